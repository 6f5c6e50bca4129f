// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use chatlink_core::ChatlinkError;

/// Handle to the single SQLite connection.
///
/// Opening runs PRAGMA setup (WAL, foreign keys, busy timeout) and all
/// pending refinery migrations. Query modules accept `&Database` and go
/// through [`Database::connection`].
#[derive(Debug)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, configure pragmas, and run
    /// migrations.
    pub async fn open(path: &str) -> Result<Self, ChatlinkError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| ChatlinkError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(std::time::Duration::from_millis(5_000))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        // Migrations report through ChatlinkError already; unwrap the closure
        // error instead of double-wrapping it.
        conn.call(|conn| crate::migrations::run_migrations(conn))
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(e) => e,
                e => ChatlinkError::Storage {
                    source: e.to_string().into(),
                },
            })?;

        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL. Called before shutdown so the main database file
    /// is current on disk.
    pub async fn close(&self) -> Result<(), ChatlinkError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Map a tokio-rusqlite error into the storage error variant.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> ChatlinkError {
    ChatlinkError::Storage {
        source: Box::new(e),
    }
}
