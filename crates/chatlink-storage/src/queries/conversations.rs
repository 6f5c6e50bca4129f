// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation CRUD and lifecycle operations.

use chatlink_core::ChatlinkError;
use chatlink_core::time::now_timestamp;
use chatlink_core::types::{Conversation, ConversationStatus, NewConversation};
use rusqlite::params;

use crate::database::Database;

const SELECT_COLUMNS: &str = "SELECT id, user_name, user_email, user_phone, user_company, \
     slack_thread_ts, status, created_at, updated_at FROM conversations";

pub(crate) fn row_to_conversation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    let status: String = row.get(6)?;
    let status: ConversationStatus = status.parse().map_err(|e: strum::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Conversation {
        id: row.get(0)?,
        user_name: row.get(1)?,
        user_email: row.get(2)?,
        user_phone: row.get(3)?,
        user_company: row.get(4)?,
        slack_thread_ts: row.get(5)?,
        status,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Create a new active conversation.
///
/// Any prior active conversation for the same email is closed inside the
/// same transaction, so "at most one active conversation per email" holds
/// even under concurrent intakes.
pub async fn create_conversation(
    db: &Database,
    new: &NewConversation,
) -> Result<Conversation, ChatlinkError> {
    let new = new.clone();
    db.connection()
        .call(move |conn| {
            let now = now_timestamp();
            let tx = conn.transaction()?;
            tx.execute(
                "UPDATE conversations SET status = 'closed', updated_at = ?1
                 WHERE user_email = ?2 AND status = 'active'",
                params![now, new.user_email],
            )?;
            tx.execute(
                "INSERT INTO conversations
                     (user_name, user_email, user_phone, user_company,
                      slack_thread_ts, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 'active', ?6, ?6)",
                params![
                    new.user_name,
                    new.user_email,
                    new.user_phone,
                    new.user_company,
                    new.slack_thread_ts,
                    now,
                ],
            )?;
            let id = tx.last_insert_rowid();
            let conversation = tx.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_conversation,
            )?;
            tx.commit()?;
            Ok(conversation)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a conversation by id. Absent rows are `None`, not an error.
pub async fn get_conversation(
    db: &Database,
    id: i64,
) -> Result<Option<Conversation>, ChatlinkError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_conversation,
            );
            match result {
                Ok(conversation) => Ok(Some(conversation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up the conversation owning a Slack thread key.
pub async fn get_conversation_by_thread_ts(
    db: &Database,
    thread_ts: &str,
) -> Result<Option<Conversation>, ChatlinkError> {
    let thread_ts = thread_ts.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE slack_thread_ts = ?1"),
                params![thread_ts],
                row_to_conversation,
            );
            match result {
                Ok(conversation) => Ok(Some(conversation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The most recently updated active conversation, if any.
pub async fn get_recent_active_conversation(
    db: &Database,
) -> Result<Option<Conversation>, ChatlinkError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!(
                    "{SELECT_COLUMNS} WHERE status = 'active'
                     ORDER BY updated_at DESC, id DESC LIMIT 1"
                ),
                [],
                row_to_conversation,
            );
            match result {
                Ok(conversation) => Ok(Some(conversation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Close a conversation. Idempotent: closing an already-closed or absent
/// conversation succeeds and changes nothing.
pub async fn close_conversation(db: &Database, id: i64) -> Result<(), ChatlinkError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE conversations SET status = 'closed', updated_at = ?1
                 WHERE id = ?2 AND status = 'active'",
                params![now_timestamp(), id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Close every active conversation for an email. Idempotent; returns the
/// number of rows affected.
pub async fn close_active_conversations_for_email(
    db: &Database,
    email: &str,
) -> Result<u64, ChatlinkError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE conversations SET status = 'closed', updated_at = ?1
                 WHERE user_email = ?2 AND status = 'active'",
                params![now_timestamp(), email],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All conversations for an email, most recently updated first.
pub async fn get_conversations_by_email(
    db: &Database,
    email: &str,
) -> Result<Vec<Conversation>, ChatlinkError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} WHERE user_email = ?1 ORDER BY updated_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map(params![email], row_to_conversation)?;
            let mut conversations = Vec::new();
            for row in rows {
                conversations.push(row?);
            }
            Ok(conversations)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_new(email: &str, thread_ts: &str) -> NewConversation {
        NewConversation {
            user_name: "Jane Visitor".to_string(),
            user_email: email.to_string(),
            user_phone: "+1555000111".to_string(),
            user_company: None,
            slack_thread_ts: thread_ts.to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_get_round_trips() {
        let (db, _dir) = setup_db().await;
        let created = create_conversation(&db, &make_new("jane@example.com", "T1"))
            .await
            .unwrap();
        assert_eq!(created.status, ConversationStatus::Active);
        assert_eq!(created.slack_thread_ts, "T1");

        let fetched = get_conversation(&db, created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_absent_conversation_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_conversation(&db, 999).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn new_intake_supersedes_prior_active_for_same_email() {
        let (db, _dir) = setup_db().await;
        let first = create_conversation(&db, &make_new("jane@example.com", "T1"))
            .await
            .unwrap();
        let second = create_conversation(&db, &make_new("jane@example.com", "T2"))
            .await
            .unwrap();

        let first = get_conversation(&db, first.id).await.unwrap().unwrap();
        assert_eq!(first.status, ConversationStatus::Closed);

        let second = get_conversation(&db, second.id).await.unwrap().unwrap();
        assert_eq!(second.status, ConversationStatus::Active);

        // At most one active conversation per email.
        let all = get_conversations_by_email(&db, "jane@example.com")
            .await
            .unwrap();
        let active = all
            .iter()
            .filter(|c| c.status == ConversationStatus::Active)
            .count();
        assert_eq!(active, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn thread_ts_lookup_finds_exactly_one() {
        let (db, _dir) = setup_db().await;
        create_conversation(&db, &make_new("a@example.com", "T1"))
            .await
            .unwrap();
        let b = create_conversation(&db, &make_new("b@example.com", "T2"))
            .await
            .unwrap();

        let hit = get_conversation_by_thread_ts(&db, "T2").await.unwrap();
        assert_eq!(hit.unwrap().id, b.id);
        assert!(
            get_conversation_by_thread_ts(&db, "T9")
                .await
                .unwrap()
                .is_none()
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_thread_ts_is_rejected() {
        let (db, _dir) = setup_db().await;
        create_conversation(&db, &make_new("a@example.com", "T1"))
            .await
            .unwrap();
        let result = create_conversation(&db, &make_new("b@example.com", "T1")).await;
        assert!(result.is_err(), "thread key must map to exactly one conversation");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn close_conversation_is_idempotent() {
        let (db, _dir) = setup_db().await;
        let convo = create_conversation(&db, &make_new("jane@example.com", "T1"))
            .await
            .unwrap();

        close_conversation(&db, convo.id).await.unwrap();
        close_conversation(&db, convo.id).await.unwrap();
        // Closing an absent conversation also succeeds.
        close_conversation(&db, 12345).await.unwrap();

        let convo = get_conversation(&db, convo.id).await.unwrap().unwrap();
        assert_eq!(convo.status, ConversationStatus::Closed);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn close_for_email_is_idempotent_and_counts_rows() {
        let (db, _dir) = setup_db().await;
        create_conversation(&db, &make_new("jane@example.com", "T1"))
            .await
            .unwrap();

        let first = close_active_conversations_for_email(&db, "jane@example.com")
            .await
            .unwrap();
        assert_eq!(first, 1);

        let second = close_active_conversations_for_email(&db, "jane@example.com")
            .await
            .unwrap();
        assert_eq!(second, 0);

        let none = close_active_conversations_for_email(&db, "nobody@example.com")
            .await
            .unwrap();
        assert_eq!(none, 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn recent_active_prefers_latest_updated() {
        let (db, _dir) = setup_db().await;
        assert!(get_recent_active_conversation(&db).await.unwrap().is_none());

        let a = create_conversation(&db, &make_new("a@example.com", "T1"))
            .await
            .unwrap();
        let b = create_conversation(&db, &make_new("b@example.com", "T2"))
            .await
            .unwrap();

        // Same-millisecond timestamps fall back to the id tiebreak.
        let recent = get_recent_active_conversation(&db).await.unwrap().unwrap();
        assert_eq!(recent.id, b.id);

        close_conversation(&db, b.id).await.unwrap();
        let recent = get_recent_active_conversation(&db).await.unwrap().unwrap();
        assert_eq!(recent.id, a.id);
        db.close().await.unwrap();
    }
}
