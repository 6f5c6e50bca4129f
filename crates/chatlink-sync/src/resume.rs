// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resume record for reconnecting a returning visitor.
//!
//! The widget persists the conversation id it was attached to; on the next
//! visit the record is restored if it is younger than the configured TTL.
//! Staleness is judged at restore time, so a record written under one TTL
//! honors whatever TTL is current when it is read back.

use std::path::Path;

use chatlink_core::time::{now_timestamp, parse_timestamp};
use chatlink_core::ChatlinkError;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Persisted pointer to the visitor's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub conversation_id: i64,
    pub saved_at: String,
}

impl ResumeRecord {
    pub fn new(conversation_id: i64) -> Self {
        Self {
            conversation_id,
            saved_at: now_timestamp(),
        }
    }

    /// Writes the record as JSON, replacing any previous one.
    pub fn save(&self, path: &Path) -> Result<(), ChatlinkError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ChatlinkError::Internal(format!("failed to encode resume record: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| ChatlinkError::Internal(format!("failed to write resume record: {e}")))?;
        Ok(())
    }

    /// Restores a record if one exists and is younger than `ttl_days`.
    ///
    /// A stale or unreadable record is deleted and reported as absent; the
    /// visitor simply starts a fresh conversation.
    pub fn restore(path: &Path, ttl_days: i64) -> Option<Self> {
        let raw = std::fs::read_to_string(path).ok()?;
        let record: Self = match serde_json::from_str(&raw) {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "discarding unreadable resume record");
                let _ = std::fs::remove_file(path);
                return None;
            }
        };

        let Some(saved_at) = parse_timestamp(&record.saved_at) else {
            debug!("discarding resume record with malformed timestamp");
            let _ = std::fs::remove_file(path);
            return None;
        };

        if Utc::now() - saved_at > Duration::days(ttl_days) {
            debug!(
                conversation_id = record.conversation_id,
                "discarding expired resume record"
            );
            let _ = std::fs::remove_file(path);
            return None;
        }

        Some(record)
    }

    /// Removes the record, succeeding even if none exists.
    pub fn discard(path: &Path) {
        let _ = std::fs::remove_file(path);
    }
}
