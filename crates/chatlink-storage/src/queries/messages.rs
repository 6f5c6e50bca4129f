// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message append and read operations.
//!
//! Messages are append-only. The only mutation is the `read_by_user` flag,
//! expressed as an atomic UPDATE so concurrent appenders are never clobbered.

use chatlink_core::ChatlinkError;
use chatlink_core::time::now_timestamp;
use chatlink_core::types::{Message, NewMessage, Sender};
use rusqlite::params;

use crate::database::Database;

const SELECT_COLUMNS: &str = "SELECT id, conversation_id, sender, message_text, sent_at, \
     read_by_user, slack_ts FROM messages";

pub(crate) fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let sender: String = row.get(2)?;
    let sender: Sender = sender.parse().map_err(|e: strum::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Message {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        sender,
        message_text: row.get(3)?,
        sent_at: row.get(4)?,
        read_by_user: row.get(5)?,
        slack_ts: row.get(6)?,
    })
}

/// Append a message and bump the conversation's `updated_at`.
///
/// `sent_at` defaults to the current time. A supplied timestamp earlier than
/// the conversation's latest message (a late-arriving Slack event ts) is
/// clamped up to it, keeping insertion order equal to chronological order
/// within the conversation.
pub async fn add_message(db: &Database, new: &NewMessage) -> Result<Message, ChatlinkError> {
    let new = new.clone();
    db.connection()
        .call(move |conn| {
            let now = now_timestamp();
            let tx = conn.transaction()?;

            let latest: Option<String> = tx.query_row(
                "SELECT MAX(sent_at) FROM messages WHERE conversation_id = ?1",
                params![new.conversation_id],
                |row| row.get(0),
            )?;

            let mut sent_at = new.sent_at.clone().unwrap_or_else(|| now.clone());
            if let Some(latest) = latest {
                if sent_at < latest {
                    sent_at = latest;
                }
            }

            tx.execute(
                "INSERT INTO messages
                     (conversation_id, sender, message_text, sent_at, read_by_user, slack_ts)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5)",
                params![
                    new.conversation_id,
                    new.sender.to_string(),
                    new.message_text,
                    sent_at,
                    new.slack_ts,
                ],
            )?;
            let id = tx.last_insert_rowid();

            tx.execute(
                "UPDATE conversations SET updated_at = ?1 WHERE id = ?2",
                params![now, new.conversation_id],
            )?;

            let message = tx.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                row_to_message,
            )?;
            tx.commit()?;
            Ok(message)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All messages for a conversation in ascending `sent_at` order. Empty list
/// when there are none or the conversation is absent.
pub async fn get_messages(
    db: &Database,
    conversation_id: i64,
) -> Result<Vec<Message>, ChatlinkError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} WHERE conversation_id = ?1 ORDER BY sent_at ASC, id ASC"
            ))?;
            let rows = stmt.query_map(params![conversation_id], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Messages strictly after `after_timestamp`; exact equality is excluded.
pub async fn get_new_messages(
    db: &Database,
    conversation_id: i64,
    after_timestamp: &str,
) -> Result<Vec<Message>, ChatlinkError> {
    let after = after_timestamp.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} WHERE conversation_id = ?1 AND sent_at > ?2
                 ORDER BY sent_at ASC, id ASC"
            ))?;
            let rows = stmt.query_map(params![conversation_id, after], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The most recent `limit` messages, returned in chronological order.
pub async fn get_last_messages(
    db: &Database,
    conversation_id: i64,
    limit: i64,
) -> Result<Vec<Message>, ChatlinkError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} WHERE conversation_id = ?1
                 ORDER BY sent_at DESC, id DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![conversation_id, limit], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            messages.reverse();
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flag all unread operator messages as read. Idempotent; returns the number
/// of rows flipped.
pub async fn mark_messages_as_read(
    db: &Database,
    conversation_id: i64,
) -> Result<u64, ChatlinkError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE messages SET read_by_user = 1
                 WHERE conversation_id = ?1 AND sender = 'operator' AND read_by_user = 0",
                params![conversation_id],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Find a message by its Slack message id. Used for inbound dedup.
pub async fn get_message_by_slack_ts(
    db: &Database,
    slack_ts: &str,
) -> Result<Option<Message>, ChatlinkError> {
    let slack_ts = slack_ts.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE slack_ts = ?1"),
                params![slack_ts],
                row_to_message,
            );
            match result {
                Ok(message) => Ok(Some(message)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count of operator messages the visitor has not fetched yet.
pub async fn unread_operator_count(
    db: &Database,
    conversation_id: i64,
) -> Result<u64, ChatlinkError> {
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM messages
                 WHERE conversation_id = ?1 AND sender = 'operator' AND read_by_user = 0",
                params![conversation_id],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
