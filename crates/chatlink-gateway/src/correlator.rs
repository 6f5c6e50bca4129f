// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Correlation of inbound Slack message events to stored conversations.
//!
//! Events arrive with a `thread_ts` naming the thread the operator replied
//! in; that key matches a conversation's `slack_thread_ts` exactly. Events
//! without a usable thread key fall back to the most recently updated active
//! conversation, which is only safe while a single operator workspace feeds
//! this instance.

use chatlink_core::time::slack_ts_to_timestamp;
use chatlink_core::{ChatlinkError, ConversationStore, NewMessage, Sender};
use tracing::{debug, info, warn};

use crate::webhook::SlackEvent;

/// What happened to an inbound message event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrelationOutcome {
    /// Filtered out before any storage access.
    Ignored(&'static str),
    /// The event's `ts` was already stored; retried webhook delivery.
    Duplicate,
    /// Appended as an operator message.
    Recorded {
        conversation_id: i64,
        message_id: i64,
    },
    /// No thread match and no active conversation to fall back to.
    NoMatch,
}

/// Filters and correlates one `event_callback` message event.
///
/// Every branch acknowledges; only storage failures surface as errors.
pub async fn correlate(
    store: &dyn ConversationStore,
    event: &SlackEvent,
) -> Result<CorrelationOutcome, ChatlinkError> {
    if event.kind.as_deref() != Some("message") {
        return Ok(CorrelationOutcome::Ignored("not a message event"));
    }
    if event.bot_id.is_some() {
        return Ok(CorrelationOutcome::Ignored("bot message"));
    }
    if event.subtype.is_some() {
        return Ok(CorrelationOutcome::Ignored("message subtype"));
    }
    if event.channel_type.as_deref() != Some("im") {
        return Ok(CorrelationOutcome::Ignored("not a direct message"));
    }
    if event.user.is_none() {
        return Ok(CorrelationOutcome::Ignored("no user"));
    }
    let Some(text) = event.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(CorrelationOutcome::Ignored("no text"));
    };

    // Webhook deliveries are retried; an already-stored ts means this event
    // was processed on an earlier attempt.
    if let Some(ts) = event.ts.as_deref() {
        if store.get_message_by_slack_ts(ts).await?.is_some() {
            debug!(slack_ts = ts, "duplicate event delivery");
            return Ok(CorrelationOutcome::Duplicate);
        }
    }

    let conversation = match event.thread_ts.as_deref() {
        Some(thread_ts) => store.get_conversation_by_thread_ts(thread_ts).await?,
        None => None,
    };

    let conversation = match conversation {
        Some(c) => c,
        None => match store.get_recent_active_conversation().await? {
            Some(c) => {
                warn!(
                    conversation_id = c.id,
                    thread_ts = event.thread_ts.as_deref().unwrap_or(""),
                    "no thread match, attributing to most recent active conversation"
                );
                c
            }
            None => return Ok(CorrelationOutcome::NoMatch),
        },
    };

    let message = store
        .add_message(&NewMessage {
            conversation_id: conversation.id,
            sender: Sender::Operator,
            message_text: text.to_string(),
            sent_at: event.ts.as_deref().and_then(slack_ts_to_timestamp),
            slack_ts: event.ts.clone(),
        })
        .await?;

    info!(
        conversation_id = conversation.id,
        message_id = message.id,
        "operator message recorded"
    );

    Ok(CorrelationOutcome::Recorded {
        conversation_id: conversation.id,
        message_id: message.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlink_config::StorageConfig;
    use chatlink_core::NewConversation;
    use chatlink_storage::SqliteStore;
    use tempfile::TempDir;

    async fn test_store() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("chat.db").to_string_lossy().into_owned(),
        };
        let store = SqliteStore::new(config);
        store.initialize().await.unwrap();
        (store, dir)
    }

    async fn seed_conversation(store: &SqliteStore, email: &str, thread_ts: &str) -> i64 {
        store
            .create_conversation(&NewConversation {
                user_name: "John Doe".into(),
                user_email: email.into(),
                user_phone: "+1234567890".into(),
                user_company: None,
                slack_thread_ts: thread_ts.into(),
            })
            .await
            .unwrap()
            .id
    }

    fn operator_event(thread_ts: Option<&str>, ts: &str, text: &str) -> SlackEvent {
        SlackEvent {
            kind: Some("message".into()),
            subtype: None,
            bot_id: None,
            channel_type: Some("im".into()),
            user: Some("U1".into()),
            text: Some(text.into()),
            ts: Some(ts.into()),
            thread_ts: thread_ts.map(String::from),
        }
    }

    #[tokio::test]
    async fn thread_match_attributes_to_that_conversation() {
        let (store, _dir) = test_store().await;
        let id = seed_conversation(&store, "john@example.com", "1700000000.000100").await;
        // A newer active conversation that the fallback would pick.
        seed_conversation(&store, "jane@example.com", "1700000000.000200").await;

        let event = operator_event(Some("1700000000.000100"), "1700000001.000300", "reply");
        let outcome = correlate(&store, &event).await.unwrap();
        assert!(matches!(
            outcome,
            CorrelationOutcome::Recorded { conversation_id, .. } if conversation_id == id
        ));

        let messages = store.get_messages(id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::Operator);
        assert_eq!(messages[0].slack_ts.as_deref(), Some("1700000001.000300"));
        assert!(!messages[0].read_by_user);
    }

    #[tokio::test]
    async fn missing_thread_falls_back_to_recent_active() {
        let (store, _dir) = test_store().await;
        seed_conversation(&store, "john@example.com", "1700000000.000100").await;
        let recent = seed_conversation(&store, "jane@example.com", "1700000000.000200").await;

        let event = operator_event(None, "1700000001.000300", "top-level reply");
        let outcome = correlate(&store, &event).await.unwrap();
        assert!(matches!(
            outcome,
            CorrelationOutcome::Recorded { conversation_id, .. } if conversation_id == recent
        ));
    }

    #[tokio::test]
    async fn no_match_and_no_active_conversation_drops_event() {
        let (store, _dir) = test_store().await;
        let event = operator_event(None, "1700000001.000300", "orphan");
        let outcome = correlate(&store, &event).await.unwrap();
        assert_eq!(outcome, CorrelationOutcome::NoMatch);
    }

    #[tokio::test]
    async fn noise_events_are_filtered_before_storage() {
        let (store, _dir) = test_store().await;
        let id = seed_conversation(&store, "john@example.com", "1700000000.000100").await;

        let mut bot = operator_event(Some("1700000000.000100"), "1700000001.000301", "bot");
        bot.bot_id = Some("B1".into());
        let mut edited = operator_event(Some("1700000000.000100"), "1700000001.000302", "edited");
        edited.subtype = Some("message_changed".into());
        let mut channel = operator_event(Some("1700000000.000100"), "1700000001.000303", "chan");
        channel.channel_type = Some("channel".into());
        let mut anon = operator_event(Some("1700000000.000100"), "1700000001.000304", "anon");
        anon.user = None;
        let mut wrong_kind = operator_event(Some("1700000000.000100"), "1700000001.000305", "x");
        wrong_kind.kind = Some("reaction_added".into());

        for event in [bot, edited, channel, anon, wrong_kind] {
            let outcome = correlate(&store, &event).await.unwrap();
            assert!(matches!(outcome, CorrelationOutcome::Ignored(_)), "{event:?}");
        }
        assert!(store.get_messages(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn redelivered_event_is_reported_as_duplicate() {
        let (store, _dir) = test_store().await;
        let id = seed_conversation(&store, "john@example.com", "1700000000.000100").await;

        let event = operator_event(Some("1700000000.000100"), "1700000001.000300", "reply");
        correlate(&store, &event).await.unwrap();
        let second = correlate(&store, &event).await.unwrap();
        assert_eq!(second, CorrelationOutcome::Duplicate);
        assert_eq!(store.get_messages(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn event_ts_becomes_message_sent_at() {
        let (store, _dir) = test_store().await;
        let id = seed_conversation(&store, "john@example.com", "1700000000.000100").await;

        let event = operator_event(Some("1700000000.000100"), "1712345678.000200", "reply");
        correlate(&store, &event).await.unwrap();

        let messages = store.get_messages(id).await.unwrap();
        assert!(messages[0].sent_at.starts_with("2024-04-05T"));
    }
}
