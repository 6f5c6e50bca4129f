// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation store trait: durable persistence for conversations and
//! messages, the single source of truth for the correlation engine.

use async_trait::async_trait;

use crate::error::ChatlinkError;
use crate::types::{Conversation, HealthStatus, Message, NewConversation, NewMessage};

/// Durable persistence for conversations and messages.
///
/// Implementations must serialize per-conversation mutation enough to keep
/// `sent_at` totally ordered within a conversation and to preserve the
/// one-active-conversation-per-email invariant. Absent rows are `None` or an
/// empty list, never an error; only storage failure is an `Err`.
#[async_trait]
pub trait ConversationStore: Send + Sync + 'static {
    /// Opens the backend and runs pending migrations.
    async fn initialize(&self) -> Result<(), ChatlinkError>;

    /// Flushes pending writes and releases the backend.
    async fn close(&self) -> Result<(), ChatlinkError>;

    /// Cheap liveness probe against the backend.
    async fn health_check(&self) -> Result<HealthStatus, ChatlinkError>;

    /// Creates an active conversation. Any prior active conversation for the
    /// same email is closed in the same transaction, so the invariant holds
    /// under concurrent intakes.
    async fn create_conversation(
        &self,
        new: &NewConversation,
    ) -> Result<Conversation, ChatlinkError>;

    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>, ChatlinkError>;

    /// Looks up the conversation owning a Slack thread key. Used only by the
    /// inbound correlator.
    async fn get_conversation_by_thread_ts(
        &self,
        thread_ts: &str,
    ) -> Result<Option<Conversation>, ChatlinkError>;

    /// The most recently updated active conversation, if any. Correlation
    /// fallback for inbound events without a usable thread key.
    async fn get_recent_active_conversation(
        &self,
    ) -> Result<Option<Conversation>, ChatlinkError>;

    /// Idempotent; succeeds when the conversation is already closed or absent.
    async fn close_conversation(&self, id: i64) -> Result<(), ChatlinkError>;

    /// Closes every active conversation for `email`; returns the number of
    /// rows affected. Idempotent.
    async fn close_active_conversations_for_email(
        &self,
        email: &str,
    ) -> Result<u64, ChatlinkError>;

    /// Appends a message and bumps the conversation's `updated_at`.
    /// `sent_at` defaults to the current time when omitted.
    async fn add_message(&self, new: &NewMessage) -> Result<Message, ChatlinkError>;

    /// All messages in ascending `sent_at` order. Empty list when the
    /// conversation has no messages or does not exist.
    async fn get_messages(&self, conversation_id: i64) -> Result<Vec<Message>, ChatlinkError>;

    /// Messages strictly after `after_timestamp` (`sent_at == after` is
    /// excluded), ascending.
    async fn get_new_messages(
        &self,
        conversation_id: i64,
        after_timestamp: &str,
    ) -> Result<Vec<Message>, ChatlinkError>;

    /// The most recent `limit` messages, returned in chronological order.
    async fn get_last_messages(
        &self,
        conversation_id: i64,
        limit: i64,
    ) -> Result<Vec<Message>, ChatlinkError>;

    /// Flags all unread operator messages as read. Idempotent; returns the
    /// number of rows flipped.
    async fn mark_messages_as_read(&self, conversation_id: i64) -> Result<u64, ChatlinkError>;

    /// All conversations for an email, most recently updated first.
    async fn get_conversations_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<Conversation>, ChatlinkError>;

    /// Finds a stored message by its Slack message id. Used by the correlator
    /// to drop retried webhook deliveries.
    async fn get_message_by_slack_ts(
        &self,
        slack_ts: &str,
    ) -> Result<Option<Message>, ChatlinkError>;

    /// Count of operator messages the visitor has not fetched yet.
    async fn unread_operator_count(&self, conversation_id: i64) -> Result<u64, ChatlinkError>;
}
