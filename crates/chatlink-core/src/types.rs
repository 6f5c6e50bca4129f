// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Chatlink workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state of a conversation. At most one conversation per visitor
/// email is `Active` at any time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Closed,
}

/// Who authored a message: the website visitor or the Slack-side operator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Operator,
}

/// A correlated pair of visitor identity and Slack thread.
///
/// `slack_thread_ts` is the correlation key for inbound Slack events; it is
/// assigned exactly once, when the intake notification succeeds, and never
/// reassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub user_company: Option<String>,
    pub slack_thread_ts: String,
    pub status: ConversationStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// A single message within a conversation. Messages are append-only; the only
/// mutable field is `read_by_user`, which transitions false -> true once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender: Sender,
    pub message_text: String,
    pub sent_at: String,
    pub read_by_user: bool,
    pub slack_ts: Option<String>,
}

/// Insert payload for a new conversation.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub user_company: Option<String>,
    pub slack_thread_ts: String,
}

/// Insert payload for a new message.
///
/// `sent_at` defaults to the current server time when `None`. `slack_ts` is
/// set when the message came from, or produced, a Slack notification.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: i64,
    pub sender: Sender,
    pub message_text: String,
    pub sent_at: Option<String>,
    pub slack_ts: Option<String>,
}

/// Visitor identity attached to an outbound notification so the operator
/// sees who is talking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyMeta {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
}

/// Result of an outbound notification attempt.
///
/// Ordinary upstream rejection is `Failed`, not an error: callers choose
/// their own failure policy.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyOutcome {
    /// The notification was posted; `external_id` is the Slack message `ts`,
    /// which doubles as the thread key when opening a new thread.
    Delivered { external_id: String },
    /// The notification was rejected or could not be delivered.
    Failed { reason: String },
}

/// Health reported by storage health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}
