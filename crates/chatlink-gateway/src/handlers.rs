// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the chat widget API.
//!
//! Handles conversation intake, visitor replies, and message fetches. Bodies
//! are taken as raw JSON values so field validation produces 400s with
//! consistent error bodies instead of extractor rejections.

use axum::extract::{Path, Query, State};
use axum::Json;
use chatlink_core::{
    ChatlinkError, Conversation, Message, NewConversation, NewMessage, NotifyMeta, NotifyOutcome,
    Sender,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::server::AppState;

/// Response body for conversation intake.
#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub success: bool,
    pub message: String,
    pub conversation_id: i64,
}

/// Response body for a visitor reply.
#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub success: bool,
    pub message: String,
    /// Present when the message was persisted but Slack delivery failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_warning: Option<String>,
}

/// Response body for a message fetch.
#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// Response body for a single conversation lookup.
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversation: Conversation,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Query parameters for the message fetch route.
#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    /// Whether to flip unread operator messages to read. Defaults to true.
    #[serde(rename = "markAsRead", default = "default_mark_as_read")]
    pub mark_as_read: bool,
}

fn default_mark_as_read() -> bool {
    true
}

fn required_str(body: &Value, field: &str) -> Result<String, ChatlinkError> {
    match body.get(field).and_then(Value::as_str).map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ChatlinkError::Validation(format!("{field} is required"))),
    }
}

fn optional_str(body: &Value, field: &str) -> Option<String> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn parse_conversation_id(raw: &str) -> Result<i64, ChatlinkError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ChatlinkError::Validation(format!(
            "invalid conversation id: {raw}"
        ))),
    }
}

/// Renders the operator ping for a visitor reply: the last few exchanges so
/// the operator has context without leaving Slack.
fn render_reply_notification(context: &[Message]) -> String {
    context
        .iter()
        .map(|m| {
            let who = match m.sender {
                Sender::User => "Visitor",
                Sender::Operator => "You",
            };
            format!("{who}: {}", m.message_text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// POST /api/chat/conversations
///
/// Conversation intake. The Slack notification must succeed before anything
/// is written; a visitor submission with no operator thread behind it would
/// otherwise be stranded where nobody sees it.
pub async fn create_conversation(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<IntakeResponse>, ApiError> {
    let name = required_str(&body, "name")?;
    let email = required_str(&body, "email")?;
    let phone = required_str(&body, "phone")?;
    let message = required_str(&body, "message")?;
    let company = optional_str(&body, "company");

    let notifier = state.notifier.as_ref().ok_or_else(|| {
        ChatlinkError::Config("notifier credentials are not configured".to_string())
    })?;

    // One active conversation per email; supersede any prior ones up front.
    state
        .store
        .close_active_conversations_for_email(&email)
        .await?;

    let meta = NotifyMeta {
        name: name.clone(),
        email: email.clone(),
        phone: phone.clone(),
        company: company.clone(),
    };
    let external_id = match notifier.notify(None, &message, &meta).await {
        NotifyOutcome::Delivered { external_id } => external_id,
        NotifyOutcome::Failed { reason } => {
            return Err(ChatlinkError::Upstream {
                message: format!("Slack notification failed: {reason}"),
                source: None,
            }
            .into());
        }
    };

    let conversation = state
        .store
        .create_conversation(&NewConversation {
            user_name: name,
            user_email: email,
            user_phone: phone,
            user_company: company,
            slack_thread_ts: external_id.clone(),
        })
        .await?;

    state
        .store
        .add_message(&NewMessage {
            conversation_id: conversation.id,
            sender: Sender::User,
            message_text: message,
            sent_at: None,
            slack_ts: Some(external_id),
        })
        .await?;

    info!(conversation_id = conversation.id, "conversation created");

    Ok(Json(IntakeResponse {
        success: true,
        message: "Conversation created".to_string(),
        conversation_id: conversation.id,
    }))
}

/// POST /api/chat/conversations/{id}/messages
///
/// Visitor reply into an existing conversation. The message is persisted
/// before any external call; a Slack outage degrades to a warning in the
/// response rather than losing the reply.
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let id = parse_conversation_id(&id)?;
    let message = required_str(&body, "message")?;

    let conversation = state
        .store
        .get_conversation(id)
        .await?
        .ok_or_else(|| ChatlinkError::NotFound(format!("conversation {id} not found")))?;

    state
        .store
        .add_message(&NewMessage {
            conversation_id: conversation.id,
            sender: Sender::User,
            message_text: message,
            sent_at: None,
            slack_ts: None,
        })
        .await?;

    let notifier = state.notifier.as_ref().ok_or_else(|| {
        ChatlinkError::Config("notifier credentials are not configured".to_string())
    })?;

    let meta = NotifyMeta {
        name: conversation.user_name.clone(),
        email: conversation.user_email.clone(),
        phone: conversation.user_phone.clone(),
        company: conversation.user_company.clone(),
    };
    let context = state.store.get_last_messages(id, 3).await?;
    let text = render_reply_notification(&context);
    let slack_warning = match notifier
        .notify(Some(&conversation.slack_thread_ts), &text, &meta)
        .await
    {
        NotifyOutcome::Delivered { .. } => None,
        NotifyOutcome::Failed { reason } => {
            warn!(conversation_id = id, reason = %reason, "reply persisted but Slack delivery failed");
            Some(
                "Slack notification failed; the operator may not see this message immediately"
                    .to_string(),
            )
        }
    };

    Ok(Json(ReplyResponse {
        success: true,
        message: "Message sent".to_string(),
        slack_warning,
    }))
}

/// GET /api/chat/conversations/{id}/messages
///
/// Fetches the full message history. With `markAsRead` (the default), unread
/// operator messages are flipped first so the returned rows reflect the
/// post-read state.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FetchQuery>,
) -> Result<Json<FetchResponse>, ApiError> {
    let id = parse_conversation_id(&id)?;

    let conversation = state
        .store
        .get_conversation(id)
        .await?
        .ok_or_else(|| ChatlinkError::NotFound(format!("conversation {id} not found")))?;

    if query.mark_as_read {
        state.store.mark_messages_as_read(id).await?;
    }
    let messages = state.store.get_messages(id).await?;

    Ok(Json(FetchResponse {
        conversation,
        messages,
    }))
}

/// GET /api/chat/conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let id = parse_conversation_id(&id)?;
    let conversation = state
        .store
        .get_conversation(id)
        .await?
        .ok_or_else(|| ChatlinkError::NotFound(format!("conversation {id} not found")))?;

    Ok(Json(ConversationResponse { conversation }))
}

/// GET /health
pub async fn get_health(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    match state.store.health_check().await? {
        chatlink_core::HealthStatus::Healthy => Ok(Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })),
        chatlink_core::HealthStatus::Unhealthy(reason) => {
            Err(ChatlinkError::Internal(format!("storage unhealthy: {reason}")).into())
        }
    }
}
