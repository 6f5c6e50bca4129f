// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the gateway's read endpoints.

use std::time::Duration;

use chatlink_core::{ChatlinkError, Conversation, Message};
use serde::Deserialize;

/// Request timeout for gateway calls. Shorter than the poll interval so a
/// stalled fetch never overlaps the next tick.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(4);

/// One fetch of a conversation's state.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSnapshot {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// Client for the gateway message-fetch endpoint.
#[derive(Debug, Clone)]
pub struct SyncClient {
    client: reqwest::Client,
    base_url: String,
}

impl SyncClient {
    /// Creates a client against a gateway base URL such as
    /// `http://127.0.0.1:8787`.
    pub fn new(base_url: String) -> Result<Self, ChatlinkError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ChatlinkError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, base_url })
    }

    /// Fetches the conversation and its full message history.
    ///
    /// With `mark_as_read` the gateway flips unread operator messages before
    /// returning, so the snapshot reflects the post-read state. An unknown
    /// conversation id surfaces as [`ChatlinkError::NotFound`] so the caller
    /// can discard its resume record.
    pub async fn fetch_messages(
        &self,
        conversation_id: i64,
        mark_as_read: bool,
    ) -> Result<FetchSnapshot, ChatlinkError> {
        let url = format!(
            "{}/api/chat/conversations/{conversation_id}/messages?markAsRead={mark_as_read}",
            self.base_url
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ChatlinkError::Upstream {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ChatlinkError::NotFound(format!(
                "conversation {conversation_id} not found"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatlinkError::Upstream {
                message: format!("gateway returned {status}: {body}"),
                source: None,
            });
        }

        response
            .json::<FetchSnapshot>()
            .await
            .map_err(|e| ChatlinkError::Upstream {
                message: format!("failed to parse fetch response: {e}"),
                source: Some(Box::new(e)),
            })
    }
}
