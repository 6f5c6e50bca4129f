// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Slack Web API `chat.postMessage` call.

use serde::{Deserialize, Serialize};

/// Request body for `chat.postMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct PostMessageRequest {
    /// Destination channel id.
    pub channel: String,
    /// Message text (Slack mrkdwn).
    pub text: String,
    /// Thread to reply within; absent when opening a new thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

/// Response body for `chat.postMessage`.
///
/// Slack signals business rejection with HTTP 200 and `ok: false`; `error`
/// then carries a short code such as `channel_not_found`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    pub ok: bool,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
