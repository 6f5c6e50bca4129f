// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack Events API webhook endpoint.
//!
//! Slack expects a 200 acknowledgment regardless of business outcome, so
//! every recognized payload answers 200 and only unparseable bodies or
//! storage failures answer 500. The body is parsed by hand from raw bytes
//! rather than through the `Json` extractor to keep that contract.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{debug, error};

use crate::correlator;
use crate::error::ApiError;
use crate::server::AppState;

/// Envelope of an Events API delivery.
///
/// Unknown fields are tolerated; Slack adds envelope keys freely.
#[derive(Debug, Deserialize)]
pub struct SlackEventPayload {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub challenge: Option<String>,
    pub event: Option<SlackEvent>,
}

/// Inner event of an `event_callback` delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackEvent {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subtype: Option<String>,
    pub bot_id: Option<String>,
    pub channel_type: Option<String>,
    pub user: Option<String>,
    pub text: Option<String>,
    pub ts: Option<String>,
    pub thread_ts: Option<String>,
}

/// POST /api/slack/events
pub async fn slack_events(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: SlackEventPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "unparseable Slack event payload");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "message": "unparseable event payload",
                })),
            )
                .into_response();
        }
    };

    match payload.kind.as_deref() {
        Some("url_verification") => {
            let challenge = payload.challenge.unwrap_or_default();
            Json(serde_json::json!({ "challenge": challenge })).into_response()
        }
        Some("event_callback") => {
            let Some(event) = payload.event else {
                debug!("event_callback with no event body");
                return ok_response();
            };
            match correlator::correlate(state.store.as_ref(), &event).await {
                Ok(outcome) => {
                    debug!(?outcome, "event processed");
                    ok_response()
                }
                Err(e) => ApiError(e).into_response(),
            }
        }
        _ => {
            debug!(kind = payload.kind.as_deref().unwrap_or(""), "ignoring event type");
            ok_response()
        }
    }
}

fn ok_response() -> Response {
    Json(serde_json::json!({ "ok": true })).into_response()
}
