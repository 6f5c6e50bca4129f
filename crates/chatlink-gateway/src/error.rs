// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP error mapping for the gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chatlink_core::ChatlinkError;
use serde::Serialize;
use tracing::error;

/// Error body returned by every failing gateway route.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// Wrapper turning [`ChatlinkError`] into an HTTP response.
///
/// Validation and not-found messages are safe to echo to the client; storage
/// and internal details are logged and replaced with a generic body.
#[derive(Debug)]
pub struct ApiError(pub ChatlinkError);

impl From<ChatlinkError> for ApiError {
    fn from(e: ChatlinkError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            ChatlinkError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ChatlinkError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ChatlinkError::Config(msg) => {
                error!(detail = %msg, "configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "service is not configured for this operation".to_string(),
                )
            }
            ChatlinkError::Upstream { message, .. } => {
                error!(detail = %message, "upstream notification error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ChatlinkError::Storage { source } => {
                error!(detail = %source, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage failure".to_string(),
                )
            }
            ChatlinkError::Internal(msg) => {
                error!(detail = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}
