// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the chat widget API and
//! the Slack events webhook.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use chatlink_config::ServerConfig;
use chatlink_core::{ChatlinkError, ConversationStore, Notifier};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::webhook;

/// Shared state for axum request handlers.
///
/// The notifier is absent when Slack credentials are not configured; routes
/// that require one fail with a configuration error while read paths and the
/// webhook keep working.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ConversationStore>,
    pub notifier: Option<Arc<dyn Notifier>>,
}

/// Builds the gateway router.
///
/// Factored out of [`start_server`] so tests can drive it with
/// `tower::ServiceExt::oneshot` without binding a socket.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route(
            "/api/chat/conversations",
            post(handlers::create_conversation),
        )
        .route(
            "/api/chat/conversations/{id}",
            get(handlers::get_conversation),
        )
        .route(
            "/api/chat/conversations/{id}/messages",
            post(handlers::post_message).get(handlers::get_messages),
        )
        .route("/api/slack/events", post(webhook::slack_events))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the gateway HTTP server and serves until the task is dropped.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), ChatlinkError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ChatlinkError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| ChatlinkError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
