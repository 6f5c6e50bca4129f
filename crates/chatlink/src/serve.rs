// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chatlink serve` command implementation.
//!
//! Assembles the SQLite store and the Slack notifier, starts the gateway,
//! and runs until a shutdown signal arrives.

use std::sync::Arc;

use chatlink_config::ChatlinkConfig;
use chatlink_core::{ChatlinkError, ConversationStore, Notifier};
use chatlink_gateway::{start_server, AppState};
use chatlink_slack::SlackNotifier;
use chatlink_storage::SqliteStore;
use tracing::{info, warn};

/// Runs the `chatlink serve` command.
///
/// The server starts even without Slack credentials so the webhook and read
/// endpoints stay available; intake and replies then fail with a
/// configuration error until credentials are provided.
pub async fn run_serve(config: ChatlinkConfig) -> Result<(), ChatlinkError> {
    init_tracing(&config.server.log_level);

    let store = SqliteStore::new(config.storage.clone());
    store.initialize().await?;
    let store: Arc<dyn ConversationStore> = Arc::new(store);
    info!(path = %config.storage.database_path, "storage initialized");

    let notifier: Option<Arc<dyn Notifier>> =
        if config.slack.bot_token.is_some() && config.slack.channel_id.is_some() {
            Some(Arc::new(SlackNotifier::new(&config.slack)?))
        } else {
            warn!("Slack credentials not configured; intake and replies will be rejected");
            None
        };

    let state = AppState {
        store: store.clone(),
        notifier,
    };

    let server_config = config.server.clone();
    let mut server = tokio::spawn(async move { start_server(&server_config, state).await });

    tokio::select! {
        result = &mut server => {
            result.map_err(|e| ChatlinkError::Internal(format!("server task failed: {e}")))??;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            server.abort();
        }
    }

    store.close().await?;
    info!("chatlink serve shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chatlink={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
