// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Chatlink.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use chatlink_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! ```

#![allow(clippy::result_large_err)]

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ChatlinkConfig, ServerConfig, SlackConfig, StorageConfig, SyncConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid `ChatlinkConfig` or a list of human-readable error
/// lines for the binary to print.
pub fn load_and_validate() -> Result<ChatlinkConfig, Vec<String>> {
    match loader::load_config() {
        Ok(config) => {
            validate(&config)?;
            Ok(config)
        }
        Err(err) => Err(err.into_iter().map(|e| e.to_string()).collect()),
    }
}

/// Semantic checks that serde attributes cannot express. Collects all errors
/// instead of failing fast.
fn validate(config: &ChatlinkConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push("server.host must not be empty".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push("storage.database_path must not be empty".to_string());
    }

    if config.sync.poll_interval_secs == 0 {
        errors.push("sync.poll_interval_secs must be at least 1".to_string());
    }

    if config.sync.resume_ttl_days < 1 {
        errors.push(format!(
            "sync.resume_ttl_days must be at least 1, got {}",
            config.sync.resume_ttl_days
        ));
    }

    // A token without a channel (or vice versa) is always a deploy mistake:
    // the notifier needs both.
    match (&config.slack.bot_token, &config.slack.channel_id) {
        (Some(_), None) => {
            errors.push("slack.bot_token is set but slack.channel_id is missing".to_string());
        }
        (None, Some(_)) => {
            errors.push("slack.channel_id is set but slack.bot_token is missing".to_string());
        }
        _ => {}
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
