// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Chatlink.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Chatlink configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; the Slack credentials are the only fields with no usable default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatlinkConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Slack notifier settings.
    #[serde(default)]
    pub slack: SlackConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Client sync loop settings.
    #[serde(default)]
    pub sync: SyncConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Slack notifier configuration.
///
/// `bot_token` and `channel_id` are both required for outbound notifications;
/// when either is missing the gateway runs without a notifier and write paths
/// that need one fail with a configuration error.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`) used as bearer auth against the Slack Web API.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Destination channel for new-conversation threads.
    #[serde(default)]
    pub channel_id: Option<String>,

    /// Slack Web API base URL. Overridden in tests.
    #[serde(default = "default_slack_api_base_url")]
    pub api_base_url: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            channel_id: None,
            api_base_url: default_slack_api_base_url(),
        }
    }
}

fn default_slack_api_base_url() -> String {
    "https://slack.com/api".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "chatlink.db".to_string()
}

/// Client sync loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Polling interval in seconds for the widget sync loop.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Lifetime in days of the client-side resume record.
    #[serde(default = "default_resume_ttl_days")]
    pub resume_ttl_days: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            resume_ttl_days: default_resume_ttl_days(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_resume_ttl_days() -> i64 {
    7
}
