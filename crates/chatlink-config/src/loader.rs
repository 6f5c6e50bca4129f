// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./chatlink.toml` > `~/.config/chatlink/chatlink.toml`
//! > `/etc/chatlink/chatlink.toml` with environment variable overrides via the
//! `CHATLINK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ChatlinkConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/chatlink/chatlink.toml` (system-wide)
/// 3. `~/.config/chatlink/chatlink.toml` (user XDG config)
/// 4. `./chatlink.toml` (local directory)
/// 5. `CHATLINK_*` environment variables
pub fn load_config() -> Result<ChatlinkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatlinkConfig::default()))
        .merge(Toml::file("/etc/chatlink/chatlink.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("chatlink/chatlink.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("chatlink.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<ChatlinkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatlinkConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ChatlinkConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatlinkConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `CHATLINK_SLACK_BOT_TOKEN` must map to
/// `slack.bot_token`, not `slack.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("CHATLINK_").map(|key| {
        // The key arrives in the env var's original casing with the prefix
        // stripped. Example: CHATLINK_SLACK_BOT_TOKEN -> "SLACK_BOT_TOKEN"
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("slack_", "slack.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("sync_", "sync.", 1);
        mapped.into()
    })
}
