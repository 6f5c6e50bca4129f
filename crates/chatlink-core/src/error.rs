// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Chatlink conversation engine.

use thiserror::Error;

/// The primary error type used across all Chatlink crates.
///
/// Variants carry the error taxonomy the gateway maps onto HTTP statuses:
/// `Validation` is 400, `NotFound` is 404, everything else is 500. Upstream
/// notifier failure is policy-dependent at the call site -- fatal at intake,
/// degraded to a warning on the reply path.
#[derive(Debug, Error)]
pub enum ChatlinkError {
    /// Caller-fixable input problem (missing field, empty message, bad id).
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced conversation does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Deployment or credentials problem (missing Slack token or channel).
    #[error("configuration error: {0}")]
    Config(String),

    /// External notification channel failure (transport error, Slack rejection).
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
