// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Chatlink.
//!
//! Exposes the chat widget REST API (intake, replies, fetches) and the Slack
//! Events API webhook, backed by a [`ConversationStore`] and an optional
//! [`Notifier`].
//!
//! [`ConversationStore`]: chatlink_core::ConversationStore
//! [`Notifier`]: chatlink_core::Notifier

pub mod correlator;
pub mod error;
pub mod handlers;
pub mod server;
pub mod webhook;

pub use server::{router, start_server, AppState};
