// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Chatlink integration tests.
//!
//! Provides a mock notifier and a gateway test harness for fast,
//! deterministic, CI-runnable tests without a Slack workspace.
//!
//! # Components
//!
//! - [`MockNotifier`] - Scriptable notifier recording every call
//! - [`TestHarness`] - In-process gateway over a temp SQLite store

pub mod harness;
pub mod mock_notifier;

pub use harness::TestHarness;
pub use mock_notifier::{MockNotifier, NotifyCall};
