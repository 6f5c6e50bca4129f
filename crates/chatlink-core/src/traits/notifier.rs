// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound notifier trait for the external operator channel.

use async_trait::async_trait;

use crate::types::{NotifyMeta, NotifyOutcome};

/// Posts a message to the operator's external channel.
///
/// With `thread_ts = None` the notifier opens a new thread and returns its
/// identifier as `external_id`; with a thread key it posts a reply within
/// that thread. Ordinary upstream rejection is reported as
/// [`NotifyOutcome::Failed`], never as a panic or error -- callers own the
/// failure policy. Missing credentials are handled before this trait is ever
/// reached (the gateway holds no notifier at all in that case).
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(
        &self,
        thread_ts: Option<&str>,
        text: &str,
        meta: &NotifyMeta,
    ) -> NotifyOutcome;
}
