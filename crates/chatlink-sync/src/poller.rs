// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The polling loop behind the chat widget.
//!
//! Every tick performs one fetch and feeds both the message view and the
//! unread badge from that single snapshot. Updates are emitted only when the
//! snapshot differs from the previous one, so an idle conversation produces
//! no channel traffic.

use std::time::Duration;

use chatlink_core::{ChatlinkError, Message, Sender};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::SyncClient;

/// Whether the visitor currently has the widget open.
///
/// Viewing marks fetched operator messages as read; Background leaves them
/// unread so the badge keeps counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Viewing,
    Background,
}

/// Snapshot pushed to the widget when something changed.
#[derive(Debug, Clone)]
pub struct SyncUpdate {
    pub messages: Vec<Message>,
    pub unread_count: u64,
}

/// Unread operator messages in a snapshot.
pub fn unread_count(messages: &[Message]) -> u64 {
    messages
        .iter()
        .filter(|m| m.sender == Sender::Operator && !m.read_by_user)
        .count() as u64
}

/// Fingerprint of a snapshot for change detection.
fn fingerprint(messages: &[Message], unread: u64) -> (usize, Option<i64>, u64) {
    (messages.len(), messages.last().map(|m| m.id), unread)
}

/// Spawns the sync loop for one conversation.
///
/// The loop runs until the token is cancelled, the update receiver is
/// dropped, or the gateway reports the conversation gone. Transient fetch
/// failures are logged and the next tick retries; the conversation's state
/// is re-fetched whole each time, so a missed tick loses nothing.
pub fn spawn(
    client: SyncClient,
    conversation_id: i64,
    poll_interval: Duration,
    mut mode: watch::Receiver<SyncMode>,
    cancel: CancellationToken,
) -> (mpsc::Receiver<SyncUpdate>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(8);

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_seen: Option<(usize, Option<i64>, u64)> = None;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(conversation_id, "sync loop cancelled");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let viewing = *mode.borrow_and_update() == SyncMode::Viewing;
            let snapshot = match client.fetch_messages(conversation_id, viewing).await {
                Ok(s) => s,
                Err(ChatlinkError::NotFound(_)) => {
                    warn!(conversation_id, "conversation gone, stopping sync loop");
                    break;
                }
                Err(e) => {
                    warn!(conversation_id, error = %e, "fetch failed, will retry next tick");
                    continue;
                }
            };

            let unread = unread_count(&snapshot.messages);
            let seen = fingerprint(&snapshot.messages, unread);
            if last_seen.as_ref() == Some(&seen) {
                continue;
            }
            last_seen = Some(seen);

            let update = SyncUpdate {
                messages: snapshot.messages,
                unread_count: unread,
            };
            if tx.send(update).await.is_err() {
                debug!(conversation_id, "update receiver dropped, stopping sync loop");
                break;
            }
        }
    });

    (rx, handle)
}
