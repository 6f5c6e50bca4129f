// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notifier for deterministic testing.
//!
//! `MockNotifier` implements `Notifier` with a scriptable outcome queue,
//! enabling fast, CI-runnable tests without a Slack workspace.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chatlink_core::{Notifier, NotifyMeta, NotifyOutcome};

/// One recorded `notify` invocation.
#[derive(Debug, Clone)]
pub struct NotifyCall {
    pub thread_ts: Option<String>,
    pub text: String,
    pub meta: NotifyMeta,
}

/// A mock notifier that records calls and replays scripted outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, delivery
/// succeeds with a fresh synthetic thread timestamp.
pub struct MockNotifier {
    outcomes: Mutex<VecDeque<NotifyOutcome>>,
    calls: Mutex<Vec<NotifyCall>>,
    counter: AtomicU64,
}

impl MockNotifier {
    /// Create a mock notifier whose deliveries all succeed.
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            counter: AtomicU64::new(100),
        }
    }

    /// Queue an outcome for the next call.
    pub fn push_outcome(&self, outcome: NotifyOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    /// Queue a delivery failure for the next call.
    pub fn push_failure(&self, reason: &str) {
        self.push_outcome(NotifyOutcome::Failed {
            reason: reason.to_string(),
        });
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<NotifyCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(
        &self,
        thread_ts: Option<&str>,
        text: &str,
        meta: &NotifyMeta,
    ) -> NotifyOutcome {
        self.calls.lock().unwrap().push(NotifyCall {
            thread_ts: thread_ts.map(String::from),
            text: text.to_string(),
            meta: meta.clone(),
        });

        if let Some(outcome) = self.outcomes.lock().unwrap().pop_front() {
            return outcome;
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        NotifyOutcome::Delivered {
            external_id: format!("1700000000.{n:06}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> NotifyMeta {
        NotifyMeta {
            name: "John Doe".into(),
            email: "john@example.com".into(),
            phone: "+1234567890".into(),
            company: None,
        }
    }

    #[tokio::test]
    async fn default_deliveries_get_distinct_thread_ids() {
        let notifier = MockNotifier::new();
        let first = notifier.notify(None, "a", &meta()).await;
        let second = notifier.notify(None, "b", &meta()).await;
        let (NotifyOutcome::Delivered { external_id: a }, NotifyOutcome::Delivered { external_id: b }) =
            (first, second)
        else {
            panic!("expected deliveries");
        };
        assert_ne!(a, b);
        assert_eq!(notifier.call_count(), 2);
    }

    #[tokio::test]
    async fn scripted_outcomes_are_replayed_in_order() {
        let notifier = MockNotifier::new();
        notifier.push_failure("invalid_auth");
        let first = notifier.notify(None, "a", &meta()).await;
        assert!(matches!(first, NotifyOutcome::Failed { .. }));
        let second = notifier.notify(None, "b", &meta()).await;
        assert!(matches!(second, NotifyOutcome::Delivered { .. }));
    }
}
