// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a gateway router over a temp SQLite store and a
//! [`MockNotifier`], and drives it with in-process HTTP requests through
//! `tower::ServiceExt::oneshot`, so no port is bound.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chatlink_config::StorageConfig;
use chatlink_core::{ChatlinkError, ConversationStore, Notifier};
use chatlink_gateway::{router, AppState};
use chatlink_storage::SqliteStore;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::mock_notifier::MockNotifier;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    with_notifier: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self { with_notifier: true }
    }

    /// Build a gateway with no notifier, as when Slack credentials are
    /// missing from configuration.
    pub fn without_notifier(mut self) -> Self {
        self.with_notifier = false;
        self
    }

    /// Build the test harness, creating the temp store.
    pub async fn build(self) -> Result<TestHarness, ChatlinkError> {
        let temp_dir = TempDir::new().map_err(|e| ChatlinkError::Storage {
            source: Box::new(e),
        })?;
        let storage_config = StorageConfig {
            database_path: temp_dir
                .path()
                .join("test.db")
                .to_string_lossy()
                .into_owned(),
        };
        let store = SqliteStore::new(storage_config);
        store.initialize().await?;
        let store: Arc<dyn ConversationStore> = Arc::new(store);

        let notifier = Arc::new(MockNotifier::new());
        let state = AppState {
            store: store.clone(),
            notifier: self
                .with_notifier
                .then(|| notifier.clone() as Arc<dyn Notifier>),
        };

        Ok(TestHarness {
            state,
            notifier,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete in-process gateway stack for tests.
pub struct TestHarness {
    state: AppState,
    notifier: Arc<MockNotifier>,
    _temp_dir: TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Direct store access for seeding and assertions.
    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.state.store
    }

    /// The mock notifier behind the gateway.
    pub fn notifier(&self) -> &Arc<MockNotifier> {
        &self.notifier
    }

    /// Sends a JSON POST and returns status plus parsed body.
    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Sends a POST with a raw body, for malformed-payload tests.
    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Sends a GET and returns status plus parsed body.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(self.state.clone())
            .oneshot(request)
            .await
            .expect("router never fails");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn harness_serves_health() {
        let harness = TestHarness::builder().build().await.unwrap();
        let (status, body) = harness.get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));
    }

    #[tokio::test]
    async fn harness_without_notifier_rejects_intake() {
        let harness = TestHarness::builder().without_notifier().build().await.unwrap();
        let (status, _) = harness
            .post_json(
                "/api/chat/conversations",
                json!({
                    "name": "John Doe",
                    "email": "john@example.com",
                    "phone": "+1234567890",
                    "message": "hi",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
