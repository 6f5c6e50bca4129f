// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ConversationStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use chatlink_config::model::StorageConfig;
use chatlink_core::types::{
    Conversation, HealthStatus, Message, NewConversation, NewMessage,
};
use chatlink_core::{ChatlinkError, ConversationStore};

use crate::database::Database;
use crate::queries;

/// SQLite-backed conversation store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`ConversationStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, ChatlinkError> {
        self.db.get().ok_or_else(|| ChatlinkError::Storage {
            source: "store not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl ConversationStore for SqliteStore {
    async fn initialize(&self) -> Result<(), ChatlinkError> {
        let path = self.config.database_path.clone();
        let db = Database::open(&path).await?;
        self.db.set(db).map_err(|_| ChatlinkError::Storage {
            source: "store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ChatlinkError> {
        let db = self.db()?;
        db.close().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, ChatlinkError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn create_conversation(
        &self,
        new: &NewConversation,
    ) -> Result<Conversation, ChatlinkError> {
        queries::conversations::create_conversation(self.db()?, new).await
    }

    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>, ChatlinkError> {
        queries::conversations::get_conversation(self.db()?, id).await
    }

    async fn get_conversation_by_thread_ts(
        &self,
        thread_ts: &str,
    ) -> Result<Option<Conversation>, ChatlinkError> {
        queries::conversations::get_conversation_by_thread_ts(self.db()?, thread_ts).await
    }

    async fn get_recent_active_conversation(
        &self,
    ) -> Result<Option<Conversation>, ChatlinkError> {
        queries::conversations::get_recent_active_conversation(self.db()?).await
    }

    async fn close_conversation(&self, id: i64) -> Result<(), ChatlinkError> {
        queries::conversations::close_conversation(self.db()?, id).await
    }

    async fn close_active_conversations_for_email(
        &self,
        email: &str,
    ) -> Result<u64, ChatlinkError> {
        queries::conversations::close_active_conversations_for_email(self.db()?, email).await
    }

    async fn add_message(&self, new: &NewMessage) -> Result<Message, ChatlinkError> {
        queries::messages::add_message(self.db()?, new).await
    }

    async fn get_messages(&self, conversation_id: i64) -> Result<Vec<Message>, ChatlinkError> {
        queries::messages::get_messages(self.db()?, conversation_id).await
    }

    async fn get_new_messages(
        &self,
        conversation_id: i64,
        after_timestamp: &str,
    ) -> Result<Vec<Message>, ChatlinkError> {
        queries::messages::get_new_messages(self.db()?, conversation_id, after_timestamp).await
    }

    async fn get_last_messages(
        &self,
        conversation_id: i64,
        limit: i64,
    ) -> Result<Vec<Message>, ChatlinkError> {
        queries::messages::get_last_messages(self.db()?, conversation_id, limit).await
    }

    async fn mark_messages_as_read(&self, conversation_id: i64) -> Result<u64, ChatlinkError> {
        queries::messages::mark_messages_as_read(self.db()?, conversation_id).await
    }

    async fn get_conversations_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<Conversation>, ChatlinkError> {
        queries::conversations::get_conversations_by_email(self.db()?, email).await
    }

    async fn get_message_by_slack_ts(
        &self,
        slack_ts: &str,
    ) -> Result<Option<Message>, ChatlinkError> {
        queries::messages::get_message_by_slack_ts(self.db()?, slack_ts).await
    }

    async fn unread_operator_count(&self, conversation_id: i64) -> Result<u64, ChatlinkError> {
        queries::messages::unread_operator_count(self.db()?, conversation_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatlink_core::types::Sender;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
        }
    }

    fn make_new_conversation(email: &str, thread_ts: &str) -> NewConversation {
        NewConversation {
            user_name: "John Doe".to_string(),
            user_email: email.to_string(),
            user_phone: "+1234567890".to_string(),
            user_company: None,
            slack_thread_ts: thread_ts.to_string(),
        }
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(store.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_check_fails_when_not_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        assert!(store.health_check().await.is_err());
    }

    #[tokio::test]
    async fn health_check_returns_healthy_when_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn full_conversation_lifecycle_through_store() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        // Intake: create a conversation with its Slack thread key.
        let convo = store
            .create_conversation(&make_new_conversation("john@example.com", "1700000000.000100"))
            .await
            .unwrap();

        // Opening message from the visitor.
        store
            .add_message(&NewMessage {
                conversation_id: convo.id,
                sender: Sender::User,
                message_text: "Test message".to_string(),
                sent_at: None,
                slack_ts: Some("1700000000.000100".to_string()),
            })
            .await
            .unwrap();

        // Correlated operator reply.
        store
            .add_message(&NewMessage {
                conversation_id: convo.id,
                sender: Sender::Operator,
                message_text: "How can I help?".to_string(),
                sent_at: None,
                slack_ts: Some("1700000010.000200".to_string()),
            })
            .await
            .unwrap();

        let messages = store.get_messages(convo.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].sender, Sender::Operator);

        // The visitor fetches with read-marking.
        assert_eq!(store.unread_operator_count(convo.id).await.unwrap(), 1);
        store.mark_messages_as_read(convo.id).await.unwrap();
        assert_eq!(store.unread_operator_count(convo.id).await.unwrap(), 0);

        // Correlation by thread key.
        let by_thread = store
            .get_conversation_by_thread_ts("1700000000.000100")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_thread.id, convo.id);

        store.close().await.unwrap();
    }
}
