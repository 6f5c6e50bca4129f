// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Chatlink conversation engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Chatlink workspace. The storage backend
//! implements [`ConversationStore`]; the Slack client implements
//! [`Notifier`]; the gateway depends only on the traits.

pub mod error;
pub mod time;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ChatlinkError;
pub use traits::{ConversationStore, Notifier};
pub use types::{
    Conversation, ConversationStatus, HealthStatus, Message, NewConversation, NewMessage,
    NotifyMeta, NotifyOutcome, Sender,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chatlink_error_has_all_variants() {
        // Verify all 6 error variants exist and can be constructed.
        let _validation = ChatlinkError::Validation("test".into());
        let _not_found = ChatlinkError::NotFound("test".into());
        let _config = ChatlinkError::Config("test".into());
        let _upstream = ChatlinkError::Upstream {
            message: "test".into(),
            source: None,
        };
        let _storage = ChatlinkError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _internal = ChatlinkError::Internal("test".into());
    }

    #[test]
    fn error_messages_carry_no_internal_detail_marker() {
        let err = ChatlinkError::Validation("name is required".into());
        assert_eq!(err.to_string(), "validation error: name is required");

        let err = ChatlinkError::NotFound("conversation 42".into());
        assert_eq!(err.to_string(), "not found: conversation 42");
    }

    #[test]
    fn trait_objects_are_constructible() {
        // The gateway holds both traits behind Arc<dyn ...>; this won't
        // compile if either trait loses object safety.
        fn _assert_store(_: &dyn ConversationStore) {}
        fn _assert_notifier(_: &dyn Notifier) {}
    }
}
