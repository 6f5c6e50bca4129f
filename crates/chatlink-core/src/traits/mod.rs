// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seams of the correlation engine.
//!
//! Both traits use `#[async_trait]` for dynamic dispatch so the gateway and
//! tests can swap implementations.

pub mod notifier;
pub mod store;

pub use notifier::Notifier;
pub use store::ConversationStore;
