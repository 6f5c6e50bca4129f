// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Polling sync client for the chat widget.
//!
//! A widget session attaches to one conversation, polls the gateway on a
//! fixed interval, and renders message updates and an unread badge from each
//! fetched snapshot. Across visits the session is re-attached through a
//! [`ResumeRecord`] with a bounded lifetime.

pub mod client;
pub mod poller;
pub mod resume;

pub use client::{FetchSnapshot, SyncClient};
pub use poller::{spawn, SyncMode, SyncUpdate};
pub use resume::ResumeRecord;
