// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for conversation and message operations.

pub mod conversations;
pub mod messages;
