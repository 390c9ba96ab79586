// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for SessionLite
//!
//! Maintenance commands over an existing session store: sweeping stale rows,
//! listing and inspecting sessions, and deleting single sessions.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{handle_delete, handle_gc, handle_list, handle_show, StoreArgs};
