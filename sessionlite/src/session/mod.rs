// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session engine
//!
//! This module provides:
//! - Identifier issuance and format checks (`id`)
//! - The attribute value domain (`value`) and its payload codec (`codec`)
//! - Flash-data aging (`flash`)
//! - Per-request state with RAII save-on-drop (`state`)
//! - The `SessionManager` entry point and GC policy (`manager`)
//! - Named process-wide manager handles (`registry`)

pub mod codec;
pub mod flash;
pub mod id;
pub mod manager;
pub mod registry;
pub mod state;
pub mod value;

pub use codec::SessionPayload;
pub use manager::SessionManager;
pub use registry::{clear_handles, handle, register_handle, release_handle};
pub use state::{DropBehavior, LoadOutcome, Session, SessionOrigin};
pub use value::{Attributes, Value};
