// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! SessionLite - A database-persisted HTTP session store
//!
//! SessionLite maps a browser-presented session identifier to a structured bag
//! of per-visitor state that survives across requests and process restarts.
//!
//! # Features
//!
//! - **Unpredictable identifiers**: 160 bits from the OS randomness source
//! - **Checksummed payloads**: corrupt rows start a fresh session instead of failing the request
//! - **Flash data**: values visible for exactly one subsequent request
//! - **Regeneration**: rotate identifiers and delete the old row immediately
//! - **Garbage collection**: sweep rows idle past the configured lifetime
//! - **Embedded storage**: Sled by default, in-memory for tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use sessionlite::{SessionConfig, SessionManager};
//!
//! let manager = SessionManager::open("./sessions.db", SessionConfig::default())?;
//!
//! // Per request
//! let outcome = manager.load(cookie_id.as_deref())?;
//! let mut session = outcome.session;
//! session.put("user", 1);
//! let id = session.id().to_string();
//! let write_cookie = session.cookie_required();
//! session.save()?;
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod transport;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use session::{
    Attributes, DropBehavior, LoadOutcome, Session, SessionManager, SessionOrigin, SessionPayload,
    Value,
};
pub use storage::{SessionRecord, StorageType};
pub use transport::{extract_session_id, CookieDecision, SessionCookie};

/// SessionLite version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// SessionLite crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
