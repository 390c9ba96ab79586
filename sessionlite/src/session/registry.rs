// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Process-wide named handles to session managers
//!
//! Call sites that cannot thread a `SessionManager` reference through (for
//! example framework middleware) can register one under a name at startup and
//! look it up later. Each name is a write-once slot: registering a taken name
//! fails with `DuplicateGlobalHandle` instead of replacing the existing handle.
//!
//! ```rust,ignore
//! register_handle("web", Arc::new(manager))?;
//! let manager = handle("web").expect("registered at startup");
//! ```

use crate::error::{SessionError, SessionResult};
use crate::session::manager::SessionManager;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

static SESSION_HANDLES: Lazy<RwLock<HashMap<String, Arc<SessionManager>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register `manager` under `name`
pub fn register_handle(name: &str, manager: Arc<SessionManager>) -> SessionResult<()> {
    let mut handles = SESSION_HANDLES.write();
    if handles.contains_key(name) {
        return Err(SessionError::DuplicateGlobalHandle(name.to_string()));
    }
    handles.insert(name.to_string(), manager);
    log::debug!("Registered session handle '{}'", name);
    Ok(())
}

/// Manager registered under `name`
pub fn handle(name: &str) -> Option<Arc<SessionManager>> {
    SESSION_HANDLES.read().get(name).cloned()
}

/// Unregister `name`, returning the manager that held it
pub fn release_handle(name: &str) -> Option<Arc<SessionManager>> {
    SESSION_HANDLES.write().remove(name)
}

/// Unregister every handle
pub fn clear_handles() {
    SESSION_HANDLES.write().clear();
}
