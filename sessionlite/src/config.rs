// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session configuration
//!
//! Every recognized option is a named field; unknown keys in a JSON document
//! are rejected rather than silently accepted.

use crate::error::{SessionError, SessionResult};
use crate::storage::StorageType;
use serde::{Deserialize, Serialize};

/// Default cookie name
pub const DEFAULT_SESSION_NAME: &str = "sessionlite_session";
/// Default GC threshold: two hours
pub const DEFAULT_LIFETIME_SECS: u64 = 2 * 60 * 60;
/// Default table name
pub const DEFAULT_TABLE: &str = "sessions";

/// Session engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Cookie name carrying the session identifier
    pub name: String,

    /// Rows idle longer than this many seconds are removed by GC
    pub lifetime: u64,

    /// Idle minutes after which `load` treats a row as expired even before
    /// GC has removed it. `None` disables the per-load check.
    pub timeout: Option<u64>,

    /// Cookie path
    pub path: String,

    /// Cookie domain
    pub domain: Option<String>,

    /// Cookie `Secure` flag
    pub secure: bool,

    /// Cookie `Max-Age` in seconds; 0 means a browser-session cookie
    pub cookie_max_age: u64,

    /// Storage tree holding the session rows
    pub table: String,

    /// Percent chance that constructing a manager runs the GC sweep
    pub gc_probability: u8,

    /// Backing storage driver
    pub storage_type: StorageType,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SESSION_NAME.to_string(),
            lifetime: DEFAULT_LIFETIME_SECS,
            timeout: None,
            path: "/".to_string(),
            domain: None,
            secure: false,
            cookie_max_age: 0,
            table: DEFAULT_TABLE.to_string(),
            gc_probability: 100,
            storage_type: StorageType::default(),
        }
    }
}

impl SessionConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> SessionResult<Self> {
        let config: SessionConfig = serde_json::from_str(json)
            .map_err(|e| SessionError::config(format!("malformed configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Set cookie name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set GC threshold in seconds
    pub fn with_lifetime(mut self, seconds: u64) -> Self {
        self.lifetime = seconds;
        self
    }

    /// Set idle timeout in minutes
    pub fn with_timeout(mut self, minutes: u64) -> Self {
        self.timeout = Some(minutes);
        self
    }

    /// Set cookie path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set cookie domain
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set secure flag
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set cookie max-age in seconds
    pub fn with_cookie_max_age(mut self, seconds: u64) -> Self {
        self.cookie_max_age = seconds;
        self
    }

    /// Set table name
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set GC probability percentage
    pub fn with_gc_probability(mut self, percent: u8) -> Self {
        self.gc_probability = percent;
        self
    }

    /// Set storage driver
    pub fn with_storage_type(mut self, storage_type: StorageType) -> Self {
        self.storage_type = storage_type;
        self
    }

    /// Idle timeout converted to seconds
    pub fn timeout_secs(&self) -> Option<u64> {
        self.timeout.map(|minutes| minutes.saturating_mul(60))
    }

    /// Check every option; called when a manager is constructed
    pub fn validate(&self) -> SessionResult<()> {
        if !is_cookie_token(&self.name) {
            return Err(SessionError::config(format!(
                "session name '{}' is not a valid cookie name",
                self.name
            )));
        }
        if self.lifetime == 0 {
            return Err(SessionError::config("lifetime must be greater than zero"));
        }
        if self.timeout == Some(0) {
            return Err(SessionError::config("timeout must be greater than zero"));
        }
        if !self.path.starts_with('/') || !is_attribute_value(&self.path) {
            return Err(SessionError::config(format!(
                "cookie path '{}' must start with '/' and contain no ';' or control characters",
                self.path
            )));
        }
        if let Some(domain) = &self.domain {
            if domain.is_empty() || !is_attribute_value(domain) {
                return Err(SessionError::config(format!(
                    "cookie domain '{}' is invalid",
                    domain
                )));
            }
        }
        if self.table.trim().is_empty() {
            return Err(SessionError::config("table name must not be empty"));
        }
        if self.gc_probability > 100 {
            return Err(SessionError::config(format!(
                "gc_probability {} is above 100",
                self.gc_probability
            )));
        }
        Ok(())
    }
}

/// RFC 6265 cookie-name token
fn is_cookie_token(name: &str) -> bool {
    const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={} \t";
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !SEPARATORS.contains(&b))
}

fn is_attribute_value(value: &str) -> bool {
    value.bytes().all(|b| b != b';' && !b.is_ascii_control())
}
