// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the session engine
//!
//! Only [`SessionError::CorruptPayload`] is absorbed by the engine (a corrupt
//! row starts a fresh session). Everything else reaches the caller.

use crate::storage::persistent::StorageDriverError;
use thiserror::Error;

/// Errors surfaced by the session engine and its collaborators
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Entropy unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Corrupt session payload: {0}")]
    CorruptPayload(String),

    #[error("Session payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("Type mismatch for key '{key}': expected a list, found {found}")]
    TypeMismatch { key: String, found: &'static str },

    #[error("Session storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageDriverError),

    #[error("Global session handle '{0}' is already registered")]
    DuplicateGlobalHandle(String),

    #[error("Invalid session configuration: {0}")]
    InvalidConfiguration(String),
}

impl SessionError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::EntropyUnavailable(_) => "SESSION_ENTROPY_UNAVAILABLE",
            Self::CorruptPayload(_) => "SESSION_CORRUPT_PAYLOAD",
            Self::PayloadTooLarge { .. } => "SESSION_PAYLOAD_TOO_LARGE",
            Self::TypeMismatch { .. } => "SESSION_TYPE_MISMATCH",
            Self::StorageUnavailable(_) => "SESSION_STORAGE_UNAVAILABLE",
            Self::DuplicateGlobalHandle(_) => "SESSION_DUPLICATE_GLOBAL_HANDLE",
            Self::InvalidConfiguration(_) => "SESSION_INVALID_CONFIGURATION",
        }
    }

    /// Whether the engine recovers from this error on its own
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::CorruptPayload(_))
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a corrupt payload error
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        Self::CorruptPayload(msg.into())
    }
}

impl From<bincode::Error> for SessionError {
    fn from(err: bincode::Error) -> Self {
        SessionError::CorruptPayload(err.to_string())
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
