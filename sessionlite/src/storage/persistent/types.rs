// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver types and error handling
//!
//! This module defines the driver selection enum and the error type shared
//! by every driver implementation.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Storage driver type configuration
///
/// Specifies which underlying storage technology holds the session table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Sled - Pure Rust embedded database
    /// Best for: single-node deployments that need sessions to survive restarts
    #[default]
    Sled,

    /// Memory - In-memory storage
    /// Best for: Unit testing, development
    Memory,
}

impl std::str::FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sled" => Ok(StorageType::Sled),
            "memory" => Ok(StorageType::Memory),
            _ => Err(format!(
                "Unknown storage type: {}. Valid options: sled, memory",
                s
            )),
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StorageType::Sled => "sled",
            StorageType::Memory => "memory",
        };
        write!(f, "{}", name)
    }
}

/// Error type for storage driver operations
#[derive(Error, Debug)]
pub enum StorageDriverError {
    /// I/O related errors (file system, locks held by another process, etc.)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Row envelope could not be encoded or decoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Driver is not compiled into this build
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    /// Driver-specific error (Sled, etc.)
    #[error("Storage driver error: {0}")]
    BackendSpecific(String),
}

impl From<bincode::Error> for StorageDriverError {
    fn from(e: bincode::Error) -> Self {
        StorageDriverError::SerializationError(e.to_string())
    }
}

/// Result type for storage driver operations
pub type StorageResult<T> = Result<T, StorageDriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_parsing() {
        assert_eq!("sled".parse::<StorageType>().unwrap(), StorageType::Sled);
        assert_eq!("MEMORY".parse::<StorageType>().unwrap(), StorageType::Memory);
        assert!("rocksdb".parse::<StorageType>().is_err());
    }

    #[test]
    fn test_storage_type_display_roundtrips_through_serde() {
        assert_eq!(StorageType::Memory.to_string(), "memory");
        let json = serde_json::to_string(&StorageType::Sled).unwrap();
        assert_eq!(json, "\"sled\"");
    }
}
