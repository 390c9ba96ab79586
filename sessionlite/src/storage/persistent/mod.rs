// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Persistent storage backends
//!
//! This module provides trait-based abstractions for key-value storage,
//! allowing different storage backends to hold the session table.
//!
//! # Architecture
//!
//! ```text
//! SessionRecordStore (session rows, GC sweep)
//!     ↓
//! StorageDriver / StorageTree (key-value abstraction)
//!     ↓
//! Concrete Implementations (Sled, Memory)
//! ```
//!
//! # Example Usage
//!
//! ```ignore
//! let driver = create_storage_driver(StorageType::Sled, "./data")?;
//! let tree = driver.open_tree("sessions")?;
//! tree.insert(b"key", b"value")?;
//! let value = tree.get(b"key")?;
//! tree.remove(b"key")?;
//! ```

// Core modules
pub mod factory;
pub mod traits;
pub mod types;

// Driver implementations
pub mod memory;
#[cfg(feature = "sled-backend")]
pub mod sled;

// Public API re-exports
pub use factory::create_storage_driver;
pub use memory::MemoryStorageDriver;
pub use traits::{DynStorageDriver, StorageDriver, StorageTree, TreeIter};
pub use types::{StorageDriverError, StorageResult, StorageType};
