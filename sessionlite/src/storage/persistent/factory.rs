// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver factory
//!
//! Creates the driver selected by configuration and hands it out as a
//! trait object so the record store never names a concrete backend.

use super::traits::{DynStorageDriver, StorageDriver, StorageTree};
use super::types::{StorageResult, StorageType};
use log::info;
use std::path::Path;

/// Factory function to create a storage driver based on configuration
///
/// # Arguments
/// * `storage_type` - The type of storage driver to create
/// * `path` - The filesystem path where the database should be stored
///   (ignored by the memory driver)
///
/// # Examples
/// ```ignore
/// let driver = create_storage_driver(StorageType::Sled, "./sessions.db")?;
/// let tree = driver.open_tree("sessions")?;
/// ```
pub fn create_storage_driver<P: AsRef<Path>>(
    storage_type: StorageType,
    path: P,
) -> StorageResult<DynStorageDriver> {
    info!(
        "Opening {} storage driver at {:?}",
        storage_type,
        path.as_ref()
    );

    match storage_type {
        StorageType::Sled => open_sled(path),
        StorageType::Memory => {
            use crate::storage::persistent::memory::MemoryStorageDriver;
            let driver = MemoryStorageDriver::open(path)?;
            Ok(Box::new(driver) as Box<dyn StorageDriver<Tree = Box<dyn StorageTree>>>)
        }
    }
}

#[cfg(feature = "sled-backend")]
fn open_sled<P: AsRef<Path>>(path: P) -> StorageResult<DynStorageDriver> {
    use crate::storage::persistent::sled::SledDriver;
    let driver = SledDriver::open(path)?;
    Ok(Box::new(driver) as Box<dyn StorageDriver<Tree = Box<dyn StorageTree>>>)
}

#[cfg(not(feature = "sled-backend"))]
fn open_sled<P: AsRef<Path>>(_path: P) -> StorageResult<DynStorageDriver> {
    Err(super::types::StorageDriverError::Unavailable(
        "sled backend not compiled in (enable the `sled-backend` feature)".to_string(),
    ))
}
