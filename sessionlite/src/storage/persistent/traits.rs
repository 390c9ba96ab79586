// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver traits
//!
//! This module defines the core traits for storage drivers and trees.
//! A tree plays the role of a table: the session store keeps one tree
//! keyed by session identifier.

use super::types::{StorageResult, StorageType};
use std::path::Path;

/// Iterator over the raw entries of a tree
pub type TreeIter<'a> = Box<dyn Iterator<Item = StorageResult<(Vec<u8>, Vec<u8>)>> + 'a>;

/// Trait for a tree/column family in the storage driver
///
/// Represents a named collection of key-value pairs within a storage driver.
pub trait StorageTree: Send + Sync {
    /// Insert or replace a key-value pair
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()>;

    /// Get a value by key
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Remove a key-value pair. Removing a missing key is not an error.
    fn remove(&self, key: &[u8]) -> StorageResult<()>;

    /// Remove `key` only while it still holds `expected`
    ///
    /// Returns `true` when the entry was removed. A concurrent writer that
    /// replaced the value in the meantime wins and the entry is kept.
    fn compare_and_remove(&self, key: &[u8], expected: &[u8]) -> StorageResult<bool>;

    /// Iterate over all key-value pairs
    fn iter(&self) -> StorageResult<TreeIter<'_>>;

    /// Number of entries in the tree
    fn len(&self) -> StorageResult<usize>;

    /// Check if the tree is empty
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Flush any pending writes to disk
    fn flush(&self) -> StorageResult<()>;
}

/// Main storage driver trait
///
/// Defines the interface that all storage drivers must implement.
pub trait StorageDriver: Send + Sync {
    /// Type of tree/column family used by this driver
    type Tree: StorageTree;

    /// Open or create a storage driver at the given path
    fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self>
    where
        Self: Sized;

    /// Open or create a named tree. Idempotent.
    fn open_tree(&self, name: &str) -> StorageResult<Self::Tree>;

    /// Flush all pending writes to disk
    fn flush(&self) -> StorageResult<()>;

    /// Get storage type
    fn storage_type(&self) -> StorageType;
}

/// Boxed driver as handed out by the factory
pub type DynStorageDriver = Box<dyn StorageDriver<Tree = Box<dyn StorageTree>>>;

// Helper implementation for Box<dyn StorageTree>
// This allows us to use boxed trait objects seamlessly
impl StorageTree for Box<dyn StorageTree> {
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        (**self).insert(key, value)
    }

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn remove(&self, key: &[u8]) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn compare_and_remove(&self, key: &[u8], expected: &[u8]) -> StorageResult<bool> {
        (**self).compare_and_remove(key, expected)
    }

    fn iter(&self) -> StorageResult<TreeIter<'_>> {
        (**self).iter()
    }

    fn len(&self) -> StorageResult<usize> {
        (**self).len()
    }

    fn flush(&self) -> StorageResult<()> {
        (**self).flush()
    }
}
