// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory storage driver implementation for testing

use super::traits::{StorageDriver, StorageTree, TreeIter};
use super::types::{StorageResult, StorageType};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

type TreeData = Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>;

/// In-memory storage driver for testing
#[derive(Default)]
pub struct MemoryStorageDriver {
    trees: Arc<RwLock<HashMap<String, TreeData>>>,
}

/// In-memory tree implementation
pub struct MemoryTree {
    data: TreeData,
}

impl MemoryStorageDriver {
    /// Create a new memory storage driver
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageTree for MemoryTree {
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn remove(&self, key: &[u8]) -> StorageResult<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn compare_and_remove(&self, key: &[u8], expected: &[u8]) -> StorageResult<bool> {
        let mut data = self.data.write();
        match data.get(key) {
            Some(current) if current.as_slice() == expected => {
                data.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn iter(&self) -> StorageResult<TreeIter<'_>> {
        // Snapshot so callers may remove entries while iterating
        let items: Vec<_> = self
            .data
            .read()
            .iter()
            .map(|(k, v)| Ok((k.clone(), v.clone())))
            .collect();
        Ok(Box::new(items.into_iter()))
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.data.read().len())
    }

    fn flush(&self) -> StorageResult<()> {
        // No-op for memory storage
        Ok(())
    }
}

impl StorageDriver for MemoryStorageDriver {
    type Tree = Box<dyn StorageTree>;

    fn open<P: AsRef<Path>>(_path: P) -> StorageResult<Self> {
        Ok(Self::new())
    }

    fn open_tree(&self, name: &str) -> StorageResult<Self::Tree> {
        let data = self
            .trees
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(HashMap::new())))
            .clone();

        Ok(Box::new(MemoryTree { data }) as Box<dyn StorageTree>)
    }

    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trees_opened_twice_share_data() {
        let driver = MemoryStorageDriver::new();
        let first = driver.open_tree("sessions").unwrap();
        let second = driver.open_tree("sessions").unwrap();

        first.insert(b"id", b"row").unwrap();
        assert_eq!(second.get(b"id").unwrap(), Some(b"row".to_vec()));
        assert_eq!(second.len().unwrap(), 1);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let driver = MemoryStorageDriver::new();
        let tree = driver.open_tree("sessions").unwrap();
        assert!(tree.remove(b"missing").is_ok());
        assert!(tree.is_empty().unwrap());
    }

    #[test]
    fn test_iter_snapshot_allows_removal() {
        let driver = MemoryStorageDriver::new();
        let tree = driver.open_tree("sessions").unwrap();
        tree.insert(b"a", b"1").unwrap();
        tree.insert(b"b", b"2").unwrap();

        for entry in tree.iter().unwrap() {
            let (key, _) = entry.unwrap();
            tree.remove(&key).unwrap();
        }
        assert!(tree.is_empty().unwrap());
    }

    #[test]
    fn test_separate_drivers_are_isolated() {
        let first = MemoryStorageDriver::new();
        let second = MemoryStorageDriver::new();
        first.open_tree("sessions").unwrap().insert(b"id", b"row").unwrap();
        assert!(second.open_tree("sessions").unwrap().is_empty().unwrap());
    }
}
