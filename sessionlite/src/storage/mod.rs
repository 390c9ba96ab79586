// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session persistence
//!
//! This module provides:
//! - Pluggable key-value drivers (Sled, Memory) behind `StorageDriver`
//! - The session row type and its on-disk envelope
//! - `SessionRecordStore`: find / upsert / delete / garbage collection
//! - A clock abstraction for last-activity stamps

pub mod clock;
pub mod persistent;
pub mod record;
pub mod record_store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use persistent::{
    create_storage_driver, DynStorageDriver, MemoryStorageDriver, StorageDriver,
    StorageDriverError, StorageTree, StorageType,
};
pub use record::SessionRecord;
pub use record_store::SessionRecordStore;
