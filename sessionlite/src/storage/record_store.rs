// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session record store - CRUD over the session table plus the GC sweep
//!
//! Rows live in a single storage tree keyed by session identifier. Each row
//! carries the encoded payload and the unix second of its last save.
//!
//! Concurrent requests for the same identifier race on [`SessionRecordStore::upsert`]
//! with last-writer-wins semantics. The GC sweep removes rows one at a time
//! with a compare-and-remove, so a row refreshed after the sweep read it survives.

use crate::error::{SessionError, SessionResult};
use crate::storage::clock::Clock;
use crate::storage::persistent::{DynStorageDriver, StorageTree};
use crate::storage::record::SessionRecord;
use log::{debug, info, warn};
use std::sync::Arc;

/// Store over one session table
pub struct SessionRecordStore {
    /// Driver is kept alive for as long as the tree handle is in use
    driver: Arc<DynStorageDriver>,
    tree: Box<dyn StorageTree>,
    table: String,
    clock: Arc<dyn Clock>,
}

impl SessionRecordStore {
    /// Open the session table, creating it when absent
    ///
    /// Opening is idempotent, so this doubles as the schema bootstrap.
    pub fn open(
        driver: Arc<DynStorageDriver>,
        table: &str,
        clock: Arc<dyn Clock>,
    ) -> SessionResult<Self> {
        if table.is_empty() {
            return Err(SessionError::config("session table name must not be empty"));
        }

        let tree = driver.open_tree(table)?;
        info!(
            "Session table '{}' ready on {} storage",
            table,
            driver.storage_type()
        );

        Ok(Self {
            driver,
            tree,
            table: table.to_string(),
            clock,
        })
    }

    /// Name of the backing table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Current time according to the store's clock
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Look up a record by identifier
    ///
    /// A row whose envelope cannot be decoded yields `CorruptPayload`.
    pub fn find(&self, id: &str) -> SessionResult<Option<SessionRecord>> {
        match self.tree.get(id.as_bytes())? {
            Some(data) => SessionRecord::decode_row(id.as_bytes(), &data).map(Some),
            None => Ok(None),
        }
    }

    /// Insert or replace the row for `id`, stamping it with the current time
    ///
    /// Returns the stored record.
    pub fn upsert(&self, id: &str, payload: &[u8]) -> SessionResult<SessionRecord> {
        let record = SessionRecord::new(id, payload.to_vec(), self.clock.now());
        self.tree.insert(id.as_bytes(), &record.encode_row()?)?;
        debug!(
            "Stored session {} ({} payload bytes)",
            short_id(id),
            record.payload.len()
        );
        Ok(record)
    }

    /// Delete the row for `id`. Deleting a missing row is not an error.
    pub fn delete(&self, id: &str) -> SessionResult<()> {
        self.tree.remove(id.as_bytes())?;
        Ok(())
    }

    /// Delete every record whose last activity is older than `now - max_age_seconds`
    ///
    /// Rows with an undecodable envelope can never be loaded and are swept as
    /// well. Returns the number of removed rows.
    pub fn garbage_collect(&self, max_age_seconds: u64) -> SessionResult<usize> {
        let max_age = i64::try_from(max_age_seconds).unwrap_or(i64::MAX);
        let cutoff = self.clock.now().saturating_sub(max_age);

        let mut candidates = Vec::new();
        for entry in self.tree.iter()? {
            let (key, data) = entry?;
            match SessionRecord::decode_row(&key, &data) {
                Ok(record) if record.last_activity < cutoff => candidates.push((key, data)),
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        "Sweeping undecodable session row in '{}': {}",
                        self.table, e
                    );
                    candidates.push((key, data));
                }
            }
        }

        let mut removed = 0;
        for (key, data) in candidates {
            if self.tree.compare_and_remove(&key, &data)? {
                removed += 1;
            }
        }

        if removed > 0 {
            info!(
                "Session GC removed {} rows from '{}' (cutoff {})",
                removed, self.table, cutoff
            );
        } else {
            debug!("Session GC found nothing to remove in '{}'", self.table);
        }
        Ok(removed)
    }

    /// All decodable records, ordered by identifier
    pub fn list(&self) -> SessionResult<Vec<SessionRecord>> {
        let mut records = Vec::new();
        for entry in self.tree.iter()? {
            let (key, data) = entry?;
            match SessionRecord::decode_row(&key, &data) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping undecodable session row: {}", e),
            }
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    /// Number of rows in the table
    pub fn count(&self) -> SessionResult<usize> {
        Ok(self.tree.len()?)
    }

    /// Flush pending writes to durable storage
    pub fn flush(&self) -> SessionResult<()> {
        self.tree.flush()?;
        self.driver.flush()?;
        Ok(())
    }
}

/// Identifier prefix for log lines; full identifiers are bearer secrets
pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
