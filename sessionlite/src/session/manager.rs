// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session manager - the entry point of the session engine
//!
//! One manager is built per process (or per request context) over a storage
//! driver. Construction validates the configuration, bootstraps the session
//! table and, depending on `gc_probability`, runs the GC sweep. Each request
//! then calls [`SessionManager::load`] to obtain its [`Session`].

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::session::codec::{self, SessionPayload};
use crate::session::id;
use crate::session::state::{LoadOutcome, Session};
use crate::storage::record_store::short_id;
use crate::storage::{
    create_storage_driver, Clock, DynStorageDriver, SessionRecord, SessionRecordStore, SystemClock,
};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

/// Session engine over one session table
pub struct SessionManager {
    config: SessionConfig,
    store: Arc<SessionRecordStore>,
}

impl SessionManager {
    /// Open a manager backed by the driver named in `config` at `path`
    pub fn open<P: AsRef<Path>>(path: P, config: SessionConfig) -> SessionResult<Self> {
        let driver = create_storage_driver(config.storage_type, path)?;
        Self::new(Arc::new(driver), config)
    }

    /// Create a manager over an already opened driver
    pub fn new(driver: Arc<DynStorageDriver>, config: SessionConfig) -> SessionResult<Self> {
        Self::with_clock(driver, config, Arc::new(SystemClock))
    }

    /// Create a manager with an explicit clock
    pub fn with_clock(
        driver: Arc<DynStorageDriver>,
        config: SessionConfig,
        clock: Arc<dyn Clock>,
    ) -> SessionResult<Self> {
        config.validate()?;
        let store = SessionRecordStore::open(driver, &config.table, clock)?;

        let manager = Self {
            config,
            store: Arc::new(store),
        };
        manager.collect_on_startup();
        Ok(manager)
    }

    /// Sample `gc_probability` and sweep; failures never abort construction
    fn collect_on_startup(&self) {
        let probability = self.config.gc_probability;
        if probability == 0 || fastrand::u8(0..100) >= probability {
            return;
        }
        if let Err(e) = self.garbage_collect() {
            warn!("Session GC on startup failed: {}", e);
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<SessionRecordStore> {
        &self.store
    }

    /// Load the session for a request
    ///
    /// - `None`: a fresh session, `expired == false`
    /// - an identifier with a live, decodable row: that session, flash data aged
    /// - anything else (bad format, no row, idle past `timeout`, corrupt row):
    ///   a fresh session under a new identifier, `expired == true`
    ///
    /// Storage failures propagate.
    pub fn load(&self, presented: Option<&str>) -> SessionResult<LoadOutcome> {
        let presented = match presented {
            Some(id) => id,
            None => {
                let session = Session::fresh(self.store.clone(), false, false)?;
                debug!("Started new session {}", short_id(session.id()));
                return Ok(LoadOutcome {
                    session,
                    expired: false,
                });
            }
        };

        if !id::is_valid_format(presented) {
            debug!("Presented session identifier has an invalid format");
            return self.expired();
        }

        let record = match self.store.find(presented) {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("No stored session for {}", short_id(presented));
                return self.expired();
            }
            Err(SessionError::CorruptPayload(reason)) => {
                warn!(
                    "Stored row for session {} is corrupt: {}",
                    short_id(presented),
                    reason
                );
                return self.expired();
            }
            Err(e) => return Err(e),
        };

        if self.is_timed_out(&record) {
            debug!(
                "Session {} idle for {}s, treating as expired",
                short_id(presented),
                record.idle_seconds(self.store.now())
            );
            return self.expired();
        }

        let payload = match codec::decode(&record.payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    "Discarding undecodable payload for session {}: {}",
                    short_id(presented),
                    e
                );
                return self.expired();
            }
        };

        Ok(LoadOutcome {
            session: Session::restore(self.store.clone(), record.id, payload),
            expired: false,
        })
    }

    fn expired(&self) -> SessionResult<LoadOutcome> {
        let session = Session::fresh(self.store.clone(), true, true)?;
        Ok(LoadOutcome {
            session,
            expired: true,
        })
    }

    fn is_timed_out(&self, record: &SessionRecord) -> bool {
        match self.config.timeout_secs() {
            Some(limit) => {
                let limit = i64::try_from(limit).unwrap_or(i64::MAX);
                record.idle_seconds(self.store.now()) > limit
            }
            None => false,
        }
    }

    /// Sweep rows idle longer than the configured `lifetime`
    pub fn garbage_collect(&self) -> SessionResult<usize> {
        self.store.garbage_collect(self.config.lifetime)
    }

    /// Remove a session outright (logout)
    pub fn destroy(&self, id: &str) -> SessionResult<()> {
        self.store.delete(id)?;
        debug!("Destroyed session {}", short_id(id));
        Ok(())
    }

    /// Stored record and decoded payload for `id`, without aging flash data
    pub fn inspect(&self, id: &str) -> SessionResult<Option<(SessionRecord, SessionPayload)>> {
        match self.store.find(id)? {
            Some(record) => {
                let payload = codec::decode(&record.payload)?;
                Ok(Some((record, payload)))
            }
            None => Ok(None),
        }
    }

    /// Number of stored rows, live or not yet collected
    pub fn session_count(&self) -> SessionResult<usize> {
        self.store.count()
    }

    /// Flush pending writes to durable storage
    pub fn shutdown(&self) -> SessionResult<()> {
        self.store.flush()?;
        info!("Session store '{}' flushed", self.store.table());
        Ok(())
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("name", &self.config.name)
            .field("table", &self.store.table())
            .finish()
    }
}
