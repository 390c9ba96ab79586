//! Test fixture for SessionLite integration tests
//!
//! Provides an isolated session manager per test, either in memory or backed
//! by a Sled database in a temporary directory.

#![allow(dead_code)]

use sessionlite::storage::{
    create_storage_driver, Clock, DynStorageDriver, ManualClock, MemoryStorageDriver,
};
use sessionlite::{LoadOutcome, Session, SessionConfig, SessionManager, StorageType};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Clock start used by every fixture
pub const START: i64 = 1_700_000_000;

/// Isolated session manager with a controllable clock
pub struct SessionFixture {
    manager: SessionManager,
    clock: Arc<ManualClock>,
    db_path: Option<PathBuf>,
    _temp_dir: Option<TempDir>,
}

impl SessionFixture {
    /// In-memory manager with default configuration
    pub fn memory() -> Self {
        Self::memory_with(SessionConfig::default())
    }

    /// In-memory manager with the given configuration
    pub fn memory_with(config: SessionConfig) -> Self {
        init_logging();
        let clock = Arc::new(ManualClock::new(START));
        let driver: DynStorageDriver = Box::new(MemoryStorageDriver::new());
        let manager = SessionManager::with_clock(Arc::new(driver), config, clock.clone())
            .expect("Failed to create in-memory session manager");
        Self {
            manager,
            clock,
            db_path: None,
            _temp_dir: None,
        }
    }

    /// Sled-backed manager in a fresh temporary directory
    pub fn sled() -> Result<Self, Box<dyn std::error::Error>> {
        init_logging();
        let temp_dir = tempfile::tempdir()?;
        let db_path = temp_dir.path().join("sessions.db");
        let clock = Arc::new(ManualClock::new(START));
        let manager = open_sled(&db_path, SessionConfig::default(), clock.clone())?;
        Ok(Self {
            manager,
            clock,
            db_path: Some(db_path),
            _temp_dir: Some(temp_dir),
        })
    }

    /// Drop the current manager and open a new one over the same database
    pub fn reopen(self) -> Result<Self, Box<dyn std::error::Error>> {
        let SessionFixture {
            manager,
            clock,
            db_path,
            _temp_dir,
        } = self;
        let db_path = db_path.ok_or("reopen requires a sled fixture")?;
        let config = manager.config().clone();
        manager.shutdown()?;
        drop(manager);

        let manager = open_sled(&db_path, config, clock.clone())?;
        Ok(Self {
            manager,
            clock,
            db_path: Some(db_path),
            _temp_dir,
        })
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Start a request presenting `id`
    pub fn load(&self, id: Option<&str>) -> LoadOutcome {
        self.manager.load(id).expect("Failed to load session")
    }

    /// One full request cycle: load, apply `f`, save; returns the final id
    pub fn cycle<F>(&self, id: Option<&str>, f: F) -> String
    where
        F: FnOnce(&mut Session),
    {
        let mut session = self.load(id).session;
        f(&mut session);
        let id = session.id().to_string();
        session.save().expect("Failed to save session");
        id
    }

    /// Write a raw row with the given last-activity time
    pub fn seed_raw(&self, id: &str, payload: &[u8], last_activity: i64) {
        let now = self.clock.now();
        self.clock.set(last_activity);
        self.manager
            .store()
            .upsert(id, payload)
            .expect("Failed to seed session row");
        self.clock.set(now);
    }
}

/// Route library logs to the test harness; honours RUST_LOG
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn open_sled(
    path: &Path,
    config: SessionConfig,
    clock: Arc<ManualClock>,
) -> Result<SessionManager, Box<dyn std::error::Error>> {
    let driver = create_storage_driver(StorageType::Sled, path)?;
    Ok(SessionManager::with_clock(Arc::new(driver), config, clock)?)
}
