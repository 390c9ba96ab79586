// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Per-request session state
//!
//! A [`Session`] is produced by [`SessionManager::load`](crate::SessionManager::load),
//! mutated by application code during one request, and persisted by
//! [`Session::save`]. It is confined to the request that loaded it; nothing is
//! shared across requests except what goes through the record store.
//!
//! Following the RAII pattern:
//! - An unsaved session is **saved** when dropped (default), so early returns
//!   and error paths still persist the request's changes
//! - `save()` consumes the session, so the same state cannot be written twice
//!
//! # Examples
//!
//! ```ignore
//! let LoadOutcome { mut session, .. } = manager.load(cookie_id.as_deref())?;
//! session.put("user", 42);
//! session.flash("notice", "Profile updated");
//! let id = session.id().to_string();
//! session.save()?;
//! ```

use crate::error::{SessionError, SessionResult};
use crate::session::codec::{self, SessionPayload};
use crate::session::flash::FlashTracker;
use crate::session::id;
use crate::session::value::{Attributes, Value};
use crate::storage::record_store::short_id;
use crate::storage::SessionRecordStore;
use crate::transport::CookieDecision;
use log::{debug, error};
use std::sync::Arc;

/// Behavior when a session is dropped without an explicit `save()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropBehavior {
    /// Persist the session when dropped (default)
    #[default]
    Save,
    /// Drop the request's changes
    Discard,
    /// Panic if the session is dropped without explicit save
    Panic,
}

/// How the session came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    /// Freshly issued identifier, empty attributes
    Fresh,
    /// Populated from a stored record
    Existing,
}

/// Result of loading a session for a request
pub struct LoadOutcome {
    pub session: Session,
    /// A cookie was presented but no live record matched it
    pub expired: bool,
}

/// Session state for one request
pub struct Session {
    id: String,
    attributes: Attributes,
    flash: FlashTracker,
    origin: SessionOrigin,
    dirty: bool,
    /// Set once `save` has run, whatever its outcome
    finished: bool,
    cookie_presented: bool,
    expired: bool,
    regenerated: bool,
    drop_behavior: DropBehavior,
    store: Arc<SessionRecordStore>,
}

impl Session {
    /// Brand-new session under a freshly generated identifier
    pub(crate) fn fresh(
        store: Arc<SessionRecordStore>,
        cookie_presented: bool,
        expired: bool,
    ) -> SessionResult<Self> {
        Ok(Self {
            id: id::generate()?,
            attributes: Attributes::new(),
            flash: FlashTracker::new(),
            origin: SessionOrigin::Fresh,
            dirty: false,
            finished: false,
            cookie_presented,
            expired,
            regenerated: false,
            drop_behavior: DropBehavior::default(),
            store,
        })
    }

    /// Session restored from a decoded payload; flash data is aged here
    pub(crate) fn restore(store: Arc<SessionRecordStore>, id: String, payload: SessionPayload) -> Self {
        let SessionPayload {
            mut attributes,
            new_flash,
            old_flash,
        } = payload;
        let flash = FlashTracker::age(&mut attributes, new_flash, old_flash);

        Self {
            id,
            attributes,
            flash,
            origin: SessionOrigin::Existing,
            dirty: false,
            finished: false,
            cookie_presented: true,
            expired: false,
            regenerated: false,
            drop_behavior: DropBehavior::default(),
            store,
        }
    }

    // === Identity and lifecycle ===

    /// Current session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    /// Whether the session holds loaded, unsaved state
    pub fn is_started(&self) -> bool {
        !self.finished
    }

    /// Whether application code changed anything this request
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a cookie was presented but matched no live record
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Whether `regenerate` ran during this request
    pub fn was_regenerated(&self) -> bool {
        self.regenerated
    }

    /// Whether the request carried a session cookie
    pub fn cookie_presented(&self) -> bool {
        self.cookie_presented
    }

    /// Whether the transport layer must write the session cookie
    ///
    /// True when the request carried no cookie, the presented one expired,
    /// or the identifier was regenerated.
    pub fn cookie_required(&self) -> bool {
        CookieDecision::for_session(self).must_write()
    }

    /// Set the behavior when this session is dropped unsaved
    pub fn set_drop_behavior(&mut self, behavior: DropBehavior) {
        self.drop_behavior = behavior;
    }

    // === Queries ===

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Value under `key`, or `default` when absent
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        match self.attributes.get(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Value under `key`, or the result of `fallback` when absent
    ///
    /// `fallback` only runs when the key is missing.
    pub fn get_or_else<F>(&self, key: &str, fallback: F) -> Value
    where
        F: FnOnce() -> Value,
    {
        self.attributes.get(key).cloned().unwrap_or_else(fallback)
    }

    /// True iff `key` holds a non-null value
    pub fn has(&self, key: &str) -> bool {
        self.attributes.get(key).is_some_and(|value| !value.is_null())
    }

    /// Snapshot of every attribute
    pub fn all(&self) -> Attributes {
        self.attributes.clone()
    }

    /// Keys flashed this request
    pub fn new_flash_keys(&self) -> impl Iterator<Item = &str> {
        self.flash.new_keys().iter().map(String::as_str)
    }

    /// Keys flashed last request, due to age out
    pub fn old_flash_keys(&self) -> impl Iterator<Item = &str> {
        self.flash.old_keys().iter().map(String::as_str)
    }

    // === Mutations ===

    /// Store `value` under `key` as a regular value
    ///
    /// A flash key overwritten by `put` stops being flash data, whether it was
    /// flashed this request or the previous one.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        self.flash.forget(&key);
        self.attributes.insert(key, value.into());
        self.dirty = true;
    }

    /// Append `value` to the list stored under `key`
    ///
    /// An absent or null key starts a new one-element list.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) -> SessionResult<()> {
        let key = key.into();
        match self.attributes.get_mut(&key) {
            Some(Value::List(items)) => items.push(value.into()),
            None | Some(Value::Null) => {
                self.attributes.insert(key, Value::List(vec![value.into()]));
            }
            Some(other) => {
                return Err(SessionError::TypeMismatch {
                    key,
                    found: other.type_name(),
                })
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// Remove and return the value under `key`
    pub fn pull(&mut self, key: &str) -> Option<Value> {
        let value = self.attributes.remove(key);
        self.flash.forget(key);
        self.dirty = true;
        value
    }

    /// Remove and return the value under `key`, or `default` when absent
    pub fn pull_or(&mut self, key: &str, default: impl Into<Value>) -> Value {
        self.pull(key).unwrap_or_else(|| default.into())
    }

    /// Remove one key
    pub fn forget(&mut self, key: &str) {
        self.attributes.remove(key);
        self.flash.forget(key);
        self.dirty = true;
    }

    /// Remove every key, flash data included
    pub fn flush(&mut self) {
        self.attributes.clear();
        self.flash.clear();
        self.dirty = true;
    }

    // === Flash data ===

    /// Store `value` so it is visible for exactly one subsequent request
    pub fn flash(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        self.flash.mark(&key);
        self.attributes.insert(key, value.into());
        self.dirty = true;
    }

    /// Keep all of last request's flash data for one more request
    pub fn reflash(&mut self) {
        self.flash.reflash();
        self.dirty = true;
    }

    /// Keep the given flash keys for one more request
    pub fn keep<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.flash.keep(keys);
        self.dirty = true;
    }

    // === Identifier rotation ===

    /// Issue a new identifier for this session
    ///
    /// With `destroy_old` the previous row is deleted immediately, before
    /// this request saves under the new identifier. Returns the new id.
    pub fn regenerate(&mut self, destroy_old: bool) -> SessionResult<String> {
        let new_id = id::generate()?;
        if destroy_old {
            self.store.delete(&self.id)?;
        }
        debug!(
            "Regenerated session {} -> {} (old row {})",
            short_id(&self.id),
            short_id(&new_id),
            if destroy_old { "deleted" } else { "kept" }
        );

        self.id = new_id.clone();
        self.regenerated = true;
        self.dirty = true;
        Ok(new_id)
    }

    /// Drop all data and rotate the identifier, deleting the old row
    pub fn invalidate(&mut self) -> SessionResult<String> {
        self.flush();
        self.regenerate(true)
    }

    // === Persistence ===

    /// Persist the session and end its lifecycle
    ///
    /// The lifecycle ends even when the write fails: the error is returned
    /// and dropping the consumed session does nothing further.
    pub fn save(mut self) -> SessionResult<()> {
        self.persist()
    }

    fn persist(&mut self) -> SessionResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let payload = SessionPayload {
            attributes: self.attributes.clone(),
            new_flash: self.flash.new_keys().clone(),
            old_flash: self.flash.old_keys().clone(),
        };
        let bytes = codec::encode(&payload)?;
        self.store.upsert(&self.id, &bytes)?;
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        match self.drop_behavior {
            DropBehavior::Save => {
                if let Err(e) = self.persist() {
                    error!(
                        "Failed to save session {} on drop: {}",
                        short_id(&self.id),
                        e
                    );
                }
            }
            DropBehavior::Discard => {
                debug!("Discarding unsaved session {}", short_id(&self.id));
            }
            DropBehavior::Panic => {
                if !std::thread::panicking() {
                    panic!("Session dropped without explicit save");
                }
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &short_id(&self.id))
            .field("origin", &self.origin)
            .field("keys", &self.attributes.len())
            .field("dirty", &self.dirty)
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::codec::MAX_PAYLOAD_BYTES;
    use crate::storage::persistent::{StorageResult, TreeIter};
    use crate::storage::{
        DynStorageDriver, ManualClock, MemoryStorageDriver, StorageDriver, StorageDriverError,
        StorageTree, StorageType,
    };
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Tree whose writes always fail, counting the attempts
    struct FailTree {
        inserts: Arc<AtomicUsize>,
    }

    impl StorageTree for FailTree {
        fn insert(&self, _key: &[u8], _value: &[u8]) -> StorageResult<()> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            Err(StorageDriverError::BackendSpecific("down".to_string()))
        }

        fn get(&self, _key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
            Ok(None)
        }

        fn remove(&self, _key: &[u8]) -> StorageResult<()> {
            Ok(())
        }

        fn compare_and_remove(&self, _key: &[u8], _expected: &[u8]) -> StorageResult<bool> {
            Ok(false)
        }

        fn iter(&self) -> StorageResult<TreeIter<'_>> {
            Ok(Box::new(std::iter::empty()))
        }

        fn len(&self) -> StorageResult<usize> {
            Ok(0)
        }

        fn flush(&self) -> StorageResult<()> {
            Ok(())
        }
    }

    struct FailDriver {
        inserts: Arc<AtomicUsize>,
    }

    impl StorageDriver for FailDriver {
        type Tree = Box<dyn StorageTree>;

        fn open<P: AsRef<Path>>(_path: P) -> StorageResult<Self> {
            Ok(FailDriver {
                inserts: Arc::new(AtomicUsize::new(0)),
            })
        }

        fn open_tree(&self, _name: &str) -> StorageResult<Self::Tree> {
            Ok(Box::new(FailTree {
                inserts: self.inserts.clone(),
            }))
        }

        fn flush(&self) -> StorageResult<()> {
            Ok(())
        }

        fn storage_type(&self) -> StorageType {
            StorageType::Memory
        }
    }

    fn failing_store() -> (Arc<SessionRecordStore>, Arc<AtomicUsize>) {
        let inserts = Arc::new(AtomicUsize::new(0));
        let driver: DynStorageDriver = Box::new(FailDriver {
            inserts: inserts.clone(),
        });
        let store =
            SessionRecordStore::open(Arc::new(driver), "sessions", Arc::new(ManualClock::new(0)))
                .unwrap();
        (Arc::new(store), inserts)
    }

    fn store() -> Arc<SessionRecordStore> {
        let driver: DynStorageDriver = Box::new(MemoryStorageDriver::new());
        Arc::new(
            SessionRecordStore::open(Arc::new(driver), "sessions", Arc::new(ManualClock::new(0)))
                .unwrap(),
        )
    }

    fn fresh() -> Session {
        Session::fresh(store(), false, false).unwrap()
    }

    #[test]
    fn test_get_with_defaults() {
        let mut session = fresh();
        session.put("user", 1);

        assert_eq!(session.get("user"), Some(&Value::from(1)));
        assert_eq!(session.get_or("missing", 0), Value::from(0));
        assert_eq!(session.get_or("user", 0), Value::from(1));
    }

    #[test]
    fn test_lazy_default_not_evaluated_when_present() {
        let mut session = fresh();
        session.put("k", "v");

        let mut calls = 0;
        let value = session.get_or_else("k", || {
            calls += 1;
            Value::from("fallback")
        });
        assert_eq!(value, Value::from("v"));
        assert_eq!(calls, 0);

        let value = session.get_or_else("absent", || {
            calls += 1;
            Value::from("fallback")
        });
        assert_eq!(value, Value::from("fallback"));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_has_treats_null_as_absent() {
        let mut session = fresh();
        session.put("nothing", Value::Null);
        session.put("zero", 0);
        assert!(!session.has("nothing"));
        assert!(!session.has("missing"));
        assert!(session.has("zero"));
    }

    #[test]
    fn test_push_builds_and_guards_lists() {
        let mut session = fresh();
        session.push("list", "a").unwrap();
        assert_eq!(session.get("list"), Some(&Value::from(vec!["a"])));
        session.push("list", "b").unwrap();
        assert_eq!(session.get("list"), Some(&Value::from(vec!["a", "b"])));

        session.put("name", "ana");
        let err = session.push("name", "x").unwrap_err();
        assert!(matches!(err, SessionError::TypeMismatch { found: "string", .. }));
        assert_eq!(session.get("name"), Some(&Value::from("ana")));
    }

    #[test]
    fn test_push_onto_null_starts_list() {
        let mut session = fresh();
        session.put("list", Value::Null);
        assert!(!session.has("list"));

        session.push("list", "a").unwrap();
        assert_eq!(session.get("list"), Some(&Value::from(vec!["a"])));
    }

    #[test]
    fn test_put_over_new_flash_makes_it_regular() {
        let mut session = fresh();
        session.flash("notice", "draft");
        session.put("notice", "final");

        assert_eq!(session.new_flash_keys().count(), 0);
        assert_eq!(session.get("notice"), Some(&Value::from("final")));
    }

    #[test]
    fn test_pull_removes() {
        let mut session = fresh();
        session.put("k", "v");
        assert_eq!(session.pull_or("k", "d"), Value::from("v"));
        assert!(!session.has("k"));
        assert_eq!(session.pull_or("k", "d"), Value::from("d"));
    }

    #[test]
    fn test_all_is_a_snapshot() {
        let mut session = fresh();
        session.put("a", 1);
        let mut snapshot = session.all();
        snapshot.insert("b".to_string(), Value::from(2));
        assert!(!session.has("b"));
    }

    #[test]
    fn test_forget_and_flush_mark_dirty() {
        let mut session = fresh();
        assert!(!session.is_dirty());
        session.put("a", 1);
        session.flash("b", 2);
        session.forget("a");
        assert!(!session.has("a"));
        session.flush();
        assert!(session.all().is_empty());
        assert_eq!(session.new_flash_keys().count(), 0);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_cookie_required() {
        let store = store();
        let absent = Session::fresh(store.clone(), false, false).unwrap();
        assert!(absent.cookie_required());

        let expired = Session::fresh(store.clone(), true, true).unwrap();
        assert!(expired.cookie_required());

        let mut existing = Session::restore(store, "a".repeat(40), SessionPayload::default());
        assert!(!existing.cookie_required());
        existing.regenerate(false).unwrap();
        assert!(existing.cookie_required());
    }

    #[test]
    fn test_drop_saves_by_default() {
        let store = store();
        let id = {
            let mut session = Session::fresh(store.clone(), false, false).unwrap();
            session.put("user", 7);
            session.id().to_string()
        };
        assert!(store.find(&id).unwrap().is_some());
    }

    #[test]
    fn test_drop_discard_skips_write() {
        let store = store();
        let id = {
            let mut session = Session::fresh(store.clone(), false, false).unwrap();
            session.set_drop_behavior(DropBehavior::Discard);
            session.put("user", 7);
            session.id().to_string()
        };
        assert!(store.find(&id).unwrap().is_none());
    }

    #[test]
    #[should_panic(expected = "Session dropped without explicit save")]
    fn test_drop_panic_behavior() {
        let mut session = fresh();
        session.set_drop_behavior(DropBehavior::Panic);
    }

    #[test]
    fn test_regenerate_without_destroy_keeps_old_row() {
        let store = store();
        let mut first = Session::fresh(store.clone(), false, false).unwrap();
        first.put("k", 1);
        let old_id = first.id().to_string();
        first.save().unwrap();

        let record = store.find(&old_id).unwrap().unwrap();
        let payload = codec::decode(&record.payload).unwrap();
        let mut second = Session::restore(store.clone(), old_id.clone(), payload);
        let new_id = second.regenerate(false).unwrap();
        assert_ne!(new_id, old_id);
        assert!(store.find(&old_id).unwrap().is_some());
        second.save().unwrap();
        assert!(store.find(&new_id).unwrap().is_some());
    }

    #[test]
    fn test_failed_save_writes_once() {
        let (store, inserts) = failing_store();
        let mut session = Session::fresh(store, false, false).unwrap();
        session.put("user", 7);

        let err = session.save().unwrap_err();
        assert!(matches!(err, SessionError::StorageUnavailable(_)));
        assert_eq!(inserts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_save_does_not_panic_on_drop() {
        let (store, inserts) = failing_store();
        let mut session = Session::fresh(store, false, false).unwrap();
        session.set_drop_behavior(DropBehavior::Panic);

        assert!(session.save().is_err());
        assert_eq!(inserts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_drop_save_is_logged_not_retried() {
        let (store, inserts) = failing_store();
        {
            let mut session = Session::fresh(store, false, false).unwrap();
            session.put("user", 7);
        }
        assert_eq!(inserts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_oversized_save_is_rejected_without_write() {
        let store = store();
        let mut session = Session::fresh(store.clone(), false, false).unwrap();
        session.put("blob", "x".repeat(MAX_PAYLOAD_BYTES as usize + 1));
        let id = session.id().to_string();

        let err = session.save().unwrap_err();
        assert!(matches!(err, SessionError::PayloadTooLarge { .. }));
        assert!(!err.is_recoverable());
        assert!(store.find(&id).unwrap().is_none());
    }
}
