// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Flash bookkeeping
//!
//! Flash values live in the ordinary attribute map; this tracker only records
//! which keys are flash and how old they are:
//! - `new`: flashed during the current request
//! - `old`: flashed during the previous request, removed on the next load
//!   unless kept or re-flashed

use crate::session::value::Attributes;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashTracker {
    new: BTreeSet<String>,
    old: BTreeSet<String>,
}

impl FlashTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the tracker persisted by the previous request and age it
    ///
    /// Keys still marked old (not re-flashed last request) are dropped from
    /// `attributes`; last request's new keys become this request's old keys.
    pub fn age(
        attributes: &mut Attributes,
        stored_new: BTreeSet<String>,
        stored_old: BTreeSet<String>,
    ) -> Self {
        for key in stored_old.difference(&stored_new) {
            attributes.remove(key);
        }
        Self {
            new: BTreeSet::new(),
            old: stored_new,
        }
    }

    /// Mark `key` as flashed in this request
    pub fn mark(&mut self, key: &str) {
        self.old.remove(key);
        self.new.insert(key.to_string());
    }

    /// Keep every old key for one more request
    pub fn reflash(&mut self) {
        let old = std::mem::take(&mut self.old);
        self.new.extend(old);
    }

    /// Keep the given old keys for one more request; unknown keys are ignored
    pub fn keep<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            let key = key.as_ref();
            if self.old.remove(key) {
                self.new.insert(key.to_string());
            }
        }
    }

    /// Stop tracking `key` entirely
    pub fn forget(&mut self, key: &str) {
        self.new.remove(key);
        self.old.remove(key);
    }

    pub fn clear(&mut self) {
        self.new.clear();
        self.old.clear();
    }

    pub fn new_keys(&self) -> &BTreeSet<String> {
        &self.new
    }

    pub fn old_keys(&self) -> &BTreeSet<String> {
        &self.old
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::value::Value;

    fn set(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_age_drops_stale_old_keys_only() {
        let mut attributes = Attributes::new();
        attributes.insert("stale".to_string(), Value::from(1));
        attributes.insert("fresh".to_string(), Value::from(2));
        attributes.insert("regular".to_string(), Value::from(3));

        let tracker = FlashTracker::age(&mut attributes, set(&["fresh"]), set(&["stale"]));

        assert!(!attributes.contains_key("stale"));
        assert!(attributes.contains_key("fresh"));
        assert!(attributes.contains_key("regular"));
        assert_eq!(tracker.old_keys(), &set(&["fresh"]));
        assert!(tracker.new_keys().is_empty());
    }

    #[test]
    fn test_reflashed_key_survives_age() {
        let mut attributes = Attributes::new();
        attributes.insert("k".to_string(), Value::from("v"));
        let tracker = FlashTracker::age(&mut attributes, set(&["k"]), set(&["k"]));
        assert!(attributes.contains_key("k"));
        assert!(tracker.old_keys().contains("k"));
    }

    #[test]
    fn test_keep_ignores_unknown_keys() {
        let mut tracker = FlashTracker::age(&mut Attributes::new(), set(&["a", "b"]), set(&[]));
        tracker.keep(["a", "missing"]);
        assert_eq!(tracker.new_keys(), &set(&["a"]));
        assert_eq!(tracker.old_keys(), &set(&["b"]));
    }

    #[test]
    fn test_reflash_moves_everything() {
        let mut tracker = FlashTracker::age(&mut Attributes::new(), set(&["a", "b"]), set(&[]));
        tracker.mark("c");
        tracker.reflash();
        assert_eq!(tracker.new_keys(), &set(&["a", "b", "c"]));
        assert!(tracker.old_keys().is_empty());
    }

    #[test]
    fn test_mark_promotes_old_key() {
        let mut tracker = FlashTracker::age(&mut Attributes::new(), set(&["a"]), set(&[]));
        tracker.mark("a");
        assert!(tracker.old_keys().is_empty());
        assert!(tracker.new_keys().contains("a"));
        tracker.forget("a");
        assert!(tracker.new_keys().is_empty());
    }
}
