// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Persisted session row

use crate::error::{SessionError, SessionResult};
use serde::{Deserialize, Serialize};

/// One row of the session table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Session identifier (primary key)
    pub id: String,
    /// Encoded attribute payload
    pub payload: Vec<u8>,
    /// Unix seconds of the last save
    pub last_activity: i64,
}

/// Value stored under the identifier key
#[derive(Serialize, Deserialize, Debug)]
struct StoredRow {
    payload: Vec<u8>,
    last_activity: i64,
}

impl SessionRecord {
    pub fn new(id: impl Into<String>, payload: Vec<u8>, last_activity: i64) -> Self {
        Self {
            id: id.into(),
            payload,
            last_activity,
        }
    }

    /// Seconds elapsed since the last save, relative to `now`
    pub fn idle_seconds(&self, now: i64) -> i64 {
        now.saturating_sub(self.last_activity)
    }

    pub(crate) fn encode_row(&self) -> SessionResult<Vec<u8>> {
        let row = StoredRow {
            payload: self.payload.clone(),
            last_activity: self.last_activity,
        };
        Ok(bincode::serialize(&row)?)
    }

    pub(crate) fn decode_row(id: &[u8], data: &[u8]) -> SessionResult<Self> {
        let row: StoredRow = bincode::deserialize(data)?;
        let id = String::from_utf8(id.to_vec())
            .map_err(|_| SessionError::corrupt("session key is not valid UTF-8"))?;
        Ok(Self {
            id,
            payload: row.payload,
            last_activity: row.last_activity,
        })
    }
}
