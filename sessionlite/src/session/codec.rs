// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Payload codec - turns a session's attributes and flash bookkeeping into
//! storage-safe bytes and back
//!
//! Binary layout:
//!
//! ```text
//! +---------+---------------------------+----------------+
//! | version | bincode(SessionPayload)   | crc32 (LE u32) |
//! | 1 byte  | variable                  | 4 bytes        |
//! +---------+---------------------------+----------------+
//! ```
//!
//! The checksum covers version and body. On decode any mismatch, truncation,
//! unknown version, oversized body or trailing garbage is reported as
//! `CorruptPayload`; decoding never yields a partially populated payload.
//! Encoding a body over the limit fails with `PayloadTooLarge`.

use crate::error::{SessionError, SessionResult};
use crate::session::value::Attributes;
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Current payload format version
const PAYLOAD_VERSION: u8 = 1;
/// Size of the trailing checksum
const CHECKSUM_LEN: usize = 4;
/// Upper bound for a payload body (1 MiB)
pub const MAX_PAYLOAD_BYTES: u64 = 1024 * 1024;

/// Everything persisted for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Regular and flash values together
    pub attributes: Attributes,
    /// Keys flashed during the request that wrote this payload
    pub new_flash: BTreeSet<String>,
    /// Keys flashed one request earlier, due to age out on the next load
    pub old_flash: BTreeSet<String>,
}

impl SessionPayload {
    pub fn from_attributes(attributes: Attributes) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }
}

fn encode_options() -> impl Options {
    bincode::DefaultOptions::new().reject_trailing_bytes()
}

fn decode_options() -> impl Options {
    encode_options().with_limit(MAX_PAYLOAD_BYTES)
}

/// Encode a payload into its stored form
pub fn encode(payload: &SessionPayload) -> SessionResult<Vec<u8>> {
    let size = encode_options().serialized_size(payload)?;
    if size > MAX_PAYLOAD_BYTES {
        return Err(SessionError::PayloadTooLarge {
            size,
            limit: MAX_PAYLOAD_BYTES,
        });
    }
    let body = encode_options().serialize(payload)?;

    let mut buffer = Vec::with_capacity(1 + body.len() + CHECKSUM_LEN);
    buffer.push(PAYLOAD_VERSION);
    buffer.extend_from_slice(&body);

    let checksum = crc32fast::hash(&buffer);
    buffer.extend_from_slice(&checksum.to_le_bytes());
    Ok(buffer)
}

/// Decode a stored payload
pub fn decode(data: &[u8]) -> SessionResult<SessionPayload> {
    if data.len() < 1 + CHECKSUM_LEN {
        return Err(SessionError::corrupt("payload too small"));
    }

    let (framed, checksum_bytes) = data.split_at(data.len() - CHECKSUM_LEN);
    let mut expected = [0u8; CHECKSUM_LEN];
    expected.copy_from_slice(checksum_bytes);
    if u32::from_le_bytes(expected) != crc32fast::hash(framed) {
        return Err(SessionError::corrupt("checksum mismatch"));
    }

    let version = framed[0];
    if version != PAYLOAD_VERSION {
        return Err(SessionError::corrupt(format!(
            "unsupported payload version {}",
            version
        )));
    }

    Ok(decode_options().deserialize(&framed[1..])?)
}
