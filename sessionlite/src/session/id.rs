// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session identifier generation and format validation
//!
//! Identifiers are 20 bytes read from the operating system CSPRNG, rendered as
//! 40 lowercase hex characters (160 bits). Each call reads fresh randomness;
//! there is no shared counter or seeded generator.

use crate::error::{SessionError, SessionResult};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt::Write;

/// Number of random bytes behind one identifier
pub const SESSION_ID_BYTES: usize = 20;

/// Length of the rendered identifier
pub const SESSION_ID_LEN: usize = SESSION_ID_BYTES * 2;

/// Generate a fresh session identifier
///
/// Fails with `EntropyUnavailable` when the OS randomness source cannot be
/// read. This is never retried with a weaker source.
pub fn generate() -> SessionResult<String> {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SessionError::EntropyUnavailable(e.to_string()))?;

    let mut id = String::with_capacity(SESSION_ID_LEN);
    for byte in bytes {
        // Writing to a String cannot fail
        let _ = write!(id, "{:02x}", byte);
    }
    Ok(id)
}

/// Check that `id` has the shape produced by [`generate`]
pub fn is_valid_format(id: &str) -> bool {
    id.len() == SESSION_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_have_valid_format() {
        let id = generate().unwrap();
        assert_eq!(id.len(), SESSION_ID_LEN);
        assert!(is_valid_format(&id));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids: HashSet<String> = (0..1_000).map(|_| generate().unwrap()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn test_format_rejections() {
        assert!(!is_valid_format(""));
        assert!(!is_valid_format("abc"));
        assert!(!is_valid_format(&"A".repeat(SESSION_ID_LEN)));
        assert!(!is_valid_format(&"g".repeat(SESSION_ID_LEN)));
        assert!(!is_valid_format(&"0".repeat(SESSION_ID_LEN + 1)));
        assert!(is_valid_format(&"0".repeat(SESSION_ID_LEN)));
    }
}
