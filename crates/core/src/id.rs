// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue item ids.
//!
//! An id is `q-` followed by the first 4 bytes, hex encoded, of
//! SHA-256(attendance token ‖ RFC 3339 scan time). The same token scanned
//! twice in one instant collides; the second copy gets a `-2` suffix, the
//! third `-3`, and so on.

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

/// Prefix for offline queue item ids.
pub const QUEUE_ID_PREFIX: &str = "q";

const HASH_BYTES: usize = 4;

/// Derive the base id for a scan.
pub fn generate_queue_id(attendance_token: &str, scanned_at: &DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(attendance_token.as_bytes());
    hasher.update(scanned_at.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes());
    let digest = hasher.finalize();
    format!("{}-{}", QUEUE_ID_PREFIX, hex::encode(&digest[..HASH_BYTES]))
}

/// Derive an id that `taken` does not report as already in use.
pub fn generate_unique_queue_id<F>(
    attendance_token: &str,
    scanned_at: &DateTime<Utc>,
    taken: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let base = generate_queue_id(attendance_token, scanned_at);
    if !taken(&base) {
        return base;
    }

    (2u32..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
