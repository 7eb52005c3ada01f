// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Attendance queue records and submission outcomes.
//!
//! The offline queue is persisted as a single record:
//!
//! ```text
//! {"version":1,"items":[{"id":"q-1a2b3c4d","attendanceToken":"..."}]}
//! ```
//!
//! Older clients wrote a bare JSON array of items with no version tag. That
//! form is still accepted on read and is upgraded on the next write.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Current version of the persisted queue record.
pub const QUEUE_VERSION: u32 = 1;

/// A scan waiting to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// Unique within the queue.
    pub id: String,
    /// Opaque token decoded from the instructor's QR code.
    pub attendance_token: String,
}

impl QueueItem {
    pub fn new(id: impl Into<String>, attendance_token: impl Into<String>) -> Self {
        QueueItem {
            id: id.into(),
            attendance_token: attendance_token.into(),
        }
    }
}

/// Versioned on-disk form of the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueRecord {
    pub version: u32,
    pub items: Vec<QueueItem>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredQueue {
    Versioned(QueueRecord),
    Legacy(Vec<QueueItem>),
}

impl QueueRecord {
    /// Decodes a persisted queue, accepting the legacy unversioned array.
    ///
    /// Empty input is an empty queue.
    pub fn decode(bytes: &[u8]) -> Result<Vec<QueueItem>> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<StoredQueue>(bytes) {
            Ok(StoredQueue::Versioned(record)) if record.version > QUEUE_VERSION => {
                Err(Error::UnsupportedVersion(record.version))
            }
            Ok(StoredQueue::Versioned(record)) => Ok(record.items),
            Ok(StoredQueue::Legacy(items)) => Ok(items),
            // Re-parse as a plain value to report a useful serde error
            Err(_) => match serde_json::from_slice::<serde_json::Value>(bytes) {
                Ok(_) => Err(Error::CorruptedData(
                    "queue record has an unrecognized shape".to_string(),
                )),
                Err(e) => Err(e.into()),
            },
        }
    }

    /// Encodes items in the current versioned form.
    pub fn encode(items: &[QueueItem]) -> Result<Vec<u8>> {
        #[derive(Serialize)]
        struct Borrowed<'a> {
            version: u32,
            items: &'a [QueueItem],
        }

        Ok(serde_json::to_vec(&Borrowed {
            version: QUEUE_VERSION,
            items,
        })?)
    }
}

/// Normalized result of submitting one attendance token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server recorded the attendance.
    Accepted,
    /// The server already held this record (HTTP 409). Equivalent to success.
    AlreadyRecorded,
    /// The server refused the token for good (expired, mismatched, not enrolled).
    Rejected(String),
    /// The request never got a decision: transport failure or a 5xx.
    NetworkError(String),
    /// No bearer token is held locally.
    ///
    /// The attendance token was never judged, so the item stays queued.
    Unauthenticated,
}

impl Outcome {
    /// True for outcomes that confirm the record exists on the server.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Accepted | Outcome::AlreadyRecorded)
    }

    /// True when the queued item is finished with and must be removed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Outcome::Accepted | Outcome::AlreadyRecorded | Outcome::Rejected(_)
        )
    }

    /// Human-readable message for interactive submissions.
    pub fn message(&self) -> String {
        match self {
            Outcome::Accepted => "Attendance Marked Successfully!".to_string(),
            Outcome::AlreadyRecorded => "Attendance already marked for this session.".to_string(),
            Outcome::Rejected(reason) => reason.clone(),
            Outcome::NetworkError(_) => "Could not reach the server.".to_string(),
            Outcome::Unauthenticated => "You are not signed in.".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "attendance_tests.rs"]
mod tests;
