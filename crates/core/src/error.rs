// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for presently-core operations.

use thiserror::Error;

/// All possible errors that can occur in presently-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("unsupported queue version {0}\n  hint: the queue was written by a newer release")]
    UnsupportedVersion(u32),

    #[error("invalid store key: '{0}'\n  hint: keys are ascii letters, digits, '_' and '-'")]
    InvalidKey(String),

    #[error("malformed bearer token: {0}")]
    MalformedToken(String),

    #[error("{0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns true if this error came from reading or writing durable state.
    ///
    /// Storage failures must reach the caller; a scan that could not be
    /// persisted is never dropped silently.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::Json(_)
                | Error::CorruptedData(_)
                | Error::UnsupportedVersion(_)
                | Error::InvalidKey(_)
        )
    }
}

/// A specialized Result type for presently-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
