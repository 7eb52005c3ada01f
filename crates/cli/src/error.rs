// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::api::TransportError;

/// All possible errors that can occur in the presently library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage failures and malformed data from presently-core.
    #[error(transparent)]
    Core(#[from] presently_core::Error),

    #[error("network error: {0}")]
    Transport(#[from] TransportError),

    #[error("not signed in\n  hint: run 'presently login' first")]
    NotSignedIn,

    #[error("{0}")]
    SignInFailed(String),

    #[error("{0}")]
    Rejected(String),

    #[error("could not issue attendance token: {0}")]
    IssueFailed(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response from server: {0}")]
    UnexpectedResponse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if this error came from the durable store.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_storage_failure())
    }
}

/// A specialized Result type for presently operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
