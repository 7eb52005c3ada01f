// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions.

use std::path::PathBuf;

/// Environment variable names.
pub mod vars {
    pub const PRESENTLY_DATA_DIR: &str = "PRESENTLY_DATA_DIR";
    pub const PRESENTLY_API_URL: &str = "PRESENTLY_API_URL";
    pub const PRESENTLY_PASSWORD: &str = "PRESENTLY_PASSWORD";
}

/// Returns the value of `PRESENTLY_DATA_DIR` if set.
pub fn data_dir() -> Option<PathBuf> {
    non_empty(vars::PRESENTLY_DATA_DIR).map(PathBuf::from)
}

/// Returns the value of `PRESENTLY_API_URL` if set.
pub fn api_url() -> Option<String> {
    non_empty(vars::PRESENTLY_API_URL)
}

/// Returns the value of `PRESENTLY_PASSWORD` if set.
pub fn password() -> Option<String> {
    non_empty(vars::PRESENTLY_PASSWORD)
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
