// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// A base URL nothing listens on, so every probe fails fast.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9/api";

/// Command bound to a private data directory and an unreachable server.
pub fn presently(data_dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("presently");
    cmd.arg("-C")
        .arg(data_dir.path())
        .env("PRESENTLY_API_URL", UNREACHABLE_API)
        .env_remove("PRESENTLY_DATA_DIR")
        .env_remove("PRESENTLY_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Unsigned JWT with the given claims.
pub fn jwt(claims: &str) -> String {
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims),
        URL_SAFE_NO_PAD.encode("sig")
    )
}

/// Data directory with a stored student session.
pub fn signed_in_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("bearer_token"),
        jwt(r#"{"user_id":"65a1f0c2","name":"Ada Lovelace","role":"student"}"#),
    )
    .unwrap();
    dir
}
