// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `presently login`, `logout` and `whoami`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::*;

#[test]
fn whoami_without_session_fails_with_hint() {
    let dir = TempDir::new().unwrap();
    presently(&dir)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not signed in"))
        .stderr(predicate::str::contains("presently login"));
}

#[test]
fn whoami_shows_stored_identity() {
    let dir = signed_in_dir();
    presently(&dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Lovelace (student)"))
        .stdout(predicate::str::contains("ID: 65a1f0c2"));
}

#[test]
fn malformed_stored_token_is_purged() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bearer_token"), "not-a-jwt").unwrap();

    presently(&dir).arg("whoami").assert().failure();
    assert!(!dir.path().join("bearer_token").exists());
}

#[test]
fn logout_removes_stored_token() {
    let dir = signed_in_dir();
    presently(&dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out"));
    assert!(!dir.path().join("bearer_token").exists());
}

#[test]
fn login_without_password_fails() {
    let dir = TempDir::new().unwrap();
    presently(&dir)
        .args(["login", "-e", "ada@example.edu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("password cannot be empty"));
}

#[test]
fn login_unreachable_server_fails() {
    let dir = TempDir::new().unwrap();
    presently(&dir)
        .args(["login", "-e", "ada@example.edu", "--password", "secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("network error"));
    assert!(!dir.path().join("bearer_token").exists());
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "rotation_window_secs = 0\n").unwrap();
    presently(&dir)
        .env_remove("PRESENTLY_API_URL")
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("rotation_window_secs"));
}

#[test]
fn classes_without_session_fails_with_hint() {
    let dir = TempDir::new().unwrap();
    presently(&dir)
        .arg("classes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not signed in"));
}

#[test]
fn history_with_unreachable_server_fails() {
    let dir = signed_in_dir();
    presently(&dir)
        .arg("history")
        .assert()
        .failure()
        .stderr(predicate::str::contains("network error"));
}
