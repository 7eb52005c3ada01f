// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for scanning and syncing without a reachable server.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::*;

fn queued_tokens(dir: &TempDir) -> Vec<String> {
    let output = presently(dir).args(["queue", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    let items: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["attendanceToken"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn queue_starts_empty() {
    let dir = TempDir::new().unwrap();
    presently(&dir)
        .arg("queue")
        .assert()
        .success()
        .stdout(predicate::str::contains("No scans waiting to sync."));
}

#[test]
fn scan_requires_session() {
    let dir = TempDir::new().unwrap();
    presently(&dir)
        .args(["scan", "abc123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not signed in"));
}

#[test]
fn scan_offline_flag_queues() {
    let dir = signed_in_dir();
    presently(&dir)
        .args(["scan", "abc123", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Attendance saved offline. It will sync when you are back online.",
        ));
    assert_eq!(queued_tokens(&dir), vec!["abc123"]);
}

#[test]
fn scan_with_unreachable_server_queues() {
    let dir = signed_in_dir();
    presently(&dir)
        .args(["scan", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("saved offline"));
    assert_eq!(queued_tokens(&dir), vec!["abc123"]);
}

#[test]
fn queue_keeps_scan_order() {
    let dir = signed_in_dir();
    for token in ["first", "second", "third"] {
        presently(&dir)
            .args(["scan", token, "--offline"])
            .assert()
            .success();
    }
    assert_eq!(queued_tokens(&dir), vec!["first", "second", "third"]);

    presently(&dir)
        .arg("queue")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 scans waiting to sync"));
}

#[test]
fn sync_unreachable_keeps_queue() {
    let dir = signed_in_dir();
    presently(&dir)
        .args(["scan", "abc123", "--offline"])
        .assert()
        .success();

    presently(&dir)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Server unreachable; 1 scan still queued"));
    assert_eq!(queued_tokens(&dir), vec!["abc123"]);
}

#[test]
fn blank_token_is_refused() {
    let dir = signed_in_dir();
    presently(&dir).args(["scan", "  "]).assert().failure();
    assert!(queued_tokens(&dir).is_empty());
}
