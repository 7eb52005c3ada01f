// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;

fn items() -> Vec<QueueItem> {
    vec![
        QueueItem::new("q-1a2b3c4d", "abc123"),
        QueueItem::new("q-5e6f7a8b", "def456"),
    ]
}

#[test]
fn test_render_empty() {
    assert_eq!(
        render(&[], OutputFormat::Text).unwrap(),
        "No scans waiting to sync.\n"
    );
    assert_eq!(render(&[], OutputFormat::Json).unwrap(), "[]\n");
}

#[test]
fn test_render_text_lists_in_order() {
    let out = render(&items(), OutputFormat::Text).unwrap();
    assert_eq!(
        out,
        "q-1a2b3c4d  abc123\nq-5e6f7a8b  def456\n\n2 scans waiting to sync\n"
    );
}

#[test]
fn test_render_single_item_wording() {
    let out = render(&items()[..1], OutputFormat::Text).unwrap();
    assert!(out.ends_with("1 scan waiting to sync\n"));
}

#[test]
fn test_render_json_uses_wire_names() {
    let out = render(&items(), OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value[0]["id"], "q-1a2b3c4d");
    assert_eq!(value[1]["attendanceToken"], "def456");
}
