// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the submission client module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::client::SubmissionClient;
use crate::session::Session;
use crate::test_helpers::{signed_in_session, student_jwt, MockApi, MockReply};
use presently_core::{MemoryStore, Outcome};
use std::sync::Arc;
use yare::parameterized;

fn make_client(api: &Arc<MockApi>) -> SubmissionClient {
    let session = signed_in_session(Arc::new(MemoryStore::new()), api.clone());
    SubmissionClient::new(api.clone(), session)
}

#[tokio::test]
async fn test_resubmission_is_already_recorded() {
    let api = MockApi::new();
    let client = make_client(&api);

    assert_eq!(client.submit("tok").await, Outcome::Accepted);
    assert_eq!(client.submit("tok").await, Outcome::AlreadyRecorded);
    assert_eq!(api.mark_calls(), vec!["tok", "tok"]);
}

#[tokio::test]
async fn test_bearer_attached() {
    let api = MockApi::new();
    let client = make_client(&api);

    client.submit("tok").await;

    assert_eq!(api.mark_bearers(), vec![student_jwt()]);
}

#[parameterized(
    expired = { 400, r#"{"error":"Attendance session has expired"}"#, Outcome::Rejected("Attendance session has expired".into()) },
    not_enrolled = { 403, "Forbidden: you are not enrolled in this classroom", Outcome::Rejected("Forbidden: you are not enrolled in this classroom".into()) },
    unknown_token = { 404, "", Outcome::Rejected("Failed to mark attendance.".into()) },
    conflict = { 409, "", Outcome::AlreadyRecorded },
    expired_token = { 401, r#"{"error":"Invalid or expired attendance token"}"#, Outcome::Rejected("Invalid or expired attendance token".into()) },
    server_down = { 503, "", Outcome::NetworkError("server returned status 503".into()) },
)]
fn test_reply_classification(status: u16, body: &str, expected: Outcome) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        let api = MockApi::new();
        api.script_mark("tok", MockReply::Status(status, body.to_string()));
        let client = make_client(&api);

        assert_eq!(client.submit("tok").await, expected);
    });
}

#[tokio::test]
async fn test_transport_failure_is_network_error() {
    let api = MockApi::new();
    api.script_mark("tok", MockReply::NetworkDown);
    let client = make_client(&api);

    assert!(matches!(
        client.submit("tok").await,
        Outcome::NetworkError(_)
    ));
}

#[tokio::test]
async fn test_without_bearer_is_unauthenticated() {
    let api = MockApi::new();
    let session = Session::new(Arc::new(MemoryStore::new()), api.clone());
    session.load().unwrap();
    let client = SubmissionClient::new(api.clone(), session);

    assert_eq!(client.submit("tok").await, Outcome::Unauthenticated);
    assert!(api.mark_calls().is_empty());
}
