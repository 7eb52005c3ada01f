// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    ok = { 200, Outcome::Accepted },
    created = { 201, Outcome::Accepted },
    conflict = { 409, Outcome::AlreadyRecorded },
    unauthorized = { 401, Outcome::Rejected(MARK_FAILED.into()) },
    server_error = { 500, Outcome::NetworkError("server returned status 500".into()) },
    bad_gateway = { 502, Outcome::NetworkError("server returned status 502".into()) },
)]
fn classify_by_status(status: u16, expected: Outcome) {
    assert_eq!(classify_mark_response(status, b""), expected);
}

#[parameterized(
    json_error = { br#"{"error": "Attendance session has expired"}"#.as_slice(), "Attendance session has expired" },
    json_message = { br#"{"message": "Invalid attendance token"}"#.as_slice(), "Invalid attendance token" },
    plain_text = { b"Forbidden: you are not enrolled in this classroom\n".as_slice(), "Forbidden: you are not enrolled in this classroom" },
    empty = { b"".as_slice(), MARK_FAILED },
    empty_json = { b"{}".as_slice(), MARK_FAILED },
)]
fn rejected_reason_from_body(body: &[u8], reason: &str) {
    assert_eq!(
        classify_mark_response(400, body),
        Outcome::Rejected(reason.to_string())
    );
}

#[test]
fn expired_token_401_is_rejected_with_server_reason() {
    let outcome =
        classify_mark_response(401, br#"{"error":"Invalid or expired attendance token"}"#);
    assert_eq!(
        outcome,
        Outcome::Rejected("Invalid or expired attendance token".into())
    );
    assert!(outcome.is_terminal());
}

#[test]
fn forbidden_is_rejected() {
    let outcome = classify_mark_response(403, br#"{"error":"Forbidden"}"#);
    assert_eq!(outcome, Outcome::Rejected("Forbidden".into()));
}

#[test]
fn error_prefers_error_field() {
    let body = br#"{"error":"first","message":"second"}"#;
    assert_eq!(error_message(body).as_deref(), Some("first"));
}

#[test]
fn mark_request_uses_camel_case() {
    let req = MarkAttendanceRequest {
        attendance_token: "abc123".into(),
    };
    let json = serde_json::to_string(&req).unwrap();
    assert_eq!(json, r#"{"attendanceToken":"abc123"}"#);
}

#[test]
fn session_response_parses() {
    let resp: AttendanceSessionResponse =
        serde_json::from_str(r#"{"attendanceToken":"9f8e7d"}"#).unwrap();
    assert_eq!(resp.attendance_token, "9f8e7d");
}

#[test]
fn classroom_list_parses_server_shape() {
    let body = br#"[{"id":"65a1f0c2","name":"Operating Systems","code":"CS401","instructorId":"64ff00aa","studentIds":["65b0","65b1"]},
                    {"id":"65a1f0c3","name":"Compilers","code":"CS402","instructorId":"64ff00aa","studentIds":null}]"#;
    let classes: Vec<Classroom> = parse_list(body).unwrap();
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0].code, "CS401");
    assert_eq!(classes[0].student_ids, vec!["65b0", "65b1"]);
    assert!(classes[1].student_ids.is_empty());
}

#[parameterized(
    empty_array = { b"[]".as_slice() },
    null = { b"null".as_slice() },
)]
fn empty_list_forms(body: &[u8]) {
    let records: Vec<AttendanceRecord> = parse_list(body).unwrap();
    assert!(records.is_empty());
}

#[test]
fn history_record_parses_offset_timestamp() {
    let body = br#"[{"id":"r1","userId":"65b0","classroomId":"65a1f0c2","timestamp":"2025-03-04T09:00:05.123+05:30",
                     "classroomInfo":{"subjectName":"Operating Systems","subjectCode":"CS401"}}]"#;
    let records: Vec<AttendanceRecord> = parse_list(body).unwrap();
    assert_eq!(records[0].classroom_info.subject_code, "CS401");
    assert_eq!(
        records[0].timestamp.format("%H:%M:%S").to_string(),
        "03:30:05"
    );
}

#[test]
fn summary_parses() {
    let body = br#"[{"userId":"65b0","name":"Ada Lovelace","email":"ada@example.edu","attendedCount":7}]"#;
    let rows: Vec<AttendanceSummary> = parse_list(body).unwrap();
    assert_eq!(rows[0].attended_count, 7);
}

#[test]
fn malformed_list_is_an_error() {
    assert!(parse_list::<Classroom>(br#"{"error":"nope"}"#).is_err());
}
