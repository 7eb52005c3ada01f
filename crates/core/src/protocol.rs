// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP protocol bodies for the attendance API.
//!
//! Endpoints, relative to the configured base URL:
//! - `POST /login` with [`LoginRequest`], answered by [`LoginResponse`]
//! - `POST /classes/{classId}/attendance-session`, answered by [`AttendanceSessionResponse`]
//! - `POST /attendance/mark` with [`MarkAttendanceRequest`]
//! - `GET /classes`, answered by a list of [`Classroom`]
//! - `POST /classes/join` with [`JoinClassRequest`]
//! - `POST /classes/{classId}/leave`
//! - `GET /classes/{classId}/attendance`, answered by a list of [`AttendanceSummary`]
//! - `GET /attendance/history`, answered by a list of [`AttendanceRecord`]
//!
//! Failures carry an [`ErrorBody`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::attendance::Outcome;

/// Fallback shown when a failed mark-attendance reply has no message.
pub const MARK_FAILED: &str = "Failed to mark attendance.";

/// Fallback shown when a failed login reply has no message.
pub const LOGIN_FAILED: &str = "Login failed";

/// Fallback shown when an attendance session could not be started.
pub const SESSION_FAILED: &str = "Failed to create attendance session";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    pub attendance_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSessionResponse {
    pub attendance_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinClassRequest {
    pub code: String,
}

/// A class the signed-in user teaches or attends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub student_ids: Vec<String>,
}

/// One attendance record of the signed-in student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub classroom_id: String,
    pub timestamp: DateTime<Utc>,
    pub classroom_info: ClassroomInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomInfo {
    pub subject_name: String,
    pub subject_code: String,
}

/// Sessions attended by one student of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub attended_count: u32,
}

/// Parses a JSON list reply. The server encodes an empty list as `null`.
pub fn parse_list<T: DeserializeOwned>(body: &[u8]) -> serde_json::Result<Vec<T>> {
    Ok(serde_json::from_slice::<Option<Vec<T>>>(body)?.unwrap_or_default())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error payload returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Extracts a human-readable message from a failed reply body.
///
/// Prefers the JSON `error` field, then `message`, then the raw body text.
pub fn error_message(body: &[u8]) -> Option<String> {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        if let Some(msg) = parsed.error.or(parsed.message) {
            let msg = msg.trim().to_string();
            if !msg.is_empty() {
                return Some(msg);
            }
        }
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() || text.starts_with('{') {
        None
    } else {
        Some(text)
    }
}

/// Maps a mark-attendance reply onto an [`Outcome`].
///
/// - 2xx: accepted
/// - 409: already recorded
/// - any other 4xx, 401 included: rejected, with the server's reason
///
/// The mark endpoint answers 401 for an invalid or expired attendance token,
/// so a 401 here is a verdict on the token and is terminal.
/// - everything else: no decision was made, treat as transient
pub fn classify_mark_response(status: u16, body: &[u8]) -> Outcome {
    match status {
        200..=299 => Outcome::Accepted,
        409 => Outcome::AlreadyRecorded,
        400..=499 => {
            Outcome::Rejected(error_message(body).unwrap_or_else(|| MARK_FAILED.to_string()))
        }
        _ => Outcome::NetworkError(format!("server returned status {}", status)),
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
