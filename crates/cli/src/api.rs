// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the attendance HTTP API.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP requests for production ([`HttpApi`])
//! - Scripted mock transports for unit testing
//!
//! The transport only moves bytes: it reports the status and body of every
//! reply it receives and fails only when no reply arrived. Interpreting the
//! status belongs to the callers.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use presently_core::protocol::{JoinClassRequest, LoginRequest, MarkAttendanceRequest};
use reqwest::Url;
use serde::de::DeserializeOwned;

/// Error type for transport operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request could not be built or no reply arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// The request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Building the HTTP client failed.
    #[error("client setup failed: {0}")]
    Setup(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by [`Api`] methods.
pub type ApiFuture<'a> = Pin<Box<dyn Future<Output = TransportResult<Reply>> + Send + 'a>>;

/// Boxed future returned by [`Api::probe`].
pub type ProbeFuture<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

/// A reply received from the server, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Reply {
            status,
            body: body.into(),
        }
    }

    /// Check if the reply indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Server-provided failure message, if any.
    pub fn error_message(&self) -> Option<String> {
        presently_core::protocol::error_message(&self.body)
    }
}

/// Remote attendance service.
///
/// Bearer tokens are passed per call; the transport holds no session state.
pub trait Api: Send + Sync {
    /// `POST /login`.
    fn login<'a>(&'a self, email: &'a str, password: &'a str) -> ApiFuture<'a>;

    /// `POST /classes/{class_id}/attendance-session`.
    fn create_attendance_session<'a>(&'a self, bearer: &'a str, class_id: &'a str)
        -> ApiFuture<'a>;

    /// `POST /attendance/mark`.
    fn mark_attendance<'a>(&'a self, bearer: &'a str, attendance_token: &'a str)
        -> ApiFuture<'a>;

    /// `GET /classes`: classes the bearer teaches or attends.
    fn list_classes<'a>(&'a self, bearer: &'a str) -> ApiFuture<'a>;

    /// `POST /classes/join` with a class code.
    fn join_class<'a>(&'a self, bearer: &'a str, code: &'a str) -> ApiFuture<'a>;

    /// `POST /classes/{class_id}/leave`.
    fn leave_class<'a>(&'a self, bearer: &'a str, class_id: &'a str) -> ApiFuture<'a>;

    /// `GET /classes/{class_id}/attendance`: per-student totals.
    fn class_attendance<'a>(&'a self, bearer: &'a str, class_id: &'a str) -> ApiFuture<'a>;

    /// `GET /attendance/history`: the bearer's own records, newest first.
    fn attendance_history<'a>(&'a self, bearer: &'a str) -> ApiFuture<'a>;

    /// Check whether the server answers at all.
    fn probe(&self) -> ProbeFuture<'_>;
}

/// HTTP transport implementation using reqwest.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpApi {
    /// Create a transport for the given base URL.
    pub fn new(base_url: &str, timeout: Duration) -> TransportResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| TransportError::Setup(format!("invalid base url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::Setup(format!(
                "base url '{}' cannot carry a path",
                base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        Ok(HttpApi { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> TransportResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::Setup(format!("base url '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Endpoint for a per-class route. An empty or dot-only id never
    /// leaves the client.
    fn class_endpoint(&self, class_id: &str, action: &str) -> TransportResult<Url> {
        if matches!(class_id, "" | "." | "..") {
            return Err(TransportError::Request(format!(
                "invalid class id '{}'",
                class_id
            )));
        }
        self.endpoint(&["classes", class_id, action])
    }

    fn send(request: TransportResult<reqwest::RequestBuilder>) -> ApiFuture<'static> {
        Box::pin(async move {
            let response = request?.send().await.map_err(map_reqwest_error)?;
            let status = response.status().as_u16();
            let body = response.bytes().await.map_err(map_reqwest_error)?;
            Ok(Reply::new(status, body.to_vec()))
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}

impl Api for HttpApi {
    fn login<'a>(&'a self, email: &'a str, password: &'a str) -> ApiFuture<'a> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        Self::send(
            self.endpoint(&["login"])
                .map(|url| self.client.post(url).json(&body)),
        )
    }

    fn create_attendance_session<'a>(
        &'a self,
        bearer: &'a str,
        class_id: &'a str,
    ) -> ApiFuture<'a> {
        Self::send(
            self.class_endpoint(class_id, "attendance-session")
                .map(|url| self.client.post(url).bearer_auth(bearer)),
        )
    }

    fn mark_attendance<'a>(&'a self, bearer: &'a str, attendance_token: &'a str) -> ApiFuture<'a> {
        let body = MarkAttendanceRequest {
            attendance_token: attendance_token.to_string(),
        };
        Self::send(self.endpoint(&["attendance", "mark"]).map(|url| {
            self.client.post(url).bearer_auth(bearer).json(&body)
        }))
    }

    fn list_classes<'a>(&'a self, bearer: &'a str) -> ApiFuture<'a> {
        Self::send(
            self.endpoint(&["classes"])
                .map(|url| self.client.get(url).bearer_auth(bearer)),
        )
    }

    fn join_class<'a>(&'a self, bearer: &'a str, code: &'a str) -> ApiFuture<'a> {
        let body = JoinClassRequest {
            code: code.to_string(),
        };
        Self::send(self.endpoint(&["classes", "join"]).map(|url| {
            self.client.post(url).bearer_auth(bearer).json(&body)
        }))
    }

    fn leave_class<'a>(&'a self, bearer: &'a str, class_id: &'a str) -> ApiFuture<'a> {
        Self::send(
            self.class_endpoint(class_id, "leave")
                .map(|url| self.client.post(url).bearer_auth(bearer)),
        )
    }

    fn class_attendance<'a>(&'a self, bearer: &'a str, class_id: &'a str) -> ApiFuture<'a> {
        Self::send(
            self.class_endpoint(class_id, "attendance")
                .map(|url| self.client.get(url).bearer_auth(bearer)),
        )
    }

    fn attendance_history<'a>(&'a self, bearer: &'a str) -> ApiFuture<'a> {
        Self::send(
            self.endpoint(&["attendance", "history"])
                .map(|url| self.client.get(url).bearer_auth(bearer)),
        )
    }

    /// Any HTTP reply, even an error status, means the host is reachable.
    fn probe(&self) -> ProbeFuture<'_> {
        let request = self.client.get(self.base_url.clone());
        Box::pin(async move { request.send().await.is_ok() })
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
