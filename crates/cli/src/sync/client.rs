// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Attendance submission client.
//!
//! Wraps the remote mark-attendance call and folds every possible reply into
//! an [`Outcome`]. It never returns an error: a transport failure is itself an
//! outcome ([`Outcome::NetworkError`]) that callers act on.

use std::sync::Arc;

use presently_core::protocol::classify_mark_response;
use presently_core::Outcome;

use crate::api::Api;
use crate::session::Session;

/// Submits attendance tokens with the session's bearer token.
#[derive(Clone)]
pub struct SubmissionClient {
    api: Arc<dyn Api>,
    session: Session,
}

impl SubmissionClient {
    pub fn new(api: Arc<dyn Api>, session: Session) -> Self {
        SubmissionClient { api, session }
    }

    /// Submit one attendance token.
    ///
    /// Submitting the same token twice is safe: the server answers the second
    /// call with a conflict, reported as [`Outcome::AlreadyRecorded`].
    pub async fn submit(&self, attendance_token: &str) -> Outcome {
        let Some(bearer) = self.session.bearer() else {
            return Outcome::Unauthenticated;
        };

        let outcome = match self.api.mark_attendance(&bearer, attendance_token).await {
            Ok(reply) => classify_mark_response(reply.status, &reply.body),
            Err(e) => Outcome::NetworkError(e.to_string()),
        };
        tracing::debug!(?outcome, "attendance submitted");
        outcome
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl std::fmt::Debug for SubmissionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionClient")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
