// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rotating attendance tokens for the instructor's display.
//!
//! Activating the generator for a class spawns one task that owns the
//! rotation timer:
//!
//! ```text
//!            activate / refresh / countdown hits zero
//!                ┌───────────────────────────────┐
//!                ▼                               │
//!   Idle ──► Requesting ──ok──► Active{token} ───┘
//!                │
//!                └──err──► Failed ──refresh──► Requesting
//! ```
//!
//! Each issued token is shown for one window `W`. When the countdown ends a
//! new token is requested unconditionally. A manual refresh re-issues at once
//! and restarts the countdown from `W`. After a failed request nothing is
//! displayed and the timer stays stopped until the next manual refresh.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use presently_core::protocol::{AttendanceSessionResponse, SESSION_FAILED};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api::Api;
use crate::error::{Error, Result};
use crate::session::Session;

/// Default rotation window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(30);

/// A token currently on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub attendance_token: String,
    pub class_id: String,
    pub issued_at: DateTime<Utc>,
    /// When the countdown for this token ends.
    pub expires_at: Instant,
}

/// Published state of an activated generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// Not running.
    Idle,
    /// A token request is in flight; nothing is displayed.
    Requesting,
    Active(IssuedToken),
    /// The last request failed; waiting for a manual refresh.
    Failed { reason: String },
}

impl TokenState {
    pub fn token(&self) -> Option<&IssuedToken> {
        match self {
            TokenState::Active(token) => Some(token),
            _ => None,
        }
    }
}

/// Issues session tokens for one instructor.
#[derive(Clone)]
pub struct TokenGenerator {
    api: Arc<dyn Api>,
    session: Session,
    window: Duration,
}

impl TokenGenerator {
    pub fn new(api: Arc<dyn Api>, session: Session) -> Self {
        TokenGenerator {
            api,
            session,
            window: DEFAULT_WINDOW,
        }
    }

    /// Set the rotation window.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Start issuing tokens for `class_id`.
    ///
    /// The first request is made immediately. Rotation continues until the
    /// returned handle is deactivated or dropped.
    pub fn activate(&self, class_id: &str) -> GeneratorHandle {
        let (state_tx, state_rx) = watch::channel(TokenState::Requesting);
        let refresh = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let rotation = Rotation {
            api: Arc::clone(&self.api),
            session: self.session.clone(),
            class_id: class_id.to_string(),
            window: self.window,
            state: state_tx,
            refresh: Arc::clone(&refresh),
            cancel: cancel.clone(),
        };
        tracing::info!(class_id, window_secs = self.window.as_secs(), "token generator activated");
        let task = tokio::spawn(rotation.run());

        GeneratorHandle {
            class_id: class_id.to_string(),
            state: state_rx,
            refresh,
            cancel,
            task: Some(task),
        }
    }
}

impl std::fmt::Debug for TokenGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGenerator")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

/// Owner of one activation. Dropping it stops the rotation.
#[derive(Debug)]
pub struct GeneratorHandle {
    class_id: String,
    state: watch::Receiver<TokenState>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl GeneratorHandle {
    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    /// Current state snapshot.
    pub fn current(&self) -> TokenState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<TokenState> {
        self.state.clone()
    }

    /// Re-issue now and restart the countdown.
    ///
    /// Also the retry after a failed request.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Time left on the displayed token, if one is displayed.
    pub fn remaining(&self) -> Option<Duration> {
        self.state
            .borrow()
            .token()
            .map(|token| token.expires_at.saturating_duration_since(Instant::now()))
    }

    /// Stop rotating and wait for the task to finish.
    pub async fn deactivate(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("token rotation task failed: {}", e);
            }
        }
    }
}

impl Drop for GeneratorHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// State owned by the rotation task.
struct Rotation {
    api: Arc<dyn Api>,
    session: Session,
    class_id: String,
    window: Duration,
    state: watch::Sender<TokenState>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
}

impl Rotation {
    async fn run(self) {
        loop {
            self.state.send_replace(TokenState::Requesting);

            let issued = tokio::select! {
                _ = self.cancel.cancelled() => break,
                result = self.issue() => result,
            };
            // Refreshes requested while the request was in flight are answered by it
            let _ = tokio::time::timeout(Duration::ZERO, self.refresh.notified()).await;

            let deadline = match issued {
                Ok(token) => {
                    tracing::debug!(class_id = %self.class_id, "attendance token issued");
                    let deadline = token.expires_at;
                    self.state.send_replace(TokenState::Active(token));
                    Some(deadline)
                }
                Err(e) => {
                    tracing::warn!(class_id = %self.class_id, "token request failed: {}", e);
                    self.state.send_replace(TokenState::Failed {
                        reason: e.to_string(),
                    });
                    None
                }
            };

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = self.refresh.notified() => {
                    tracing::debug!(class_id = %self.class_id, "manual refresh");
                }
                _ = countdown(deadline) => {}
            }
        }

        self.state.send_replace(TokenState::Idle);
        tracing::info!(class_id = %self.class_id, "token generator stopped");
    }

    async fn issue(&self) -> Result<IssuedToken> {
        let bearer = self.session.bearer().ok_or(Error::NotSignedIn)?;
        let issued_at = Utc::now();

        let reply = self
            .api
            .create_attendance_session(&bearer, &self.class_id)
            .await?;
        if !reply.is_success() {
            return Err(Error::Server {
                status: reply.status,
                message: reply
                    .error_message()
                    .unwrap_or_else(|| SESSION_FAILED.to_string()),
            });
        }

        let AttendanceSessionResponse { attendance_token } = reply
            .json()
            .map_err(|e| Error::UnexpectedResponse(format!("attendance session reply: {}", e)))?;

        Ok(IssuedToken {
            attendance_token,
            class_id: self.class_id.clone(),
            issued_at,
            expires_at: Instant::now() + self.window,
        })
    }
}

/// Wait for the countdown to end. Without a deadline, wait forever.
async fn countdown(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
