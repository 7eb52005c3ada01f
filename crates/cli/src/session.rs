// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session lifecycle: the bearer token and the identity decoded from it.
//!
//! ```text
//! Loading ──load()──► Authenticated ──sign_out()──► Anonymous
//!    │                     ▲                            │
//!    └──(none/malformed)──►│◄──────── sign_in() ────────┘
//! ```
//!
//! The session is an explicitly owned object. Components that need the bearer
//! token or react to identity changes receive a clone (it is a cheap handle)
//! and call [`Session::subscribe`] for change notification.

use std::sync::Arc;

use presently_core::protocol::{LoginResponse, LOGIN_FAILED};
use presently_core::{decode_identity, Identity, Store};
use tokio::sync::watch;

use crate::api::Api;
use crate::error::{Error, Result};

/// Store key holding the raw bearer token.
pub const BEARER_KEY: &str = "bearer_token";

/// Current state of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Persisted credentials have not been read yet.
    Loading,
    /// A bearer token is held and its claims decoded.
    Authenticated { bearer: String, identity: Identity },
    /// No usable bearer token.
    Anonymous,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated { identity, .. } => Some(identity),
            _ => None,
        }
    }

    pub fn bearer(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { bearer, .. } => Some(bearer),
            _ => None,
        }
    }
}

/// Shared handle to the signed-in session.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Arc<dyn Store>,
    api: Arc<dyn Api>,
    state: watch::Sender<SessionState>,
}

impl Session {
    /// Create a session in the `Loading` state.
    pub fn new(store: Arc<dyn Store>, api: Arc<dyn Api>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Session {
            inner: Arc::new(SessionInner { store, api, state }),
        }
    }

    /// Resolve the persisted bearer token.
    ///
    /// A token whose claims cannot be decoded is purged from storage and the
    /// session settles as anonymous. A storage read failure also settles as
    /// anonymous but is returned to the caller.
    pub fn load(&self) -> Result<SessionState> {
        let stored = match self.inner.store.read(BEARER_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                self.set_state(SessionState::Anonymous);
                return Err(e.into());
            }
        };

        let bearer = stored
            .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
            .filter(|token| !token.is_empty());

        let state = match bearer {
            None => SessionState::Anonymous,
            Some(bearer) => match decode_identity(&bearer) {
                Ok(identity) => {
                    if identity.is_expired(chrono::Utc::now()) {
                        tracing::warn!(
                            subject = %identity.subject_id,
                            "stored bearer token has expired; the server will refuse it"
                        );
                    }
                    SessionState::Authenticated { bearer, identity }
                }
                Err(e) => {
                    tracing::warn!("purging unreadable bearer token: {}", e);
                    self.set_state(SessionState::Anonymous);
                    self.inner.store.remove(BEARER_KEY)?;
                    return Ok(SessionState::Anonymous);
                }
            },
        };

        if let Some(identity) = state.identity() {
            tracing::info!(subject = %identity.subject_id, "session restored");
        }
        self.set_state(state.clone());
        Ok(state)
    }

    /// Authenticate against the server and persist the bearer token.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        if email.trim().is_empty() {
            return Err(Error::FieldEmpty { field: "email" });
        }
        if password.is_empty() {
            return Err(Error::FieldEmpty { field: "password" });
        }

        let reply = self.inner.api.login(email.trim(), password).await?;
        if !reply.is_success() {
            let message = reply
                .error_message()
                .unwrap_or_else(|| LOGIN_FAILED.to_string());
            return Err(Error::SignInFailed(message));
        }

        let LoginResponse { token } = reply
            .json()
            .map_err(|e| Error::UnexpectedResponse(format!("login reply: {}", e)))?;
        let identity = decode_identity(&token)?;

        self.inner.store.write(BEARER_KEY, token.as_bytes())?;
        tracing::info!(subject = %identity.subject_id, "signed in");

        self.set_state(SessionState::Authenticated {
            bearer: token,
            identity: identity.clone(),
        });
        Ok(identity)
    }

    /// Forget the bearer token in memory and in storage.
    ///
    /// The in-memory state is cleared even if the durable delete fails.
    pub fn sign_out(&self) -> Result<()> {
        self.set_state(SessionState::Anonymous);
        self.inner.store.remove(BEARER_KEY)?;
        tracing::info!("signed out");
        Ok(())
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn bearer(&self) -> Option<String> {
        self.inner.state.borrow().bearer().map(str::to_string)
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    fn set_state(&self, state: SessionState) {
        self.inner.state.send_replace(state);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the bearer token
        let state = match &*self.inner.state.borrow() {
            SessionState::Loading => "loading",
            SessionState::Authenticated { .. } => "authenticated",
            SessionState::Anonymous => "anonymous",
        };
        f.debug_struct("Session").field("state", &state).finish()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
