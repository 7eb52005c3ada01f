// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod auth;
pub mod classes;
pub mod history;
pub mod issue;
pub mod queue;
pub mod scan;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use presently_core::{FileStore, Identity, Store};
use tokio_util::sync::CancellationToken;

use crate::api::{Api, HttpApi, Reply};
use crate::config::{resolve_data_dir, Config};
use crate::connectivity::{Connectivity, ConnectivityMonitor};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::sync::{QueueStore, SubmissionClient};

/// Everything a command needs: configuration, storage, transport and the
/// restored session.
pub struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub api: Arc<dyn Api>,
    pub session: Session,
}

impl Context {
    /// Open the data directory, load configuration and restore the session.
    pub fn open(data_dir: Option<&Path>) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir);
        let config = Config::load(&data_dir)?;
        let store = Arc::new(FileStore::open(&data_dir)?);
        let api = Arc::new(HttpApi::new(
            &config.api_base_url,
            config.request_timeout(),
        )?);
        tracing::debug!(data_dir = %data_dir.display(), api = %config.api_base_url, "context opened");
        Self::with_parts(data_dir, config, store, api)
    }

    /// Assemble a context from explicit parts.
    pub fn with_parts(
        data_dir: PathBuf,
        config: Config,
        store: Arc<dyn Store>,
        api: Arc<dyn Api>,
    ) -> Result<Self> {
        let session = Session::new(Arc::clone(&store), Arc::clone(&api));
        session.load()?;
        Ok(Context {
            data_dir,
            config,
            store,
            api,
            session,
        })
    }

    pub fn queue(&self) -> QueueStore {
        QueueStore::new(Arc::clone(&self.store))
    }

    pub fn client(&self) -> SubmissionClient {
        SubmissionClient::new(Arc::clone(&self.api), self.session.clone())
    }

    /// The signed-in identity, or [`Error::NotSignedIn`].
    pub fn require_identity(&self) -> Result<Identity> {
        self.session.identity().ok_or(Error::NotSignedIn)
    }

    /// The stored bearer token, or [`Error::NotSignedIn`].
    pub fn require_bearer(&self) -> Result<String> {
        self.session.bearer().ok_or(Error::NotSignedIn)
    }

    /// Probe the server once and report the result on a fresh monitor.
    pub async fn probe_connectivity(&self) -> ConnectivityMonitor {
        let monitor = ConnectivityMonitor::new();
        monitor.set(Connectivity::from(self.api.probe().await));
        monitor
    }
}

/// Pass a 2xx reply through; turn anything else into [`Error::Server`]
/// carrying the server's message, or `fallback` when it sent none.
pub(crate) fn expect_success(reply: Reply, fallback: &str) -> Result<Reply> {
    if reply.is_success() {
        return Ok(reply);
    }
    Err(Error::Server {
        status: reply.status,
        message: reply
            .error_message()
            .unwrap_or_else(|| fallback.to_string()),
    })
}

/// A token cancelled when the user presses Ctrl-C.
pub fn shutdown_on_ctrl_c() -> CancellationToken {
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received, shutting down");
            token.cancel();
        }
    });
    shutdown
}
