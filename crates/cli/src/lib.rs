// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! presently - offline-first attendance client library.
//!
//! This crate provides the sync engine behind the `presently` CLI: scans
//! are submitted directly while the server is reachable and queued on disk
//! while it is not, then replayed in order once connectivity returns.
//!
//! # Main Components
//!
//! - [`Session`] - bearer token and the identity decoded from it
//! - [`sync::QueueStore`] - durable FIFO of pending scans
//! - [`sync::SubmissionClient`] - submits one token and classifies the reply
//! - [`sync::SyncOrchestrator`] - drains the queue when online and signed in
//! - [`sync::ScanPipeline`] - routes a scanned token to the server or the queue
//! - [`TokenGenerator`] - rotating session tokens for the instructor display
//! - [`Api`] - transport trait, implemented over HTTP by [`HttpApi`]
//!
//! # Wiring
//!
//! ```rust,ignore
//! use presently::{ConnectivityMonitor, HttpApi, Session};
//! use presently::sync::{QueueStore, ScanPipeline, SubmissionClient, SyncOrchestrator};
//!
//! let store = Arc::new(FileStore::open(&data_dir)?);
//! let api = Arc::new(HttpApi::new(&config.api_base_url, config.request_timeout())?);
//! let session = Session::new(store.clone(), api.clone());
//! session.load()?;
//!
//! let monitor = ConnectivityMonitor::new();
//! let queue = QueueStore::new(store);
//! let client = SubmissionClient::new(api, session.clone());
//! let orchestrator = Arc::new(SyncOrchestrator::new(queue.clone(), client.clone()));
//! tokio::spawn(orchestrator.run(monitor.subscribe(), session.subscribe(), shutdown));
//!
//! let pipeline = ScanPipeline::new(monitor, client, queue);
//! let result = pipeline.handle_scan(&token).await?;
//! ```

mod cli;
mod commands;

pub mod api;
pub mod config;
pub mod connectivity;
pub mod env;
pub mod error;
pub mod generator;
pub mod session;
pub mod sync;

#[cfg(test)]
mod test_helpers;

pub use api::{Api, HttpApi, Reply, TransportError};
pub use cli::{Cli, Command, OutputFormat};
pub use config::Config;
pub use connectivity::{Connectivity, ConnectivityMonitor};
pub use error::{Error, Result};
pub use generator::{GeneratorHandle, TokenGenerator, TokenState};
pub use session::{Session, SessionState};

use commands::Context;

/// Run one CLI invocation.
pub async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::open(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Login { email, password } => commands::auth::login(&ctx, &email, password).await,
        Command::Logout => commands::auth::logout(&ctx),
        Command::Whoami => commands::auth::whoami(&ctx),
        Command::Scan { token, offline } => commands::scan::run(&ctx, &token, offline)
            .await
            .map(|_| ()),
        Command::Queue { output } => commands::queue::run(&ctx, output).await,
        Command::Sync { watch } => commands::sync::run(&ctx, watch).await,
        Command::History { output } => commands::history::run(&ctx, output).await,
        Command::Classes { output } => commands::classes::list(&ctx, output).await,
        Command::Join { code } => commands::classes::join(&ctx, &code).await.map(|_| ()),
        Command::Leave { class_id } => commands::classes::leave(&ctx, &class_id)
            .await
            .map(|_| ()),
        Command::Roster { class_id, output } => {
            commands::classes::roster(&ctx, &class_id, output).await
        }
        Command::Issue {
            class_id,
            window,
            count,
        } => commands::issue::run(&ctx, &class_id, window, count).await,
    }
}
