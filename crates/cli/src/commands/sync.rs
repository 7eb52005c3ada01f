// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `sync`: replay queued scans.
//!
//! Without `--watch` this probes the server once and drains if it answers.
//! With `--watch` it keeps probing on the configured interval and lets the
//! orchestrator drain each time the server comes back.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use super::{shutdown_on_ctrl_c, Context};
use crate::connectivity::{Connectivity, ConnectivityMonitor};
use crate::error::Result;
use crate::sync::{Drain, DrainReport, SyncEvent, SyncOrchestrator};

pub async fn run(ctx: &Context, watch: bool) -> Result<()> {
    ctx.require_identity()?;
    let orchestrator = Arc::new(
        SyncOrchestrator::new(ctx.queue(), ctx.client()).with_debounce(ctx.config.sync_debounce()),
    );

    if watch {
        watch_until(ctx, orchestrator, shutdown_on_ctrl_c()).await
    } else {
        once(ctx, &orchestrator).await.map(|_| ())
    }
}

/// Drain once if the server is reachable.
pub(crate) async fn once(
    ctx: &Context,
    orchestrator: &SyncOrchestrator,
) -> Result<Option<DrainReport>> {
    if !ctx.api.probe().await {
        let pending = ctx.queue().len().await?;
        println!("Server unreachable; {} still queued", plural(pending));
        return Ok(None);
    }

    match orchestrator.drain().await? {
        Drain::Completed(report) => {
            println!("{}", summarize(&report));
            Ok(Some(report))
        }
        Drain::Skipped => {
            println!("A sync is already running");
            Ok(None)
        }
    }
}

/// Probe connectivity on an interval and drain on reconnect until `shutdown`.
pub(crate) async fn watch_until(
    ctx: &Context,
    orchestrator: Arc<SyncOrchestrator>,
    shutdown: CancellationToken,
) -> Result<()> {
    let monitor = ConnectivityMonitor::new();
    let mut events = orchestrator.subscribe();
    let trigger_loop = tokio::spawn(orchestrator.run(
        monitor.subscribe(),
        ctx.session.subscribe(),
        shutdown.clone(),
    ));

    println!(
        "Watching {} (Ctrl-C to stop)",
        ctx.config.api_base_url
    );
    let mut probe = tokio::time::interval(ctx.config.probe_interval());

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = probe.tick() => {
                let connectivity = Connectivity::from(ctx.api.probe().await);
                if monitor.set(connectivity) {
                    println!("{}", describe_connectivity(connectivity));
                }
            }
            event = events.recv() => match event {
                Ok(event) => {
                    if let Some(line) = describe_event(&event) {
                        println!("{}", line);
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "sync events dropped");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    if let Err(e) = trigger_loop.await {
        tracing::error!("sync trigger loop failed: {}", e);
    }
    Ok(())
}

fn describe_connectivity(connectivity: Connectivity) -> &'static str {
    match connectivity {
        Connectivity::Connected => "Server reachable",
        Connectivity::Disconnected | Connectivity::Unknown => "Server unreachable",
    }
}

pub(crate) fn describe_event(event: &SyncEvent) -> Option<String> {
    match event {
        SyncEvent::DrainStarted { pending } => Some(format!("Syncing {}", plural(*pending))),
        SyncEvent::ItemSynced { .. } => None,
        SyncEvent::ItemRejected { item, reason } => {
            Some(format!("Dropped {}: {}", item.id, reason))
        }
        SyncEvent::DrainAborted { outcome, .. } => {
            Some(format!("Sync stopped: {}", outcome.message()))
        }
        SyncEvent::DrainFinished(report) => Some(summarize(report)),
    }
}

pub(crate) fn summarize(report: &DrainReport) -> String {
    if report.attempted == 0 {
        return "Nothing to sync".to_string();
    }
    let mut summary = format!("Synced {}", plural(report.synced()));
    if report.rejected > 0 {
        summary.push_str(&format!(", {} rejected", report.rejected));
    }
    if report.remaining > 0 {
        summary.push_str(&format!(", {} still queued", report.remaining));
    }
    summary
}

fn plural(n: usize) -> String {
    if n == 1 {
        "1 scan".to_string()
    } else {
        format!("{} scans", n)
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
