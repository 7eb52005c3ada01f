// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync orchestrator: replays the offline queue against the server.
//!
//! ```text
//!          online && signed in && idle
//!   Idle ───────────────────────────────► Draining
//!    ▲                                       │
//!    └──── queue exhausted / network error ◄─┘
//! ```
//!
//! A drain takes one snapshot of the queue and submits the items one at a
//! time, oldest first. Terminal outcomes remove the item; a transient failure
//! stops the drain and leaves that item and everything after it queued, in
//! order, for the next trigger. Only one drain runs at a time; a trigger that
//! arrives while one is running is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use presently_core::{Outcome, QueueItem};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::client::SubmissionClient;
use super::queue::QueueStore;
use crate::connectivity::Connectivity;
use crate::error::Result;
use crate::session::SessionState;

/// Default pause between conditions becoming true and the first drain.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

const EVENT_CAPACITY: usize = 64;

/// Tally of one drain pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Items submitted, including the one that aborted the drain.
    pub attempted: usize,
    pub accepted: usize,
    pub already_recorded: usize,
    pub rejected: usize,
    /// Items from the snapshot still queued when the drain ended.
    pub remaining: usize,
    /// True if a transient failure stopped the drain early.
    pub aborted: bool,
}

impl DrainReport {
    /// Items confirmed on the server.
    pub fn synced(&self) -> usize {
        self.accepted + self.already_recorded
    }
}

/// Result of asking for a drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drain {
    Completed(DrainReport),
    /// Another drain was already running.
    Skipped,
}

/// Progress notifications for UI and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    DrainStarted { pending: usize },
    ItemSynced { item: QueueItem, outcome: Outcome },
    ItemRejected { item: QueueItem, reason: String },
    DrainAborted { item: QueueItem, outcome: Outcome },
    DrainFinished(DrainReport),
}

/// Clears the in-progress flag when a drain ends, however it ends.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Reconciles the offline queue with the server.
pub struct SyncOrchestrator {
    queue: QueueStore,
    client: SubmissionClient,
    in_progress: AtomicBool,
    debounce: Duration,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncOrchestrator {
    pub fn new(queue: QueueStore, client: SubmissionClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        SyncOrchestrator {
            queue,
            client,
            in_progress: AtomicBool::new(false),
            debounce: DEFAULT_DEBOUNCE,
            events,
        }
    }

    /// Set the pause before the first drain once conditions hold.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Subscribe to drain progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Check if a drain is currently running.
    pub fn is_draining(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Drain the queue once.
    ///
    /// Returns [`Drain::Skipped`] without touching the queue if a drain is
    /// already running. Storage failures end the drain and are returned.
    pub async fn drain(&self) -> Result<Drain> {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("drain already in progress, trigger dropped");
            return Ok(Drain::Skipped);
        }
        let _guard = DrainGuard(&self.in_progress);

        let items = self.queue.list_all().await?;
        let mut report = DrainReport::default();
        if items.is_empty() {
            return Ok(Drain::Completed(report));
        }

        tracing::info!(pending = items.len(), "draining offline queue");
        self.emit(SyncEvent::DrainStarted {
            pending: items.len(),
        });

        for (index, item) in items.iter().enumerate() {
            report.attempted += 1;
            let outcome = self.client.submit(&item.attendance_token).await;

            match outcome {
                Outcome::Accepted | Outcome::AlreadyRecorded => {
                    self.queue.remove(&item.id).await?;
                    if outcome == Outcome::Accepted {
                        report.accepted += 1;
                    } else {
                        report.already_recorded += 1;
                    }
                    tracing::debug!(id = %item.id, ?outcome, "queued scan synced");
                    self.emit(SyncEvent::ItemSynced {
                        item: item.clone(),
                        outcome,
                    });
                }
                Outcome::Rejected(reason) => {
                    self.queue.remove(&item.id).await?;
                    report.rejected += 1;
                    tracing::warn!(id = %item.id, %reason, "queued scan rejected by server, dropped");
                    self.emit(SyncEvent::ItemRejected {
                        item: item.clone(),
                        reason,
                    });
                }
                Outcome::NetworkError(_) | Outcome::Unauthenticated => {
                    report.aborted = true;
                    report.remaining = items.len() - index;
                    tracing::warn!(
                        id = %item.id,
                        ?outcome,
                        remaining = report.remaining,
                        "drain aborted, scans stay queued"
                    );
                    self.emit(SyncEvent::DrainAborted {
                        item: item.clone(),
                        outcome,
                    });
                    break;
                }
            }
        }

        tracing::info!(
            synced = report.synced(),
            rejected = report.rejected,
            remaining = report.remaining,
            "drain finished"
        );
        self.emit(SyncEvent::DrainFinished(report.clone()));
        Ok(Drain::Completed(report))
    }

    /// Start a drain in the background.
    ///
    /// Failures are logged; they never reach the caller.
    pub fn trigger(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            match this.drain().await {
                Ok(Drain::Completed(_)) | Ok(Drain::Skipped) => {}
                Err(e) => tracing::error!("background drain failed: {}", e),
            }
        })
    }

    /// Watch connectivity and session state, draining whenever both allow it.
    ///
    /// A drain is triggered each time the conditions go from not holding to
    /// holding (coming online while signed in, or signing in while online),
    /// after the debounce, if they still hold then. A source whose sender is
    /// dropped keeps its last value while the other is still watched. Runs
    /// until `shutdown` is cancelled or both sources are gone.
    pub async fn run(
        self: Arc<Self>,
        mut connectivity: watch::Receiver<Connectivity>,
        mut session: watch::Receiver<SessionState>,
        shutdown: CancellationToken,
    ) {
        let mut was_ready = false;
        let mut connectivity_open = true;
        let mut session_open = true;

        while connectivity_open || session_open {
            let ready = conditions_hold(&mut connectivity, &mut session);

            if ready && !was_ready {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(self.debounce) => {}
                }

                if conditions_hold(&mut connectivity, &mut session) {
                    self.trigger();
                } else {
                    tracing::debug!("conditions changed during debounce, drain skipped");
                    was_ready = false;
                    continue;
                }
            }
            was_ready = ready;

            tokio::select! {
                _ = shutdown.cancelled() => break,
                changed = connectivity.changed(), if connectivity_open => {
                    if changed.is_err() {
                        tracing::debug!("connectivity source closed");
                        connectivity_open = false;
                    }
                }
                changed = session.changed(), if session_open => {
                    if changed.is_err() {
                        tracing::debug!("session source closed");
                        session_open = false;
                    }
                }
            }
        }

        tracing::debug!("sync orchestrator stopped");
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

fn conditions_hold(
    connectivity: &mut watch::Receiver<Connectivity>,
    session: &mut watch::Receiver<SessionState>,
) -> bool {
    let online = connectivity.borrow_and_update().is_connected();
    let signed_in = session.borrow_and_update().is_authenticated();
    online && signed_in
}

impl std::fmt::Debug for SyncOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOrchestrator")
            .field("in_progress", &self.is_draining())
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}
