// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scan pipeline: routes a decoded attendance token to the server or the
//! offline queue.

use presently_core::{Outcome, QueueItem};

use super::client::SubmissionClient;
use super::queue::QueueStore;
use crate::connectivity::ConnectivityMonitor;
use crate::error::{Error, Result};

/// Message shown when a scan was saved for later.
pub const SAVED_OFFLINE: &str =
    "Attendance saved offline. It will sync when you are back online.";

/// What happened to one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    /// The server judged the token.
    Submitted(Outcome),
    /// The scan was stored for the next sync.
    Queued(QueueItem),
}

impl ScanResult {
    /// User-facing summary.
    pub fn message(&self) -> String {
        match self {
            ScanResult::Submitted(outcome) => outcome.message(),
            ScanResult::Queued(_) => SAVED_OFFLINE.to_string(),
        }
    }

    /// True if the attendance is recorded or will be replayed.
    pub fn is_success(&self) -> bool {
        match self {
            ScanResult::Submitted(outcome) => outcome.is_success(),
            ScanResult::Queued(_) => true,
        }
    }
}

/// Entry point for tokens coming from scan capture.
#[derive(Debug, Clone)]
pub struct ScanPipeline {
    connectivity: ConnectivityMonitor,
    client: SubmissionClient,
    queue: QueueStore,
}

impl ScanPipeline {
    pub fn new(connectivity: ConnectivityMonitor, client: SubmissionClient, queue: QueueStore) -> Self {
        ScanPipeline {
            connectivity,
            client,
            queue,
        }
    }

    /// Submit a scanned token, or queue it if the server is out of reach.
    ///
    /// While offline the token is queued without a request. While online it
    /// is submitted directly; if that attempt fails without the server
    /// judging the token, the scan is queued instead of lost. A queue write
    /// failure is returned.
    pub async fn handle_scan(&self, attendance_token: &str) -> Result<ScanResult> {
        let attendance_token = attendance_token.trim();
        if attendance_token.is_empty() {
            return Err(Error::FieldEmpty {
                field: "attendance token",
            });
        }

        if !self.connectivity.is_connected() {
            return self.queue_scan(attendance_token).await;
        }

        let outcome = self.client.submit(attendance_token).await;
        match outcome {
            Outcome::NetworkError(_) | Outcome::Unauthenticated => {
                tracing::warn!(?outcome, "direct submission failed, queueing scan");
                self.queue_scan(attendance_token).await
            }
            Outcome::Rejected(ref reason) => {
                tracing::warn!(%reason, "scan rejected");
                Ok(ScanResult::Submitted(outcome))
            }
            Outcome::Accepted | Outcome::AlreadyRecorded => {
                tracing::info!(?outcome, "scan submitted");
                Ok(ScanResult::Submitted(outcome))
            }
        }
    }

    /// Queue a scanned token without trying the server.
    pub async fn queue_scan(&self, attendance_token: &str) -> Result<ScanResult> {
        let item = self.queue.enqueue(attendance_token).await?;
        Ok(ScanResult::Queued(item))
    }
}
