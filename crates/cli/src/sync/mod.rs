// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first attendance sync.
//!
//! Scans are submitted directly while the device is online and queued while
//! it is not. The orchestrator replays the queue once connectivity and a
//! signed-in session are both present.
//!
//! # Architecture
//!
//! ```text
//!  scan ──► ┌──────────────┐ online  ┌──────────────┐     ┌─────────────┐
//!           │ ScanPipeline │────────►│  Submission  │────►│    Api      │
//!           └──────────────┘         │    Client    │◄────│  (trait)    │
//!                  │ offline         └──────────────┘     └─────────────┘
//!                  ▼                        ▲
//!           ┌──────────────┐  drain  ┌──────────────┐
//!           │  QueueStore  │◄───────►│ Orchestrator │◄── connectivity,
//!           │ (Store key)  │         │              │    session changes
//!           └──────────────┘         └──────────────┘
//! ```
//!
//! # Features
//!
//! - Durable FIFO queue in a versioned store record
//! - Outcome classification: accepted, already recorded, rejected, transient
//! - Strictly sequential replay that stops at the first transient failure
//! - At most one drain at a time, debounced trigger on reconnect or sign-in
//! - Injectable API trait for testing

mod client;
mod orchestrator;
mod queue;
mod scan;

pub use client::SubmissionClient;
pub use orchestrator::{Drain, DrainReport, SyncEvent, SyncOrchestrator, DEFAULT_DEBOUNCE};
pub use queue::{QueueResult, QueueStore, QUEUE_KEY};
pub use scan::{ScanPipeline, ScanResult, SAVED_OFFLINE};

#[cfg(test)]
mod client_tests;
