// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reachability reported by the platform.
//!
//! The monitor is a seam: the host (a platform network callback, or the
//! CLI's HTTP probe) calls [`ConnectivityMonitor::set`], and the scan
//! pipeline and sync orchestrator read or subscribe to it.

use std::sync::Arc;

use tokio::sync::watch;

/// Last reported reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Nothing reported yet. Treated as offline.
    Unknown,
    Connected,
    Disconnected,
}

impl Connectivity {
    pub fn is_connected(self) -> bool {
        self == Connectivity::Connected
    }
}

impl From<bool> for Connectivity {
    fn from(connected: bool) -> Self {
        if connected {
            Connectivity::Connected
        } else {
            Connectivity::Disconnected
        }
    }
}

/// Shared connectivity state with change notification.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<Connectivity>>,
}

impl ConnectivityMonitor {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Connectivity::Unknown);
        ConnectivityMonitor { tx: Arc::new(tx) }
    }

    /// Record a new reachability report.
    ///
    /// Returns true if the value changed. Repeated identical reports do not
    /// wake subscribers.
    pub fn set(&self, connectivity: Connectivity) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == connectivity {
                false
            } else {
                *current = connectivity;
                true
            }
        });
        if changed {
            tracing::debug!(?connectivity, "connectivity changed");
        }
        changed
    }

    pub fn current(&self) -> Connectivity {
        *self.tx.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.current().is_connected()
    }

    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
