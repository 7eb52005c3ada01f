// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue for scans captured while disconnected.
//!
//! The whole queue lives in one store record and every mutation is a full
//! read-modify-write of it. Scans can arrive while a drain is removing items,
//! so all access goes through one async mutex per queue: an enqueue and a
//! remove never interleave their read and write halves.

use std::sync::Arc;

use chrono::Utc;
use presently_core::id::generate_unique_queue_id;
use presently_core::{Error as CoreError, QueueItem, QueueRecord, Store};
use tokio::sync::Mutex;

/// Store key holding the serialized queue.
pub const QUEUE_KEY: &str = "offline_attendance_queue";

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, CoreError>;

/// Durable FIFO of pending attendance submissions.
///
/// Clones share the same store and the same exclusion point.
#[derive(Clone)]
pub struct QueueStore {
    store: Arc<dyn Store>,
    lock: Arc<Mutex<()>>,
}

impl QueueStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        QueueStore {
            store,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Append a scan to the queue.
    ///
    /// The item is persisted before this returns; a storage failure is
    /// returned to the caller rather than losing the scan.
    pub async fn enqueue(&self, attendance_token: &str) -> QueueResult<QueueItem> {
        let attendance_token = attendance_token.trim();
        if attendance_token.is_empty() {
            return Err(CoreError::InvalidInput(
                "attendance token cannot be empty".to_string(),
            ));
        }

        let _guard = self.lock.lock().await;
        let mut items = self.read_items()?;

        let id = generate_unique_queue_id(attendance_token, &Utc::now(), |candidate| {
            items.iter().any(|item| item.id == candidate)
        });
        let item = QueueItem::new(id, attendance_token);
        items.push(item.clone());

        self.write_items(&items)?;
        tracing::info!(id = %item.id, pending = items.len(), "scan queued offline");
        Ok(item)
    }

    /// Read all queued items without removing them, oldest first.
    pub async fn list_all(&self) -> QueueResult<Vec<QueueItem>> {
        let _guard = self.lock.lock().await;
        self.read_items()
    }

    /// Remove the item with `id`.
    ///
    /// Returns false, without writing, if no such item is queued.
    pub async fn remove(&self, id: &str) -> QueueResult<bool> {
        let _guard = self.lock.lock().await;
        let mut items = self.read_items()?;

        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }

        self.write_items(&items)?;
        tracing::debug!(id, pending = items.len(), "removed queued scan");
        Ok(true)
    }

    /// Get the number of queued items.
    pub async fn len(&self) -> QueueResult<usize> {
        Ok(self.list_all().await?.len())
    }

    /// Check if the queue is empty.
    pub async fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len().await? == 0)
    }

    fn read_items(&self) -> QueueResult<Vec<QueueItem>> {
        match self.store.read(QUEUE_KEY)? {
            Some(bytes) => QueueRecord::decode(&bytes),
            None => Ok(Vec::new()),
        }
    }

    fn write_items(&self, items: &[QueueItem]) -> QueueResult<()> {
        let bytes = QueueRecord::encode(items)?;
        self.store.write(QUEUE_KEY, &bytes)
    }
}

impl std::fmt::Debug for QueueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueStore").finish_non_exhaustive()
    }
}
