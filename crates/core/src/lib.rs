// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! presently-core: Shared library for the presently attendance client
//!
//! This crate provides the data model, wire protocol, bearer-token claim
//! decoding and the durable byte store consumed by the sync engine.

pub mod attendance;
pub mod error;
pub mod id;
pub mod identity;
pub mod protocol;
pub mod store;

pub use attendance::{Outcome, QueueItem, QueueRecord, QUEUE_VERSION};
pub use error::{Error, Result};
pub use identity::{decode_identity, Identity, Role};
pub use store::{FileStore, MemoryStore, Store};
