// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `scan`: mark attendance with a decoded token.

use super::Context;
use crate::connectivity::ConnectivityMonitor;
use crate::error::{Error, Result};
use crate::sync::{ScanPipeline, ScanResult};

/// Submit a scanned token, queueing it when the server is out of reach.
///
/// A rejected token is reported as an error so the exit status is non-zero.
pub async fn run(ctx: &Context, token: &str, offline: bool) -> Result<ScanResult> {
    ctx.require_identity()?;

    let monitor = if offline {
        ConnectivityMonitor::new()
    } else {
        ctx.probe_connectivity().await
    };
    let pipeline = ScanPipeline::new(monitor, ctx.client(), ctx.queue());

    let result = pipeline.handle_scan(token).await?;
    if !result.is_success() {
        return Err(Error::Rejected(result.message()));
    }

    println!("{}", result.message());
    if let ScanResult::Queued(item) = &result {
        println!("Queued as {}", item.id);
    }
    Ok(result)
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
