// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `queue`: show scans waiting to sync.

use presently_core::QueueItem;

use super::Context;
use crate::cli::OutputFormat;
use crate::error::Result;

pub async fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let items = ctx.queue().list_all().await?;
    print!("{}", render(&items, output)?);
    Ok(())
}

pub(crate) fn render(items: &[QueueItem], output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(items)?)),
        OutputFormat::Text => {
            if items.is_empty() {
                return Ok("No scans waiting to sync.\n".to_string());
            }
            let mut out = String::new();
            for item in items {
                out.push_str(&format!("{}  {}\n", item.id, item.attendance_token));
            }
            let noun = if items.len() == 1 { "scan" } else { "scans" };
            out.push_str(&format!("\n{} {} waiting to sync\n", items.len(), noun));
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
