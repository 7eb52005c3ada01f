// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `history`: the signed-in student's attendance records.

use presently_core::protocol::{parse_list, AttendanceRecord};

use super::{expect_success, Context};
use crate::cli::OutputFormat;
use crate::error::{Error, Result};

const HISTORY_FAILED: &str = "Failed to fetch attendance history";

pub async fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let records = fetch(ctx).await?;
    print!("{}", render(&records, output)?);
    Ok(())
}

/// Records as the server sent them, newest first.
pub(crate) async fn fetch(ctx: &Context) -> Result<Vec<AttendanceRecord>> {
    let bearer = ctx.require_bearer()?;
    let reply = expect_success(ctx.api.attendance_history(&bearer).await?, HISTORY_FAILED)?;
    parse_list(&reply.body)
        .map_err(|e| Error::UnexpectedResponse(format!("attendance history: {}", e)))
}

pub(crate) fn render(records: &[AttendanceRecord], output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(records)?)),
        OutputFormat::Text => {
            if records.is_empty() {
                return Ok("No attendance recorded yet.\n".to_string());
            }
            let mut out = String::new();
            for record in records {
                out.push_str(&format!(
                    "{}  {}  {}\n",
                    record.timestamp.format("%Y-%m-%d %H:%M UTC"),
                    record.classroom_info.subject_code,
                    record.classroom_info.subject_name
                ));
            }
            let noun = if records.len() == 1 { "session" } else { "sessions" };
            out.push_str(&format!("\n{} {} attended\n", records.len(), noun));
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
