// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Class commands: `classes`, `join`, `leave` and `roster`.
//!
//! `classes` is how an instructor finds the id that `issue` expects.

use presently_core::protocol::{error_message, parse_list, AttendanceSummary, Classroom};

use super::{expect_success, Context};
use crate::cli::OutputFormat;
use crate::error::{Error, Result};

const CLASSES_FAILED: &str = "Failed to fetch classrooms";
const JOIN_FAILED: &str = "Failed to join class";
const LEAVE_FAILED: &str = "Failed to leave class";
const ROSTER_FAILED: &str = "Failed to fetch class attendance";

/// List the classes the signed-in user teaches or attends.
pub async fn list(ctx: &Context, output: OutputFormat) -> Result<()> {
    let classes = fetch_classes(ctx).await?;
    print!("{}", render_classes(&classes, output)?);
    Ok(())
}

pub(crate) async fn fetch_classes(ctx: &Context) -> Result<Vec<Classroom>> {
    let bearer = ctx.require_bearer()?;
    let reply = expect_success(ctx.api.list_classes(&bearer).await?, CLASSES_FAILED)?;
    parse_list(&reply.body).map_err(|e| Error::UnexpectedResponse(format!("class list: {}", e)))
}

/// Join a class by its code. Returns the server's confirmation.
pub async fn join(ctx: &Context, code: &str) -> Result<String> {
    let bearer = ctx.require_bearer()?;
    let reply = expect_success(ctx.api.join_class(&bearer, code).await?, JOIN_FAILED)?;
    // Success bodies carry `{"message": ...}`
    let message = error_message(&reply.body).unwrap_or_else(|| format!("Joined class {}", code));
    tracing::info!(%code, "joined class");
    println!("{}", message);
    Ok(message)
}

/// Leave a class by id. Returns the server's confirmation.
pub async fn leave(ctx: &Context, class_id: &str) -> Result<String> {
    let bearer = ctx.require_bearer()?;
    let reply = expect_success(ctx.api.leave_class(&bearer, class_id).await?, LEAVE_FAILED)?;
    let message =
        error_message(&reply.body).unwrap_or_else(|| format!("Left class {}", class_id));
    tracing::info!(%class_id, "left class");
    println!("{}", message);
    Ok(message)
}

/// Show how many sessions each student of a class attended.
pub async fn roster(ctx: &Context, class_id: &str, output: OutputFormat) -> Result<()> {
    let rows = fetch_roster(ctx, class_id).await?;
    print!("{}", render_roster(&rows, output)?);
    Ok(())
}

pub(crate) async fn fetch_roster(ctx: &Context, class_id: &str) -> Result<Vec<AttendanceSummary>> {
    let bearer = ctx.require_bearer()?;
    let reply = expect_success(
        ctx.api.class_attendance(&bearer, class_id).await?,
        ROSTER_FAILED,
    )?;
    parse_list(&reply.body)
        .map_err(|e| Error::UnexpectedResponse(format!("class attendance: {}", e)))
}

pub(crate) fn render_classes(classes: &[Classroom], output: OutputFormat) -> Result<String> {
    if output == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(classes)?));
    }
    if classes.is_empty() {
        return Ok("No classes yet.\n".to_string());
    }

    let code_width = classes.iter().map(|c| c.code.len()).max().unwrap_or(0);
    let mut out = String::new();
    for class in classes {
        let students = class.student_ids.len();
        let noun = if students == 1 { "student" } else { "students" };
        out.push_str(&format!(
            "{}  {:<width$}  {} ({} {})\n",
            class.id,
            class.code,
            class.name,
            students,
            noun,
            width = code_width
        ));
    }
    Ok(out)
}

pub(crate) fn render_roster(rows: &[AttendanceSummary], output: OutputFormat) -> Result<String> {
    if output == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(rows)?));
    }
    if rows.is_empty() {
        return Ok("No students enrolled.\n".to_string());
    }

    let name_width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "{:<width$}  {:>3}  {}\n",
            row.name,
            row.attended_count,
            row.email,
            width = name_width
        ));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "classes_tests.rs"]
mod tests;
