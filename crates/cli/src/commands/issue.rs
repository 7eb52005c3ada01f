// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `issue`: print rotating attendance tokens for a class.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{shutdown_on_ctrl_c, Context};
use crate::error::{Error, Result};
use crate::generator::{TokenGenerator, TokenState};

pub async fn run(
    ctx: &Context,
    class_id: &str,
    window: Option<u64>,
    count: Option<u32>,
) -> Result<()> {
    issue_until(ctx, class_id, window, count, shutdown_on_ctrl_c())
        .await
        .map(|_| ())
}

/// Print each issued token until `count` are shown, a request fails, or
/// `shutdown` fires. Returns the tokens printed.
pub(crate) async fn issue_until(
    ctx: &Context,
    class_id: &str,
    window: Option<u64>,
    count: Option<u32>,
    shutdown: CancellationToken,
) -> Result<Vec<String>> {
    ctx.require_identity()?;

    let window = window
        .map(Duration::from_secs)
        .unwrap_or_else(|| ctx.config.rotation_window());
    let generator =
        TokenGenerator::new(ctx.api.clone(), ctx.session.clone()).with_window(window);
    let handle = generator.activate(class_id);
    let mut state = handle.subscribe();
    let mut issued = Vec::new();

    let result = loop {
        let current = state.borrow_and_update().clone();
        match current {
            TokenState::Active(token) => {
                println!(
                    "{}  (class {}, valid {}s)",
                    token.attendance_token,
                    token.class_id,
                    window.as_secs()
                );
                issued.push(token.attendance_token);
                if count.is_some_and(|n| issued.len() >= n as usize) {
                    break Ok(());
                }
            }
            TokenState::Failed { reason } => break Err(Error::IssueFailed(reason)),
            TokenState::Idle | TokenState::Requesting => {}
        }

        tokio::select! {
            _ = shutdown.cancelled() => break Ok(()),
            changed = state.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
            }
        }
    };

    handle.deactivate().await;
    result.map(|()| issued)
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
