// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session commands: `login`, `logout` and `whoami`.

use chrono::Utc;
use presently_core::{Identity, Role};

use super::Context;
use crate::env;
use crate::error::{Error, Result};

/// Sign in with email and password.
///
/// The password comes from the flag or, failing that, `PRESENTLY_PASSWORD`.
pub async fn login(ctx: &Context, email: &str, password: Option<String>) -> Result<()> {
    let password = password
        .or_else(env::password)
        .ok_or(Error::FieldEmpty { field: "password" })?;

    let identity = ctx.session.sign_in(email, &password).await?;
    println!("Signed in as {}", describe(&identity));
    Ok(())
}

/// Forget the stored bearer token.
pub fn logout(ctx: &Context) -> Result<()> {
    let was_signed_in = ctx.session.identity().is_some();
    ctx.session.sign_out()?;
    if was_signed_in {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}

/// Print the signed-in identity.
pub fn whoami(ctx: &Context) -> Result<()> {
    let identity = ctx.require_identity()?;
    println!("{}", describe(&identity));
    println!("ID: {}", identity.subject_id);
    if let Some(exp) = identity.expires_at {
        let suffix = if identity.is_expired(Utc::now()) {
            " (expired)"
        } else {
            ""
        };
        println!("Token expires: {}{}", exp.format("%Y-%m-%d %H:%M:%S UTC"), suffix);
    }
    Ok(())
}

pub(crate) fn describe(identity: &Identity) -> String {
    match &identity.role {
        Some(role) => format!("{} ({})", identity.display_name, role_name(role)),
        None => identity.display_name.clone(),
    }
}

fn role_name(role: &Role) -> &'static str {
    match role {
        Role::Student => "student",
        Role::Instructor => "instructor",
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
