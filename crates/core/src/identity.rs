// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Display identity decoded from a bearer token.
//!
//! The bearer token is a JWT minted by the auth service. Its payload segment is
//! decoded locally, without verifying the signature, to show who is signed in.
//! The resulting [`Identity`] is advisory: it must never gate an action on the
//! client. Every request is re-authorized by the server from the token itself.

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Role claimed by the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
}

/// Who the bearer token says is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: String,
    pub display_name: String,
    pub role: Option<Role>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Returns true if the token's `exp` claim is in the past.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Claim names differ between auth service releases, so all known spellings
/// are accepted.
#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default, rename = "userId")]
    user_id_camel: Option<String>,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Decodes the identity claims embedded in a bearer token.
///
/// Fails with [`Error::MalformedToken`] if the token is not a three-segment
/// JWT, the payload is not base64url JSON, or no subject claim is present.
pub fn decode_identity(bearer: &str) -> Result<Identity> {
    let parts: Vec<&str> = bearer.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(Error::MalformedToken(format!(
            "expected 3 segments, found {}",
            parts.len()
        )));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| Error::MalformedToken(format!("payload is not base64url: {}", e)))?;
    let claims: Claims = serde_json::from_slice(&payload)
        .map_err(|e| Error::MalformedToken(format!("payload is not JSON claims: {}", e)))?;

    let subject_id = [claims.user_id, claims.user_id_camel, claims.sub]
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .ok_or_else(|| Error::MalformedToken("no subject claim".to_string()))?;

    let display_name = claims
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| subject_id.clone());

    let role = match claims.role.as_deref() {
        Some("student") => Some(Role::Student),
        Some("instructor") => Some(Role::Instructor),
        _ => None,
    };

    Ok(Identity {
        subject_id,
        display_name,
        role,
        expires_at: claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0)),
    })
}
