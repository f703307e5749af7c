//! Session token issuance and validation.
//!
//! Sessions are self-contained HS256 JWTs bound to a wallet address; the
//! server keeps no session table. Logout is cookie deletion only, so a token
//! remains usable until its expiry.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::AppError;

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Wallet address, normalized to lower case.
    pub sub: String,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: u64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Issue a signed session token for a wallet address.
///
/// The address is normalized to lower case before being embedded.
pub fn issue_token(wallet_address: &str, secret: &[u8], ttl_secs: u64) -> Result<String, AppError> {
    let now = now_secs();
    let claims = Claims {
        sub: wallet_address.to_ascii_lowercase(),
        iat: now,
        exp: now + ttl_secs,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Validate a session token, returning the embedded wallet address.
///
/// Signature mismatch, expiry, and malformed tokens all collapse to `None`
/// so callers cannot tell which check rejected them.
pub fn validate_token(token: &str, secret: &[u8]) -> Option<String> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation).ok()?;

    // The library only rejects exp < now even with zero leeway; a token is
    // already invalid at its expiry second
    if data.claims.exp <= now_secs() {
        return None;
    }

    Some(data.claims.sub)
}
