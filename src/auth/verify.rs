//! Ethereum personal-message signature verification.
//!
//! Wallets sign the fixed [`LOGIN_MESSAGE`] with the EIP-191 personal-message
//! prefix. Verification recovers the signing address from the 65-byte r‖s‖v
//! signature and compares it against the claimed address, case-insensitively.
//!
//! The message is fixed rather than a per-attempt nonce, so a captured
//! signature stays replayable for its wallet. See DESIGN.md.

use crate::error::AppError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};

/// Message every wallet signs to authenticate.
pub const LOGIN_MESSAGE: &str = "Sign this message to authenticate with RationChain";

/// Normalize a wallet address to its canonical lower-case form.
///
/// Returns `None` unless the input is a 0x-prefixed 20-byte hex string.
pub fn normalize_address(address: &str) -> Option<String> {
    let hex_part = address.strip_prefix("0x")?;
    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(address.to_ascii_lowercase())
}

/// Keccak-256 digest of a message under the EIP-191 personal-message prefix.
fn personal_digest(message: &str) -> Keccak256 {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()));
    hasher.update(message.as_bytes());
    hasher
}

/// Derive the 0x-prefixed lower-case address for a public key.
///
/// Last 20 bytes of the Keccak-256 hash of the uncompressed point
/// (SEC1 tag byte excluded).
pub fn address_from_key(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&hash[12..]))
}

/// Verify a wallet signature over a personal message.
///
/// # Arguments
/// * `message` - The message the wallet signed (before prefixing)
/// * `claimed_address` - Address the caller claims to control
/// * `signature_hex` - Hex-encoded 65-byte r‖s‖v signature, 0x prefix optional
///
/// Returns true only when the recovered address matches the claim
/// (case-insensitive). Every malformation — bad hex, wrong length, invalid
/// recovery byte, unrecoverable point — is plain verification failure, so
/// callers answer them all identically. Pure function, fails closed.
pub fn verify_wallet_signature(message: &str, claimed_address: &str, signature_hex: &str) -> bool {
    let raw = signature_hex.strip_prefix("0x").unwrap_or(signature_hex);
    let Ok(bytes) = hex::decode(raw) else {
        return false;
    };

    if bytes.len() != 65 {
        return false;
    }

    // v is either 0/1 or the legacy 27/28
    let v = bytes[64];
    let Some(recovery_id) = RecoveryId::from_byte(if v >= 27 { v - 27 } else { v }) else {
        return false;
    };

    let Ok(signature) = Signature::from_slice(&bytes[..64]) else {
        return false;
    };

    let Ok(recovered) =
        VerifyingKey::recover_from_digest(personal_digest(message), &signature, recovery_id)
    else {
        return false;
    };

    address_from_key(&recovered) == claimed_address.to_ascii_lowercase()
}

/// Sign a personal message, producing the hex r‖s‖v form wallets emit.
///
/// Used by the keygen subcommand and tests; the server itself never signs.
pub fn sign_wallet_message(key: &SigningKey, message: &str) -> Result<String, AppError> {
    let (signature, recovery_id) = key
        .sign_digest_recoverable(personal_digest(message))
        .map_err(|e| AppError::Internal(format!("Signing failed: {}", e)))?;

    let mut bytes = signature.to_vec();
    bytes.push(recovery_id.to_byte() + 27);
    Ok(format!("0x{}", hex::encode(bytes)))
}
