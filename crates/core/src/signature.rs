//! Payment-gateway webhook signature verification.
//!
//! The gateway signs each delivery with HMAC-SHA256 over
//! `"{timestamp}.{raw_body}"` and sends the result in a header of the form
//! `t=<unix_seconds>,v1=<hex_signature>`. Verification must happen over the
//! raw request bytes before any payload field is trusted, and must not
//! mutate any state on failure.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age (and future skew) of a signed timestamp, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Compute the hex signature for a payload at a given timestamp.
///
/// Exposed so tests and outbound tooling can produce valid headers.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Build a complete signature header value for a payload.
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    format!("t={timestamp},v1={}", compute_signature(secret, timestamp, payload))
}

/// Verify a signature header against the raw payload bytes.
///
/// Accepts the delivery when any `v1` candidate in the header matches
/// (comparison is constant-time via [`Mac::verify_slice`]) and the signed
/// timestamp is within `tolerance_secs` of `now`.
pub fn verify_signature(
    secret: &str,
    header: &str,
    payload: &[u8],
    now: i64,
    tolerance_secs: i64,
) -> Result<(), CoreError> {
    let (timestamp, candidates) = parse_header(header)?;

    if (now - timestamp).abs() > tolerance_secs {
        return Err(CoreError::InvalidSignature);
    }

    for candidate in candidates {
        let Ok(expected) = hex::decode(&candidate) else {
            continue;
        };
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }

    Err(CoreError::InvalidSignature)
}

/// Parse `t=...,v1=...` into the timestamp and all `v1` candidates.
fn parse_header(header: &str) -> Result<(i64, Vec<String>), CoreError> {
    let mut timestamp = None;
    let mut candidates = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = value.parse::<i64>().ok();
            }
            Some(("v1", value)) => candidates.push(value.to_string()),
            _ => {}
        }
    }

    match (timestamp, candidates.is_empty()) {
        (Some(t), false) => Ok((t, candidates)),
        _ => Err(CoreError::InvalidSignature),
    }
}

// ---------------------------------------------------------------------------
// hex helpers (no extra dep)
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string; fails on odd length or non-hex characters.
    pub fn decode(s: &str) -> Result<Vec<u8>, ()> {
        if s.len() % 2 != 0 {
            return Err(());
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| ()))
            .collect()
    }
}
