//! Dispatch-payload HMAC signing and verification, per §6:
//!
//! `base64url(HMAC-SHA256(secret, "{request_id}|{device_id}|{action}|{ts}"))`
//!
//! The server signs with the primary key only; two keys stay active so a
//! key rotation doesn't invalidate payloads already in flight on devices
//! that still verify against the secondary.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum SignError {
    #[error("invalid HMAC key length")]
    InvalidKeyLength,
}

pub const HMAC_WINDOW_SECONDS: i64 = 5 * 60;

/// Two active signing keys: the server signs with `primary`; devices (and
/// the server's own ack verification, defensively) accept either.
#[derive(Clone)]
pub struct HmacKeyring {
    primary: Vec<u8>,
    secondary: Option<Vec<u8>>,
}

impl HmacKeyring {
    pub fn new(primary: impl Into<Vec<u8>>, secondary: Option<Vec<u8>>) -> Self {
        Self {
            primary: primary.into(),
            secondary,
        }
    }

    fn canonical_message(request_id: &str, device_id: &str, action: &str, ts: &str) -> String {
        format!("{request_id}|{device_id}|{action}|{ts}")
    }

    /// Signs the canonical dispatch message with the primary key, returning
    /// the base64url-encoded MAC to embed in the push payload.
    pub fn sign(
        &self,
        request_id: &str,
        device_id: &str,
        action: &str,
        ts: DateTime<Utc>,
    ) -> Result<String, SignError> {
        let message = Self::canonical_message(request_id, device_id, action, &rfc3339_seconds(ts));
        let mut mac = HmacSha256::new_from_slice(&self.primary).map_err(|_| SignError::InvalidKeyLength)?;
        mac.update(message.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }

    /// Verifies a signature against either active key and checks the
    /// timestamp falls within the 5-minute window. Used in tests and by any
    /// server-side code path that re-validates a signed payload defensively
    /// (the device is the authoritative verifier in production).
    pub fn verify(
        &self,
        request_id: &str,
        device_id: &str,
        action: &str,
        ts: DateTime<Utc>,
        now: DateTime<Utc>,
        signature: &str,
    ) -> bool {
        if (now - ts).num_seconds().abs() > HMAC_WINDOW_SECONDS {
            return false;
        }
        let message = Self::canonical_message(request_id, device_id, action, &rfc3339_seconds(ts));
        let candidate_keys = std::iter::once(&self.primary).chain(self.secondary.iter());
        for key in candidate_keys {
            if let Ok(mut mac) = HmacSha256::new_from_slice(key) {
                mac.update(message.as_bytes());
                let expected = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
                if expected.as_bytes().ct_eq(signature.as_bytes()).into() {
                    return true;
                }
            }
        }
        false
    }
}

/// Canonical second-precision RFC3339 rendering used both inside the
/// signed message and in the `ts` field of the envelope carrying it, so a
/// device reconstructing the message from the envelope it received signs
/// the same bytes the server did.
pub fn rfc3339_seconds(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs_and_verifies_with_primary_key() {
        let keyring = HmacKeyring::new(b"primary-secret".to_vec(), None);
        let now = Utc::now();
        let sig = keyring.sign("req-1", "dev-1", "ping", now).unwrap();
        assert!(keyring.verify("req-1", "dev-1", "ping", now, now, &sig));
    }

    #[test]
    fn accepts_secondary_key_during_rotation() {
        let old_keyring = HmacKeyring::new(b"old-secret".to_vec(), None);
        let now = Utc::now();
        let sig = old_keyring.sign("req-1", "dev-1", "ping", now).unwrap();

        let rotated = HmacKeyring::new(b"new-secret".to_vec(), Some(b"old-secret".to_vec()));
        assert!(rotated.verify("req-1", "dev-1", "ping", now, now, &sig));
    }

    #[test]
    fn rejects_timestamp_outside_window() {
        let keyring = HmacKeyring::new(b"primary-secret".to_vec(), None);
        let ts = Utc::now() - chrono::Duration::minutes(10);
        let sig = keyring.sign("req-1", "dev-1", "ping", ts).unwrap();
        assert!(!keyring.verify("req-1", "dev-1", "ping", ts, Utc::now(), &sig));
    }

    #[test]
    fn rejects_tampered_signature() {
        let keyring = HmacKeyring::new(b"primary-secret".to_vec(), None);
        let now = Utc::now();
        let sig = keyring.sign("req-1", "dev-1", "ping", now).unwrap();
        let mut tampered = sig.clone();
        tampered.push('x');
        assert!(!keyring.verify("req-1", "dev-1", "ping", now, now, &tampered));
    }
}
