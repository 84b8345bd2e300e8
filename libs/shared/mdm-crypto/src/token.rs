//! Device bearer-token issuance and verification.
//!
//! A device token is `{token_id}.{secret}`: `token_id` is a short, indexed,
//! non-secret prefix used for O(1) row lookup; `secret` is the part that's
//! bcrypt-hashed at rest and verified in constant time by `bcrypt` itself.

use rand::Rng;
use thiserror::Error;

const TOKEN_ID_LEN: usize = 12;
const TOKEN_SECRET_LEN: usize = 32;
const BCRYPT_COST: u32 = 12;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed bearer token")]
    Malformed,
    #[error("hashing failed: {0}")]
    HashFailed(#[from] bcrypt::BcryptError),
}

/// A freshly minted token, returned once at enrollment time. Only
/// `token_id` and `token_hash` are persisted; `full_token` is handed to the
/// device and never stored.
pub struct IssuedToken {
    pub token_id: String,
    pub token_hash: String,
    pub full_token: String,
}

pub fn issue_token() -> Result<IssuedToken, TokenError> {
    let token_id = random_alnum(TOKEN_ID_LEN);
    let secret = random_alnum(TOKEN_SECRET_LEN);
    let token_hash = bcrypt::hash(&secret, BCRYPT_COST)?;
    let full_token = format!("{token_id}.{secret}");
    Ok(IssuedToken {
        token_id,
        token_hash,
        full_token,
    })
}

/// Splits a bearer token into its indexed prefix and secret remainder
/// without touching bcrypt; the caller uses `token_id` for the O(1) row
/// lookup before calling `verify_secret`.
pub fn split_bearer_token(token: &str) -> Result<(&str, &str), TokenError> {
    token.split_once('.').ok_or(TokenError::Malformed)
}

pub fn verify_secret(secret: &str, token_hash: &str) -> Result<bool, TokenError> {
    Ok(bcrypt::verify(secret, token_hash)?)
}

fn random_alnum(len: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_through_split_and_verify() {
        let issued = issue_token().unwrap();
        let (token_id, secret) = split_bearer_token(&issued.full_token).unwrap();
        assert_eq!(token_id, issued.token_id);
        assert!(verify_secret(secret, &issued.token_hash).unwrap());
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let issued = issue_token().unwrap();
        assert!(!verify_secret("not-the-secret", &issued.token_hash).unwrap());
    }

    #[test]
    fn malformed_token_rejected() {
        assert!(split_bearer_token("no-dot-here").is_err());
    }
}
