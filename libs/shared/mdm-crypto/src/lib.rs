//! Cryptographic primitives for the fleet control plane: dispatch HMAC
//! signing, OTA cohort hashing, and device bearer-token issuance.

pub mod cohort;
pub mod hmac_sign;
pub mod token;

pub use cohort::{cohort_for_device, is_in_cohort};
pub use hmac_sign::{rfc3339_seconds, HmacKeyring, SignError, HMAC_WINDOW_SECONDS};
pub use token::{issue_token, split_bearer_token, verify_secret, IssuedToken, TokenError};
