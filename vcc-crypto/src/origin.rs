//! Origin hashing and survey tokens.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Random bytes behind each survey token.
pub const SURVEY_TOKEN_BYTES: usize = 32;

/// One-way hash of a submitter's network origin, kept for abuse review only.
///
/// The deployment salt keeps the small IPv4 space from being enumerated
/// back into addresses.
pub fn hash_origin(salt: &str, origin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update([0u8]);
    hasher.update(origin.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates an unguessable URL-safe survey token.
pub fn generate_survey_token() -> String {
    let mut bytes = [0u8; SURVEY_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
