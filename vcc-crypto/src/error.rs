//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors raised by the encryption adapter.
///
/// Messages never include plaintext.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    #[error("malformed ciphertext envelope: {0}")]
    Envelope(#[from] serde_json::Error),
}
