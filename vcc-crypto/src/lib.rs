//! Encryption adapter for VCC survey compliance records.
//!
//! Provides:
//! - ChaCha20-Poly1305 authenticated encryption of one response blob
//! - An externally supplied [`EncryptionKey`] per call; nothing here keeps
//!   key state between calls
//! - The [`KeyProvider`] seam through which deployments hand keys in
//! - One-way hashing of a submitter's network origin
//! - Survey token generation
//!
//! Tampered ciphertext and wrong keys fail with [`CryptoError::Decryption`];
//! the authentication tag guarantees garbage is never returned.

mod cipher;
mod error;
mod key;
mod origin;
mod provider;

pub use cipher::{decrypt, decrypt_blob, encrypt, encrypt_blob, EncryptedPayload, NONCE_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use key::{EncryptionKey, KEY_SIZE};
pub use origin::{generate_survey_token, hash_origin, SURVEY_TOKEN_BYTES};
pub use provider::{EnvKeyProvider, KeyProvider, StaticKeyProvider};
