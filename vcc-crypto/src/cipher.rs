//! ChaCha20-Poly1305 encryption of single response blobs.

use crate::error::{CryptoError, CryptoResult};
use crate::key::EncryptionKey;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Nonce size in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Ciphertext plus the random nonce it was sealed with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub nonce: [u8; NONCE_SIZE],
    /// Ciphertext with the authentication tag appended.
    pub ciphertext: Vec<u8>,
}

/// Encrypts `plaintext` under `key` with a fresh random nonce.
pub fn encrypt(plaintext: &[u8], key: &EncryptionKey) -> CryptoResult<EncryptedPayload> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

    let mut nonce = [0u8; NONCE_SIZE];
    rand::rng().fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    Ok(EncryptedPayload { nonce, ciphertext })
}

/// Decrypts and authenticates a payload.
///
/// Fails on a wrong key or any modification of nonce or ciphertext.
pub fn decrypt(payload: &EncryptedPayload, key: &EncryptionKey) -> CryptoResult<Vec<u8>> {
    if payload.ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::Decryption("ciphertext shorter than tag".into()));
    }

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    cipher
        .decrypt(Nonce::from_slice(&payload.nonce), payload.ciphertext.as_slice())
        .map_err(|_| CryptoError::Decryption("wrong key or tampered data".into()))
}

/// Encrypts into the serialized blob form stored by the compliance vault.
pub fn encrypt_blob(plaintext: &[u8], key: &EncryptionKey) -> CryptoResult<Vec<u8>> {
    let payload = encrypt(plaintext, key)?;
    Ok(serde_json::to_vec(&payload)?)
}

/// Inverse of [`encrypt_blob`].
pub fn decrypt_blob(blob: &[u8], key: &EncryptionKey) -> CryptoResult<Vec<u8>> {
    let payload: EncryptedPayload = serde_json::from_slice(blob)?;
    decrypt(&payload, key)
}
