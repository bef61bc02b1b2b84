//! Key provider seam.
//!
//! Key management is the deployment's job. Components ask a provider for the
//! key at the moment they need it and drop it afterwards.

use crate::key::EncryptionKey;

/// Supplies the compliance encryption key, if one is configured.
pub trait KeyProvider: Send + Sync {
    /// Returns the current key, or `None` when no key is configured.
    fn current_key(&self) -> Option<EncryptionKey>;

    fn is_available(&self) -> bool {
        self.current_key().is_some()
    }
}

/// Reads a base64 key from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvKeyProvider {
    var: String,
}

impl EnvKeyProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl KeyProvider for EnvKeyProvider {
    fn current_key(&self) -> Option<EncryptionKey> {
        let encoded = std::env::var(&self.var).ok()?;
        EncryptionKey::from_base64(&encoded).ok()
    }
}

/// Hands out a fixed key, or none. Used when the host injects the key
/// directly and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyProvider {
    key: Option<EncryptionKey>,
}

impl StaticKeyProvider {
    pub fn new(key: EncryptionKey) -> Self {
        Self { key: Some(key) }
    }

    /// A provider with no key configured.
    pub fn unavailable() -> Self {
        Self { key: None }
    }
}

impl KeyProvider for StaticKeyProvider {
    fn current_key(&self) -> Option<EncryptionKey> {
        self.key.clone()
    }
}
