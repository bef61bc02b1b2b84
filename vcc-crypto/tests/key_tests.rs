use vcc_crypto::{
    generate_survey_token, hash_origin, CryptoError, EncryptionKey, EnvKeyProvider, KeyProvider,
    StaticKeyProvider, KEY_SIZE,
};

#[test]
fn base64_roundtrip() {
    let key = EncryptionKey::generate();
    let restored = EncryptionKey::from_base64(&key.to_base64()).unwrap();
    assert_eq!(key.as_bytes(), restored.as_bytes());
}

#[test]
fn base64_with_surrounding_whitespace_is_accepted() {
    let key = EncryptionKey::generate();
    let encoded = format!("  {}\n", key.to_base64());
    assert!(EncryptionKey::from_base64(&encoded).is_ok());
}

#[test]
fn short_key_is_rejected() {
    let err = EncryptionKey::from_slice(&[0u8; 16]).unwrap_err();
    assert!(matches!(
        err,
        CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: 16 }
    ));
}

#[test]
fn invalid_base64_is_rejected() {
    let err = EncryptionKey::from_base64("%%%not-base64%%%").unwrap_err();
    assert!(matches!(err, CryptoError::InvalidKeyEncoding(_)));
}

#[test]
fn debug_never_prints_key_material() {
    let key = EncryptionKey::from_bytes([0xAB; KEY_SIZE]);
    let rendered = format!("{key:?}");
    assert!(!rendered.contains("171"));
    assert!(!rendered.to_lowercase().contains("ab"));
}

#[test]
fn static_provider_availability() {
    assert!(StaticKeyProvider::new(EncryptionKey::generate()).is_available());
    assert!(!StaticKeyProvider::unavailable().is_available());
    assert!(StaticKeyProvider::default().current_key().is_none());
}

#[test]
fn env_provider_without_variable_is_unavailable() {
    let provider = EnvKeyProvider::new("VCC_TEST_KEY_THAT_IS_NEVER_SET");
    assert_eq!(provider.var(), "VCC_TEST_KEY_THAT_IS_NEVER_SET");
    assert!(provider.current_key().is_none());
}

#[test]
fn origin_hash_is_stable_and_salted() {
    let a = hash_origin("salt-a", "203.0.113.7");
    assert_eq!(a, hash_origin("salt-a", "203.0.113.7"));
    assert_ne!(a, hash_origin("salt-b", "203.0.113.7"));
    assert_eq!(a.len(), 64);
    assert!(!a.contains("203.0.113.7"));
}

#[test]
fn survey_tokens_are_url_safe_and_unique() {
    let a = generate_survey_token();
    let b = generate_survey_token();
    assert_ne!(a, b);
    assert_eq!(a.len(), 43);
    assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}
