//! Unit tests for the token cipher.
//!
//! Tests key derivation, seal/open round-trips, tamper detection, and
//! memory zeroization.

use reposcout::services::token_cipher::{TokenCipher, TokenCipherTrait};

fn setup() -> (TokenCipher, Vec<u8>) {
    let cipher = TokenCipher::new();
    let key = cipher.derive_key("test-passphrase", b"test-salt").unwrap();
    (cipher, key)
}

#[test]
fn test_derive_key_is_256_bits() {
    let (_, key) = setup();
    assert_eq!(key.len(), 32);
}

#[test]
fn test_derive_key_is_deterministic() {
    let cipher = TokenCipher::new();
    let k1 = cipher.derive_key("passphrase", b"salt").unwrap();
    let k2 = cipher.derive_key("passphrase", b"salt").unwrap();
    assert_eq!(k1, k2);
}

#[test]
fn test_different_salt_different_key() {
    let cipher = TokenCipher::new();
    let k1 = cipher.derive_key("passphrase", b"salt-a").unwrap();
    let k2 = cipher.derive_key("passphrase", b"salt-b").unwrap();
    assert_ne!(k1, k2);
}

#[test]
fn test_seal_open_roundtrip() {
    let (cipher, key) = setup();
    let plaintext = b"jwt-token-value";

    let sealed = cipher.seal(plaintext, &key).unwrap();
    assert_eq!(sealed.iv.len(), 12);
    assert_eq!(sealed.auth_tag.len(), 16);
    assert_eq!(sealed.ciphertext.len(), plaintext.len());

    let opened = cipher.open(&sealed, &key).unwrap();
    assert_eq!(opened, plaintext);
}

#[test]
fn test_ciphertext_differs_from_plaintext() {
    let (cipher, key) = setup();
    let plaintext = b"a-long-enough-session-token";
    let sealed = cipher.seal(plaintext, &key).unwrap();
    assert_ne!(sealed.ciphertext, plaintext.to_vec());
}

#[test]
fn test_open_with_wrong_key_fails() {
    let (cipher, key) = setup();
    let sealed = cipher.seal(b"secret-token", &key).unwrap();

    let wrong_key = cipher.derive_key("other-passphrase", b"test-salt").unwrap();
    assert!(cipher.open(&sealed, &wrong_key).is_err());
}

#[test]
fn test_open_with_tampered_ciphertext_fails() {
    let (cipher, key) = setup();
    let mut sealed = cipher.seal(b"secret-token", &key).unwrap();
    sealed.ciphertext[0] ^= 0xFF;
    assert!(cipher.open(&sealed, &key).is_err());
}

#[test]
fn test_open_with_tampered_tag_fails() {
    let (cipher, key) = setup();
    let mut sealed = cipher.seal(b"secret-token", &key).unwrap();
    sealed.auth_tag[0] ^= 0xFF;
    assert!(cipher.open(&sealed, &key).is_err());
}

#[test]
fn test_seal_rejects_short_key() {
    let cipher = TokenCipher::new();
    let short_key = vec![0u8; 16];
    assert!(cipher.seal(b"token", &short_key).is_err());
}

#[test]
fn test_nonce_is_unique_per_seal() {
    let (cipher, key) = setup();
    let s1 = cipher.seal(b"token", &key).unwrap();
    let s2 = cipher.seal(b"token", &key).unwrap();
    assert_ne!(s1.iv, s2.iv);
}

#[test]
fn test_zeroize_memory() {
    let (cipher, _) = setup();
    let mut sensitive = vec![0xAAu8; 64];
    cipher.zeroize_memory(&mut sensitive);
    assert!(sensitive.iter().all(|&b| b == 0));
}
