//! Token cipher for RepoScout.
//!
//! Seals the session credential for at-rest storage with AES-256-GCM.
//! The at-rest key is derived with PBKDF2-HMAC-SHA256 from a fixed
//! application passphrase; the plaintext token never touches disk.

use ring::aead::{self, Aad, BoundKey, Nonce, NonceSequence, UnboundKey, AES_256_GCM};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use std::num::NonZeroU32;
use zeroize::Zeroize;

use crate::types::errors::CryptoError;
use crate::types::session::SealedToken;

/// PBKDF2 iteration count for key derivation.
const PBKDF2_ITERATIONS: u32 = 100_000;

/// AES-256-GCM key length in bytes.
const KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce/IV length in bytes.
const NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
const TAG_LENGTH: usize = 16;

/// Trait defining the credential sealing operations.
pub trait TokenCipherTrait {
    /// Derives the at-rest encryption key from a passphrase and salt using PBKDF2.
    fn derive_key(&self, passphrase: &str, salt: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Seals a plaintext token, returning ciphertext, IV, and auth tag.
    fn seal(&self, plaintext: &[u8], key: &[u8]) -> Result<SealedToken, CryptoError>;

    /// Opens a sealed token, returning the plaintext bytes.
    fn open(&self, sealed: &SealedToken, key: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Clears sensitive data from memory by overwriting with zeros.
    fn zeroize_memory(&self, data: &mut [u8]);
}

/// A nonce sequence that uses a single nonce value.
/// Used for one-shot seal/open operations.
struct SingleNonce {
    nonce: Option<[u8; NONCE_LENGTH]>,
}

impl SingleNonce {
    fn new(nonce_bytes: [u8; NONCE_LENGTH]) -> Self {
        Self {
            nonce: Some(nonce_bytes),
        }
    }
}

impl NonceSequence for SingleNonce {
    fn advance(&mut self) -> Result<Nonce, ring::error::Unspecified> {
        self.nonce
            .take()
            .map(Nonce::assume_unique_for_key)
            .ok_or(ring::error::Unspecified)
    }
}

/// Token cipher backed by the `ring` crate.
pub struct TokenCipher {
    rng: SystemRandom,
}

impl TokenCipher {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for TokenCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCipherTrait for TokenCipher {
    fn derive_key(&self, passphrase: &str, salt: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let iterations = NonZeroU32::new(PBKDF2_ITERATIONS)
            .ok_or_else(|| CryptoError::KeyDerivation("Invalid iteration count".to_string()))?;

        let mut key = vec![0u8; KEY_LENGTH];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            salt,
            passphrase.as_bytes(),
            &mut key,
        );

        Ok(key)
    }

    fn seal(&self, plaintext: &[u8], key: &[u8]) -> Result<SealedToken, CryptoError> {
        if key.len() != KEY_LENGTH {
            return Err(CryptoError::InvalidKey(format!(
                "Key must be {} bytes, got {}",
                KEY_LENGTH,
                key.len()
            )));
        }

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::RandomGeneration("Failed to generate nonce".to_string()))?;

        let unbound_key = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| CryptoError::Seal("Failed to create sealing key".to_string()))?;

        let nonce_sequence = SingleNonce::new(nonce_bytes);
        let mut sealing_key = aead::SealingKey::new(unbound_key, nonce_sequence);

        let mut in_out = plaintext.to_vec();
        sealing_key
            .seal_in_place_append_tag(Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Seal("Seal operation failed".to_string()))?;

        // ring appends the auth tag to the ciphertext; the last TAG_LENGTH
        // bytes are the tag.
        let tag_start = in_out.len() - TAG_LENGTH;
        let auth_tag = in_out[tag_start..].to_vec();
        let ciphertext = in_out[..tag_start].to_vec();

        Ok(SealedToken {
            ciphertext,
            iv: nonce_bytes.to_vec(),
            auth_tag,
        })
    }

    fn open(&self, sealed: &SealedToken, key: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if key.len() != KEY_LENGTH {
            return Err(CryptoError::InvalidKey(format!(
                "Key must be {} bytes, got {}",
                KEY_LENGTH,
                key.len()
            )));
        }

        if sealed.iv.len() != NONCE_LENGTH {
            return Err(CryptoError::Open(format!(
                "IV must be {} bytes, got {}",
                NONCE_LENGTH,
                sealed.iv.len()
            )));
        }

        if sealed.auth_tag.len() != TAG_LENGTH {
            return Err(CryptoError::Open(format!(
                "Auth tag must be {} bytes, got {}",
                TAG_LENGTH,
                sealed.auth_tag.len()
            )));
        }

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        nonce_bytes.copy_from_slice(&sealed.iv);

        let unbound_key = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| CryptoError::Open("Failed to create opening key".to_string()))?;

        let nonce_sequence = SingleNonce::new(nonce_bytes);
        let mut opening_key = aead::OpeningKey::new(unbound_key, nonce_sequence);

        // ring expects ciphertext and auth tag concatenated
        let mut in_out = Vec::with_capacity(sealed.ciphertext.len() + sealed.auth_tag.len());
        in_out.extend_from_slice(&sealed.ciphertext);
        in_out.extend_from_slice(&sealed.auth_tag);

        let plaintext = opening_key
            .open_in_place(Aad::empty(), &mut in_out)
            .map_err(|_| {
                CryptoError::Open("Open failed: invalid key or corrupted data".to_string())
            })?;

        Ok(plaintext.to_vec())
    }

    fn zeroize_memory(&self, data: &mut [u8]) {
        data.zeroize();
    }
}
