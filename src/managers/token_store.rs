//! Token Store for RepoScout.
//!
//! Persists the session credential as a single sealed row in SQLite. The
//! canonical storage key is `session_token`; the legacy `github_token` and
//! `jwt_token` keys from earlier client variants are not read or written.
//! Storage absence is "absent", not an error; a row that fails to unseal
//! is also treated as absent and the caller re-authenticates.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::params;
use tracing::warn;
use zeroize::Zeroize;

use crate::database::connection::Database;
use crate::services::token_cipher::{TokenCipher, TokenCipherTrait};
use crate::types::errors::StoreError;
use crate::types::session::SealedToken;

/// Canonical storage key for the session credential.
pub const STORAGE_KEY: &str = "session_token";

/// Internal at-rest key derived from a fixed identifier.
/// In production this would use a machine-specific identifier; for now a
/// fixed passphrase + salt.
const TOKEN_KEY_PASSPHRASE: &str = "reposcout-token-key-v1";
const TOKEN_KEY_SALT: &[u8] = b"reposcout-tkn";

/// Trait defining the token store contract.
pub trait TokenStoreTrait {
    fn get_token(&self) -> Result<Option<String>, StoreError>;
    fn set_token(&self, token: &str) -> Result<(), StoreError>;
    fn clear_token(&self) -> Result<(), StoreError>;
    fn has_token(&self) -> bool;
}

/// Token store backed by SQLite + TokenCipher.
pub struct TokenStore {
    db: Arc<Database>,
    cipher: TokenCipher,
    at_rest_key: Vec<u8>,
}

impl TokenStore {
    /// Creates a new TokenStore, deriving the at-rest key on construction.
    pub fn new(db: Arc<Database>) -> Result<Self, StoreError> {
        let cipher = TokenCipher::new();
        let at_rest_key = cipher
            .derive_key(TOKEN_KEY_PASSPHRASE, TOKEN_KEY_SALT)
            .map_err(|e| StoreError::CryptoError(e.to_string()))?;

        Ok(Self {
            db,
            cipher,
            at_rest_key,
        })
    }
}

impl TokenStoreTrait for TokenStore {
    /// Reads and unseals the stored credential.
    ///
    /// A missing row and a row that fails to unseal both yield `Ok(None)`.
    fn get_token(&self) -> Result<Option<String>, StoreError> {
        let conn = self.db.connection();
        let result = conn.query_row(
            "SELECT ciphertext, iv, auth_tag FROM session_credential WHERE key = ?1",
            params![STORAGE_KEY],
            |row| {
                Ok(SealedToken {
                    ciphertext: row.get(0)?,
                    iv: row.get(1)?,
                    auth_tag: row.get(2)?,
                })
            },
        );

        match result {
            Ok(sealed) => match self.cipher.open(&sealed, &self.at_rest_key) {
                Ok(mut plaintext) => {
                    let token = std::str::from_utf8(&plaintext).map(str::to_string);
                    plaintext.zeroize();
                    match token {
                        Ok(token) => Ok(Some(token)),
                        Err(_) => {
                            warn!("stored credential is not valid UTF-8, treating as absent");
                            Ok(None)
                        }
                    }
                }
                Err(e) => {
                    warn!("stored credential failed to unseal, treating as absent: {}", e);
                    Ok(None)
                }
            },
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::DatabaseError(e.to_string())),
        }
    }

    /// Seals and stores the credential, overwriting any previous one.
    /// At most one credential is active at a time.
    fn set_token(&self, token: &str) -> Result<(), StoreError> {
        let sealed = self
            .cipher
            .seal(token.as_bytes(), &self.at_rest_key)
            .map_err(|e| StoreError::CryptoError(e.to_string()))?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;

        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO session_credential (key, ciphertext, iv, auth_tag, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![STORAGE_KEY, sealed.ciphertext, sealed.iv, sealed.auth_tag, now],
            )
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// Removes the stored credential.
    fn clear_token(&self) -> Result<(), StoreError> {
        self.db
            .connection()
            .execute(
                "DELETE FROM session_credential WHERE key = ?1",
                params![STORAGE_KEY],
            )
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Returns true if a credential row exists.
    fn has_token(&self) -> bool {
        let conn = self.db.connection();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM session_credential WHERE key = ?1",
                params![STORAGE_KEY],
                |row| row.get(0),
            )
            .unwrap_or(0);
        count > 0
    }
}
