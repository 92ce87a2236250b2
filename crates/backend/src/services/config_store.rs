//! Encrypted per-shop key/value configuration store.
//!
//! Shop config values and network config blobs are encrypted at rest with
//! AES-256-GCM. The wire format of a stored value is
//! `enc1:<base64(nonce || ciphertext)>` with a random 96-bit nonce per
//! encryption. Plaintexts are JSON: individual values for shop config rows,
//! whole objects for network blobs.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value};
use sqlx::PgPool;
use thiserror::Error;

use shopyard_core::ShopId;

use crate::config::ConfigKey;
use crate::db::{RepositoryError, ShopConfigRepository};

/// Prefix marking an encrypted value (format version 1).
const ENC_PREFIX: &str = "enc1:";

/// Nonce size for AES-256-GCM (96 bits).
const NONCE_SIZE: usize = 12;

/// Errors from the encrypted config store.
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    /// Encryption failed.
    #[error("config encryption failed")]
    Encrypt,

    /// Decryption failed (wrong key or tampered ciphertext).
    #[error("config decryption failed")]
    Decrypt,

    /// Stored value is missing the encryption prefix.
    #[error("stored value is missing the encryption prefix")]
    MissingPrefix,

    /// Ciphertext is structurally invalid.
    #[error("malformed ciphertext: {0}")]
    Malformed(String),

    /// Decrypted plaintext is not the expected JSON shape.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// AES-256-GCM cipher for config values.
#[derive(Clone)]
pub struct ConfigCipher {
    key: [u8; 32],
}

impl ConfigCipher {
    /// Create a cipher from the configured key.
    #[must_use]
    pub const fn new(key: &ConfigKey) -> Self {
        Self {
            key: *key.as_bytes(),
        }
    }

    /// Encrypt a JSON value into the prefixed base64 wire format.
    ///
    /// # Errors
    ///
    /// Returns `ConfigStoreError::Encrypt` if the cipher rejects the input.
    pub fn encrypt_value(&self, value: &Value) -> Result<String, ConfigStoreError> {
        let plaintext = serde_json::to_vec(value)?;

        let cipher =
            Aes256Gcm::new_from_slice(&self.key).map_err(|_| ConfigStoreError::Encrypt)?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_slice())
            .map_err(|_| ConfigStoreError::Encrypt)?;

        let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(nonce.as_slice());
        combined.extend_from_slice(&ciphertext);

        Ok(format!("{ENC_PREFIX}{}", BASE64.encode(&combined)))
    }

    /// Decrypt a prefixed base64 string back to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigStoreError::MissingPrefix` / `Malformed` for
    /// structurally invalid input and `ConfigStoreError::Decrypt` when
    /// authentication fails (wrong key or tampered data).
    pub fn decrypt_value(&self, stored: &str) -> Result<Value, ConfigStoreError> {
        let encoded = stored
            .strip_prefix(ENC_PREFIX)
            .ok_or(ConfigStoreError::MissingPrefix)?;

        let combined = BASE64
            .decode(encoded)
            .map_err(|e| ConfigStoreError::Malformed(e.to_string()))?;

        if combined.len() < NONCE_SIZE {
            return Err(ConfigStoreError::Malformed(
                "ciphertext shorter than nonce".to_owned(),
            ));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let cipher =
            Aes256Gcm::new_from_slice(&self.key).map_err(|_| ConfigStoreError::Decrypt)?;

        let plaintext = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| ConfigStoreError::Decrypt)?;

        Ok(serde_json::from_slice(&plaintext)?)
    }

    /// Decrypt a blob that must hold a JSON object (network configs).
    ///
    /// # Errors
    ///
    /// As [`Self::decrypt_value`], plus `Malformed` when the plaintext is not
    /// a JSON object.
    pub fn decrypt_object(&self, stored: &str) -> Result<Map<String, Value>, ConfigStoreError> {
        match self.decrypt_value(stored)? {
            Value::Object(map) => Ok(map),
            other => Err(ConfigStoreError::Malformed(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

}

impl std::fmt::Debug for ConfigCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Per-request view over a shop's encrypted configuration.
///
/// Mirrors the three operations the routes need: `get` one key, `dump` the
/// whole map, `assign` (merge) submitted fields.
pub struct EncryptedConfigStore<'a> {
    repo: ShopConfigRepository<'a>,
    cipher: &'a ConfigCipher,
}

impl<'a> EncryptedConfigStore<'a> {
    /// Create a store over the given pool and cipher.
    #[must_use]
    pub const fn new(pool: &'a PgPool, cipher: &'a ConfigCipher) -> Self {
        Self {
            repo: ShopConfigRepository::new(pool),
            cipher,
        }
    }

    /// Get a single decrypted config value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigStoreError` on database or decryption failure.
    pub async fn get(
        &self,
        shop_id: ShopId,
        key: &str,
    ) -> Result<Option<Value>, ConfigStoreError> {
        match self.repo.get(shop_id, key).await? {
            Some(stored) => Ok(Some(self.cipher.decrypt_value(&stored)?)),
            None => Ok(None),
        }
    }

    /// Decrypt the shop's entire config map.
    ///
    /// # Errors
    ///
    /// Returns `ConfigStoreError` on database or decryption failure.
    pub async fn dump(&self, shop_id: ShopId) -> Result<Map<String, Value>, ConfigStoreError> {
        let rows = self.repo.dump(shop_id).await?;

        let mut config = Map::with_capacity(rows.len());
        for (key, stored) in rows {
            let value = self.cipher.decrypt_value(&stored)?;
            config.insert(key, value);
        }

        Ok(config)
    }

    /// Merge the submitted fields into the shop's config.
    ///
    /// Keys present in the store but absent from `fields` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ConfigStoreError` on database or encryption failure.
    pub async fn assign(
        &self,
        shop_id: ShopId,
        fields: &Map<String, Value>,
    ) -> Result<(), ConfigStoreError> {
        for (key, value) in fields {
            let stored = self.cipher.encrypt_value(value)?;
            self.repo.upsert(shop_id, key, &stored).await?;
        }

        Ok(())
    }
}

/// Human-readable JSON type name for error messages.
const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::ConfigKey;

    fn test_cipher() -> ConfigCipher {
        let key = ConfigKey::parse(
            "TEST_KEY",
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
        )
        .unwrap();
        ConfigCipher::new(&key)
    }

    #[test]
    fn test_roundtrip_values() {
        let cipher = test_cipher();
        for value in [
            json!("hunter22"),
            json!(true),
            json!(42),
            json!(null),
            json!(["a", "b"]),
            json!({"hostname": "shop.example.com", "discountCodes": true}),
        ] {
            let stored = cipher.encrypt_value(&value).unwrap();
            assert!(stored.starts_with(ENC_PREFIX));
            assert_eq!(cipher.decrypt_value(&stored).unwrap(), value);
        }
    }

    #[test]
    fn test_nonce_varies_per_encryption() {
        let cipher = test_cipher();
        let a = cipher.encrypt_value(&json!("same")).unwrap();
        let b = cipher.encrypt_value(&json!("same")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_prefix() {
        let cipher = test_cipher();
        assert!(matches!(
            cipher.decrypt_value("bm90LWVuY3J5cHRlZA=="),
            Err(ConfigStoreError::MissingPrefix)
        ));
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let cipher = test_cipher();
        let stored = cipher.encrypt_value(&json!("payload")).unwrap();

        // Flip the final base64 character
        let mut tampered = stored.clone();
        let last = if tampered.ends_with('A') { 'B' } else { 'A' };
        tampered.pop();
        tampered.push(last);

        assert!(cipher.decrypt_value(&tampered).is_err());
    }

    #[test]
    fn test_truncated_ciphertext_rejected() {
        let cipher = test_cipher();
        let short = format!("{ENC_PREFIX}{}", BASE64.encode([0u8; 4]));
        assert!(matches!(
            cipher.decrypt_value(&short),
            Err(ConfigStoreError::Malformed(_))
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let stored = test_cipher().encrypt_value(&json!("payload")).unwrap();

        let other_key = ConfigKey::parse(
            "TEST_KEY",
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
        )
        .unwrap();
        let other = ConfigCipher::new(&other_key);

        assert!(matches!(
            other.decrypt_value(&stored),
            Err(ConfigStoreError::Decrypt)
        ));
    }

    #[test]
    fn test_decrypt_object_rejects_scalar() {
        let cipher = test_cipher();
        let stored = cipher.encrypt_value(&json!("scalar")).unwrap();
        assert!(matches!(
            cipher.decrypt_object(&stored),
            Err(ConfigStoreError::Malformed(_))
        ));
    }

    #[test]
    fn test_decrypt_object_accepts_map() {
        let cipher = test_cipher();
        let stored = cipher
            .encrypt_value(&json!({"active": true, "provider": "mainnet"}))
            .unwrap();
        let map = cipher.decrypt_object(&stored).unwrap();
        assert_eq!(map.get("provider"), Some(&json!("mainnet")));
    }
}
