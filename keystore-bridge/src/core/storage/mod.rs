//! Encrypted credential storage
//!
//! [`CredentialStore`] is the string key-value contract the bridge depends on.
//! [`EncryptedPreferences`] implements it on top of any [`PlatformStorage`]:
//!
//! - entry names are encrypted deterministically (AES-256-GCM with a synthetic
//!   IV taken from an HMAC of the name), so equal names map to equal entries and
//!   can still be decrypted for enumeration;
//! - values are encrypted with a random nonce and bound to their plaintext name
//!   as associated data;
//! - every key is derived from one Argon2id master key.

use crate::core::crypto::encryption::{EncryptedData, EncryptionAlgorithm, EncryptionManager};
use crate::infrastructure::platform::PlatformStorage;
use crate::shared::constants::{
    ARGON2_ITERATIONS, ARGON2_MEMORY_KIB, ARGON2_PARALLELISM, KEY_ENCRYPTION_LABEL, KEY_SIV_LABEL,
    KEY_SIZE, NONCE_SIZE, PREFERENCES_CHECK_ENTRY, PREFERENCES_CHECK_VALUE, PREFERENCES_SALT_ENTRY,
    SALT_SIZE, VALUE_ENCRYPTION_LABEL,
};
use crate::shared::error::WalletError;
use crate::shared::WalletResult;
use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand_core::{OsRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// String key-value store for credentials
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore {
    /// Read a value, `None` when the key was never written
    fn get_string(&self, key: &str) -> WalletResult<Option<String>>;

    /// Write a value unless the key already holds one
    ///
    /// Returns `true` when written. Existing values are never replaced.
    fn put_string_if_absent(&self, key: &str, value: &str) -> WalletResult<bool>;

    /// Every key in the store
    fn keys(&self) -> WalletResult<Vec<String>>;

    /// Keys starting with `prefix`, with the prefix removed, sorted
    fn keys_with_prefix(&self, prefix: &str) -> WalletResult<Vec<String>> {
        let mut ids: Vec<String> = self
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(prefix).map(str::to_string))
            .collect();
        ids.sort();
        Ok(ids)
    }
}

/// Keys derived from the master key
struct PreferenceKeys {
    key_encryption: Zeroizing<[u8; KEY_SIZE]>,
    key_siv: Zeroizing<[u8; KEY_SIZE]>,
    value_encryption: Zeroizing<[u8; KEY_SIZE]>,
}

impl PreferenceKeys {
    fn derive(master_key: &[u8; KEY_SIZE]) -> WalletResult<Self> {
        Ok(Self {
            key_encryption: hmac_sha256(master_key, KEY_ENCRYPTION_LABEL)?,
            key_siv: hmac_sha256(master_key, KEY_SIV_LABEL)?,
            value_encryption: hmac_sha256(master_key, VALUE_ENCRYPTION_LABEL)?,
        })
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> WalletResult<Zeroizing<[u8; KEY_SIZE]>> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| WalletError::crypto(format!("HMAC key error: {}", e)))?;
    mac.update(data);
    let mut out = Zeroizing::new([0u8; KEY_SIZE]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// Derive the 32-byte master key from a password with Argon2id
pub fn derive_master_key(password: &str, salt: &[u8]) -> WalletResult<Zeroizing<[u8; KEY_SIZE]>> {
    let params = Params::new(ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_PARALLELISM, Some(KEY_SIZE))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    argon2.hash_password_into(password.as_bytes(), salt, &mut *key)?;
    Ok(key)
}

/// Encrypted string preferences over a raw platform store
pub struct EncryptedPreferences<P: PlatformStorage> {
    storage: P,
    keys: PreferenceKeys,
    // Entry names always use AES-256-GCM; only values follow the configured cipher
    key_cipher: EncryptionManager,
    value_cipher: EncryptionManager,
}

impl<P: PlatformStorage> EncryptedPreferences<P> {
    /// Open with a password
    ///
    /// The salt is created on first use. A stored check value detects a wrong
    /// password before anything gets written under the wrong key.
    pub fn open(storage: P, password: &str, value_cipher: EncryptionAlgorithm) -> WalletResult<Self> {
        let salt = match storage.retrieve(PREFERENCES_SALT_ENTRY)? {
            Some(salt) => salt,
            None => {
                let mut salt = [0u8; SALT_SIZE];
                OsRng.fill_bytes(&mut salt);
                storage.store(PREFERENCES_SALT_ENTRY, &salt)?;
                log::info!("Created new preferences salt");
                salt.to_vec()
            }
        };
        let master_key = derive_master_key(password, &salt)?;
        let preferences = Self::with_master_key(storage, &master_key, value_cipher)?;
        preferences.verify_or_write_check()?;
        Ok(preferences)
    }

    /// Open with an already-derived master key
    pub fn with_master_key(storage: P, master_key: &[u8; KEY_SIZE], value_cipher: EncryptionAlgorithm) -> WalletResult<Self> {
        Ok(Self {
            storage,
            keys: PreferenceKeys::derive(master_key)?,
            key_cipher: EncryptionManager::new(EncryptionAlgorithm::AES256GCM),
            value_cipher: EncryptionManager::new(value_cipher),
        })
    }

    pub fn storage(&self) -> &P {
        &self.storage
    }

    fn verify_or_write_check(&self) -> WalletResult<()> {
        match self.storage.retrieve(PREFERENCES_CHECK_ENTRY)? {
            Some(bytes) => {
                let encrypted = EncryptedData::from_bytes(&bytes)?;
                let check = self
                    .value_cipher
                    .decrypt(&encrypted, &self.keys.value_encryption, PREFERENCES_CHECK_ENTRY.as_bytes())
                    .map_err(|_| WalletError::storage("Wrong keystore password or corrupted preferences"))?;
                if check != PREFERENCES_CHECK_VALUE {
                    return Err(WalletError::storage("Preferences check value mismatch"));
                }
                Ok(())
            }
            None => {
                let encrypted = self.value_cipher.encrypt(
                    PREFERENCES_CHECK_VALUE,
                    &self.keys.value_encryption,
                    PREFERENCES_CHECK_ENTRY.as_bytes(),
                )?;
                self.storage.store(PREFERENCES_CHECK_ENTRY, &encrypted.to_bytes())
            }
        }
    }

    fn synthetic_nonce(&self, name: &str) -> WalletResult<[u8; NONCE_SIZE]> {
        let mac = hmac_sha256(&*self.keys.key_siv, name.as_bytes())?;
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&mac[..NONCE_SIZE]);
        Ok(nonce)
    }

    /// Storage entry name for a plaintext key
    fn entry_name(&self, key: &str) -> WalletResult<String> {
        let nonce = self.synthetic_nonce(key)?;
        let encrypted = self
            .key_cipher
            .encrypt_with_nonce(key.as_bytes(), &self.keys.key_encryption, b"", nonce)?;
        let mut raw = nonce.to_vec();
        raw.extend_from_slice(&encrypted.ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(raw))
    }

    /// Plaintext key for a storage entry name
    fn key_from_entry_name(&self, entry: &str) -> WalletResult<String> {
        let raw = URL_SAFE_NO_PAD.decode(entry)?;
        if raw.len() < NONCE_SIZE {
            return Err(WalletError::storage(format!("Malformed preference entry: {}", entry)));
        }
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&raw[..NONCE_SIZE]);
        let encrypted = EncryptedData {
            algorithm: EncryptionAlgorithm::AES256GCM,
            nonce,
            ciphertext: raw[NONCE_SIZE..].to_vec(),
        };
        let plaintext = self.key_cipher.decrypt(&encrypted, &self.keys.key_encryption, b"")?;
        let key = String::from_utf8(plaintext)?;

        if self.synthetic_nonce(&key)? != nonce {
            return Err(WalletError::storage(format!("Preference entry failed SIV check: {}", entry)));
        }
        Ok(key)
    }
}

impl<P: PlatformStorage> CredentialStore for EncryptedPreferences<P> {
    fn get_string(&self, key: &str) -> WalletResult<Option<String>> {
        let entry = self.entry_name(key)?;
        let bytes = match self.storage.retrieve(&entry)? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let encrypted = EncryptedData::from_bytes(&bytes)?;
        let plaintext = Zeroizing::new(
            self.value_cipher
                .decrypt(&encrypted, &self.keys.value_encryption, key.as_bytes())?,
        );
        let value = std::str::from_utf8(&plaintext)
            .map_err(|e| WalletError::storage(format!("UTF-8 error: {}", e)))?
            .to_string();
        Ok(Some(value))
    }

    fn put_string_if_absent(&self, key: &str, value: &str) -> WalletResult<bool> {
        let entry = self.entry_name(key)?;
        if self.storage.exists(&entry)? {
            return Ok(false);
        }
        let encrypted = self
            .value_cipher
            .encrypt(value.as_bytes(), &self.keys.value_encryption, key.as_bytes())?;
        self.storage.store(&entry, &encrypted.to_bytes())?;
        Ok(true)
    }

    fn keys(&self) -> WalletResult<Vec<String>> {
        self.storage
            .list_keys()?
            .into_iter()
            .filter(|entry| entry != PREFERENCES_SALT_ENTRY && entry != PREFERENCES_CHECK_ENTRY)
            .map(|entry| self.key_from_entry_name(&entry))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::{FileStorage, MemoryStorage};

    const MASTER_KEY: [u8; KEY_SIZE] = [0x5c; KEY_SIZE];

    fn memory_preferences() -> EncryptedPreferences<MemoryStorage> {
        EncryptedPreferences::with_master_key(MemoryStorage::new(), &MASTER_KEY, EncryptionAlgorithm::AES256GCM)
            .expect("Failed to open preferences")
    }

    #[test]
    fn test_put_get() {
        let prefs = memory_preferences();
        assert_eq!(prefs.get_string("com.uniswap.mnemonic.0x1").expect("Failed to read"), None);

        assert!(prefs.put_string_if_absent("com.uniswap.mnemonic.0x1", "phrase one").expect("Failed to write"));
        assert_eq!(
            prefs.get_string("com.uniswap.mnemonic.0x1").expect("Failed to read"),
            Some("phrase one".to_string())
        );
    }

    #[test]
    fn test_put_never_overwrites() {
        let prefs = memory_preferences();
        assert!(prefs.put_string_if_absent("k", "first").expect("Failed to write"));
        assert!(!prefs.put_string_if_absent("k", "second").expect("Failed to write"));
        assert_eq!(prefs.get_string("k").expect("Failed to read"), Some("first".to_string()));
    }

    #[test]
    fn test_nothing_stored_in_plaintext() {
        let prefs = memory_preferences();
        prefs.put_string_if_absent("com.uniswap.privateKey.0xabc", "0xsecret").expect("Failed to write");

        for entry in prefs.storage().list_keys().expect("Failed to list") {
            assert!(!entry.contains("privateKey"));
            let raw = prefs.storage().retrieve(&entry).expect("Failed to read").expect("Entry exists");
            assert!(!String::from_utf8_lossy(&raw).contains("0xsecret"));
        }
    }

    #[test]
    fn test_keys_and_prefix_listing() {
        let prefs = memory_preferences();
        prefs.put_string_if_absent("com.uniswap.mnemonic.0xb", "m2").expect("Failed to write");
        prefs.put_string_if_absent("com.uniswap.mnemonic.0xa", "m1").expect("Failed to write");
        prefs.put_string_if_absent("com.uniswap.privateKey.0xc", "pk").expect("Failed to write");

        let mut keys = prefs.keys().expect("Failed to list keys");
        keys.sort();
        assert_eq!(keys.len(), 3);
        assert_eq!(
            prefs.keys_with_prefix("com.uniswap.mnemonic.").expect("Failed to list"),
            vec!["0xa".to_string(), "0xb".to_string()]
        );
        assert_eq!(
            prefs.keys_with_prefix("com.uniswap.privateKey.").expect("Failed to list"),
            vec!["0xc".to_string()]
        );
    }

    #[test]
    fn test_value_bound_to_its_key() {
        let prefs = memory_preferences();
        prefs.put_string_if_absent("a", "value-a").expect("Failed to write");
        prefs.put_string_if_absent("b", "value-b").expect("Failed to write");

        // Swap the ciphertexts of the two entries
        let entry_a = prefs.entry_name("a").expect("Failed to name entry");
        let entry_b = prefs.entry_name("b").expect("Failed to name entry");
        let raw_a = prefs.storage().retrieve(&entry_a).expect("Failed to read").expect("exists");
        let raw_b = prefs.storage().retrieve(&entry_b).expect("Failed to read").expect("exists");
        prefs.storage().store(&entry_a, &raw_b).expect("Failed to store");
        prefs.storage().store(&entry_b, &raw_a).expect("Failed to store");

        assert!(matches!(prefs.get_string("a"), Err(WalletError::Storage(_))));
    }

    #[test]
    fn test_chacha_values_readable_by_aes_configured_store() {
        let storage = MemoryStorage::new();
        let chacha = EncryptedPreferences::with_master_key(storage, &MASTER_KEY, EncryptionAlgorithm::ChaCha20Poly1305)
            .expect("Failed to open preferences");
        chacha.put_string_if_absent("k", "v").expect("Failed to write");

        let EncryptedPreferences { storage, .. } = chacha;
        let aes = EncryptedPreferences::with_master_key(storage, &MASTER_KEY, EncryptionAlgorithm::AES256GCM)
            .expect("Failed to reopen preferences");
        assert_eq!(aes.get_string("k").expect("Failed to read"), Some("v".to_string()));
    }

    #[test]
    fn test_open_with_password_persists_and_detects_wrong_password() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        {
            let storage = FileStorage::new(dir.path()).expect("Failed to create storage");
            let prefs = EncryptedPreferences::open(storage, "correct horse", EncryptionAlgorithm::AES256GCM)
                .expect("Failed to open preferences");
            prefs.put_string_if_absent("com.uniswap.mnemonic.0x1", "phrase").expect("Failed to write");
        }

        let storage = FileStorage::new(dir.path()).expect("Failed to create storage");
        let reopened = EncryptedPreferences::open(storage, "correct horse", EncryptionAlgorithm::AES256GCM)
            .expect("Failed to reopen preferences");
        assert_eq!(
            reopened.get_string("com.uniswap.mnemonic.0x1").expect("Failed to read"),
            Some("phrase".to_string())
        );
        assert_eq!(reopened.keys().expect("Failed to list"), vec!["com.uniswap.mnemonic.0x1".to_string()]);

        let storage = FileStorage::new(dir.path()).expect("Failed to create storage");
        let wrong = EncryptedPreferences::open(storage, "battery staple", EncryptionAlgorithm::AES256GCM);
        assert!(matches!(wrong, Err(WalletError::Storage(_))));
    }
}
