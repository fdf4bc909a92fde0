//! Environment configuration
//!
//! Settings come from the process environment, optionally seeded from a `.env`
//! file, with safe defaults for everything except the storage password.

use crate::core::crypto::encryption::EncryptionAlgorithm;
use crate::shared::constants::{
    DEFAULT_NAMESPACE, ENV_NAMESPACE, ENV_PASSWORD, ENV_STORAGE_DIR, ENV_VALUE_CIPHER,
    PREFERENCES_DIR_NAME, STORAGE_DIR_NAME,
};
use crate::shared::error::WalletError;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use zeroize::Zeroizing;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Root of the keychain key prefixes, e.g. `com.uniswap`
    pub namespace: String,
    /// Directory holding the encrypted preference entries
    pub storage_dir: PathBuf,
    /// Cipher for newly written values
    pub value_cipher: EncryptionAlgorithm,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            storage_dir: default_storage_dir(),
            value_cipher: EncryptionAlgorithm::default(),
        }
    }
}

impl BridgeConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self, WalletError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, WalletError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            namespace: non_empty(ENV_NAMESPACE).unwrap_or(defaults.namespace),
            storage_dir: non_empty(ENV_STORAGE_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            value_cipher: match non_empty(ENV_VALUE_CIPHER) {
                Some(name) => name.parse()?,
                None => defaults.value_cipher,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        if self.namespace.is_empty() {
            return Err(WalletError::config("Namespace must not be empty"));
        }
        if self.namespace.chars().any(char::is_whitespace) {
            return Err(WalletError::config(format!(
                "Namespace must not contain whitespace: {:?}",
                self.namespace
            )));
        }
        Ok(())
    }

    /// Storage password from the environment, or an interactive prompt
    pub fn password(&self) -> Result<Zeroizing<String>, WalletError> {
        if let Ok(pw) = env::var(ENV_PASSWORD) {
            return Ok(Zeroizing::new(pw));
        }
        rpassword::prompt_password("Enter password for keystore: ")
            .map(Zeroizing::new)
            .map_err(|e| WalletError::config(format!("Password prompt failed: {}", e)))
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("./secure_storage"))
        .join(STORAGE_DIR_NAME)
        .join(PREFERENCES_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::from_lookup(lookup_from(&[])).expect("Failed to load defaults");
        assert_eq!(config.namespace, "com.uniswap");
        assert_eq!(config.value_cipher, EncryptionAlgorithm::AES256GCM);
        assert!(config.storage_dir.ends_with("keystore-bridge/preferences"));
    }

    #[test]
    fn test_overrides() {
        let config = BridgeConfig::from_lookup(lookup_from(&[
            (ENV_NAMESPACE, "org.example"),
            (ENV_STORAGE_DIR, "/tmp/prefs"),
            (ENV_VALUE_CIPHER, "chacha20poly1305"),
        ]))
        .expect("Failed to load config");

        assert_eq!(config.namespace, "org.example");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/prefs"));
        assert_eq!(config.value_cipher, EncryptionAlgorithm::ChaCha20Poly1305);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = BridgeConfig::from_lookup(lookup_from(&[(ENV_NAMESPACE, "   ")]))
            .expect("Failed to load config");
        assert_eq!(config.namespace, "com.uniswap");
    }

    #[test]
    fn test_invalid_values() {
        let bad_cipher = BridgeConfig::from_lookup(lookup_from(&[(ENV_VALUE_CIPHER, "des")]));
        assert!(matches!(bad_cipher, Err(WalletError::Config(_))));

        let bad_namespace = BridgeConfig::from_lookup(lookup_from(&[(ENV_NAMESPACE, "com uniswap")]));
        assert!(matches!(bad_namespace, Err(WalletError::Config(_))));
    }
}
