//! Constants for the keystore bridge
//!
//! This module contains all constants used throughout the crate.

// Keychain namespacing
pub const DEFAULT_NAMESPACE: &str = "com.uniswap";
pub const MNEMONIC_PREFIX: &str = ".mnemonic.";
pub const PRIVATE_KEY_PREFIX: &str = ".privateKey.";

// Key derivation
pub const ETHEREUM_DERIVATION_PATH_PREFIX: &str = "m/44'/60'/0'/0/";
pub const MNEMONIC_ENTROPY_SIZE: usize = 16; // 12 words

// Security constants
pub const PRIVATE_KEY_SIZE: usize = 32;
pub const KEY_SIZE: usize = 32;
pub const NONCE_SIZE: usize = 12;
pub const SALT_SIZE: usize = 32;
pub const HASH_SIZE: usize = 32;
pub const ADDRESS_SIZE: usize = 20;

// Argon2id parameters for the preferences master key
pub const ARGON2_MEMORY_KIB: u32 = 65536;
pub const ARGON2_ITERATIONS: u32 = 3;
pub const ARGON2_PARALLELISM: u32 = 1;

// Signature recovery id offsets
pub const LEGACY_V_OFFSET: u64 = 27;
pub const EIP155_V_OFFSET: u64 = 35;

// Storage constants
pub const PREFERENCES_FILE_EXTENSION: &str = "pref";
pub const PREFERENCES_SALT_ENTRY: &str = "__keystore_master_salt__";
pub const PREFERENCES_CHECK_ENTRY: &str = "__keystore_key_check__";
pub const PREFERENCES_CHECK_VALUE: &[u8] = b"keystore-bridge/v1";
pub const STORAGE_DIR_NAME: &str = "keystore-bridge";
pub const PREFERENCES_DIR_NAME: &str = "preferences";

// HMAC labels for preference sub-keys
pub const KEY_ENCRYPTION_LABEL: &[u8] = b"keystore-bridge/key-encryption";
pub const KEY_SIV_LABEL: &[u8] = b"keystore-bridge/key-siv";
pub const VALUE_ENCRYPTION_LABEL: &[u8] = b"keystore-bridge/value-encryption";

// Environment variables
pub const ENV_NAMESPACE: &str = "KEYSTORE_NAMESPACE";
pub const ENV_STORAGE_DIR: &str = "KEYSTORE_STORAGE_DIR";
pub const ENV_PASSWORD: &str = "KEYSTORE_PASSWORD";
pub const ENV_VALUE_CIPHER: &str = "KEYSTORE_VALUE_CIPHER";

// FFI input limits
pub const MAX_MNEMONIC_LENGTH: usize = 512;
pub const MAX_MESSAGE_LENGTH: usize = 1024 * 64;
pub const MAX_HASH_LENGTH: usize = 66;

/// Full keychain key prefix for mnemonic records under a namespace
pub fn mnemonic_key_prefix(namespace: &str) -> String {
    format!("{}{}", namespace, MNEMONIC_PREFIX)
}

/// Full keychain key prefix for private-key records under a namespace
pub fn private_key_key_prefix(namespace: &str) -> String {
    format!("{}{}", namespace, PRIVATE_KEY_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_prefixes() {
        assert_eq!(mnemonic_key_prefix(DEFAULT_NAMESPACE), "com.uniswap.mnemonic.");
        assert_eq!(private_key_key_prefix(DEFAULT_NAMESPACE), "com.uniswap.privateKey.");
    }

    #[test]
    fn test_prefixes_do_not_overlap() {
        let mnemonic = mnemonic_key_prefix(DEFAULT_NAMESPACE);
        let private_key = private_key_key_prefix(DEFAULT_NAMESPACE);
        assert!(!mnemonic.starts_with(&private_key));
        assert!(!private_key.starts_with(&mnemonic));
    }
}
