//! Error handling for the keystore bridge
//!
//! This module defines the error types used throughout the crate.

use thiserror::Error;

/// Keystore error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("No mnemonic stored for id: {0}")]
    MnemonicNotFound(String),

    #[error("No private key stored for address: {0}")]
    PrivateKeyNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a cryptographic error
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn mnemonic_not_found(mnemonic_id: impl Into<String>) -> Self {
        Self::MnemonicNotFound(mnemonic_id.into())
    }

    pub fn private_key_not_found(address: impl Into<String>) -> Self {
        Self::PrivateKeyNotFound(address.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True when the requested credential was never stored
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MnemonicNotFound(_) | Self::PrivateKeyNotFound(_))
    }

    /// Stable numeric code handed across the C boundary
    pub fn code(&self) -> i32 {
        match self {
            Self::Config(_) => 1,
            Self::Crypto(_) => 2,
            Self::Validation(_) => 3,
            Self::Storage(_) => 4,
            Self::MnemonicNotFound(_) => 5,
            Self::PrivateKeyNotFound(_) => 6,
            Self::Internal(_) => 7,
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for WalletError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("IO error: {}", err))
    }
}

impl From<hex::FromHexError> for WalletError {
    fn from(err: hex::FromHexError) -> Self {
        Self::validation(format!("Hex decoding error: {}", err))
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

impl From<base64::DecodeError> for WalletError {
    fn from(err: base64::DecodeError) -> Self {
        Self::storage(format!("Base64 decoding error: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for WalletError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::storage(format!("UTF-8 error: {}", err))
    }
}

// Cryptographic error conversions
impl From<secp256k1::Error> for WalletError {
    fn from(err: secp256k1::Error) -> Self {
        Self::crypto(format!("Secp256k1 error: {}", err))
    }
}

impl From<bip39::Error> for WalletError {
    fn from(err: bip39::Error) -> Self {
        Self::validation(format!("Invalid BIP39 mnemonic: {}", err))
    }
}

impl From<bip32::Error> for WalletError {
    fn from(err: bip32::Error) -> Self {
        Self::crypto(format!("BIP32 derivation error: {}", err))
    }
}

impl From<argon2::Error> for WalletError {
    fn from(err: argon2::Error) -> Self {
        Self::crypto(format!("Argon2 error: {}", err))
    }
}

// Encryption error conversions
impl From<aes_gcm::Error> for WalletError {
    fn from(err: aes_gcm::Error) -> Self {
        Self::storage(format!("Authenticated decryption failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_error_creation() {
        let config_error = WalletError::config("Invalid configuration");
        let crypto_error = WalletError::crypto("Signing failed");
        let missing = WalletError::private_key_not_found("0xabc");

        assert!(matches!(config_error, WalletError::Config(_)));
        assert!(matches!(crypto_error, WalletError::Crypto(_)));
        assert!(missing.is_missing_credential());
        assert!(!crypto_error.is_missing_credential());
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let wallet_error: WalletError = io_error.into();

        assert!(matches!(wallet_error, WalletError::Storage(_)));

        let hex_error: WalletError = hex::decode("zz").unwrap_err().into();
        assert!(matches!(hex_error, WalletError::Validation(_)));

        let secp_error: WalletError = secp256k1::SecretKey::from_byte_array([0u8; 32]).unwrap_err().into();
        assert!(matches!(secp_error, WalletError::Crypto(_)));

        let bip32_error: WalletError = "m/not/a/path".parse::<bip32::DerivationPath>().unwrap_err().into();
        assert!(matches!(bip32_error, WalletError::Crypto(_)));

        let json_error: WalletError = serde_json::from_str::<u8>("{").unwrap_err().into();
        assert!(matches!(json_error, WalletError::Internal(_)));
    }

    #[test]
    fn test_error_display() {
        let error = WalletError::mnemonic_not_found("0x1234");
        let display = format!("{}", error);

        assert!(display.contains("No mnemonic stored"));
        assert!(display.contains("0x1234"));
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            WalletError::config(""),
            WalletError::crypto(""),
            WalletError::validation(""),
            WalletError::storage(""),
            WalletError::mnemonic_not_found(""),
            WalletError::private_key_not_found(""),
            WalletError::internal(""),
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|c| *c != 0));
    }
}
