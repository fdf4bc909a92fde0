use crate::shared::error::WalletError;
use std::fmt;
use std::str::FromStr;

/// Value encryption algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionAlgorithm {
    #[default]
    AES256GCM,
    ChaCha20Poly1305,
}

impl EncryptionAlgorithm {
    /// One-byte tag written ahead of every encrypted value
    pub fn tag(&self) -> u8 {
        match self {
            EncryptionAlgorithm::AES256GCM => 1,
            EncryptionAlgorithm::ChaCha20Poly1305 => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, WalletError> {
        match tag {
            1 => Ok(EncryptionAlgorithm::AES256GCM),
            2 => Ok(EncryptionAlgorithm::ChaCha20Poly1305),
            other => Err(WalletError::storage(format!("Unknown encryption algorithm tag {}", other))),
        }
    }
}

impl FromStr for EncryptionAlgorithm {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "aes256gcm" => Ok(EncryptionAlgorithm::AES256GCM),
            "chacha20poly1305" => Ok(EncryptionAlgorithm::ChaCha20Poly1305),
            other => Err(WalletError::config(format!("Unsupported value cipher: {}", other))),
        }
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptionAlgorithm::AES256GCM => write!(f, "aes256gcm"),
            EncryptionAlgorithm::ChaCha20Poly1305 => write!(f, "chacha20poly1305"),
        }
    }
}
