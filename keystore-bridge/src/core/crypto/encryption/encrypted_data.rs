use super::EncryptionAlgorithm;
use crate::shared::constants::NONCE_SIZE;
use crate::shared::error::WalletError;

/// Encrypted data structure
///
/// Serialized as `algorithm tag (1) || nonce (12) || ciphertext with tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedData {
    pub algorithm: EncryptionAlgorithm,
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + NONCE_SIZE + self.ciphertext.len());
        out.push(self.algorithm.tag());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        if bytes.len() < 1 + NONCE_SIZE {
            return Err(WalletError::storage("Encrypted entry is truncated"));
        }
        let algorithm = EncryptionAlgorithm::from_tag(bytes[0])?;
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[1..1 + NONCE_SIZE]);
        Ok(Self {
            algorithm,
            nonce,
            ciphertext: bytes[1 + NONCE_SIZE..].to_vec(),
        })
    }
}
