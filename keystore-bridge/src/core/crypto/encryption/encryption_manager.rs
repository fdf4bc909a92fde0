use super::{EncryptedData, EncryptionAlgorithm};
use crate::shared::constants::{KEY_SIZE, NONCE_SIZE};
use crate::shared::WalletResult;
use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use chacha20poly1305::{ChaCha20Poly1305, Key as ChaChaKey, Nonce as ChaChaNonce};
use rand_core::{OsRng, RngCore};

/// Authenticated encryption with associated data
pub struct EncryptionManager {
    algorithm: EncryptionAlgorithm,
}

impl EncryptionManager {
    pub fn new(algorithm: EncryptionAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Encrypt with a fresh random nonce
    pub fn encrypt(&self, data: &[u8], key: &[u8; KEY_SIZE], aad: &[u8]) -> WalletResult<EncryptedData> {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);
        self.encrypt_with_nonce(data, key, aad, nonce)
    }

    /// Encrypt with a caller-chosen nonce
    ///
    /// The nonce must be unique per (key, plaintext) pair; synthetic-IV callers
    /// derive it from the plaintext itself.
    pub fn encrypt_with_nonce(&self, data: &[u8], key: &[u8; KEY_SIZE], aad: &[u8], nonce: [u8; NONCE_SIZE]) -> WalletResult<EncryptedData> {
        let payload = Payload { msg: data, aad };
        let ciphertext = match self.algorithm {
            EncryptionAlgorithm::AES256GCM => {
                let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
                cipher.encrypt(Nonce::from_slice(&nonce), payload)?
            }
            EncryptionAlgorithm::ChaCha20Poly1305 => {
                let cipher = ChaCha20Poly1305::new(ChaChaKey::from_slice(key));
                cipher.encrypt(ChaChaNonce::from_slice(&nonce), payload)?
            }
        };

        Ok(EncryptedData {
            algorithm: self.algorithm,
            nonce,
            ciphertext,
        })
    }

    /// Decrypt using the algorithm recorded in the data, not the manager default
    pub fn decrypt(&self, encrypted_data: &EncryptedData, key: &[u8; KEY_SIZE], aad: &[u8]) -> WalletResult<Vec<u8>> {
        let payload = Payload {
            msg: encrypted_data.ciphertext.as_slice(),
            aad,
        };
        let plaintext = match encrypted_data.algorithm {
            EncryptionAlgorithm::AES256GCM => {
                let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
                cipher.decrypt(Nonce::from_slice(&encrypted_data.nonce), payload)?
            }
            EncryptionAlgorithm::ChaCha20Poly1305 => {
                let cipher = ChaCha20Poly1305::new(ChaChaKey::from_slice(key));
                cipher.decrypt(ChaChaNonce::from_slice(&encrypted_data.nonce), payload)?
            }
        };
        Ok(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::WalletError;

    const KEY: [u8; KEY_SIZE] = [0x01; KEY_SIZE];
    const WRONG_KEY: [u8; KEY_SIZE] = [0xfe; KEY_SIZE];

    #[test]
    fn test_encrypt_decrypt_data() {
        for algorithm in [EncryptionAlgorithm::AES256GCM, EncryptionAlgorithm::ChaCha20Poly1305] {
            let manager = EncryptionManager::new(algorithm);
            let data = b"Hello, World!";

            let encrypted = manager.encrypt(data, &KEY, b"aad")
                .expect("Failed to encrypt data");
            assert_ne!(data, encrypted.ciphertext.as_slice());

            let decrypted = manager.decrypt(&encrypted, &KEY, b"aad")
                .expect("Failed to decrypt data");
            assert_eq!(data, decrypted.as_slice());
        }
    }

    #[test]
    fn test_decrypt_with_wrong_key_or_aad() {
        let manager = EncryptionManager::new(EncryptionAlgorithm::AES256GCM);
        let encrypted = manager.encrypt(b"secret", &KEY, b"com.uniswap.mnemonic.0x1")
            .expect("Failed to encrypt data");

        assert!(matches!(manager.decrypt(&encrypted, &WRONG_KEY, b"com.uniswap.mnemonic.0x1"), Err(WalletError::Storage(_))));
        assert!(manager.decrypt(&encrypted, &KEY, b"com.uniswap.mnemonic.0x2").is_err());
    }

    #[test]
    fn test_fixed_nonce_is_deterministic() {
        let manager = EncryptionManager::new(EncryptionAlgorithm::AES256GCM);
        let a = manager.encrypt_with_nonce(b"name", &KEY, b"", [3u8; NONCE_SIZE]).expect("Failed to encrypt");
        let b = manager.encrypt_with_nonce(b"name", &KEY, b"", [3u8; NONCE_SIZE]).expect("Failed to encrypt");
        assert_eq!(a, b);
    }

    #[test]
    fn test_decrypt_honours_recorded_algorithm() {
        let chacha = EncryptionManager::new(EncryptionAlgorithm::ChaCha20Poly1305);
        let encrypted = chacha.encrypt(b"value", &KEY, b"").expect("Failed to encrypt");

        let aes = EncryptionManager::new(EncryptionAlgorithm::AES256GCM);
        assert_eq!(aes.decrypt(&encrypted, &KEY, b"").expect("Failed to decrypt"), b"value");
    }
}
