//! Loaded wallet handles
//!
//! A [`LocalWallet`] is a private key that has been parsed and is ready to sign.
//! It owns its key material; dropping it wipes the key.

use crate::core::crypto::keys::SecurePrivateKey;
use crate::core::crypto::signatures::SignatureManager;
use crate::shared::error::WalletError;
use crate::shared::types::SignedTransaction;
use crate::shared::utils::parse_hash32;
use secp256k1::Secp256k1;

/// A private key loaded for signing
pub struct LocalWallet {
    private_key: SecurePrivateKey,
    address: String,
    signer: SignatureManager,
}

impl LocalWallet {
    pub fn new(private_key: SecurePrivateKey) -> Result<Self, WalletError> {
        let address = private_key.address(&Secp256k1::signing_only())?;
        Ok(Self {
            private_key,
            address,
            signer: SignatureManager::new(),
        })
    }

    /// Load from the keychain's hex form
    pub fn from_private_key_hex(private_key: &str) -> Result<Self, WalletError> {
        Self::new(SecurePrivateKey::from_hex(private_key)?)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Sign a transaction hash with EIP-155 `v` for `chain_id`
    pub fn sign_transaction_hash(&self, tx_hash: &str, chain_id: u64) -> Result<SignedTransaction, WalletError> {
        let hash = parse_hash32(tx_hash)?;
        let signature = self.signer.sign_transaction_hash(&self.private_key, &hash, chain_id)?;
        Ok(signature.into_signed_transaction())
    }

    /// EIP-191 personal-message signature
    pub fn sign_message(&self, message: &str) -> Result<String, WalletError> {
        let signature = self.signer.sign_message(&self.private_key, message.as_bytes())?;
        Ok(signature.to_signature_string())
    }

    /// Signature over a raw 32-byte hash
    ///
    /// The chain id scopes the request but does not alter `v`; raw hashes are
    /// signed in the 27/28 form.
    pub fn sign_hash(&self, hash: &str, chain_id: u64) -> Result<String, WalletError> {
        let digest = parse_hash32(hash)?;
        log::debug!("Signing raw hash for {} on chain {}", self.address, chain_id);
        let signature = self.signer.sign_hash(&self.private_key, &digest)?;
        Ok(signature.to_signature_string())
    }
}
