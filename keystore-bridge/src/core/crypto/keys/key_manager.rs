//! Key generation and derivation
//!
//! BIP39 mnemonics and BIP32 derivation on the Ethereum account path.

use super::{SecurePrivateKey, SecureSeedPhrase};
use crate::shared::constants::ETHEREUM_DERIVATION_PATH_PREFIX;
use crate::shared::error::WalletError;
use bip32::{DerivationPath, XPrv};
use secp256k1::Secp256k1;
use std::str::FromStr;

const HARDENED_FLAG: u32 = 1 << 31;

/// Key manager for derivation and address computation
pub struct KeyManager {
    secp256k1: Secp256k1<secp256k1::All>,
}

impl KeyManager {
    pub fn new() -> Self {
        Self {
            secp256k1: Secp256k1::new(),
        }
    }

    /// Ethereum derivation path for an account index: m/44'/60'/0'/0/{index}
    pub fn derivation_path(index: u32) -> Result<DerivationPath, WalletError> {
        if index >= HARDENED_FLAG {
            return Err(WalletError::validation(format!(
                "Derivation index {} out of range",
                index
            )));
        }
        Ok(DerivationPath::from_str(&format!("{}{}", ETHEREUM_DERIVATION_PATH_PREFIX, index))?)
    }

    /// Derive the private key at `index` from a seed phrase
    pub fn derive_private_key(&self, seed_phrase: &SecureSeedPhrase, index: u32) -> Result<SecurePrivateKey, WalletError> {
        let derivation_path = Self::derivation_path(index)?;
        let seed = seed_phrase.to_seed()?;

        let mut child_xprv = XPrv::new(seed.as_bytes())?;
        for child_number in derivation_path.into_iter() {
            child_xprv = child_xprv.derive_child(child_number)?;
        }

        let private_key_bytes = child_xprv.private_key().to_bytes();
        SecurePrivateKey::from_bytes(private_key_bytes.as_slice())
    }

    /// Ethereum address for a private key
    pub fn address(&self, private_key: &SecurePrivateKey) -> Result<String, WalletError> {
        private_key.address(&self.secp256k1)
    }
}

impl Default for KeyManager {
    fn default() -> Self {
        Self::new()
    }
}
