//! Signing backend boundary
//!
//! The bridge never touches key derivation or signature math directly. It goes
//! through a [`SigningBackend`], which owns those algorithms and hands back owned
//! resources. Resources that used to need an explicit free call release
//! themselves on drop, so they are wiped on every exit path.

use crate::core::crypto::keys::{KeyManager, SecurePrivateKey, SecureSeedPhrase};
use crate::core::wallet::LocalWallet;
use crate::shared::error::WalletError;
use crate::shared::types::SignedTransaction;
use zeroize::Zeroizing;

/// A freshly generated mnemonic and its index-0 address
pub struct MnemonicAndAddress {
    pub mnemonic: SecureSeedPhrase,
    pub address: String,
}

/// A private key derived from a mnemonic, with its address
pub struct DerivedPrivateKey {
    pub private_key: SecurePrivateKey,
    pub address: String,
}

impl DerivedPrivateKey {
    /// Keychain form of the key
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        self.private_key.to_hex()
    }
}

/// Key-management and signing operations the bridge delegates to
pub trait SigningBackend {
    /// Loaded, signing-ready wallet. Dropping it releases the key material.
    type Wallet;

    fn generate_mnemonic(&self) -> Result<MnemonicAndAddress, WalletError>;

    fn private_key_from_mnemonic(&self, mnemonic: &str, index: u32) -> Result<DerivedPrivateKey, WalletError>;

    fn wallet_from_private_key(&self, private_key: &str) -> Result<Self::Wallet, WalletError>;

    fn sign_tx_with_wallet(&self, wallet: &Self::Wallet, tx_hash: &str, chain_id: u64) -> Result<SignedTransaction, WalletError>;

    fn sign_message_with_wallet(&self, wallet: &Self::Wallet, message: &str) -> Result<String, WalletError>;

    fn sign_hash_with_wallet(&self, wallet: &Self::Wallet, hash: &str, chain_id: u64) -> Result<String, WalletError>;
}

/// In-process backend: BIP39, BIP32 on m/44'/60'/0'/0/i, secp256k1
pub struct LocalSigningBackend {
    key_manager: KeyManager,
}

impl LocalSigningBackend {
    pub fn new() -> Self {
        Self {
            key_manager: KeyManager::new(),
        }
    }
}

impl Default for LocalSigningBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SigningBackend for LocalSigningBackend {
    type Wallet = LocalWallet;

    fn generate_mnemonic(&self) -> Result<MnemonicAndAddress, WalletError> {
        let mnemonic = SecureSeedPhrase::generate()?;
        let private_key = self.key_manager.derive_private_key(&mnemonic, 0)?;
        let address = self.key_manager.address(&private_key)?;
        Ok(MnemonicAndAddress { mnemonic, address })
    }

    fn private_key_from_mnemonic(&self, mnemonic: &str, index: u32) -> Result<DerivedPrivateKey, WalletError> {
        let seed_phrase = SecureSeedPhrase::parse(mnemonic)?;
        let private_key = self.key_manager.derive_private_key(&seed_phrase, index)?;
        let address = self.key_manager.address(&private_key)?;
        Ok(DerivedPrivateKey { private_key, address })
    }

    fn wallet_from_private_key(&self, private_key: &str) -> Result<LocalWallet, WalletError> {
        LocalWallet::from_private_key_hex(private_key)
    }

    fn sign_tx_with_wallet(&self, wallet: &LocalWallet, tx_hash: &str, chain_id: u64) -> Result<SignedTransaction, WalletError> {
        wallet.sign_transaction_hash(tx_hash, chain_id)
    }

    fn sign_message_with_wallet(&self, wallet: &LocalWallet, message: &str) -> Result<String, WalletError> {
        wallet.sign_message(message)
    }

    fn sign_hash_with_wallet(&self, wallet: &LocalWallet, hash: &str, chain_id: u64) -> Result<String, WalletError> {
        wallet.sign_hash(hash, chain_id)
    }
}
