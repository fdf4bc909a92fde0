//! Address-keyed keystore and signing bridge
//!
//! Mnemonics and private keys live in a [`CredentialStore`], keyed by the
//! address they derive. Signing requests name an address; the bridge loads the
//! stored key into a backend wallet once and keeps it for the process lifetime.
//!
//! The store is the source of truth. The wallet cache only saves repeated key
//! parsing and is never consulted for anything but signing.

use crate::core::backend::SigningBackend;
use crate::core::crypto::keys::SecureSeedPhrase;
use crate::core::storage::CredentialStore;
use crate::shared::error::WalletError;
use crate::shared::types::{RecordKind, SignedTransaction};
use crate::shared::utils::normalize_address;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use zeroize::Zeroizing;

pub struct SigningBridge<B: SigningBackend, S: CredentialStore> {
    backend: B,
    store: S,
    namespace: String,
    wallet_cache: HashMap<String, B::Wallet>,
}

impl<B: SigningBackend, S: CredentialStore> SigningBridge<B, S> {
    pub fn new(backend: B, store: S, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            store,
            namespace: namespace.into(),
            wallet_cache: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Import a mnemonic and return its index-0 address
    ///
    /// The address is returned whether or not a new record was written.
    pub fn import_mnemonic(&mut self, mnemonic: &str) -> Result<String, WalletError> {
        let derived = self.backend.private_key_from_mnemonic(mnemonic, 0)?;
        self.store_new_mnemonic(mnemonic, &derived.address)
    }

    /// Generate a new mnemonic, store it, and return its address
    pub fn generate_and_store_mnemonic(&mut self) -> Result<String, WalletError> {
        let generated = self.backend.generate_mnemonic()?;
        let address = self.store_new_mnemonic(generated.mnemonic.as_str(), &generated.address)?;
        log::info!("Generated new mnemonic {}", address);
        Ok(address)
    }

    /// Address at `derivation_index` for a mnemonic, without storing anything
    pub fn generate_address_for_mnemonic(&self, mnemonic: &str, derivation_index: u32) -> Result<String, WalletError> {
        let derived = self.backend.private_key_from_mnemonic(mnemonic, derivation_index)?;
        Ok(derived.address.clone())
    }

    /// Derive the key at `derivation_index` from a stored mnemonic and store it
    ///
    /// `mnemonic_id` is the mnemonic's address; any casing is accepted.
    pub fn generate_and_store_private_key(&mut self, mnemonic_id: &str, derivation_index: u32) -> Result<String, WalletError> {
        let mnemonic_id = normalize_address(mnemonic_id)?;
        let mnemonic = self
            .retrieve_mnemonic(&mnemonic_id)?
            .map(Zeroizing::new)
            .ok_or_else(|| WalletError::mnemonic_not_found(mnemonic_id.clone()))?;
        let derived = self.backend.private_key_from_mnemonic(&mnemonic, derivation_index)?;

        let key = RecordKind::PrivateKey.keychain_key(&self.namespace, &derived.address);
        if self.store.put_string_if_absent(&key, &derived.private_key_hex())? {
            log::info!("Stored private key for {} (index {})", derived.address, derivation_index);
        } else {
            log::debug!("Private key for {} already stored", derived.address);
        }
        Ok(derived.address.clone())
    }

    pub fn sign_transaction_for_address(&mut self, address: &str, tx_hash: &str, chain_id: u64) -> Result<SignedTransaction, WalletError> {
        let wallet = Self::cached_wallet(&self.backend, &self.store, &self.namespace, &mut self.wallet_cache, address)?;
        self.backend.sign_tx_with_wallet(wallet, tx_hash, chain_id)
    }

    pub fn sign_message_for_address(&mut self, address: &str, message: &str) -> Result<String, WalletError> {
        let wallet = Self::cached_wallet(&self.backend, &self.store, &self.namespace, &mut self.wallet_cache, address)?;
        self.backend.sign_message_with_wallet(wallet, message)
    }

    pub fn sign_hash_for_address(&mut self, address: &str, hash: &str, chain_id: u64) -> Result<String, WalletError> {
        let wallet = Self::cached_wallet(&self.backend, &self.store, &self.namespace, &mut self.wallet_cache, address)?;
        self.backend.sign_hash_with_wallet(wallet, hash, chain_id)
    }

    /// Cached wallet for `address`, loading it from the stored private key on a miss
    ///
    /// Fails with [`WalletError::PrivateKeyNotFound`] when no key was stored; the
    /// cache is left untouched on any failure.
    pub fn retrieve_or_create_wallet_for_address(&mut self, address: &str) -> Result<&B::Wallet, WalletError> {
        Self::cached_wallet(&self.backend, &self.store, &self.namespace, &mut self.wallet_cache, address)
    }

    // Takes fields separately so callers can keep using the backend while
    // holding the returned wallet.
    fn cached_wallet<'a>(
        backend: &B,
        store: &S,
        namespace: &str,
        cache: &'a mut HashMap<String, B::Wallet>,
        address: &str,
    ) -> Result<&'a B::Wallet, WalletError> {
        let address = normalize_address(address)?;
        match cache.entry(address) {
            Entry::Occupied(entry) => {
                log::debug!("Wallet cache hit for {}", entry.key());
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                log::debug!("Wallet cache miss for {}", entry.key());
                let key = RecordKind::PrivateKey.keychain_key(namespace, entry.key());
                let private_key = store
                    .get_string(&key)?
                    .map(Zeroizing::new)
                    .ok_or_else(|| WalletError::private_key_not_found(entry.key().clone()))?;
                let wallet = backend.wallet_from_private_key(&private_key)?;
                Ok(entry.insert(wallet))
            }
        }
    }

    /// Stored mnemonic phrase for a mnemonic id (its address, any casing)
    pub fn retrieve_mnemonic(&self, mnemonic_id: &str) -> Result<Option<String>, WalletError> {
        let key = RecordKind::Mnemonic.keychain_key(&self.namespace, &normalize_address(mnemonic_id)?);
        self.store.get_string(&key)
    }

    /// Ids of all stored mnemonics
    pub fn mnemonic_ids(&self) -> Result<Vec<String>, WalletError> {
        self.store.keys_with_prefix(&RecordKind::Mnemonic.key_prefix(&self.namespace))
    }

    /// Addresses that have a stored private key
    pub fn addresses_for_stored_private_keys(&self) -> Result<Vec<String>, WalletError> {
        self.store.keys_with_prefix(&RecordKind::PrivateKey.key_prefix(&self.namespace))
    }

    /// Release one cached wallet; returns whether one was cached
    pub fn evict_wallet(&mut self, address: &str) -> bool {
        match normalize_address(address) {
            Ok(address) => self.wallet_cache.remove(&address).is_some(),
            Err(_) => false,
        }
    }

    /// Release every cached wallet
    pub fn clear_wallet_cache(&mut self) {
        let released = self.wallet_cache.len();
        self.wallet_cache.clear();
        if released > 0 {
            log::debug!("Released {} cached wallets", released);
        }
    }

    pub fn cached_wallet_count(&self) -> usize {
        self.wallet_cache.len()
    }

    /// Write-once store of a mnemonic under its address
    ///
    /// A different phrase can only map to an existing address through a
    /// derivation collision; the first record wins and the event is logged.
    fn store_new_mnemonic(&self, mnemonic: &str, address: &str) -> Result<String, WalletError> {
        let key = RecordKind::Mnemonic.keychain_key(&self.namespace, address);
        if self.store.put_string_if_absent(&key, mnemonic)? {
            log::info!("Stored mnemonic {}", address);
            return Ok(address.to_string());
        }

        let existing = self.store.get_string(&key)?.map(Zeroizing::new);
        let same_phrase = existing.as_deref().is_some_and(|stored| is_same_phrase(stored, mnemonic));
        if same_phrase {
            log::debug!("Mnemonic {} already stored", address);
        } else {
            log::warn!("Mnemonic for {} differs from the stored record; keeping the stored one", address);
        }
        Ok(address.to_string())
    }
}

/// Phrases match when their canonical BIP39 forms match
fn is_same_phrase(stored: &str, incoming: &str) -> bool {
    match (SecureSeedPhrase::parse(stored), SecureSeedPhrase::parse(incoming)) {
        (Ok(stored), Ok(incoming)) => stored.as_str() == incoming.as_str(),
        _ => false,
    }
}

impl<B: SigningBackend, S: CredentialStore> Drop for SigningBridge<B, S> {
    fn drop(&mut self) {
        self.clear_wallet_cache();
    }
}
