use crate::shared::constants::MNEMONIC_ENTROPY_SIZE;
use crate::shared::error::WalletError;
use bip39::{Language, Mnemonic};
use rand_core::{OsRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

/// Secure seed phrase wrapper
///
/// Holds a validated BIP39 English mnemonic in canonical form (lowercase words
/// separated by single spaces). The phrase is wiped when dropped.
pub struct SecureSeedPhrase {
    phrase: String,
}

impl SecureSeedPhrase {
    /// Parse and validate a user-supplied phrase
    pub fn parse(phrase: &str) -> Result<Self, WalletError> {
        let canonical = Zeroizing::new(
            phrase
                .split_whitespace()
                .map(|word| word.to_lowercase())
                .collect::<Vec<_>>()
                .join(" "),
        );
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, &canonical)?;
        Ok(Self {
            phrase: mnemonic.to_string(),
        })
    }

    /// Generate a fresh 12-word phrase from the OS RNG
    pub fn generate() -> Result<Self, WalletError> {
        let mut entropy = Zeroizing::new([0u8; MNEMONIC_ENTROPY_SIZE]);
        OsRng.fill_bytes(&mut *entropy);
        let mnemonic = Mnemonic::from_entropy_in(Language::English, &*entropy)?;
        Ok(Self {
            phrase: mnemonic.to_string(),
        })
    }

    /// Get the seed phrase as a &str
    pub fn as_str(&self) -> &str {
        &self.phrase
    }

    pub fn word_count(&self) -> usize {
        self.phrase.split_whitespace().count()
    }

    /// BIP39 seed with an empty passphrase
    pub fn to_seed(&self) -> Result<bip32::Seed, WalletError> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, &self.phrase)?;
        Ok(bip32::Seed::new(mnemonic.to_seed_normalized("")))
    }
}

impl Drop for SecureSeedPhrase {
    fn drop(&mut self) {
        self.phrase.zeroize();
    }
}
