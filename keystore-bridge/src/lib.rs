//! Keystore Bridge
//!
//! Address-keyed keystore for Ethereum accounts.
//! Mnemonics and private keys are kept in an encrypted preference store keyed
//! by the address they derive, and signing requests are served by address.
//!
//! ## Architecture
//!
//! - **Core**: signing backend, wallet, crypto primitives, credential store, bridge
//! - **Infrastructure**: configuration and platform storage
//! - **Shared**: common types, constants, utilities and errors
//!
//! ## Usage
//!
//! ```no_run
//! use keystore_bridge::{open_bridge, BridgeConfig};
//!
//! # fn main() -> Result<(), keystore_bridge::WalletError> {
//! keystore_bridge::init();
//! let mut bridge = open_bridge(&BridgeConfig::from_env()?)?;
//!
//! let address = bridge.generate_and_store_mnemonic()?;
//! bridge.generate_and_store_private_key(&address, 0)?;
//! let signature = bridge.sign_message_for_address(&address, "hello")?;
//! # let _ = signature;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod shared;
pub mod infrastructure;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use crate::core::{
    CredentialStore, DerivedPrivateKey, EncryptedPreferences, LocalSigningBackend, LocalWallet,
    MnemonicAndAddress, SigningBackend, SigningBridge,
};
pub use crate::core::crypto::encryption::EncryptionAlgorithm;
pub use infrastructure::config::BridgeConfig;
pub use infrastructure::platform::{FileStorage, MemoryStorage, PlatformStorage};
pub use shared::error::WalletError;
pub use shared::types::{RecordKind, SignedTransaction, WalletResult};

/// Bridge over the on-disk encrypted preferences with the in-process backend
pub type LocalBridge = SigningBridge<LocalSigningBackend, EncryptedPreferences<FileStorage>>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Install the `env_logger` backend; later calls are no-ops
pub fn init() {
    if env_logger::try_init().is_ok() {
        log::debug!("{} {} logging initialized", NAME, VERSION);
    }
}

/// Open the on-disk store described by `config` and wrap it in a bridge
pub fn open_bridge(config: &BridgeConfig) -> WalletResult<LocalBridge> {
    config.validate()?;
    let storage = FileStorage::new(&config.storage_dir)?;
    let password = config.password()?;
    let store = EncryptedPreferences::open(storage, &password, config.value_cipher)?;
    log::info!(
        "Opened keystore at {} (namespace {})",
        config.storage_dir.display(),
        config.namespace
    );
    Ok(SigningBridge::new(LocalSigningBackend::new(), store, config.namespace.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert_eq!(NAME, "keystore-bridge");
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }

    #[test]
    fn test_open_bridge_on_disk() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = BridgeConfig {
            namespace: "com.uniswap".to_string(),
            storage_dir: dir.path().join("prefs"),
            value_cipher: EncryptionAlgorithm::ChaCha20Poly1305,
        };
        std::env::set_var(shared::constants::ENV_PASSWORD, "open-bridge-test");

        let address = {
            let mut bridge = open_bridge(&config).expect("Failed to open bridge");
            bridge
                .import_mnemonic("test test test test test test test test test test test junk")
                .expect("Failed to import mnemonic")
        };

        let bridge = open_bridge(&config).expect("Failed to reopen bridge");
        assert_eq!(bridge.mnemonic_ids().expect("Failed to list mnemonics"), vec![address]);
    }
}
