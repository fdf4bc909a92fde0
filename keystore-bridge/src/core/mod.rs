//! Core keystore functionality
//!
//! Key derivation and signing sit behind the backend boundary, the encrypted
//! credential store persists records, and the bridge ties the two together by
//! address.

pub mod wallet;
pub mod crypto;
pub mod storage;
pub mod backend;
pub mod bridge;

pub use backend::{DerivedPrivateKey, LocalSigningBackend, MnemonicAndAddress, SigningBackend};
pub use bridge::SigningBridge;
pub use storage::{CredentialStore, EncryptedPreferences};
pub use wallet::LocalWallet;
