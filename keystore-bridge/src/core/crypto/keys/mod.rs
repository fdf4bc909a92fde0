//! Key management for the keystore bridge
//!
//! Seed phrases, private keys and BIP32 derivation.

pub mod secure_private_key;
pub mod key_manager;
pub mod secure_seed_phrase;

// Re-export all public items from submodules
pub use secure_private_key::*;
pub use key_manager::*;
pub use secure_seed_phrase::*;
