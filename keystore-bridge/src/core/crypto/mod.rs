//! Cryptographic functionality for the keystore bridge
//!
//! This module provides encryption, key management, and digital signatures.
//!
//! SECURITY: secret material is held in zeroizing wrappers and never logged.

pub mod keys;
pub mod signatures;
pub mod encryption;

// Re-export all public items from submodules
pub use keys::*;
pub use signatures::*;
pub use encryption::*;
