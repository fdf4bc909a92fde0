//! Digital signature functionality for the keystore bridge
//!
//! This module handles recoverable ECDSA signatures for transactions, hashes and messages.

pub mod signature_manager;
pub mod transaction_signature;

// Re-export all public items from submodules
pub use signature_manager::*;
pub use transaction_signature::*;
