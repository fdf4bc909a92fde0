//! Utility functions for the keystore bridge
//!
//! Hex handling, Keccak hashing and Ethereum address helpers.

use crate::shared::constants::{ADDRESS_SIZE, HASH_SIZE};
use crate::shared::error::WalletError;
use secp256k1::PublicKey;
use sha3::{Digest, Keccak256};

/// Keccak256 hash function
pub fn keccak256(data: &[u8]) -> [u8; HASH_SIZE] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Strip an optional `0x` / `0X` prefix
pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Parse a 32-byte hash given as hex, with or without `0x`
pub fn parse_hash32(value: &str) -> Result<[u8; HASH_SIZE], WalletError> {
    let clean = strip_hex_prefix(value.trim());
    if clean.len() != HASH_SIZE * 2 {
        return Err(WalletError::validation(format!(
            "Hash must be {} hex characters, got {}",
            HASH_SIZE * 2,
            clean.len()
        )));
    }
    let mut out = [0u8; HASH_SIZE];
    hex::decode_to_slice(clean, &mut out)?;
    Ok(out)
}

/// Ethereum address of a secp256k1 public key, `0x` + lowercase hex
pub fn address_from_public_key(public_key: &PublicKey) -> String {
    // Drop the 0x04 uncompressed tag before hashing
    let serialized = public_key.serialize_uncompressed();
    let hash = keccak256(&serialized[1..]);
    format!("0x{}", hex::encode(&hash[HASH_SIZE - ADDRESS_SIZE..]))
}

/// Validate Ethereum address format
pub fn validate_ethereum_address(address: &str) -> Result<(), WalletError> {
    if !address.starts_with("0x") {
        return Err(WalletError::validation("Address must start with 0x"));
    }

    if address.len() != 2 + ADDRESS_SIZE * 2 {
        return Err(WalletError::validation("Address must be 42 characters long"));
    }

    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::validation("Address contains invalid hex characters"));
    }

    Ok(())
}

/// Canonical form used for keychain keys: validated and lowercased
pub fn normalize_address(address: &str) -> Result<String, WalletError> {
    let trimmed = address.trim();
    let lowered = format!("0x{}", strip_hex_prefix(trimmed).to_ascii_lowercase());
    validate_ethereum_address(&lowered)?;
    Ok(lowered)
}
