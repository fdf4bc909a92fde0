//! Shared types for the keystore bridge

use crate::shared::constants::{mnemonic_key_prefix, private_key_key_prefix};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type used across the crate
pub type WalletResult<T> = Result<T, crate::shared::error::WalletError>;

/// Kind of credential record held in the keychain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Mnemonic,
    PrivateKey,
}

impl RecordKind {
    /// Full key prefix for this record kind under a namespace
    pub fn key_prefix(&self, namespace: &str) -> String {
        match self {
            RecordKind::Mnemonic => mnemonic_key_prefix(namespace),
            RecordKind::PrivateKey => private_key_key_prefix(namespace),
        }
    }

    /// Keychain key for a record identified by `id`
    pub fn keychain_key(&self, namespace: &str, id: &str) -> String {
        format!("{}{}", self.key_prefix(namespace), id)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Mnemonic => write!(f, "mnemonic"),
            RecordKind::PrivateKey => write!(f, "private key"),
        }
    }
}

/// Result of signing a transaction hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// 65-byte `r || s || v` hex, `v` truncated to one byte
    pub signature: String,
    pub r: String,
    pub s: String,
    /// Full EIP-155 recovery value
    pub v: u64,
}
