use crate::shared::types::SignedTransaction;
use ethers::types::{Signature, U256};

/// Recoverable secp256k1 signature in Ethereum `r, s, v` form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthereumSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u64,
}

impl EthereumSignature {
    pub fn to_ethers(&self) -> Signature {
        Signature {
            r: U256::from_big_endian(&self.r),
            s: U256::from_big_endian(&self.s),
            v: self.v,
        }
    }

    /// 65-byte `r || s || v` hex without prefix, as ethers renders it
    pub fn to_signature_string(&self) -> String {
        self.to_ethers().to_string()
    }

    pub fn into_signed_transaction(self) -> SignedTransaction {
        SignedTransaction {
            signature: self.to_signature_string(),
            r: format!("0x{}", hex::encode(self.r)),
            s: format!("0x{}", hex::encode(self.s)),
            v: self.v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_string_layout() {
        let signature = EthereumSignature {
            r: [0x11; 32],
            s: [0x22; 32],
            v: 27,
        };

        let rendered = signature.to_signature_string();
        assert_eq!(rendered.len(), 130);
        assert!(rendered.starts_with(&"11".repeat(32)));
        assert!(rendered.ends_with("1b"));
    }

    #[test]
    fn test_signed_transaction_keeps_full_v() {
        let signature = EthereumSignature {
            r: [0x01; 32],
            s: [0x02; 32],
            v: 2 * 137 + 35,
        };

        let signed = signature.into_signed_transaction();
        assert_eq!(signed.v, 309);
        assert!(signed.r.starts_with("0x01"));
        assert_eq!(signed.s.len(), 66);
    }
}
