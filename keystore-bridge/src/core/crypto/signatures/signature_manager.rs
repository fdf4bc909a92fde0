use super::EthereumSignature;
use crate::core::crypto::keys::SecurePrivateKey;
use crate::shared::constants::{EIP155_V_OFFSET, HASH_SIZE, LEGACY_V_OFFSET};
use crate::shared::WalletResult;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1};

/// Digital signature manager
pub struct SignatureManager {
    secp: Secp256k1<secp256k1::All>,
}

impl SignatureManager {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }

    /// Sign a transaction hash with EIP-155 replay protection
    pub fn sign_transaction_hash(&self, private_key: &SecurePrivateKey, tx_hash: &[u8; HASH_SIZE], chain_id: u64) -> WalletResult<EthereumSignature> {
        self.sign_digest(private_key, tx_hash, |rec_id| Self::calculate_v_eip155(rec_id, chain_id))
    }

    /// Sign a raw 32-byte hash, `v` in the 27/28 form
    pub fn sign_hash(&self, private_key: &SecurePrivateKey, hash: &[u8; HASH_SIZE]) -> WalletResult<EthereumSignature> {
        self.sign_digest(private_key, hash, Self::calculate_v_legacy)
    }

    /// Sign an EIP-191 personal message
    pub fn sign_message(&self, private_key: &SecurePrivateKey, message: &[u8]) -> WalletResult<EthereumSignature> {
        let digest = ethers::utils::hash_message(message);
        self.sign_digest(private_key, &digest.0, Self::calculate_v_legacy)
    }

    fn sign_digest<F>(&self, private_key: &SecurePrivateKey, digest: &[u8; HASH_SIZE], v_for: F) -> WalletResult<EthereumSignature>
    where
        F: FnOnce(RecoveryId) -> u64,
    {
        let msg = Message::from_digest(*digest);
        let rec_sig: RecoverableSignature = private_key.with_secret_key(|secret_key| {
            Ok(self.secp.sign_ecdsa_recoverable(msg, secret_key))
        })?;

        let (rec_id, compact) = rec_sig.serialize_compact();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[0..32]);
        s.copy_from_slice(&compact[32..64]);

        Ok(EthereumSignature { r, s, v: v_for(rec_id) })
    }

    fn calculate_v_legacy(rec_id: RecoveryId) -> u64 {
        let rec_num: i32 = i32::from(rec_id);
        (rec_num as u64) + LEGACY_V_OFFSET
    }

    /// Calculate the v value for EIP-155 signatures
    fn calculate_v_eip155(rec_id: RecoveryId, chain_id: u64) -> u64 {
        let rec_num: i32 = i32::from(rec_id);
        (rec_num as u64) + EIP155_V_OFFSET + 2 * chain_id
    }
}

impl Default for SignatureManager {
    fn default() -> Self {
        Self::new()
    }
}
