use crate::shared::constants::PRIVATE_KEY_SIZE;
use crate::shared::error::WalletError;
use crate::shared::utils::{address_from_public_key, strip_hex_prefix};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use zeroize::Zeroizing;

/// Secure private key wrapper
///
/// Key bytes live in zeroized memory and are only exposed through
/// [`SecurePrivateKey::with_secret_key`] or an explicit hex export.
pub struct SecurePrivateKey {
    bytes: Zeroizing<[u8; PRIVATE_KEY_SIZE]>,
}

impl SecurePrivateKey {
    /// Wrap raw key bytes, rejecting values outside the secp256k1 range
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(WalletError::crypto("Invalid private key length".to_string()));
        }

        let mut key = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
        key.copy_from_slice(bytes);

        SecretKey::from_byte_array(*key)?;

        Ok(Self { bytes: key })
    }

    /// Parse the stored hex form, `0x` prefix optional
    pub fn from_hex(value: &str) -> Result<Self, WalletError> {
        let clean = strip_hex_prefix(value.trim());
        if clean.len() != PRIVATE_KEY_SIZE * 2 {
            return Err(WalletError::crypto("Invalid private key length".to_string()));
        }
        let mut bytes = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
        hex::decode_to_slice(clean, &mut *bytes)
            .map_err(|_| WalletError::crypto("Invalid private key encoding".to_string()))?;
        Self::from_bytes(&*bytes)
    }

    /// `0x`-prefixed lowercase hex, the form written to the keychain
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("0x{}", hex::encode(&*self.bytes)))
    }

    /// Run an operation with the parsed secret key
    pub fn with_secret_key<F, T>(&self, f: F) -> Result<T, WalletError>
    where
        F: FnOnce(&SecretKey) -> Result<T, WalletError>,
    {
        let secret_key = SecretKey::from_byte_array(*self.bytes)?;
        f(&secret_key)
    }

    pub fn public_key<C: secp256k1::Signing>(&self, secp: &Secp256k1<C>) -> Result<PublicKey, WalletError> {
        self.with_secret_key(|secret_key| Ok(PublicKey::from_secret_key(secp, secret_key)))
    }

    /// Ethereum address for this key
    pub fn address<C: secp256k1::Signing>(&self, secp: &Secp256k1<C>) -> Result<String, WalletError> {
        Ok(address_from_public_key(&self.public_key(secp)?))
    }
}

// No Debug or Clone: key material must not be copied or logged by accident
