//! FFI bindings for the signing backend
//!
//! C-compatible entry points for hosts that drive the backend directly.
//! Every result is owned by the caller and must go back through the matching
//! `*_free` function; free functions accept null and clear the pointers they
//! release. Errors surface as null pointers or a non-zero `error_code`
//! (see [`WalletError::code`]), and panics are caught before they reach the
//! boundary.

use crate::core::backend::{LocalSigningBackend, SigningBackend};
use crate::core::wallet::LocalWallet;
use crate::shared::constants::{MAX_HASH_LENGTH, MAX_MESSAGE_LENGTH, MAX_MNEMONIC_LENGTH};
use crate::shared::error::WalletError;
use lazy_static::lazy_static;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use zeroize::{Zeroize, Zeroizing};

lazy_static! {
    static ref BACKEND: LocalSigningBackend = LocalSigningBackend::new();
}

const SUCCESS: i32 = 0;

/// Mnemonic and its index-0 address
#[repr(C)]
pub struct CMnemonicAndAddress {
    pub mnemonic: *mut c_char,
    pub address: *mut c_char,
    pub error_code: i32,
}

/// Derived private key (0x-prefixed hex) and its address
#[repr(C)]
pub struct CPrivateKeyAndAddress {
    pub private_key: *mut c_char,
    pub address: *mut c_char,
    pub error_code: i32,
}

#[repr(C)]
pub struct CSignedTransaction {
    pub signature: *mut c_char,
    pub r: *mut c_char,
    pub s: *mut c_char,
    pub v: u64,
    pub error_code: i32,
}

/// Single owned string or an error code
#[repr(C)]
pub struct SecureResult {
    pub success: bool,
    pub data: *mut c_char,
    pub error_code: i32,
}

impl CMnemonicAndAddress {
    fn error(error_code: i32) -> Self {
        Self {
            mnemonic: ptr::null_mut(),
            address: ptr::null_mut(),
            error_code,
        }
    }
}

impl CPrivateKeyAndAddress {
    fn error(error_code: i32) -> Self {
        Self {
            private_key: ptr::null_mut(),
            address: ptr::null_mut(),
            error_code,
        }
    }
}

impl CSignedTransaction {
    fn error(error_code: i32) -> Self {
        Self {
            signature: ptr::null_mut(),
            r: ptr::null_mut(),
            s: ptr::null_mut(),
            v: 0,
            error_code,
        }
    }
}

impl SecureResult {
    fn from_result(result: Result<String, WalletError>) -> Self {
        match result.and_then(into_c_string) {
            Ok(data) => Self {
                success: true,
                data,
                error_code: SUCCESS,
            },
            Err(e) => Self::error(e.code()),
        }
    }

    fn error(error_code: i32) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error_code,
        }
    }
}

/// Read a caller string, enforcing a byte limit
fn read_input(input: *const c_char, max_length: usize) -> Result<Zeroizing<String>, WalletError> {
    if input.is_null() {
        return Err(WalletError::validation("Null input pointer"));
    }

    let input_str = unsafe { CStr::from_ptr(input) }
        .to_str()
        .map_err(|_| WalletError::validation("Invalid UTF-8 input"))?;

    if input_str.len() > max_length {
        return Err(WalletError::validation("Input too long"));
    }

    Ok(Zeroizing::new(input_str.to_string()))
}

fn into_c_string(value: impl Into<Vec<u8>>) -> Result<*mut c_char, WalletError> {
    CString::new(value)
        .map(CString::into_raw)
        .map_err(|_| WalletError::internal("String contains interior NUL"))
}

fn panic_code() -> i32 {
    WalletError::internal("Panic at FFI boundary").code()
}

fn guarded<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        log::error!("Panic caught at FFI boundary");
        on_panic
    })
}

/// Reclaim and wipe a string previously handed out by this module
fn release_string(slot: &mut *mut c_char) {
    if !slot.is_null() {
        let mut bytes = unsafe { CString::from_raw(*slot) }.into_bytes();
        bytes.zeroize();
        *slot = ptr::null_mut();
    }
}

fn wallet_ref<'a>(wallet: *const LocalWallet) -> Result<&'a LocalWallet, WalletError> {
    unsafe { wallet.as_ref() }.ok_or_else(|| WalletError::validation("Null wallet handle"))
}

/// Generate a 12-word mnemonic and its index-0 address
#[no_mangle]
pub extern "C" fn keystore_generate_mnemonic() -> CMnemonicAndAddress {
    guarded(CMnemonicAndAddress::error(panic_code()), || {
        let generated = match BACKEND.generate_mnemonic() {
            Ok(generated) => generated,
            Err(e) => return CMnemonicAndAddress::error(e.code()),
        };
        let mut mnemonic = match into_c_string(generated.mnemonic.as_str()) {
            Ok(ptr) => ptr,
            Err(e) => return CMnemonicAndAddress::error(e.code()),
        };
        match into_c_string(generated.address) {
            Ok(address) => CMnemonicAndAddress {
                mnemonic,
                address,
                error_code: SUCCESS,
            },
            Err(e) => {
                release_string(&mut mnemonic);
                CMnemonicAndAddress::error(e.code())
            }
        }
    })
}

#[no_mangle]
pub extern "C" fn keystore_mnemonic_free(result: *mut CMnemonicAndAddress) {
    if let Some(result) = unsafe { result.as_mut() } {
        release_string(&mut result.mnemonic);
        release_string(&mut result.address);
    }
}

/// Derive the private key at `m/44'/60'/0'/0/{index}`
#[no_mangle]
pub extern "C" fn keystore_private_key_from_mnemonic(
    mnemonic: *const c_char,
    index: u32,
) -> CPrivateKeyAndAddress {
    guarded(CPrivateKeyAndAddress::error(panic_code()), || {
        let derived = match read_input(mnemonic, MAX_MNEMONIC_LENGTH)
            .and_then(|mnemonic| BACKEND.private_key_from_mnemonic(&mnemonic, index))
        {
            Ok(derived) => derived,
            Err(e) => return CPrivateKeyAndAddress::error(e.code()),
        };
        let mut private_key = match into_c_string(derived.private_key_hex().as_str()) {
            Ok(ptr) => ptr,
            Err(e) => return CPrivateKeyAndAddress::error(e.code()),
        };
        match into_c_string(derived.address.as_str()) {
            Ok(address) => CPrivateKeyAndAddress {
                private_key,
                address,
                error_code: SUCCESS,
            },
            Err(e) => {
                release_string(&mut private_key);
                CPrivateKeyAndAddress::error(e.code())
            }
        }
    })
}

#[no_mangle]
pub extern "C" fn keystore_private_key_free(result: *mut CPrivateKeyAndAddress) {
    if let Some(result) = unsafe { result.as_mut() } {
        release_string(&mut result.private_key);
        release_string(&mut result.address);
    }
}

/// Load a wallet from a hex private key; null on failure
#[no_mangle]
pub extern "C" fn keystore_wallet_from_private_key(private_key: *const c_char) -> *mut LocalWallet {
    guarded(ptr::null_mut(), || {
        match read_input(private_key, MAX_HASH_LENGTH)
            .and_then(|private_key| BACKEND.wallet_from_private_key(&private_key))
        {
            Ok(wallet) => Box::into_raw(Box::new(wallet)),
            Err(e) => {
                log::warn!("Wallet construction failed: {}", e);
                ptr::null_mut()
            }
        }
    })
}

#[no_mangle]
pub extern "C" fn keystore_wallet_free(wallet: *mut LocalWallet) {
    if !wallet.is_null() {
        drop(unsafe { Box::from_raw(wallet) });
    }
}

#[no_mangle]
pub extern "C" fn keystore_sign_tx_with_wallet(
    wallet: *const LocalWallet,
    tx_hash: *const c_char,
    chain_id: u64,
) -> CSignedTransaction {
    guarded(CSignedTransaction::error(panic_code()), || {
        let signed = match wallet_ref(wallet).and_then(|wallet| {
            let tx_hash = read_input(tx_hash, MAX_HASH_LENGTH)?;
            BACKEND.sign_tx_with_wallet(wallet, &tx_hash, chain_id)
        }) {
            Ok(signed) => signed,
            Err(e) => return CSignedTransaction::error(e.code()),
        };

        let mut out = CSignedTransaction::error(SUCCESS);
        out.v = signed.v;
        let filled = into_c_string(signed.signature)
            .map(|ptr| out.signature = ptr)
            .and_then(|_| into_c_string(signed.r).map(|ptr| out.r = ptr))
            .and_then(|_| into_c_string(signed.s).map(|ptr| out.s = ptr));
        if let Err(e) = filled {
            keystore_signed_transaction_free(&mut out);
            return CSignedTransaction::error(e.code());
        }
        out
    })
}

/// Transaction signature as a JSON object `{signature, r, s, v}`
#[no_mangle]
pub extern "C" fn keystore_sign_tx_with_wallet_json(
    wallet: *const LocalWallet,
    tx_hash: *const c_char,
    chain_id: u64,
) -> SecureResult {
    guarded(SecureResult::error(panic_code()), || {
        SecureResult::from_result(wallet_ref(wallet).and_then(|wallet| {
            let tx_hash = read_input(tx_hash, MAX_HASH_LENGTH)?;
            let signed = BACKEND.sign_tx_with_wallet(wallet, &tx_hash, chain_id)?;
            Ok(serde_json::to_string(&signed)?)
        }))
    })
}

#[no_mangle]
pub extern "C" fn keystore_signed_transaction_free(result: *mut CSignedTransaction) {
    if let Some(result) = unsafe { result.as_mut() } {
        release_string(&mut result.signature);
        release_string(&mut result.r);
        release_string(&mut result.s);
    }
}

/// EIP-191 personal message signature
#[no_mangle]
pub extern "C" fn keystore_sign_message_with_wallet(
    wallet: *const LocalWallet,
    message: *const c_char,
) -> SecureResult {
    guarded(SecureResult::error(panic_code()), || {
        SecureResult::from_result(wallet_ref(wallet).and_then(|wallet| {
            let message = read_input(message, MAX_MESSAGE_LENGTH)?;
            BACKEND.sign_message_with_wallet(wallet, &message)
        }))
    })
}

/// Raw 32-byte hash signature
#[no_mangle]
pub extern "C" fn keystore_sign_hash_with_wallet(
    wallet: *const LocalWallet,
    hash: *const c_char,
    chain_id: u64,
) -> SecureResult {
    guarded(SecureResult::error(panic_code()), || {
        SecureResult::from_result(wallet_ref(wallet).and_then(|wallet| {
            let hash = read_input(hash, MAX_HASH_LENGTH)?;
            BACKEND.sign_hash_with_wallet(wallet, &hash, chain_id)
        }))
    })
}

/// Free a string returned in a [`SecureResult`]
#[no_mangle]
pub extern "C" fn keystore_string_free(ptr: *mut c_char) {
    let mut ptr = ptr;
    release_string(&mut ptr);
}
