//! Key-hash addresses.
//!
//! ```text
//! hash    = RIPEMD-160(SHA3-256(x || y))
//! payload = 0x5A || hash
//! address = base58(payload || SHA-256(SHA-256(payload))[..4])
//! ```
//!
//! The public key is hashed in its raw 64-byte form whatever encoding it
//! arrived in, so SEC1 keys map to the same address.

use crate::ports::AddressVerifier;
use ir_01_signature_verification::EcdsaPublicKey;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use sha3::Sha3_256;
use shared_types::Address;
use tracing::debug;

/// Version byte of user addresses (base58 prefix `d`).
const USER_ADDRESS_VERSION: u8 = 0x5A;
const CHECKSUM_LEN: usize = 4;

/// Address owned by `public_key`; `None` if the key is not a curve point.
pub fn derive_address(public_key: &[u8]) -> Option<Address> {
    let key = EcdsaPublicKey::from_slice(public_key).ok()?;
    let key_hash = Ripemd160::digest(Sha3_256::digest(key.to_raw_bytes()));

    let mut payload = Vec::with_capacity(1 + key_hash.len() + CHECKSUM_LEN);
    payload.push(USER_ADDRESS_VERSION);
    payload.extend_from_slice(&key_hash);
    let checksum = Sha256::digest(Sha256::digest(&payload));
    payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    Some(Address::new(bs58::encode(payload).into_string()))
}

/// Accepts an address only from the key it was derived from.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyHashAddressVerifier;

impl AddressVerifier for KeyHashAddressVerifier {
    fn owns(&self, address: &Address, public_key: &[u8]) -> bool {
        match derive_address(public_key) {
            Some(derived) => derived == *address,
            None => {
                debug!(%address, "public key does not parse");
                false
            }
        }
    }
}
