//! crypto/nonce.rs
//! Random nonce generation.
//!
//! Every message gets a fresh random 12-byte nonce that travels with the
//! ciphertext. Uniqueness per key rests on the randomness source.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::types::NONCE_LEN_12;

/// Fill `n` bytes from the operating system RNG.
#[inline]
pub fn random_bytes(n: usize) -> Vec<u8> {
    let mut out = vec![0u8; n];
    OsRng.fill_bytes(&mut out);
    out
}

/// Fresh 12-byte AEAD nonce.
#[inline]
pub fn random_nonce_12() -> [u8; NONCE_LEN_12] {
    let mut nonce = [0u8; NONCE_LEN_12];
    OsRng.fill_bytes(&mut nonce);
    nonce
}
