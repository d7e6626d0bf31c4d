//! Deterministic stand-in for the cipher engine.
//!
//! "Encryption" XORs with a fixed byte and appends a 16-byte tag computed over
//! associated data and ciphertext, which is enough to observe binding and
//! tampering without real keys.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use vault_core::crypto::{Crypto, CryptoError, NONCE_LEN_12, TAG_LEN};

const MASK: u8 = 0x5A;

#[derive(Debug, Default)]
pub struct FakeCrypto {
    counter: AtomicU64,
    pub segments_decrypted: AtomicU64,
}

impl FakeCrypto {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_nonce(&self) -> [u8; NONCE_LEN_12] {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let mut nonce = [0u8; NONCE_LEN_12];
        nonce[4..].copy_from_slice(&n.to_be_bytes());
        nonce
    }
}

fn tag(parts: &[&[u8]]) -> [u8; TAG_LEN] {
    // two FNV-1a lanes with different seeds
    let mut a: u64 = 0xcbf2_9ce4_8422_2325;
    let mut b: u64 = 0x8422_2325_cbf2_9ce4;
    for part in parts {
        for &x in part.iter().chain(&(part.len() as u64).to_be_bytes()) {
            a = (a ^ x as u64).wrapping_mul(0x0000_0100_0000_01b3);
            b = (b ^ x as u64).wrapping_mul(0x0000_0100_0000_01b3).rotate_left(7);
        }
    }
    let mut out = [0u8; TAG_LEN];
    out[..8].copy_from_slice(&a.to_be_bytes());
    out[8..].copy_from_slice(&b.to_be_bytes());
    out
}

fn seal(nonce: &[u8], ad: &[u8], cleartext: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = cleartext.iter().map(|b| b ^ MASK).collect();
    let t = tag(&[nonce, ad, &out]);
    out.extend_from_slice(&t);
    out
}

fn open(nonce: &[u8], ad: &[u8], wire: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if wire.len() < TAG_LEN {
        return Err(CryptoError::Truncated { have: wire.len(), need: TAG_LEN });
    }
    let (body, t) = wire.split_at(wire.len() - TAG_LEN);
    if tag(&[nonce, ad, body]) != t {
        return Err(CryptoError::TagMismatch);
    }
    Ok(body.iter().map(|b| b ^ MASK).collect())
}

impl Crypto for FakeCrypto {
    fn decrypt_stream(&self, input: &mut dyn Read, ad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut wire = Vec::new();
        input.read_to_end(&mut wire)?;
        open(&[], ad, &wire)
    }

    fn encrypt_stream(&self, output: &mut dyn Write, ad: &[u8], cleartext: &[u8]) -> Result<(), CryptoError> {
        output.write_all(&seal(&[], ad, cleartext))?;
        Ok(())
    }

    fn decrypt_segment(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.segments_decrypted.fetch_add(1, Ordering::SeqCst);
        open(nonce, &[], ciphertext)
    }

    fn encrypt_segment(&self, cleartext: &[u8]) -> Result<([u8; NONCE_LEN_12], Vec<u8>), CryptoError> {
        let nonce = self.next_nonce();
        Ok((nonce, seal(&nonce, &[], cleartext)))
    }

    fn get_random_bytes(&self, n: usize) -> Vec<u8> {
        (0..n).map(|i| i as u8).collect()
    }
}
