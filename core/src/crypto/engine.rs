//! crypto/engine.rs
//! The crypto capability the stream codec is built on, plus the bundled engine.
//!
//! The codec never reaches for a global engine: callers hand one in, which is
//! also how tests swap in a deterministic fake.

use std::io::{Read, Write};
use std::sync::Arc;

use crate::crypto::aead::AeadImpl;
use crate::crypto::nonce::{random_bytes, random_nonce_12};
use crate::crypto::types::{CipherSuite, CryptoError, NONCE_LEN_12, TAG_LEN};
use crate::stream::legacy;
use crate::types::BackupError;

/// Symmetric engine with a single key known to the implementation.
pub trait Crypto {
    /// Decrypt everything left in `input`, authenticating `ad` alongside it.
    fn decrypt_stream(&self, input: &mut dyn Read, ad: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Encrypt `cleartext` bound to `ad` and write it to `output`.
    fn encrypt_stream(
        &self,
        output: &mut dyn Write,
        ad: &[u8],
        cleartext: &[u8],
    ) -> Result<(), CryptoError>;

    /// Decrypt one legacy segment (no associated data).
    fn decrypt_segment(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Encrypt one legacy segment, returning the nonce it was sealed with.
    fn encrypt_segment(&self, cleartext: &[u8]) -> Result<([u8; NONCE_LEN_12], Vec<u8>), CryptoError>;

    fn get_random_bytes(&self, n: usize) -> Vec<u8>;

    /// Read and decrypt a whole chain of legacy segments.
    fn decrypt_multiple_segments(&self, input: &mut dyn Read) -> Result<Vec<u8>, BackupError> {
        legacy::read_segments(self, input)
    }
}

impl<C: Crypto + ?Sized> Crypto for &C {
    fn decrypt_stream(&self, input: &mut dyn Read, ad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        (**self).decrypt_stream(input, ad)
    }
    fn encrypt_stream(&self, output: &mut dyn Write, ad: &[u8], cleartext: &[u8]) -> Result<(), CryptoError> {
        (**self).encrypt_stream(output, ad, cleartext)
    }
    fn decrypt_segment(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        (**self).decrypt_segment(nonce, ciphertext)
    }
    fn encrypt_segment(&self, cleartext: &[u8]) -> Result<([u8; NONCE_LEN_12], Vec<u8>), CryptoError> {
        (**self).encrypt_segment(cleartext)
    }
    fn get_random_bytes(&self, n: usize) -> Vec<u8> {
        (**self).get_random_bytes(n)
    }
    fn decrypt_multiple_segments(&self, input: &mut dyn Read) -> Result<Vec<u8>, BackupError> {
        (**self).decrypt_multiple_segments(input)
    }
}

impl<C: Crypto + ?Sized> Crypto for Arc<C> {
    fn decrypt_stream(&self, input: &mut dyn Read, ad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        (**self).decrypt_stream(input, ad)
    }
    fn encrypt_stream(&self, output: &mut dyn Write, ad: &[u8], cleartext: &[u8]) -> Result<(), CryptoError> {
        (**self).encrypt_stream(output, ad, cleartext)
    }
    fn decrypt_segment(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        (**self).decrypt_segment(nonce, ciphertext)
    }
    fn encrypt_segment(&self, cleartext: &[u8]) -> Result<([u8; NONCE_LEN_12], Vec<u8>), CryptoError> {
        (**self).encrypt_segment(cleartext)
    }
    fn get_random_bytes(&self, n: usize) -> Vec<u8> {
        (**self).get_random_bytes(n)
    }
    fn decrypt_multiple_segments(&self, input: &mut dyn Read) -> Result<Vec<u8>, BackupError> {
        (**self).decrypt_multiple_segments(input)
    }
}

/// Bundled engine over a single 32-byte key.
///
/// Stream layout: `[nonce (12)][ciphertext || tag (16)]`, one message per stream.
#[derive(Clone)]
pub struct AeadCrypto {
    aead: AeadImpl,
}

impl AeadCrypto {
    pub fn new(suite: CipherSuite, key: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self { aead: AeadImpl::new(suite, key)? })
    }

    pub fn suite(&self) -> CipherSuite {
        self.aead.suite()
    }
}

impl std::fmt::Debug for AeadCrypto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // key material stays out of logs
        f.debug_struct("AeadCrypto").field("suite", &self.suite()).finish()
    }
}

impl Crypto for AeadCrypto {
    fn decrypt_stream(&self, input: &mut dyn Read, ad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut wire = Vec::new();
        input.read_to_end(&mut wire)?;

        let need = NONCE_LEN_12 + TAG_LEN;
        if wire.len() < need {
            return Err(CryptoError::Truncated { have: wire.len(), need });
        }
        let (nonce, body) = wire.split_at(NONCE_LEN_12);
        self.aead.open(nonce, ad, body)
    }

    fn encrypt_stream(
        &self,
        output: &mut dyn Write,
        ad: &[u8],
        cleartext: &[u8],
    ) -> Result<(), CryptoError> {
        let nonce = random_nonce_12();
        let body = self.aead.seal(&nonce, ad, cleartext)?;
        output.write_all(&nonce)?;
        output.write_all(&body)?;
        Ok(())
    }

    fn decrypt_segment(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.aead.open(nonce, &[], ciphertext)
    }

    fn encrypt_segment(&self, cleartext: &[u8]) -> Result<([u8; NONCE_LEN_12], Vec<u8>), CryptoError> {
        let nonce = random_nonce_12();
        let body = self.aead.seal(&nonce, &[], cleartext)?;
        Ok((nonce, body))
    }

    fn get_random_bytes(&self, n: usize) -> Vec<u8> {
        random_bytes(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn engine() -> AeadCrypto {
        AeadCrypto::new(CipherSuite::Aes256Gcm, &[3u8; 32]).unwrap()
    }

    #[test]
    fn stream_roundtrip_and_ad_binding() {
        let c = engine();
        let mut wire = Vec::new();
        c.encrypt_stream(&mut wire, b"ad-1", b"payload").unwrap();
        assert_eq!(wire.len(), NONCE_LEN_12 + 7 + TAG_LEN);

        let out = c.decrypt_stream(&mut Cursor::new(&wire), b"ad-1").unwrap();
        assert_eq!(out, b"payload");

        let err = c.decrypt_stream(&mut Cursor::new(&wire), b"ad-2").unwrap_err();
        assert!(matches!(err, CryptoError::TagMismatch));
    }

    #[test]
    fn short_stream_is_truncated_not_tag_mismatch() {
        let err = engine().decrypt_stream(&mut Cursor::new(vec![0u8; 20]), b"").unwrap_err();
        assert!(matches!(err, CryptoError::Truncated { have: 20, need: 28 }));
    }

    #[test]
    fn debug_hides_key() {
        assert_eq!(format!("{:?}", engine()), "AeadCrypto { suite: Aes256Gcm }");
    }
}
