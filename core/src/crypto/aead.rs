//! crypto/aead.rs
//! AEAD interface for AES-256-GCM and ChaCha20-Poly1305.
//!
//! Design notes:
//! - Both ciphers use 32-byte keys and 12-byte nonces.
//! - Tag verification must fail closed (no partial plaintext).
//! - Caller provides nonce and associated data per message.

use crate::crypto::types::{CipherSuite, CryptoError};
use crate::crypto::types::{KEY_LEN_32, NONCE_LEN_12, TAG_LEN};

use aes_gcm::aead::{Aead, KeyInit, Payload};

use aes_gcm::{Aes256Gcm, Nonce as AesNonce};
use chacha20poly1305::{ChaCha20Poly1305, Nonce as ChaNonce};

/// Unified AEAD cipher implementation selected by [`CipherSuite`].
#[derive(Clone)]
pub enum AeadImpl {
    AesGcm(Aes256Gcm),
    ChaCha(ChaCha20Poly1305),
}

impl AeadImpl {
    /// Construct the cipher for `suite` over a 32-byte key.
    pub fn new(suite: CipherSuite, key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_LEN_32 {
            return Err(CryptoError::InvalidKeyLen {
                expected: KEY_LEN_32,
                actual: key.len(),
            });
        }

        let bad_key = || CryptoError::InvalidKeyLen { expected: KEY_LEN_32, actual: key.len() };
        match suite {
            CipherSuite::Aes256Gcm =>
                Ok(Self::AesGcm(Aes256Gcm::new_from_slice(key).map_err(|_| bad_key())?)),
            CipherSuite::Chacha20Poly1305 =>
                Ok(Self::ChaCha(ChaCha20Poly1305::new_from_slice(key).map_err(|_| bad_key())?)),
        }
    }

    pub fn suite(&self) -> CipherSuite {
        match self {
            AeadImpl::AesGcm(_) => CipherSuite::Aes256Gcm,
            AeadImpl::ChaCha(_) => CipherSuite::Chacha20Poly1305,
        }
    }

    /// AEAD seal (encrypt) plaintext with nonce and associated data.
    pub fn seal(
        &self,
        nonce_12: &[u8],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        check_nonce(nonce_12)?;

        match self {
            AeadImpl::AesGcm(cipher) => cipher
                .encrypt(AesNonce::from_slice(nonce_12), Payload { msg: plaintext, aad })
                .map_err(|_| CryptoError::Failure("AES-GCM seal failed".into())),
            AeadImpl::ChaCha(cipher) => cipher
                .encrypt(ChaNonce::from_slice(nonce_12), Payload { msg: plaintext, aad })
                .map_err(|_| CryptoError::Failure("ChaCha20-Poly1305 seal failed".into())),
        }
    }

    /// AEAD open (decrypt) ciphertext with nonce and associated data.
    pub fn open(
        &self,
        nonce_12: &[u8],
        aad: &[u8],
        ciphertext_and_tag: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        check_nonce(nonce_12)?;

        if ciphertext_and_tag.len() < TAG_LEN {
            return Err(CryptoError::Truncated { have: ciphertext_and_tag.len(), need: TAG_LEN });
        }

        match self {
            AeadImpl::AesGcm(cipher) => cipher
                .decrypt(AesNonce::from_slice(nonce_12), Payload { msg: ciphertext_and_tag, aad })
                .map_err(|_| CryptoError::TagMismatch),
            AeadImpl::ChaCha(cipher) => cipher
                .decrypt(ChaNonce::from_slice(nonce_12), Payload { msg: ciphertext_and_tag, aad })
                .map_err(|_| CryptoError::TagMismatch),
        }
    }
}

#[inline]
fn check_nonce(nonce: &[u8]) -> Result<(), CryptoError> {
    if nonce.len() != NONCE_LEN_12 {
        return Err(CryptoError::InvalidNonceLen {
            expected: NONCE_LEN_12,
            actual: nonce.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_both_suites() {
        for suite in [CipherSuite::Aes256Gcm, CipherSuite::Chacha20Poly1305] {
            let aead = AeadImpl::new(suite, &[7u8; KEY_LEN_32]).unwrap();
            let ct = aead.seal(&[1u8; 12], b"ad", b"hello").unwrap();
            assert_eq!(ct.len(), 5 + TAG_LEN);
            assert_eq!(aead.open(&[1u8; 12], b"ad", &ct).unwrap(), b"hello");
            assert!(matches!(aead.open(&[1u8; 12], b"other", &ct), Err(CryptoError::TagMismatch)));
        }
    }

    #[test]
    fn rejects_short_key_and_nonce() {
        assert!(matches!(
            AeadImpl::new(CipherSuite::Aes256Gcm, &[0u8; 16]),
            Err(CryptoError::InvalidKeyLen { expected: 32, actual: 16 })
        ));
        let aead = AeadImpl::new(CipherSuite::Aes256Gcm, &[0u8; 32]).unwrap();
        assert!(matches!(
            aead.seal(&[0u8; 8], b"", b"x"),
            Err(CryptoError::InvalidNonceLen { expected: 12, actual: 8 })
        ));
    }
}
