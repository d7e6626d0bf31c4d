use std::{fmt, io};

use crate::constants::cipher_ids;

/// Stable key size for both bundled ciphers.
pub const KEY_LEN_32: usize = 32;

/// Standard 12-byte nonce length for AES-GCM and ChaCha20-Poly1305.
pub const NONCE_LEN_12: usize = crate::constants::IV_SIZE;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = crate::constants::TAG_LEN;

/// Cipher suites the bundled engine can run.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CipherSuite {
    Aes256Gcm        = cipher_ids::AES256_GCM,
    Chacha20Poly1305 = cipher_ids::CHACHA20_POLY1305,
}

#[derive(Debug)]
pub enum CryptoError {
    /// Invalid key length provided to cipher.
    InvalidKeyLen { expected: usize, actual: usize },

    /// Nonce length mismatch (must be 12 bytes for supported ciphers).
    InvalidNonceLen { expected: usize, actual: usize },

    /// Ciphertext shorter than nonce and tag together.
    Truncated { have: usize, need: usize },

    /// AEAD tag mismatch (authentication failure).
    TagMismatch,

    /// Reading or writing the underlying stream failed.
    Io(io::Error),

    /// General runtime error with context.
    Failure(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CryptoError::*;
        match self {
            InvalidKeyLen { expected, actual } =>
                write!(f, "invalid key length: expected={}, actual={}", expected, actual),
            InvalidNonceLen { expected, actual } =>
                write!(f, "invalid nonce length: expected={}, actual={}", expected, actual),
            Truncated { have, need } =>
                write!(f, "ciphertext too short: have={}, need={}", have, need),
            TagMismatch =>
                write!(f, "AEAD tag mismatch"),
            Io(e) =>
                write!(f, "I/O error: {}", e),
            Failure(msg) =>
                write!(f, "crypto failure: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}

impl From<io::Error> for CryptoError {
    fn from(e: io::Error) -> Self {
        CryptoError::Io(e)
    }
}
