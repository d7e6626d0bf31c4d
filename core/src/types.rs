use std::io;
use thiserror::Error;

use crate::{crypto::CryptoError, headers::HeaderError};

/// Boundary error for every read and write the crate performs.
///
/// - Variants follow the failure taxonomy callers act on: a short read is never
///   reported as an authentication failure and vice versa.
/// - Nothing here is retried internally; re-fetching bytes is the caller's policy.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Structural violation: short read, truncated segment, bad header.
    #[error("malformed stream: {0}")]
    MalformedStream(String),

    /// Version byte is newer than anything this build understands.
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    /// The engine rejected the authentication tag.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// Authenticated content disagrees with what the caller expected.
    #[error("security violation: {0}")]
    SecurityViolation(String),

    /// Authenticated bytes that are not a valid metadata document.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Segment header built with a nonce of the wrong width.
    #[error("invalid nonce length: expected={expected}, actual={actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    /// Engine-side failure that is neither a tag mismatch nor a short read.
    #[error("crypto error: {0}")]
    Crypto(CryptoError),

    /// I/O error other than an unexpected end of stream.
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for BackupError {
    fn from(e: io::Error) -> Self {
        // A stream that ends early is a framing problem, not an I/O one
        if e.kind() == io::ErrorKind::UnexpectedEof {
            BackupError::MalformedStream(e.to_string())
        } else {
            BackupError::Io(e)
        }
    }
}

impl From<CryptoError> for BackupError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::TagMismatch => BackupError::DecryptionFailed(e.to_string()),
            CryptoError::Truncated { .. } => BackupError::MalformedStream(e.to_string()),
            CryptoError::InvalidNonceLen { expected, actual } =>
                BackupError::InvalidNonceLength { expected, actual },
            CryptoError::Io(io) => BackupError::from(io),
            other => BackupError::Crypto(other),
        }
    }
}

impl From<HeaderError> for BackupError {
    fn from(e: HeaderError) -> Self {
        match e {
            HeaderError::InvalidNonceLength { expected, actual } =>
                BackupError::InvalidNonceLength { expected, actual },
            other => BackupError::MalformedStream(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(e: serde_json::Error) -> Self {
        BackupError::InvalidMetadata(e.to_string())
    }
}
