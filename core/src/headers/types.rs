//! headers/types.rs
//! Backup type registry, legacy segment header and legacy version header.
//!
//! Notes:
//! - The backup type never appears in cleartext; it only feeds the associated data.
//! - Segment and version headers exist for version-0 streams only.
//! - Multi-byte integers are big-endian on the wire.

use std::fmt;

use crate::constants::{backup_type_ids, IV_SIZE, MAX_KEY_LENGTH_SIZE, MAX_PACKAGE_LENGTH_SIZE};
use crate::constants::{MAX_SEGMENT_LENGTH, SEGMENT_HEADER_SIZE};

/// Kind of payload a per-package stream carries.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BackupType {
    Kv   = backup_type_ids::KV,
    Full = backup_type_ids::FULL,
}

impl BackupType {
    /// Single-byte tag used in the associated data.
    #[inline(always)]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Name used in the metadata document.
    pub const fn name(self) -> &'static str {
        match self {
            BackupType::Kv => "KV",
            BackupType::Full => "FULL",
        }
    }

    /// Inverse of [`BackupType::name`]. Anything else is "not recorded".
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "KV" => Some(BackupType::Kv),
            "FULL" => Some(BackupType::Full),
            _ => None,
        }
    }
}

impl fmt::Display for BackupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header in front of every version-0 segment.
///
/// Layout:
///
/// ```text
/// [ segment_length (2, BE) ]
/// [ nonce (12) ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    /// Ciphertext bytes (tag included) that follow this header.
    pub segment_length: u16,
    pub nonce: [u8; IV_SIZE],
}

impl SegmentHeader {
    pub const LEN: usize = SEGMENT_HEADER_SIZE;

    /// Build a header from a nonce of any width; only 12 bytes are accepted.
    pub fn new(segment_length: u16, nonce: &[u8]) -> Result<Self, HeaderError> {
        if nonce.len() != IV_SIZE {
            return Err(HeaderError::InvalidNonceLength {
                expected: IV_SIZE,
                actual: nonce.len(),
            });
        }
        if segment_length as usize > MAX_SEGMENT_LENGTH {
            return Err(HeaderError::SegmentTooLong { len: segment_length as usize });
        }
        let mut n = [0u8; IV_SIZE];
        n.copy_from_slice(nonce);
        Ok(Self { segment_length, nonce: n })
    }
}

/// Version header that opened the first segment of a legacy per-package stream.
///
/// Superseded by binding the same information into the associated data;
/// only read back from version-0 streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionHeader {
    pub version: u8,
    pub package_name: String,
    pub key: Option<String>,
}

impl VersionHeader {
    pub fn new(version: u8, package_name: &str, key: Option<&str>) -> Result<Self, HeaderError> {
        if package_name.len() > MAX_PACKAGE_LENGTH_SIZE {
            return Err(HeaderError::PackageNameTooLong { len: package_name.len() });
        }
        if let Some(k) = key {
            if k.len() > MAX_KEY_LENGTH_SIZE {
                return Err(HeaderError::KeyTooLong { len: k.len() });
            }
        }
        Ok(Self {
            version,
            package_name: package_name.to_owned(),
            key: key.map(str::to_owned),
        })
    }
}

#[derive(Debug)]
pub enum HeaderError {
    /// Nonce is not exactly `IV_SIZE` bytes.
    InvalidNonceLength { expected: usize, actual: usize },

    /// Segment length above the signed 16-bit range.
    SegmentTooLong { len: usize },

    /// Package name longer than `MAX_PACKAGE_LENGTH_SIZE` bytes.
    PackageNameTooLong { len: usize },

    /// Record key longer than `MAX_KEY_LENGTH_SIZE` bytes.
    KeyTooLong { len: usize },

    /// Buffer shorter than the structure being decoded.
    BufferTooShort { have: usize, need: usize },

    /// Field content that cannot be decoded.
    Malformed(String),
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use HeaderError::*;
        match self {
            InvalidNonceLength { expected, actual } =>
                write!(f, "nonce size of {} is not the expected IV size of {}", actual, expected),
            SegmentTooLong { len } =>
                write!(f, "segment length {} exceeds {}", len, MAX_SEGMENT_LENGTH),
            PackageNameTooLong { len } =>
                write!(f, "package name of {} bytes is longer than {}", len, MAX_PACKAGE_LENGTH_SIZE),
            KeyTooLong { len } =>
                write!(f, "key of {} bytes is longer than {}", len, MAX_KEY_LENGTH_SIZE),
            BufferTooShort { have, need } =>
                write!(f, "buffer too short: have={}, need={}", have, need),
            Malformed(msg) =>
                write!(f, "malformed header: {}", msg),
        }
    }
}

impl std::error::Error for HeaderError {}
