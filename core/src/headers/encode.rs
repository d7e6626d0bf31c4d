//! headers/encode.rs
//!
//! Associated data construction and legacy header encoding.
//!
//! Design notes:
//! - Associated data is authentication input only. It carries no length prefix
//!   and is never parsed back.
//! - Legacy headers are big-endian, matching the version-0 wire format.

use byteorder::{BigEndian, WriteBytesExt};

use crate::constants::SEGMENT_HEADER_SIZE;
use crate::headers::types::{BackupType, HeaderError, SegmentHeader, VersionHeader};

/// Associated data binding a ciphertext to one package and stream kind.
///
/// Layout:
///
/// ```text
/// [ version (1) ]
/// [ backup_type (1) ]
/// [ utf8(package_name) (N) ]
/// ```
#[inline]
pub fn build_ad(version: u8, backup_type: BackupType, package_name: &str) -> Vec<u8> {
    let name = package_name.as_bytes();
    let mut out = Vec::with_capacity(2 + name.len());
    out.push(version);
    out.push(backup_type.tag());
    out.extend_from_slice(name);
    out
}

#[inline]
pub fn build_ad_for_kv(version: u8, package_name: &str) -> Vec<u8> {
    build_ad(version, BackupType::Kv, package_name)
}

#[inline]
pub fn build_ad_for_full(version: u8, package_name: &str) -> Vec<u8> {
    build_ad(version, BackupType::Full, package_name)
}

/// Associated data of a backup set's metadata stream: `[version][token (8, BE)]`.
#[inline]
pub fn build_metadata_ad(version: u8, token: i64) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + 8);
    out.push(version);
    out.extend_from_slice(&token.to_be_bytes());
    out
}

/// Serialize a segment header into its fixed 14-byte form.
#[inline]
pub fn encode_segment_header(h: &SegmentHeader) -> [u8; SEGMENT_HEADER_SIZE] {
    let mut out = [0u8; SEGMENT_HEADER_SIZE];
    out[..2].copy_from_slice(&h.segment_length.to_be_bytes()); // 0..2  length
    out[2..].copy_from_slice(&h.nonce);                        // 2..14 nonce
    out
}

/// Serialize a legacy version header.
///
/// Layout:
///
/// ```text
/// [ version (1) ]
/// [ package_len (2, BE) ][ package_name ]
/// [ key_len (2, BE) ][ key ]        key_len = 0 when absent
/// ```
pub fn encode_version_header(h: &VersionHeader) -> Result<Vec<u8>, HeaderError> {
    // Re-validate: the struct fields are public.
    let h = VersionHeader::new(h.version, &h.package_name, h.key.as_deref())?;

    let name = h.package_name.as_bytes();
    let key = h.key.as_deref().unwrap_or("").as_bytes();

    let mut out = Vec::with_capacity(1 + 2 + name.len() + 2 + key.len());
    out.push(h.version);
    out.write_u16::<BigEndian>(name.len() as u16)
        .map_err(|e| HeaderError::Malformed(e.to_string()))?;
    out.extend_from_slice(name);
    out.write_u16::<BigEndian>(key.len() as u16)
        .map_err(|e| HeaderError::Malformed(e.to_string()))?;
    out.extend_from_slice(key);
    Ok(out)
}
