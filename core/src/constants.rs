//! Wire-level constants shared by the framing, stream and metadata layers.

/// Highest stream format version this build reads and the one it writes.
/// Version `0` is the legacy chained-segment format.
pub const VERSION: u8 = 1;

/// Legacy segmented format marker.
pub const VERSION_LEGACY: u8 = 0;

/// Backup type tags folded into the associated data.
pub mod backup_type_ids {
    pub const KV: u8   = 0x01;
    pub const FULL: u8 = 0x02;
}

/// Longest package name (in encoded bytes) a stream may be bound to.
pub const MAX_PACKAGE_LENGTH_SIZE: usize = 255;
/// Longest key-value record key carried by a legacy version header.
pub const MAX_KEY_LENGTH_SIZE: usize = MAX_PACKAGE_LENGTH_SIZE;
/// Upper bound of an encoded legacy version header.
pub const MAX_VERSION_HEADER_SIZE: usize =
    1 + 2 * 2 + MAX_PACKAGE_LENGTH_SIZE + MAX_KEY_LENGTH_SIZE;

/// AEAD authentication tag length in bytes (128 bit).
pub const TAG_LEN: usize = 16;

/// Width of the big-endian segment length field.
pub const SEGMENT_LENGTH_SIZE: usize = 2;
/// Largest value the segment length field may carry (`i16::MAX`).
pub const MAX_SEGMENT_LENGTH: usize = i16::MAX as usize;
/// Cleartext that still fits into one segment once the tag is appended.
pub const MAX_SEGMENT_CLEARTEXT_LENGTH: usize = MAX_SEGMENT_LENGTH - TAG_LEN;
/// Per-segment nonce width.
pub const IV_SIZE: usize = 12;
/// `[len (2)][nonce (12)]`
pub const SEGMENT_HEADER_SIZE: usize = SEGMENT_LENGTH_SIZE + IV_SIZE;

/// Random bytes behind a freshly generated backup-set salt.
pub const METADATA_SALT_SIZE: usize = 32;

/// Cipher suite identifiers for the bundled engine.
pub mod cipher_ids {
    pub const AES256_GCM: u16        = 0x0001;
    pub const CHACHA20_POLY1305: u16 = 0x0002;
}
