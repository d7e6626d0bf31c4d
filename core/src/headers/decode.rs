//! headers/decode.rs
//!
//! Legacy header decoding. Associated data has no decoder on purpose.

use byteorder::{BigEndian, ByteOrder};

use crate::constants::{IV_SIZE, MAX_KEY_LENGTH_SIZE, MAX_PACKAGE_LENGTH_SIZE};
use crate::headers::types::{HeaderError, SegmentHeader, VersionHeader};

/// Parse the fixed 14-byte segment header at the start of `wire`.
#[inline]
pub fn parse_segment_header(wire: &[u8]) -> Result<SegmentHeader, HeaderError> {
    if wire.len() < SegmentHeader::LEN {
        return Err(HeaderError::BufferTooShort { have: wire.len(), need: SegmentHeader::LEN });
    }

    let segment_length = BigEndian::read_u16(&wire[0..2]);
    SegmentHeader::new(segment_length, &wire[2..2 + IV_SIZE])
}

/// Parse a legacy version header. Trailing bytes are rejected.
pub fn decode_version_header(buf: &[u8]) -> Result<VersionHeader, HeaderError> {
    let mut off = 0usize;

    fn take<'a>(buf: &'a [u8], off: &mut usize, n: usize) -> Result<&'a [u8], HeaderError> {
        let end = *off + n;
        if buf.len() < end {
            return Err(HeaderError::BufferTooShort { have: buf.len(), need: end });
        }
        let s = &buf[*off..end];
        *off = end;
        Ok(s)
    }

    let version = take(buf, &mut off, 1)?[0];

    let name_len = BigEndian::read_u16(take(buf, &mut off, 2)?) as usize;
    if name_len > MAX_PACKAGE_LENGTH_SIZE {
        return Err(HeaderError::PackageNameTooLong { len: name_len });
    }
    let name = std::str::from_utf8(take(buf, &mut off, name_len)?)
        .map_err(|e| HeaderError::Malformed(format!("package name: {}", e)))?;

    let key_len = BigEndian::read_u16(take(buf, &mut off, 2)?) as usize;
    if key_len > MAX_KEY_LENGTH_SIZE {
        return Err(HeaderError::KeyTooLong { len: key_len });
    }
    let key = if key_len == 0 {
        None
    } else {
        Some(
            std::str::from_utf8(take(buf, &mut off, key_len)?)
                .map_err(|e| HeaderError::Malformed(format!("key: {}", e)))?,
        )
    };

    if off != buf.len() {
        return Err(HeaderError::Malformed(format!(
            "{} trailing bytes after version header",
            buf.len() - off
        )));
    }

    VersionHeader::new(version, name, key)
}
