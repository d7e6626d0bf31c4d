//! Version-0 chained-segment format.
//!
//! Layout after the version byte:
//!
//! ```text
//! { [ segment_length (2, BE) ][ nonce (12) ][ ciphertext || tag (segment_length) ] }*
//! ```
//!
//! Segments are sealed without associated data. Per-package streams open
//! with a segment holding the encoded [`VersionHeader`]. Kept apart from the
//! current format so it can be dropped without touching it.

use std::io::{Read, Write};

use crate::constants::{MAX_SEGMENT_CLEARTEXT_LENGTH, SEGMENT_HEADER_SIZE, TAG_LEN, VERSION_LEGACY};
use crate::crypto::Crypto;
use crate::headers::{decode_version_header, encode_segment_header, encode_version_header};
use crate::headers::{parse_segment_header, SegmentHeader, VersionHeader};
use crate::stream::types::StreamContext;
use crate::types::BackupError;
use crate::utils::read_fully;

/// Read one segment. `Ok(None)` on a clean end of stream at a header boundary.
pub fn read_segment<C: Crypto + ?Sized>(
    crypto: &C,
    input: &mut dyn Read,
) -> Result<Option<Vec<u8>>, BackupError> {
    let mut hdr = [0u8; SEGMENT_HEADER_SIZE];
    match read_fully(input, &mut hdr)? {
        0 => return Ok(None),
        n if n < SEGMENT_HEADER_SIZE => {
            return Err(BackupError::MalformedStream(format!(
                "truncated segment header: {} of {} bytes",
                n, SEGMENT_HEADER_SIZE
            )));
        }
        _ => {}
    }

    let header = parse_segment_header(&hdr)?;
    let len = header.segment_length as usize;
    if len < TAG_LEN {
        return Err(BackupError::MalformedStream(format!(
            "segment length {} shorter than tag",
            len
        )));
    }

    let mut ciphertext = vec![0u8; len];
    let got = read_fully(input, &mut ciphertext)?;
    if got < len {
        return Err(BackupError::MalformedStream(format!(
            "truncated segment: declared {} bytes, {} remaining",
            len, got
        )));
    }

    let cleartext = crypto.decrypt_segment(&header.nonce, &ciphertext).map_err(|e| {
        log::warn!("legacy segment failed to authenticate: {}", e);
        BackupError::from(e)
    })?;
    Ok(Some(cleartext))
}

/// Read segments until the stream ends and concatenate their cleartext.
///
/// Any failure discards everything decrypted so far.
pub fn read_segments<C: Crypto + ?Sized>(
    crypto: &C,
    input: &mut dyn Read,
) -> Result<Vec<u8>, BackupError> {
    let mut out = Vec::new();
    let mut count = 0usize;
    while let Some(segment) = read_segment(crypto, input)? {
        out.extend_from_slice(&segment);
        count += 1;
    }
    log::debug!("read {} legacy segments, {} bytes of cleartext", count, out.len());
    Ok(out)
}

/// Seal `cleartext` into as many segments as needed and write them.
pub fn write_segments<C: Crypto + ?Sized>(
    crypto: &C,
    output: &mut dyn Write,
    cleartext: &[u8],
) -> Result<(), BackupError> {
    for chunk in cleartext.chunks(MAX_SEGMENT_CLEARTEXT_LENGTH) {
        write_segment(crypto, output, chunk)?;
    }
    Ok(())
}

fn write_segment<C: Crypto + ?Sized>(
    crypto: &C,
    output: &mut dyn Write,
    chunk: &[u8],
) -> Result<(), BackupError> {
    let (nonce, ciphertext) = crypto.encrypt_segment(chunk)?;
    let len = u16::try_from(ciphertext.len()).map_err(|_| {
        BackupError::MalformedStream(format!("segment of {} bytes too long", ciphertext.len()))
    })?;
    let header = SegmentHeader::new(len, &nonce)?;
    output.write_all(&encode_segment_header(&header))?;
    output.write_all(&ciphertext)?;
    Ok(())
}

/// Decode the payload of a legacy stream for `ctx` (version byte already consumed).
pub fn read_payload<C: Crypto + ?Sized>(
    crypto: &C,
    input: &mut dyn Read,
    ctx: &StreamContext,
) -> Result<Vec<u8>, BackupError> {
    match ctx {
        StreamContext::Metadata { .. } => crypto.decrypt_multiple_segments(input),
        StreamContext::Package { package_name, key, .. } => {
            let first = read_segment(crypto, input)?.ok_or_else(|| {
                BackupError::MalformedStream("legacy stream without version header".into())
            })?;
            let header = decode_version_header(&first)?;
            check_version_header(&header, package_name, key.as_deref())?;
            read_segments(crypto, input)
        }
    }
}

/// Write a legacy stream for `ctx`, version byte included.
pub fn write_stream<C: Crypto + ?Sized>(
    crypto: &C,
    output: &mut dyn Write,
    ctx: &StreamContext,
    cleartext: &[u8],
) -> Result<(), BackupError> {
    output.write_all(&[VERSION_LEGACY])?;
    if let StreamContext::Package { package_name, key, .. } = ctx {
        let header = VersionHeader::new(VERSION_LEGACY, package_name, key.as_deref())?;
        write_segment(crypto, output, &encode_version_header(&header)?)?;
    }
    write_segments(crypto, output, cleartext)
}

fn check_version_header(
    header: &VersionHeader,
    package_name: &str,
    key: Option<&str>,
) -> Result<(), BackupError> {
    if header.version != VERSION_LEGACY {
        log::warn!("legacy version header carries version {}", header.version);
        return Err(BackupError::SecurityViolation(format!(
            "invalid version '{}' in header, expected '{}'",
            header.version, VERSION_LEGACY
        )));
    }
    if header.package_name != package_name {
        log::warn!("legacy version header names package {}", header.package_name);
        return Err(BackupError::SecurityViolation(format!(
            "invalid package '{}' in header, expected '{}'",
            header.package_name, package_name
        )));
    }
    if header.key.as_deref() != key {
        log::warn!("legacy version header of {} names another record", package_name);
        return Err(BackupError::SecurityViolation(format!(
            "invalid key '{}' in header, expected '{}'",
            header.key.as_deref().unwrap_or(""),
            key.unwrap_or("")
        )));
    }
    Ok(())
}
