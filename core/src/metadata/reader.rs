//! Metadata decoding.
//!
//! The document is trusted in shape only because it arrived authenticated; the
//! version and token it carries must still match what the caller saw outside
//! of it, otherwise an authenticated manifest could be replayed elsewhere.

use std::io::Read;

use serde_json::Value;

use crate::constants::VERSION_LEGACY;
use crate::crypto::Crypto;
use crate::metadata::document::*;
use crate::metadata::types::{ApkSplit, BackupMetadata, PackageMetadata, PackageMetadataMap};
use crate::metadata::MetadataCodec;
use crate::stream::StreamContext;
use crate::types::BackupError;

pub trait MetadataReader {
    /// Decrypt and decode the metadata stream of the backup set `expected_token`.
    fn read_metadata(
        &self,
        input: &mut dyn Read,
        expected_token: i64,
    ) -> Result<BackupMetadata, BackupError>;

    /// Decode already decrypted document bytes.
    fn decode(
        &self,
        bytes: &[u8],
        expected_version: Option<u8>,
        expected_token: Option<i64>,
    ) -> Result<BackupMetadata, BackupError>;
}

impl<C: Crypto> MetadataReader for MetadataCodec<C> {
    fn read_metadata(
        &self,
        mut input: &mut dyn Read,
        expected_token: i64,
    ) -> Result<BackupMetadata, BackupError> {
        let ctx = StreamContext::metadata(expected_token);
        let decoded = self.codec().read_versioned_stream(&mut input, &ctx)?;
        self.decode(&decoded.cleartext, Some(decoded.version), Some(expected_token))
    }

    fn decode(
        &self,
        bytes: &[u8],
        expected_version: Option<u8>,
        expected_token: Option<i64>,
    ) -> Result<BackupMetadata, BackupError> {
        let json: Value = serde_json::from_slice(bytes)?;
        let root = Obj::new(&json, "document")?;

        // backup-set metadata and expectations
        let meta = root.require_object(JSON_METADATA)?;
        let raw_version = meta.require_i64(JSON_METADATA_VERSION)?;
        let version = u8::try_from(raw_version).map_err(|_| {
            BackupError::InvalidMetadata(format!("version {} out of range", raw_version))
        })?;
        if let Some(expected) = expected_version {
            if version != expected {
                log::warn!("metadata version {} does not match stream version {}", version, expected);
                return Err(BackupError::SecurityViolation(format!(
                    "invalid version '{}' in metadata, expected '{}'",
                    version, expected
                )));
            }
        }
        let token = meta.require_i64(JSON_METADATA_TOKEN)?;
        if let Some(expected) = expected_token {
            if token != expected {
                log::warn!("metadata token {} does not match expected token {}", token, expected);
                return Err(BackupError::SecurityViolation(format!(
                    "invalid token '{}' in metadata, expected '{}'",
                    token, expected
                )));
            }
        }

        let mut package_metadata_map = PackageMetadataMap::new();
        for package_name in root.keys() {
            if package_name == JSON_METADATA {
                continue;
            }
            let value = root.value(package_name).ok_or_else(|| {
                BackupError::InvalidMetadata(format!("{}: null package entry", package_name))
            })?;
            let p = Obj::new(value, package_name)?;
            package_metadata_map.insert(package_name.clone(), decode_package(&p)?);
        }

        let salt = if version == VERSION_LEGACY {
            String::new()
        } else {
            let salt = meta.require_str(JSON_METADATA_SALT)?;
            if salt.is_empty() && self.codec().config().reject_empty_salt {
                return Err(BackupError::InvalidMetadata(format!(
                    "empty salt in version {} metadata",
                    version
                )));
            }
            salt.to_owned()
        };

        let raw_sdk = meta.require_i64(JSON_METADATA_SDK_INT)?;
        let android_version = i32::try_from(raw_sdk).map_err(|_| {
            BackupError::InvalidMetadata(format!("sdk_int {} out of range", raw_sdk))
        })?;

        let metadata = BackupMetadata {
            version,
            token,
            salt,
            time: meta.require_i64(JSON_METADATA_TIME)?,
            android_version,
            android_incremental: meta.require_str(JSON_METADATA_INCREMENTAL)?.to_owned(),
            device_name: meta.require_str(JSON_METADATA_NAME)?.to_owned(),
            d2d_backup: meta.opt_bool_or(JSON_METADATA_D2D_BACKUP, false),
            package_metadata_map,
        };
        log::debug!(
            "decoded metadata v{} token {} with {} packages",
            metadata.version,
            metadata.token,
            metadata.package_metadata_map.len()
        );
        Ok(metadata)
    }
}

fn decode_package(p: &Obj<'_>) -> Result<PackageMetadata, BackupError> {
    let signatures = match p.opt_array(JSON_PACKAGE_SIGNATURES) {
        None => None,
        Some(values) => Some(
            values
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_owned).ok_or_else(|| {
                        BackupError::InvalidMetadata(format!("{}: non-string signature", p.label()))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };

    Ok(PackageMetadata {
        time: p.require_i64(JSON_PACKAGE_TIME)?,
        state: state_from_wire(p.opt_str_or(JSON_PACKAGE_STATE, "")),
        // no type for APK-only entries and old documents
        backup_type: backup_type_from_wire(p.opt_str_or(JSON_PACKAGE_BACKUP_TYPE, "")),
        size: size_from_wire(p.opt_i64_or(JSON_PACKAGE_SIZE, -1)),
        name: string_from_wire(p.opt_str_or(JSON_PACKAGE_APP_NAME, "")),
        system: p.opt_bool_or(JSON_PACKAGE_SYSTEM, false),
        is_launchable_system_app: p.opt_bool_or(JSON_PACKAGE_SYSTEM_LAUNCHER, false),
        version: version_from_wire(p.opt_i64_or(JSON_PACKAGE_VERSION, 0)),
        installer: string_from_wire(p.opt_str_or(JSON_PACKAGE_INSTALLER, "")),
        splits: decode_splits(p)?,
        sha256: string_from_wire(p.opt_str_or(JSON_PACKAGE_SHA256, "")),
        signatures,
    })
}

fn decode_splits(p: &Obj<'_>) -> Result<Option<Vec<ApkSplit>>, BackupError> {
    let Some(values) = p.opt_array(JSON_PACKAGE_SPLITS) else {
        return Ok(None);
    };
    let mut splits = Vec::with_capacity(values.len());
    for v in values {
        let s = Obj::new(v, p.label())?;
        splits.push(ApkSplit {
            name: s.require_str(JSON_PACKAGE_SPLIT_NAME)?.to_owned(),
            size: size_from_wire(s.opt_i64_or(JSON_PACKAGE_SIZE, -1)),
            sha256: s.require_str(JSON_PACKAGE_SHA256)?.to_owned(),
        });
    }
    Ok(Some(splits))
}
