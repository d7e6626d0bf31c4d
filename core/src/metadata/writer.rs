//! Metadata encoding; the field mapping mirrors `reader.rs`.

use std::io::Write;

use serde_json::{json, Map, Value};

use crate::constants::VERSION;
use crate::crypto::Crypto;
use crate::metadata::document::*;
use crate::metadata::types::{BackupMetadata, PackageMetadata, PackageState};
use crate::metadata::MetadataCodec;
use crate::stream::StreamContext;
use crate::types::BackupError;

pub trait MetadataWriter {
    /// Encrypt and write `metadata` as a current-format metadata stream.
    fn write_metadata(
        &self,
        metadata: &BackupMetadata,
        output: &mut dyn Write,
    ) -> Result<(), BackupError>;

    /// Serialize `metadata` to document bytes.
    fn encode(&self, metadata: &BackupMetadata) -> Result<Vec<u8>, BackupError>;
}

impl<C: Crypto> MetadataWriter for MetadataCodec<C> {
    fn write_metadata(
        &self,
        metadata: &BackupMetadata,
        mut output: &mut dyn Write,
    ) -> Result<(), BackupError> {
        if metadata.version != VERSION {
            return Err(BackupError::InvalidMetadata(format!(
                "refusing to write version {} metadata as version {}",
                metadata.version, VERSION
            )));
        }
        let bytes = self.encode(metadata)?;
        let ctx = StreamContext::metadata(metadata.token);
        self.codec().write_versioned_stream(&mut output, &ctx, &bytes)
    }

    fn encode(&self, metadata: &BackupMetadata) -> Result<Vec<u8>, BackupError> {
        Ok(serde_json::to_vec(&to_document(metadata)?)?)
    }
}

/// Build the JSON document. Absent optionals are left out rather than written
/// as sentinels. A package may not take the reserved `@meta@` key.
pub fn to_document(m: &BackupMetadata) -> Result<Value, BackupError> {
    let mut meta = Map::new();
    meta.insert(JSON_METADATA_VERSION.into(), json!(m.version));
    meta.insert(JSON_METADATA_TOKEN.into(), json!(m.token));
    meta.insert(JSON_METADATA_SALT.into(), json!(m.salt));
    meta.insert(JSON_METADATA_TIME.into(), json!(m.time));
    meta.insert(JSON_METADATA_SDK_INT.into(), json!(m.android_version));
    meta.insert(JSON_METADATA_INCREMENTAL.into(), json!(m.android_incremental));
    meta.insert(JSON_METADATA_NAME.into(), json!(m.device_name));
    if m.d2d_backup {
        meta.insert(JSON_METADATA_D2D_BACKUP.into(), json!(true));
    }

    let mut root = Map::new();
    root.insert(JSON_METADATA.into(), Value::Object(meta));
    for (package_name, p) in &m.package_metadata_map {
        if package_name == JSON_METADATA {
            return Err(BackupError::InvalidMetadata(format!(
                "package name '{}' is reserved",
                package_name
            )));
        }
        root.insert(package_name.clone(), package_to_document(p));
    }
    Ok(Value::Object(root))
}

fn package_to_document(p: &PackageMetadata) -> Value {
    let mut o = Map::new();
    o.insert(JSON_PACKAGE_TIME.into(), json!(p.time));
    if p.state != PackageState::ApkAndData {
        o.insert(JSON_PACKAGE_STATE.into(), json!(p.state.name()));
    }
    if let Some(t) = p.backup_type {
        o.insert(JSON_PACKAGE_BACKUP_TYPE.into(), json!(t.name()));
    }
    if let Some(size) = p.size {
        o.insert(JSON_PACKAGE_SIZE.into(), json!(size));
    }
    if let Some(name) = &p.name {
        o.insert(JSON_PACKAGE_APP_NAME.into(), json!(name));
    }
    if p.system {
        o.insert(JSON_PACKAGE_SYSTEM.into(), json!(true));
    }
    if p.is_launchable_system_app {
        o.insert(JSON_PACKAGE_SYSTEM_LAUNCHER.into(), json!(true));
    }
    if let Some(version) = p.version {
        o.insert(JSON_PACKAGE_VERSION.into(), json!(version));
    }
    if let Some(installer) = &p.installer {
        o.insert(JSON_PACKAGE_INSTALLER.into(), json!(installer));
    }
    if let Some(splits) = &p.splits {
        let splits: Vec<Value> = splits
            .iter()
            .map(|s| {
                let mut so = Map::new();
                so.insert(JSON_PACKAGE_SPLIT_NAME.into(), json!(s.name));
                if let Some(size) = s.size {
                    so.insert(JSON_PACKAGE_SIZE.into(), json!(size));
                }
                so.insert(JSON_PACKAGE_SHA256.into(), json!(s.sha256));
                Value::Object(so)
            })
            .collect();
        o.insert(JSON_PACKAGE_SPLITS.into(), Value::Array(splits));
    }
    if let Some(sha256) = &p.sha256 {
        o.insert(JSON_PACKAGE_SHA256.into(), json!(sha256));
    }
    if let Some(signatures) = &p.signatures {
        o.insert(JSON_PACKAGE_SIGNATURES.into(), json!(signatures));
    }
    Value::Object(o)
}
