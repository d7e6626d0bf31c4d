use std::fmt;

use crate::constants::{MAX_KEY_LENGTH_SIZE, MAX_PACKAGE_LENGTH_SIZE, VERSION_LEGACY};
use crate::headers::{build_ad, build_metadata_ad, BackupType, HeaderError};

/// Wire format selected by the leading version byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    /// Version 0: chained segments, no associated data.
    Legacy,
    /// Version >= 1: one authenticated message bound to associated data.
    Current(u8),
}

impl StreamFormat {
    #[inline]
    pub fn from_version(version: u8) -> Self {
        if version == VERSION_LEGACY {
            StreamFormat::Legacy
        } else {
            StreamFormat::Current(version)
        }
    }

    #[inline]
    pub fn version(self) -> u8 {
        match self {
            StreamFormat::Legacy => VERSION_LEGACY,
            StreamFormat::Current(v) => v,
        }
    }
}

/// What a stream is expected to hold; decides the associated data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamContext {
    /// Per-package payload of the given backup type.
    ///
    /// `key` names one key-value record; legacy record streams carry it in
    /// their version header. It does not feed the associated data.
    Package {
        backup_type: BackupType,
        package_name: String,
        key: Option<String>,
    },
    /// Backup-set metadata bound to its token.
    Metadata { token: i64 },
}

impl StreamContext {
    pub fn package(backup_type: BackupType, package_name: &str) -> Result<Self, HeaderError> {
        if package_name.len() > MAX_PACKAGE_LENGTH_SIZE {
            return Err(HeaderError::PackageNameTooLong { len: package_name.len() });
        }
        Ok(StreamContext::Package {
            backup_type,
            package_name: package_name.to_owned(),
            key: None,
        })
    }

    /// Single key-value record of `package_name`.
    pub fn kv_record(package_name: &str, key: &str) -> Result<Self, HeaderError> {
        if package_name.len() > MAX_PACKAGE_LENGTH_SIZE {
            return Err(HeaderError::PackageNameTooLong { len: package_name.len() });
        }
        if key.is_empty() {
            return Err(HeaderError::Malformed("empty record key".into()));
        }
        if key.len() > MAX_KEY_LENGTH_SIZE {
            return Err(HeaderError::KeyTooLong { len: key.len() });
        }
        Ok(StreamContext::Package {
            backup_type: BackupType::Kv,
            package_name: package_name.to_owned(),
            key: Some(key.to_owned()),
        })
    }

    pub fn metadata(token: i64) -> Self {
        StreamContext::Metadata { token }
    }

    /// Associated data for a current-format stream of `version`.
    pub fn associated_data(&self, version: u8) -> Vec<u8> {
        match self {
            StreamContext::Package { backup_type, package_name, .. } =>
                build_ad(version, *backup_type, package_name),
            StreamContext::Metadata { token } => build_metadata_ad(version, *token),
        }
    }
}

impl fmt::Display for StreamContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamContext::Package { backup_type, package_name, key: None } =>
                write!(f, "{} stream of {}", backup_type, package_name),
            StreamContext::Package { backup_type, package_name, key: Some(key) } =>
                write!(f, "{} record {} of {}", backup_type, key, package_name),
            StreamContext::Metadata { token } =>
                write!(f, "metadata stream of token {}", token),
        }
    }
}

/// Authenticated cleartext plus the version byte it arrived under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedStream {
    pub version: u8,
    pub cleartext: Vec<u8>,
}
