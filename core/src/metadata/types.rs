use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::constants::{METADATA_SALT_SIZE, VERSION};
use crate::crypto::Crypto;
use crate::headers::BackupType;

/// Package name → per-package state. Each name appears once.
pub type PackageMetadataMap = BTreeMap<String, PackageMetadata>;

/// Manifest of one backup set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupMetadata {
    pub version: u8,
    /// Backup-set identifier assigned by the destination.
    pub token: i64,
    /// Empty only for version-0 sets.
    pub salt: String,
    /// Epoch millis.
    pub time: i64,
    pub android_version: i32,
    pub android_incremental: String,
    pub device_name: String,
    pub d2d_backup: bool,
    pub package_metadata_map: PackageMetadataMap,
}

impl BackupMetadata {
    /// Fresh manifest for a new backup run: current version, new salt, now, no packages.
    pub fn new<C: Crypto + ?Sized>(
        crypto: &C,
        token: i64,
        android_version: i32,
        android_incremental: &str,
        device_name: &str,
        d2d_backup: bool,
    ) -> Self {
        Self {
            version: VERSION,
            token,
            salt: STANDARD.encode(crypto.get_random_bytes(METADATA_SALT_SIZE)),
            time: chrono::Utc::now().timestamp_millis(),
            android_version,
            android_incremental: android_incremental.to_owned(),
            device_name: device_name.to_owned(),
            d2d_backup,
            package_metadata_map: PackageMetadataMap::new(),
        }
    }

    /// Sum of every known APK and split size; `None` when nothing is known.
    pub fn size(&self) -> Option<i64> {
        let mut known = false;
        let mut total = 0i64;
        for p in self.package_metadata_map.values() {
            if let Some(s) = p.size {
                known = true;
                total = total.saturating_add(s);
            }
            for split in p.splits.iter().flatten() {
                if let Some(s) = split.size {
                    known = true;
                    total = total.saturating_add(s);
                }
            }
        }
        known.then_some(total)
    }
}

/// Outcome of backing up one package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PackageState {
    #[default]
    ApkAndData,
    QuotaExceeded,
    NoData,
    NotAllowed,
    WasStopped,
    UnknownError,
}

impl PackageState {
    pub const fn name(self) -> &'static str {
        use PackageState::*;
        match self {
            ApkAndData => "APK_AND_DATA",
            QuotaExceeded => "QUOTA_EXCEEDED",
            NoData => "NO_DATA",
            NotAllowed => "NOT_ALLOWED",
            WasStopped => "WAS_STOPPED",
            UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Empty means "nothing went wrong"; names from a newer writer fall back
    /// to `UnknownError`.
    pub fn from_name(name: &str) -> Self {
        use PackageState::*;
        match name {
            "" | "APK_AND_DATA" => ApkAndData,
            "QUOTA_EXCEEDED" => QuotaExceeded,
            "NO_DATA" => NoData,
            "NOT_ALLOWED" => NotAllowed,
            "WAS_STOPPED" => WasStopped,
            _ => UnknownError,
        }
    }
}

impl fmt::Display for PackageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One backed-up application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageMetadata {
    /// Epoch millis of the last backup of this package.
    pub time: i64,
    pub state: PackageState,
    /// `None` for documents that predate type tracking or APK-only entries.
    pub backup_type: Option<BackupType>,
    pub size: Option<i64>,
    pub name: Option<String>,
    pub system: bool,
    pub is_launchable_system_app: bool,
    pub version: Option<i64>,
    pub installer: Option<String>,
    pub splits: Option<Vec<ApkSplit>>,
    pub sha256: Option<String>,
    pub signatures: Option<Vec<String>>,
}

impl PackageMetadata {
    pub fn new(time: i64) -> Self {
        Self { time, ..Default::default() }
    }
}

/// Split APK belonging to a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApkSplit {
    pub name: String,
    pub size: Option<i64>,
    pub sha256: String,
}
