//! Read-only view of a decoded backup set for restore flows.

use crate::metadata::{BackupMetadata, PackageMetadataMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorableBackup {
    backup_metadata: BackupMetadata,
}

impl RestorableBackup {
    pub fn new(backup_metadata: BackupMetadata) -> Self {
        Self { backup_metadata }
    }

    pub fn backup_metadata(&self) -> &BackupMetadata {
        &self.backup_metadata
    }

    /// Display name of the set; same as the device name.
    pub fn name(&self) -> &str {
        &self.backup_metadata.device_name
    }

    pub fn version(&self) -> u8 {
        self.backup_metadata.version
    }

    pub fn token(&self) -> i64 {
        self.backup_metadata.token
    }

    pub fn salt(&self) -> &str {
        &self.backup_metadata.salt
    }

    pub fn time(&self) -> i64 {
        self.backup_metadata.time
    }

    pub fn size(&self) -> Option<i64> {
        self.backup_metadata.size()
    }

    pub fn device_name(&self) -> &str {
        &self.backup_metadata.device_name
    }

    pub fn d2d_backup(&self) -> bool {
        self.backup_metadata.d2d_backup
    }

    pub fn package_metadata_map(&self) -> &PackageMetadataMap {
        &self.backup_metadata.package_metadata_map
    }
}

impl From<BackupMetadata> for RestorableBackup {
    fn from(m: BackupMetadata) -> Self {
        Self::new(m)
    }
}
