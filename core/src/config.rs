//! Reader configuration.

use serde::{Deserialize, Serialize};

use crate::constants::VERSION;
use crate::types::BackupError;

/// Knobs for reading backup streams and metadata documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Highest version byte accepted. Never above what this build implements.
    pub max_version: u8,

    /// Reject an empty salt in any document newer than version 0.
    pub reject_empty_salt: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_version: VERSION,
            reject_empty_salt: true,
        }
    }
}

impl ReaderConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, BackupError> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| BackupError::InvalidMetadata(format!("reader config: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), BackupError> {
        if self.max_version > VERSION {
            return Err(BackupError::UnsupportedVersion(self.max_version));
        }
        Ok(())
    }

    /// `max_version` clamped to what this build implements.
    #[inline]
    pub fn effective_max_version(&self) -> u8 {
        self.max_version.min(VERSION)
    }
}
