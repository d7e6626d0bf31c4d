//! vault-core
//!
//! Authenticated backup-stream framing and the backup-set metadata codec.
//! The cipher engine is injected through [`crypto::Crypto`].

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod config;
pub mod types;
pub mod utils;

// Framing primitives and crypto capability
pub mod headers;
pub mod crypto;

// Stream and document layers
pub mod stream;
pub mod metadata;
pub mod restore;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::ReaderConfig;
    pub use crate::constants::VERSION;
    pub use crate::crypto::{AeadCrypto, CipherSuite, Crypto};
    pub use crate::headers::{build_ad, BackupType};
    pub use crate::metadata::{
        ApkSplit, BackupMetadata, MetadataCodec, MetadataReader, MetadataWriter,
        PackageMetadata, PackageMetadataMap, PackageState,
    };
    pub use crate::restore::RestorableBackup;
    pub use crate::stream::{StreamCodec, StreamContext};
    pub use crate::types::BackupError;
}
