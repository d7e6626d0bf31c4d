//! Backup-set metadata: model, document mapping, reader and writer.
//!
//! Notes:
//! - The document is JSON keyed by package name plus the reserved `@meta@` entry.
//! - Unknown keys are ignored and missing optional keys take defaults, so
//!   documents from older and newer writers both decode.
//! - Wire sentinels never leave `document.rs`.

pub mod types;
pub mod document;
pub mod reader;
pub mod writer;

pub use types::*;
pub use reader::MetadataReader;
pub use writer::MetadataWriter;

use crate::config::ReaderConfig;
use crate::crypto::Crypto;
use crate::stream::StreamCodec;

/// Reads and writes metadata streams through a [`StreamCodec`].
#[derive(Debug, Clone)]
pub struct MetadataCodec<C> {
    codec: StreamCodec<C>,
}

impl<C: Crypto> MetadataCodec<C> {
    pub fn new(crypto: C) -> Self {
        Self { codec: StreamCodec::new(crypto) }
    }

    pub fn with_config(crypto: C, config: ReaderConfig) -> Self {
        Self { codec: StreamCodec::with_config(crypto, config) }
    }

    pub fn from_codec(codec: StreamCodec<C>) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &StreamCodec<C> {
        &self.codec
    }
}
