//! Versioned backup streams.
//!
//! Responsibilities:
//! - Dispatch once on the leading version byte
//! - Bind current-format streams to their associated data
//! - Read and write the legacy segmented format (isolated in `legacy`)
//!
//! Non-responsibilities:
//! - Key management
//! - Parsing the cleartext

pub mod types;
pub mod codec;
pub mod legacy;

pub use types::{DecodedStream, StreamContext, StreamFormat};
pub use codec::StreamCodec;
