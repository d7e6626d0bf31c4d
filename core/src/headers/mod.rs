//! headers/mod.rs
//! Framing primitives: version byte, associated data, legacy headers.
//!
//! Notes:
//! - Pure functions and plain data, no I/O.
//! - Associated data = `[version][backup type][utf8(package)]`; distinct per
//!   (version, type, package) so ciphertext cannot move between streams.
//! - Segment and version headers only exist in version-0 streams.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
