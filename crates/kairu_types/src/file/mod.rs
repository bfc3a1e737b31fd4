//! File type support for `kairu-rs` project.

mod error;

pub mod acs;

// Re-export unified error type
pub use error::{ChunkKind, DecodeError, ReferenceKind};

// Re-export main file types
pub use acs::{DecodeConfig as AcsDecodeConfig, File as AcsFile, Header as AcsHeader, RawChunk};
