//! This module is separated into its own crate to enable simple dynamic linking for `kairu`, and should not be used directly.

/// `use kairu_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use kairu_runtime;
pub use kairu_types;

// Re-export commonly used types at crate root
pub use kairu_runtime::{Agent, PlaybackConfig, PlaybackEvent, Scheduler};
pub use kairu_types::file::{AcsFile, DecodeError};
pub use kairu_types::model::CharacterDefinition;
