//! Prelude module for `kairu_types`.
//!
//! ```rust
//! use kairu_types::prelude::*;
//!
//! let frame = FrameStep::new(0, 100);
//! assert_eq!(frame.image(), Some(0));
//! ```

pub use crate::file::{
	AcsDecodeConfig, AcsFile, AcsHeader, ChunkKind, DecodeError, RawChunk, ReferenceKind,
};
pub use crate::model::{
	AnimationState, BranchEntry, BranchTarget, CharacterDefinition, CharacterMetadata, Color,
	Compression, DefinitionBuilder, FrameStep, ImageFrame, Palette, Point, RoleNames, Roles,
	SoundCue, StateId, StateSpec, TargetSpec, TransitionKind,
};
