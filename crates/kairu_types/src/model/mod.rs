//! In-memory character model.
//!
//! A [`CharacterDefinition`] is produced once by the decoder (or assembled by
//! hand through [`DefinitionBuilder`]) and is read-only afterwards. Assets live
//! in flat tables and every cross-reference is a validated index:
//!
//! | Reference              | Table                               |
//! |------------------------|-------------------------------------|
//! | `FrameImage::image`    | [`CharacterDefinition::images`]     |
//! | `FrameStep::sound`     | [`CharacterDefinition::sounds`]     |
//! | `FrameStep::text`      | [`CharacterDefinition::strings`]    |
//! | `BranchTarget::State`  | [`CharacterDefinition::states`]     |
//!
//! Because the definition is immutable it can be shared (for example behind
//! an `Arc`) by any number of playback cursors.

mod definition;
mod image;
mod metadata;
mod sound;
mod state;


pub use definition::{CharacterDefinition, DefinitionBuilder, RoleNames, Roles};
pub use image::{Color, Compression, ImageFrame, Palette};
pub use metadata::{
	BalloonInfo, CharacterMetadata, Guid, LocalizedInfo, StateGroup, VoiceExtra, VoiceInfo,
};
pub use sound::SoundCue;
pub use state::{
	pick_weighted, AnimationState, BranchEntry, BranchTarget, FrameBranch, FrameImage, FrameStep,
	Overlay, OverlayKind, Point, StateId, StateSpec, TargetSpec, TransitionKind,
};
