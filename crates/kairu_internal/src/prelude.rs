//! Prelude module for `kairu_internal`.
//!
//! Brings the decoder, the model and the playback runtime into scope at once.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kairu_internal::prelude::*;
//!
//! let definition = CharacterDefinition::builder()
//! 	.image(ImageFrame::new(1, 1, Compression::Stored, vec![0]).unwrap())
//! 	.state(StateSpec::new("RestPose").frame(FrameStep::new(0, 100)).branch(TargetSpec::Exit, 1))
//! 	.roles(RoleNames {
//! 		exit_state: Some("RestPose".to_string()),
//! 		..RoleNames::default()
//! 	})
//! 	.build()
//! 	.unwrap();
//!
//! let mut agent = Agent::with_seed(Arc::new(definition), PlaybackConfig::manual(), 1);
//! let events = agent.show();
//! assert!(events[0].is_frame_change());
//! ```

// Re-export everything from kairu_types::prelude
#[doc(inline)]
pub use kairu_types::prelude::*;

#[doc(inline)]
pub use kairu_runtime::{
	Agent, AgentStatus, Interaction, InteractionState, PlaybackConfig, PlaybackEvent,
	PlaybackWarning, Request, RequestError, RequestSender, RuntimeCursor, Scheduler,
	SchedulerState, Stimulus, TickOutput,
};

// Re-export the member crates for advanced usage
#[doc(inline)]
pub use kairu_runtime;
#[doc(inline)]
pub use kairu_types;
#[doc(inline)]
pub use kairu_types::{file, model};
