//! In-memory character shared by the playback tests

use std::sync::Arc;

use kairu_rs::prelude::*;

fn blank() -> ImageFrame {
	ImageFrame::new(2, 2, Compression::Stored, vec![0; 4]).unwrap()
}

/// A small character with the usual cast of animations.
///
/// | State       | Frames (ms)   | Branches             |
/// |-------------|---------------|----------------------|
/// | `RestPose`  | 100           | exit                 |
/// | `Idle1_1`   | 200, 200      | `Idle1_1` 3, `Idle1_2` 1 |
/// | `Idle1_2`   | 400           | `Idle1_1`            |
/// | `Greet`     | 100, 100, 100 | `RestPose`           |
/// | `Think`     | 150 x 4       | `RestPose`, uninterruptible |
/// | `Goodbye`   | 300           | exit                 |
pub(crate) fn cast() -> Arc<CharacterDefinition> {
	let definition = CharacterDefinition::builder()
		.size(32, 48)
		.images((0..6).map(|_| blank()).collect())
		.sound(SoundCue::new(b"RIFF\x04\x00\x00\x00WAVE".to_vec()))
		.string("Hello there")
		.state(StateSpec::new("RestPose").frame(FrameStep::new(0, 100)).branch(TargetSpec::Exit, 1))
		.state(
			StateSpec::new("Idle1_1")
				.frame(FrameStep::new(1, 200))
				.frame(FrameStep::new(2, 200))
				.branch(TargetSpec::state("Idle1_1"), 3)
				.branch(TargetSpec::state("Idle1_2"), 1),
		)
		.state(
			StateSpec::new("Idle1_2")
				.frame(FrameStep::new(3, 400))
				.branch(TargetSpec::state("Idle1_1"), 1),
		)
		.state(
			StateSpec::new("Greet")
				.frame(FrameStep::new(4, 100).with_sound(0).with_text(0))
				.frame(FrameStep::new(4, 100).with_offset(Point::new(0, -2)))
				.frame(FrameStep::new(4, 100))
				.branch(TargetSpec::state("RestPose"), 1),
		)
		.state(
			StateSpec::new("Think")
				.frame(FrameStep::new(5, 150))
				.frame(FrameStep::new(5, 150).with_exit_frame(3))
				.frame(FrameStep::new(5, 150))
				.frame(FrameStep::new(5, 150))
				.branch(TargetSpec::state("RestPose"), 1)
				.interruptible(false),
		)
		.state(StateSpec::new("Goodbye").frame(FrameStep::new(0, 300)).branch(TargetSpec::Exit, 1))
		.group("IdlingLevel1", vec!["Idle1_1".to_string(), "Idle1_2".to_string()])
		.build()
		.unwrap();
	Arc::new(definition)
}

#[test]
fn test_cast_roles() {
	let definition = cast();
	let roles = definition.roles();
	assert_eq!(definition.state_name(roles.default_state), "RestPose");
	assert_eq!(definition.state_name(roles.idle_state), "Idle1_1");
	assert_eq!(definition.state_name(roles.return_state), "RestPose");
	assert_eq!(definition.state_name(roles.exit_state), "Goodbye");
	assert_eq!(definition.idle_states().count(), 2);
}
