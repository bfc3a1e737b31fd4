//! Dragging a character while it animates

use kairu_rs::prelude::*;

use crate::character::cast;

#[test_log::test]
fn test_drag_follows_pointer() {
	let mut agent = Agent::with_seed(cast(), PlaybackConfig::manual(), 1);
	agent.show();
	agent.handle(Stimulus::StartAnimation("Idle1_1".to_string())).unwrap();
	agent.tick(50);
	let before = agent.scheduler().cursor().copied();

	let path = [Point::new(10, 10), Point::new(25, 40), Point::new(-5, 60)];
	agent.handle(Stimulus::PointerDown(Point::new(4, 4))).unwrap();
	assert_eq!(agent.interaction().state(), InteractionState::Dragging);

	let mut positions = Vec::new();
	for &at in &path {
		for event in agent.handle(Stimulus::PointerMove(at)).unwrap() {
			if let PlaybackEvent::FrameChanged {
				position,
				..
			} = event
			{
				positions.push(position);
			}
		}
	}
	agent.handle(Stimulus::PointerUp(Point::new(-5, 60))).unwrap();

	// grabbed 4 pixels into the character
	assert_eq!(positions, vec![Point::new(6, 6), Point::new(21, 36), Point::new(-9, 56)]);
	assert_eq!(agent.scheduler().origin(), Point::new(-9, 56));
	assert_eq!(agent.scheduler().cursor().copied(), before);
	assert_eq!(agent.interaction().state(), InteractionState::Idle);
}

#[test]
fn test_frame_offsets_follow_origin() {
	let mut agent = Agent::with_seed(cast(), PlaybackConfig::manual(), 1);
	agent.handle(Stimulus::PointerDown(Point::new(0, 0))).unwrap();
	agent.handle(Stimulus::PointerUp(Point::new(100, 200))).unwrap();
	assert_eq!(agent.scheduler().origin(), Point::new(100, 200));

	agent.handle(Stimulus::StartAnimation("Greet".to_string())).unwrap();
	let events = agent.tick(100).events;
	assert!(events.contains(&PlaybackEvent::FrameChanged {
		state: agent.scheduler().definition().state_id("Greet").unwrap(),
		frame: 1,
		image: Some(4),
		position: Point::new(100, 198),
	}));
}

#[test]
fn test_secondary_click_returns() {
	let mut agent = Agent::with_seed(cast(), PlaybackConfig::manual(), 1);
	agent.handle(Stimulus::StartAnimation("Idle1_2".to_string())).unwrap();
	let events = agent.handle(Stimulus::SecondaryClick).unwrap();
	let rest = agent.scheduler().definition().state_id("RestPose").unwrap();
	assert_eq!(agent.scheduler().cursor().map(RuntimeCursor::state), Some(rest));
	assert_eq!(events.len(), 1);
}
