use std::sync::Arc;

use kairu_types::model::{
	CharacterDefinition, Compression, FrameStep, ImageFrame, Point, RoleNames, SoundCue, StateId,
	StateSpec, TargetSpec,
};

use crate::*;

fn pixel() -> ImageFrame {
	ImageFrame::new(1, 1, Compression::Stored, vec![1]).unwrap()
}

/// Character used throughout the runtime tests.
fn character() -> Arc<CharacterDefinition> {
	let definition = CharacterDefinition::builder()
		.size(10, 10)
		.images(vec![pixel(), pixel(), pixel(), pixel()])
		.sounds(vec![SoundCue::new(vec![0]), SoundCue::new(vec![1]), SoundCue::new(vec![2])])
		.state(StateSpec::new("RestPose").frame(FrameStep::new(0, 100)).branch(TargetSpec::Exit, 1))
		.state(
			StateSpec::new("Idle1_1")
				.frame(FrameStep::new(0, 500))
				.branch(TargetSpec::state("Idle1_1"), 1)
				.idle(true),
		)
		.state(
			StateSpec::new("Greet")
				.frame(FrameStep::new(1, 300))
				.frame(FrameStep::new(2, 300))
				.branch(TargetSpec::Exit, 1),
		)
		.state(
			StateSpec::new("Busy")
				.frame(FrameStep::new(0, 100).with_exit_frame(2))
				.frame(FrameStep::new(1, 100))
				.frame(FrameStep::new(2, 100))
				.branch(TargetSpec::Exit, 1)
				.interruptible(false),
		)
		.state(
			StateSpec::new("Chime")
				.frame(FrameStep::new(0, 10).with_sound(0))
				.frame(FrameStep::new(1, 10).with_sound(1))
				.frame(FrameStep::new(2, 10).with_sound(2))
				.branch(TargetSpec::Exit, 1),
		)
		.state(
			StateSpec::new("Blink")
				.frame(FrameStep::new(0, 0).with_sound(0))
				.frame(FrameStep::new(1, 100))
				.branch(TargetSpec::Exit, 1),
		)
		.state(StateSpec::new("Jump").branch(TargetSpec::state("Greet"), 1))
		.state(StateSpec::new("Stuck").frame(FrameStep::new(0, 50)).branch(TargetSpec::Exit, 0))
		.state(
			StateSpec::new("Loop")
				.frame(FrameStep::new(0, 100).with_branch(0, 100).with_exit_frame(1))
				.branch(TargetSpec::Exit, 1)
				.interruptible(false),
		)
		.state(
			StateSpec::new("Goodbye")
				.frame(FrameStep::new(3, 200))
				.branch(TargetSpec::state("Idle1_1"), 1),
		)
		.build()
		.unwrap();
	Arc::new(definition)
}

fn scheduler() -> Scheduler {
	Scheduler::with_seed(character(), PlaybackConfig::manual(), 42)
}

fn id(scheduler: &Scheduler, name: &str) -> StateId {
	scheduler.definition().state_id(name).unwrap()
}

fn frame_changed(state: StateId, frame: usize, image: u32) -> PlaybackEvent {
	PlaybackEvent::FrameChanged {
		state,
		frame,
		image: Some(image),
		position: Point::default(),
	}
}

fn frame_changes(events: &[PlaybackEvent]) -> usize {
	events.iter().filter(|e| e.is_frame_change()).count()
}

#[test_log::test]
fn test_greet_example() {
	let definition = CharacterDefinition::builder()
		.images(vec![pixel(), pixel(), pixel()])
		.state(
			StateSpec::new("Idle")
				.frame(FrameStep::new(0, 500))
				.branch(TargetSpec::state("Idle"), 1),
		)
		.state(
			StateSpec::new("Greet")
				.frame(FrameStep::new(1, 300))
				.frame(FrameStep::new(2, 300))
				.branch(TargetSpec::Exit, 1),
		)
		.roles(RoleNames {
			exit_state: Some("Greet".to_string()),
			..RoleNames::default()
		})
		.build()
		.unwrap();
	let mut scheduler = Scheduler::with_seed(Arc::new(definition), PlaybackConfig::manual(), 1);
	let greet = id(&scheduler, "Greet");

	let events = scheduler.start("Greet").unwrap();
	assert_eq!(events, vec![frame_changed(greet, 0, 1)]);

	assert_eq!(scheduler.tick(650), vec![frame_changed(greet, 1, 2)]);
	assert_eq!(scheduler.tick(1), vec![PlaybackEvent::AnimationFinished {
		state: greet,
		name: "Greet".to_string(),
	}]);
	assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[test]
fn test_finished_exactly_once() {
	let mut scheduler = scheduler();
	scheduler.start("Greet").unwrap();

	let mut events = Vec::new();
	for _ in 0..20 {
		events.extend(scheduler.tick(100));
	}
	let finished: Vec<usize> =
		events.iter().enumerate().filter(|(_, e)| e.is_finished()).map(|(i, _)| i).collect();
	assert_eq!(finished.len(), 1);
	assert_eq!(frame_changes(&events[finished[0]..]), 0);
	assert!(scheduler.is_stopped());
}

#[test]
fn test_long_tick_fires_every_cue() {
	let mut scheduler = scheduler();
	let chime = id(&scheduler, "Chime");

	let events = scheduler.start("Chime").unwrap();
	assert_eq!(events.len(), 2);

	let events = scheduler.tick(25);
	assert_eq!(events, vec![
		frame_changed(chime, 1, 1),
		PlaybackEvent::CueFired {
			state: chime,
			frame: 1,
			sound: Some(1),
			text: None,
		},
		frame_changed(chime, 2, 2),
		PlaybackEvent::CueFired {
			state: chime,
			frame: 2,
			sound: Some(2),
			text: None,
		},
	]);
	assert_eq!(scheduler.cursor().unwrap().elapsed_ms(), 5);
}

#[test_log::test]
fn test_unknown_animation_leaves_cursor_unchanged() {
	let mut scheduler = scheduler();
	scheduler.start("Greet").unwrap();
	scheduler.tick(120);
	let before = *scheduler.cursor().unwrap();

	let err = scheduler.request_interrupt("Unknown").unwrap_err();
	assert_eq!(err, PlaybackWarning::UnknownAnimation {
		name: "Unknown".to_string(),
	});
	assert!(scheduler.start("Unknown").is_err());
	assert!(scheduler.request_interrupt("#NoSuchGroup").is_err());

	assert_eq!(scheduler.cursor(), Some(&before));
	assert_eq!(scheduler.state(), SchedulerState::Playing);
	assert_eq!(scheduler.pending().count(), 0);
}

#[test]
fn test_uninterruptible_state_queues_request() {
	let mut scheduler = scheduler();
	let busy = id(&scheduler, "Busy");
	let greet = id(&scheduler, "Greet");
	scheduler.start("Busy").unwrap();

	assert!(matches!(scheduler.start("Greet"), Err(PlaybackWarning::NotInterruptible { .. })));
	assert_eq!(scheduler.request_interrupt("Greet").unwrap(), vec![]);
	assert_eq!(scheduler.state(), SchedulerState::Interrupted);

	// the pending request makes frame 0 take its exit branch to frame 2
	assert_eq!(scheduler.tick(100), vec![frame_changed(busy, 2, 2)]);
	assert_eq!(scheduler.tick(100), vec![]);
	assert_eq!(scheduler.tick(1), vec![frame_changed(greet, 0, 1)]);
	assert_eq!(scheduler.state(), SchedulerState::Playing);
}

#[test]
fn test_later_request_supersedes_pending() {
	let mut scheduler = scheduler();
	scheduler.start("Busy").unwrap();
	scheduler.request_interrupt("Greet").unwrap();
	scheduler.request_interrupt("Chime").unwrap();
	assert_eq!(scheduler.pending().collect::<Vec<_>>(), vec![id(&scheduler, "Chime")]);

	scheduler.enqueue("Greet").unwrap();
	assert_eq!(scheduler.pending().collect::<Vec<_>>(), vec![
		id(&scheduler, "Chime"),
		id(&scheduler, "Greet")
	]);
}

#[test]
fn test_frame_branch_loops_until_exit_frame() {
	let mut scheduler = scheduler();
	let lp = id(&scheduler, "Loop");
	scheduler.start("Loop").unwrap();

	let events = scheduler.tick(1000);
	assert_eq!(frame_changes(&events), 10);
	assert_eq!(scheduler.cursor().unwrap().state(), lp);

	scheduler.request_interrupt("Greet").unwrap();
	assert_eq!(scheduler.tick(100), vec![]);
	assert!(scheduler.cursor().unwrap().is_at_end());
	assert_eq!(scheduler.tick(0), vec![frame_changed(id(&scheduler, "Greet"), 0, 1)]);
}

#[test]
fn test_exit_state_is_terminal() {
	let mut scheduler = scheduler();
	let goodbye = id(&scheduler, "Goodbye");
	scheduler.start("Idle1_1").unwrap();

	assert_eq!(scheduler.request_exit(), vec![frame_changed(goodbye, 0, 3)]);
	scheduler.tick(200);
	// Goodbye branches to Idle1_1, but an exit request stops after it
	assert_eq!(scheduler.tick(1), vec![PlaybackEvent::AnimationFinished {
		state: goodbye,
		name: "Goodbye".to_string(),
	}]);
	assert!(scheduler.is_stopped());
}

#[test_log::test]
fn test_exit_state_without_frames_stops_at_once() {
	let definition = CharacterDefinition::builder()
		.images(vec![pixel()])
		.state(StateSpec::new("RestPose").frame(FrameStep::new(0, 100)).branch(TargetSpec::Exit, 1))
		.state(StateSpec::new("Hide").branch(TargetSpec::state("RestPose"), 1))
		.build()
		.unwrap();
	let mut scheduler = Scheduler::with_seed(Arc::new(definition), PlaybackConfig::manual(), 3);
	let mut interaction = Interaction::new();
	let hide = id(&scheduler, "Hide");
	scheduler.start("RestPose").unwrap();

	let events = interaction.handle(&mut scheduler, Stimulus::RequestExit).unwrap();
	assert_eq!(events, vec![PlaybackEvent::AnimationFinished {
		state: hide,
		name: "Hide".to_string(),
	}]);
	assert!(scheduler.is_stopped());
	assert_eq!(interaction.state(), InteractionState::Exiting);
}

fn hiding_character() -> Arc<CharacterDefinition> {
	let definition = CharacterDefinition::builder()
		.images(vec![pixel(), pixel()])
		.state(StateSpec::new("RestPose").frame(FrameStep::new(0, 100)).branch(TargetSpec::Exit, 1))
		.state(StateSpec::new("Hide").frame(FrameStep::new(0, 100)).branch(TargetSpec::Exit, 1))
		.state(StateSpec::new("Show").frame(FrameStep::new(1, 100)).branch(TargetSpec::Exit, 1))
		.group("Showing", vec!["Show".to_string()])
		.build()
		.unwrap();
	Arc::new(definition)
}

#[test]
fn test_hide_reappears_with_showing_state() {
	let mut scheduler = Scheduler::with_seed(hiding_character(), PlaybackConfig::manual(), 5);
	let show = id(&scheduler, "Show");
	scheduler.start("Hide").unwrap();

	assert_eq!(scheduler.tick(100), vec![]);
	assert_eq!(scheduler.tick(1), vec![frame_changed(show, 0, 1)]);
	assert_eq!(scheduler.tick(99), vec![]);
	assert_eq!(scheduler.tick(1), vec![PlaybackEvent::AnimationFinished {
		state: show,
		name: "Show".to_string(),
	}]);
}

#[test]
fn test_hide_stays_hidden_when_reappearing_is_off_or_exiting() {
	let config = PlaybackConfig {
		reappear_after_hide: false,
		..PlaybackConfig::manual()
	};
	let mut scheduler = Scheduler::with_seed(hiding_character(), config, 5);
	let hide = id(&scheduler, "Hide");
	let finished = PlaybackEvent::AnimationFinished {
		state: hide,
		name: "Hide".to_string(),
	};
	scheduler.start("Hide").unwrap();
	scheduler.tick(100);
	assert_eq!(scheduler.tick(1), vec![finished.clone()]);

	let mut scheduler = Scheduler::with_seed(hiding_character(), PlaybackConfig::manual(), 5);
	scheduler.start("RestPose").unwrap();
	assert_eq!(scheduler.request_exit(), vec![frame_changed(hide, 0, 0)]);
	scheduler.tick(100);
	assert_eq!(scheduler.tick(1), vec![finished]);
	assert!(scheduler.is_stopped());
}

#[test]
fn test_idle_draws_from_every_state_when_configured() {
	let pick = |config: PlaybackConfig| {
		let mut scheduler = Scheduler::with_seed(character(), config, 11);
		let mut interaction = Interaction::new();
		let mut picked = std::collections::HashSet::new();
		for _ in 0..50 {
			interaction.handle(&mut scheduler, Stimulus::PrimaryDoubleClick).unwrap();
			picked.insert(scheduler.cursor().unwrap().state());
			scheduler.stop();
		}
		picked
	};

	let idle = character().state_id("Idle1_1").unwrap();
	assert_eq!(pick(PlaybackConfig::manual()).into_iter().collect::<Vec<_>>(), vec![idle]);

	let everything = pick(PlaybackConfig {
		idle_all_states: true,
		..PlaybackConfig::manual()
	});
	assert!(everything.len() > 1);
	assert!(everything.iter().any(|&state| state != idle));
}

#[test]
fn test_zero_weights_fall_back_to_return_state() {
	let mut scheduler = scheduler();
	scheduler.start("Stuck").unwrap();
	scheduler.tick(50);
	assert_eq!(scheduler.tick(1), vec![frame_changed(id(&scheduler, "RestPose"), 0, 0)]);
	assert_eq!(scheduler.cursor().unwrap().elapsed_ms(), 1);
}

#[test]
fn test_empty_sequence_branches_immediately() {
	let mut scheduler = scheduler();
	let events = scheduler.start("Jump").unwrap();
	assert_eq!(events, vec![frame_changed(id(&scheduler, "Greet"), 0, 1)]);
}

#[test]
fn test_zero_duration_frames() {
	let mut scheduler = scheduler();
	let blink = id(&scheduler, "Blink");
	let cue = PlaybackEvent::CueFired {
		state: blink,
		frame: 0,
		sound: Some(0),
		text: None,
	};

	assert_eq!(scheduler.start("Blink").unwrap(), vec![cue.clone(), frame_changed(blink, 1, 1)]);

	let config = PlaybackConfig {
		emit_zero_duration_frames: true,
		..PlaybackConfig::manual()
	};
	let mut scheduler = Scheduler::with_seed(character(), config, 42);
	assert_eq!(scheduler.start("Blink").unwrap(), vec![
		frame_changed(blink, 0, 0),
		cue,
		frame_changed(blink, 1, 1)
	]);
}

#[test]
fn test_speed_scaling() {
	let config = PlaybackConfig {
		speed_percent: 200,
		..PlaybackConfig::manual()
	};
	let mut scheduler = Scheduler::with_seed(character(), config, 42);
	let greet = id(&scheduler, "Greet");
	scheduler.start("Greet").unwrap();
	assert_eq!(scheduler.tick(150), vec![frame_changed(greet, 1, 2)]);

	scheduler.set_speed(50);
	scheduler.tick(1);
	scheduler.tick(1);
	assert_eq!(scheduler.cursor().unwrap().elapsed_ms(), 1);
}

#[test]
fn test_drag_keeps_animation() {
	let mut scheduler = scheduler();
	let mut interaction = Interaction::new();
	let idle = id(&scheduler, "Idle1_1");
	scheduler.start("Idle1_1").unwrap();
	scheduler.tick(120);
	let before = *scheduler.cursor().unwrap();

	let events = interaction.handle(&mut scheduler, Stimulus::PointerDown(Point::new(0, 0))).unwrap();
	assert!(events.is_empty());
	assert_eq!(interaction.state(), InteractionState::Dragging);

	let events = interaction.handle(&mut scheduler, Stimulus::PointerMove(Point::new(5, 5))).unwrap();
	assert_eq!(events, vec![PlaybackEvent::FrameChanged {
		state: idle,
		frame: 0,
		image: Some(0),
		position: Point::new(5, 5),
	}]);
	interaction.handle(&mut scheduler, Stimulus::PointerMove(Point::new(40, -3))).unwrap();
	interaction.handle(&mut scheduler, Stimulus::PointerUp(Point::new(40, -3))).unwrap();

	assert_eq!(interaction.state(), InteractionState::Idle);
	assert_eq!(scheduler.origin(), Point::new(40, -3));
	assert_eq!(scheduler.cursor(), Some(&before));
}

#[test]
fn test_pointer_down_outside_character() {
	let mut scheduler = scheduler();
	let mut interaction = Interaction::new();
	scheduler.set_origin(Point::new(100, 100));
	interaction.handle(&mut scheduler, Stimulus::PointerDown(Point::new(99, 105))).unwrap();
	assert_eq!(interaction.state(), InteractionState::Idle);
	interaction.handle(&mut scheduler, Stimulus::PointerDown(Point::new(109, 109))).unwrap();
	assert_eq!(interaction.state(), InteractionState::Dragging);
}

#[test]
fn test_double_click_plays_idle_only_when_stopped() {
	let mut scheduler = scheduler();
	let mut interaction = Interaction::new();

	let events = interaction.handle(&mut scheduler, Stimulus::PrimaryDoubleClick).unwrap();
	assert_eq!(events, vec![frame_changed(id(&scheduler, "Idle1_1"), 0, 0)]);

	let events = interaction.handle(&mut scheduler, Stimulus::PrimaryDoubleClick).unwrap();
	assert!(events.is_empty());
}

#[test]
fn test_secondary_double_click_exits() {
	let mut scheduler = scheduler();
	let mut interaction = Interaction::new();
	scheduler.start("Greet").unwrap();

	interaction.handle(&mut scheduler, Stimulus::SecondaryDoubleClick).unwrap();
	assert_eq!(interaction.state(), InteractionState::ExitRequested);
	assert!(matches!(
		interaction.handle(&mut scheduler, Stimulus::StartAnimation("Greet".to_string())),
		Err(PlaybackWarning::Exiting { .. })
	));

	for _ in 0..3 {
		let events = scheduler.tick(100);
		interaction.observe(&scheduler, &events);
	}
	assert_eq!(interaction.state(), InteractionState::Exiting);
	assert!(interaction.is_exiting());
}

#[test]
fn test_agent_request_queue() {
	let config = PlaybackConfig {
		request_queue_capacity: 3,
		..PlaybackConfig::manual()
	};
	let mut agent = Agent::with_seed(character(), config, 7);
	let sender = agent.sender();

	sender.animate("Greet").unwrap();
	sender.animate("Nope").unwrap();
	sender.say(Some("Hello!".to_string())).unwrap();
	assert_eq!(sender.animate("Greet"), Err(RequestError::QueueFull));

	let output = agent.tick(0);
	let greet = agent.scheduler().definition().state_id("Greet").unwrap();
	assert_eq!(output.events, vec![frame_changed(greet, 0, 1), PlaybackEvent::Balloon {
		text: Some("Hello!".to_string()),
	}]);
	assert_eq!(output.warnings, vec![PlaybackWarning::UnknownAnimation {
		name: "Nope".to_string(),
	}]);
	assert_eq!(output.status, AgentStatus::Running);
	assert_eq!(agent.balloon(), Some("Hello!"));
}

#[test]
fn test_agent_exit_flow() {
	let mut agent = Agent::with_seed(character(), PlaybackConfig::manual(), 7);
	agent.show();
	agent.sender().send(Request::Exit).unwrap();

	let mut status = AgentStatus::Running;
	for _ in 0..10 {
		status = agent.tick(100).status;
	}
	assert_eq!(status, AgentStatus::Exit);
	assert!(agent.scheduler().is_stopped());
}

#[test]
fn test_agent_idles_after_delay() {
	let config = PlaybackConfig {
		auto_idle: true,
		idle_delay_min_ms: 100,
		idle_delay_max_ms: 100,
		..PlaybackConfig::default()
	};
	let mut agent = Agent::with_seed(character(), config, 7);

	assert!(agent.tick(50).events.is_empty());
	assert_eq!(agent.interaction().idle_countdown(), Some(50));
	let events = agent.tick(50).events;
	let idle = agent.scheduler().definition().state_id("Idle1_1").unwrap();
	assert_eq!(events, vec![frame_changed(idle, 0, 0)]);
}

#[test]
fn test_sender_after_agent_dropped() {
	let agent = Agent::with_seed(character(), PlaybackConfig::manual(), 7);
	let sender = agent.sender();
	drop(agent);
	assert_eq!(sender.animate("Greet"), Err(RequestError::Disconnected));
}
