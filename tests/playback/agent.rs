//! Agent driven from another thread through the request queue

use std::thread;

use kairu_rs::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};

use crate::character::cast;

fn run(agent: &mut Agent, ms: u64, step: u64) -> Vec<PlaybackEvent> {
	let mut events = Vec::new();
	for _ in 0..ms / step {
		events.extend(agent.tick(step).events);
	}
	events
}

fn names(agent: &Agent, events: &[PlaybackEvent]) -> Vec<String> {
	let definition = agent.scheduler().definition();
	let mut names: Vec<String> = Vec::new();
	for event in events {
		if let PlaybackEvent::FrameChanged {
			state,
			..
		} = event
		{
			let name = definition.state_name(*state);
			if names.last().is_none_or(|last| last != name) {
				names.push(name.to_string());
			}
		}
	}
	names
}

#[test_log::test]
fn test_requests_from_another_thread() {
	let mut agent = Agent::with_seed(cast(), PlaybackConfig::manual(), 11);
	let sender = agent.sender();

	thread::spawn(move || {
		sender.animate("Greet").unwrap();
		sender.say(Some("Hello there".to_string())).unwrap();
	})
	.join()
	.unwrap();

	let events = run(&mut agent, 500, 10);
	assert_eq!(names(&agent, &events), vec!["Greet", "RestPose"]);
	assert!(events.contains(&PlaybackEvent::Balloon {
		text: Some("Hello there".to_string())
	}));
	let cue = events.iter().find_map(|event| match event {
		PlaybackEvent::CueFired {
			sound,
			text,
			..
		} => Some((*sound, *text)),
		_ => None,
	});
	assert_eq!(cue, Some((Some(0), Some(0))));
	assert_eq!(agent.scheduler().definition().text(0), Some("Hello there"));
}

#[test_log::test]
fn test_enqueued_animations_play_in_order() {
	let mut agent = Agent::with_seed(cast(), PlaybackConfig::manual(), 11);
	let sender = agent.sender();
	sender.send(Request::Animate("Think".to_string())).unwrap();
	sender.send(Request::Enqueue("Greet".to_string())).unwrap();
	sender.send(Request::Enqueue("Goodbye".to_string())).unwrap();

	let events = run(&mut agent, 2_000, 10);
	assert_eq!(names(&agent, &events), vec!["Think", "Greet", "Goodbye"]);

	// Think jumped from frame 1 to its exit frame because Greet was waiting
	let think = agent.scheduler().definition().state_id("Think").unwrap();
	let frames: Vec<usize> = events
		.iter()
		.filter_map(|event| match event {
			PlaybackEvent::FrameChanged {
				state,
				frame,
				..
			} if *state == think => Some(*frame),
			_ => None,
		})
		.collect();
	assert_eq!(frames, vec![0, 1, 3]);
}

#[test]
fn test_idle_branches_are_reproducible() {
	let play = |seed| {
		let rng = SmallRng::seed_from_u64(seed);
		let mut agent = Agent::with_rng(cast(), PlaybackConfig::manual(), rng);
		agent.sender().animate("#IdlingLevel1").unwrap();
		let events = run(&mut agent, 20_000, 50);
		names(&agent, &events)
	};

	let first = play(3);
	assert_eq!(first, play(3));
	assert!(first.iter().all(|name| name.starts_with("Idle1_")));
	assert!(first.len() > 1);
}

#[test]
fn test_auto_idle_after_quiet_period() {
	let config = PlaybackConfig {
		idle_delay_min_ms: 1_000,
		idle_delay_max_ms: 2_000,
		..PlaybackConfig::default()
	};
	let mut agent = Agent::with_seed(cast(), config, 5);
	agent.show();

	let events = run(&mut agent, 3_000, 10);
	let played = names(&agent, &events);
	assert_eq!(played.first().map(String::as_str), Some("RestPose"));
	assert!(played[1..].iter().all(|name| name.starts_with("Idle1_")));
	assert!(played.len() > 1);
}

#[test_log::test]
fn test_exit_ignores_later_requests() {
	let mut agent = Agent::with_seed(cast(), PlaybackConfig::manual(), 5);
	agent.show();
	let sender = agent.sender();
	sender.send(Request::Exit).unwrap();
	sender.animate("Greet").unwrap();

	let output = agent.tick(10);
	assert_eq!(output.warnings, vec![PlaybackWarning::Exiting {
		name: "Greet".to_string()
	}]);

	let mut status = output.status;
	for _ in 0..40 {
		status = agent.tick(10).status;
	}
	assert_eq!(status, AgentStatus::Exit);
	assert!(agent.handle(Stimulus::PrimaryDoubleClick).unwrap().is_empty());
	assert!(agent.tick(1_000).events.is_empty());
}
