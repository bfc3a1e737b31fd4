//! Frame scheduler.
//!
//! The scheduler owns the single [`RuntimeCursor`] of a character and moves
//! it through the animation graph as time passes.
//!
//! ## Timing
//!
//! Entering a frame emits `FrameChanged` followed by `CueFired` when the frame
//! carries a cue. A tick spanning several frames enters every one of them in
//! order, so no cue is skipped. When the last frame of a sequence has elapsed
//! the cursor parks at the end; the branch table is consulted on the next
//! tick, and any time left over carries into the state that follows.
//!
//! ## Requests
//!
//! | Current state             | `request_interrupt`                     |
//! |---------------------------|-----------------------------------------|
//! | stopped                   | starts the state                        |
//! | playing, interruptible    | cuts the sequence, starts the state     |
//! | playing, uninterruptible  | queued until the next branch point      |
//!
//! A queued request replaces any earlier one. While a request waits, frames
//! that name an exit frame jump to it so the animation wraps up early.

use std::{collections::VecDeque, fmt, sync::Arc};

use kairu_types::model::{
	AnimationState, BranchTarget, CharacterDefinition, FrameBranch, Point, StateId,
};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{PlaybackConfig, PlaybackEvent, PlaybackWarning, RuntimeCursor};

/// Frames entered in a single tick without consuming time before the tick
/// gives up; only reachable with loops of zero-duration frames.
const MAX_INSTANT_STEPS: usize = 4096;

/// Coarse scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerState {
	/// Nothing plays
	Stopped,
	/// A state plays
	Playing,
	/// A state plays and a request waits for its branch point
	Interrupted,
}

impl fmt::Display for SchedulerState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Stopped => write!(f, "Stopped"),
			Self::Playing => write!(f, "Playing"),
			Self::Interrupted => write!(f, "Interrupted"),
		}
	}
}

/// Drives one character through its animation graph.
#[derive(Debug, Clone)]
pub struct Scheduler {
	definition: Arc<CharacterDefinition>,
	config: PlaybackConfig,
	cursor: Option<RuntimeCursor>,
	pending: VecDeque<StateId>,
	terminal: Option<StateId>,
	origin: Point,
	speed_remainder: u64,
	rng: SmallRng,
}

impl Scheduler {
	/// Creates a stopped scheduler seeded from the operating system.
	pub fn new(definition: Arc<CharacterDefinition>, config: PlaybackConfig) -> Self {
		Self::with_rng(definition, config, SmallRng::from_os_rng())
	}

	/// Creates a stopped scheduler with a fixed seed.
	pub fn with_seed(definition: Arc<CharacterDefinition>, config: PlaybackConfig, seed: u64) -> Self {
		Self::with_rng(definition, config, SmallRng::seed_from_u64(seed))
	}

	/// Creates a stopped scheduler using `rng` for every random choice.
	pub fn with_rng(definition: Arc<CharacterDefinition>, config: PlaybackConfig, rng: SmallRng) -> Self {
		Self {
			definition,
			config,
			cursor: None,
			pending: VecDeque::new(),
			terminal: None,
			origin: Point::default(),
			speed_remainder: 0,
			rng,
		}
	}

	/// Shared character definition.
	pub fn definition(&self) -> &Arc<CharacterDefinition> {
		&self.definition
	}

	/// Active configuration.
	pub fn config(&self) -> &PlaybackConfig {
		&self.config
	}

	/// Changes the playback speed.
	pub fn set_speed(&mut self, percent: u32) {
		self.config.speed_percent = percent;
		self.speed_remainder = 0;
	}

	/// Coarse state.
	pub fn state(&self) -> SchedulerState {
		match self.cursor {
			None => SchedulerState::Stopped,
			Some(_) if self.pending.is_empty() => SchedulerState::Playing,
			Some(_) => SchedulerState::Interrupted,
		}
	}

	/// Returns `true` when nothing plays.
	pub fn is_stopped(&self) -> bool {
		self.cursor.is_none()
	}

	/// Current cursor, `None` when stopped.
	pub fn cursor(&self) -> Option<&RuntimeCursor> {
		self.cursor.as_ref()
	}

	/// Playing state.
	pub fn current_state(&self) -> Option<&AnimationState> {
		self.cursor.and_then(|c| self.definition.state(c.state))
	}

	/// Requests waiting for the next branch point, oldest first.
	pub fn pending(&self) -> impl Iterator<Item = StateId> + '_ {
		self.pending.iter().copied()
	}

	/// Character origin on screen.
	pub fn origin(&self) -> Point {
		self.origin
	}

	/// Moves the character origin; frame positions are relative to it.
	pub fn set_origin(&mut self, origin: Point) {
		self.origin = origin;
	}

	pub(crate) fn rng_mut(&mut self) -> &mut SmallRng {
		&mut self.rng
	}

	/// `FrameChanged` for the frame currently displayed, if any.
	pub fn current_frame_event(&self) -> Option<PlaybackEvent> {
		let cursor = self.cursor?;
		let state = self.definition.state(cursor.state)?;
		let frame = state.frame(cursor.frame)?;
		Some(PlaybackEvent::FrameChanged {
			state: cursor.state,
			frame: cursor.frame,
			image: frame.image(),
			position: self.origin.offset_by(frame.offset()),
		})
	}

	/// Starts a state by name.
	///
	/// Only allowed when stopped or while the playing state is interruptible.
	/// Clears queued requests.
	///
	/// # Errors
	///
	/// Returns a warning and leaves the cursor untouched when the name is
	/// unknown or the playing state cannot be interrupted.
	pub fn start(&mut self, name: &str) -> Result<Vec<PlaybackEvent>, PlaybackWarning> {
		let id = self.resolve(name)?;
		if let Some(current) = self.current_state().filter(|state| !state.is_interruptible()) {
			let warning = PlaybackWarning::NotInterruptible {
				current: current.name().to_string(),
			};
			log::warn!("{warning}");
			return Err(warning);
		}
		self.pending.clear();
		self.terminal = None;
		Ok(self.start_id(id))
	}

	/// Plays a state as soon as the current animation allows it.
	///
	/// A `#` prefix selects a random member of a state group. Supersedes any
	/// queued request.
	///
	/// # Errors
	///
	/// Returns [`PlaybackWarning::UnknownAnimation`] and leaves the cursor
	/// untouched when the name does not resolve.
	pub fn request_interrupt(&mut self, name: &str) -> Result<Vec<PlaybackEvent>, PlaybackWarning> {
		let id = self.resolve(name)?;
		Ok(self.interrupt(id))
	}

	/// Plays the return state as soon as the current animation allows it.
	pub fn request_return(&mut self) -> Vec<PlaybackEvent> {
		let id = self.definition.roles().return_state;
		self.interrupt(id)
	}

	/// Plays the exit state as soon as possible and stops after it, whatever
	/// its branch table says.
	pub fn request_exit(&mut self) -> Vec<PlaybackEvent> {
		let id = self.definition.roles().exit_state;
		self.schedule(id, Some(id))
	}

	/// Appends a state to the queue without superseding earlier requests.
	///
	/// Starts it right away when stopped.
	///
	/// # Errors
	///
	/// Returns [`PlaybackWarning::UnknownAnimation`] when the name does not
	/// resolve.
	pub fn enqueue(&mut self, name: &str) -> Result<Vec<PlaybackEvent>, PlaybackWarning> {
		let id = self.resolve(name)?;
		if self.cursor.is_none() {
			return Ok(self.start_id(id));
		}
		self.pending.push_back(id);
		Ok(Vec::new())
	}

	/// Stops playback silently and drops queued requests.
	pub fn stop(&mut self) {
		self.cursor = None;
		self.pending.clear();
		self.terminal = None;
	}

	/// Advances playback by `delta_ms` of wall-clock time.
	pub fn tick(&mut self, delta_ms: u64) -> Vec<PlaybackEvent> {
		let mut events = Vec::new();
		if self.cursor.is_none() {
			return events;
		}

		let scaled = delta_ms
			.saturating_mul(u64::from(self.config.speed_percent))
			.saturating_add(self.speed_remainder);
		self.speed_remainder = scaled % 100;
		let delta = scaled / 100;

		if let Some(cursor) = self.cursor.as_mut() {
			cursor.elapsed_ms = cursor.elapsed_ms.saturating_add(delta);
		}
		if self.cursor.is_some_and(|c| c.ended) {
			self.resolve_end(&mut events);
		}
		self.consume(&mut events);
		events
	}

	fn resolve(&mut self, name: &str) -> Result<StateId, PlaybackWarning> {
		self.definition.resolve_request(name, &mut self.rng).ok_or_else(|| {
			let warning = PlaybackWarning::UnknownAnimation {
				name: name.to_string(),
			};
			log::warn!("{warning}");
			warning
		})
	}

	/// Plays a state by id as soon as the current animation allows it.
	pub fn interrupt(&mut self, id: StateId) -> Vec<PlaybackEvent> {
		self.schedule(id, None)
	}

	/// Starts or queues `id`; playback stops once `terminal` ends.
	fn schedule(&mut self, id: StateId, terminal: Option<StateId>) -> Vec<PlaybackEvent> {
		self.pending.clear();
		self.terminal = terminal;
		if self.current_state().is_none_or(AnimationState::is_interruptible) {
			return self.start_id(id);
		}
		log::debug!("Queued {} until the next branch point", self.definition.state_name(id));
		self.pending.push_back(id);
		Vec::new()
	}

	fn start_id(&mut self, id: StateId) -> Vec<PlaybackEvent> {
		log::debug!("Starting {}", self.definition.state_name(id));
		let mut events = Vec::new();
		self.enter_state(id, 0, &mut events);
		self.consume(&mut events);
		events
	}

	/// Consumes elapsed time frame by frame until the current frame still has
	/// time left or the sequence ends.
	fn consume(&mut self, events: &mut Vec<PlaybackEvent>) {
		let definition = Arc::clone(&self.definition);
		let mut instant_steps = 0;

		while let Some(cursor) = self.cursor {
			if cursor.ended {
				break;
			}
			let Some(state) = definition.state(cursor.state) else {
				self.cursor = None;
				break;
			};
			let Some(frame) = state.frame(cursor.frame) else {
				self.park(cursor);
				break;
			};

			let duration = u64::from(frame.duration_ms);
			if cursor.elapsed_ms < duration {
				break;
			}
			if duration == 0 {
				instant_steps += 1;
				if instant_steps > MAX_INSTANT_STEPS {
					log::warn!("{} loops over zero-duration frames", state.name());
					break;
				}
			}

			let elapsed = cursor.elapsed_ms - duration;
			let next = self.next_frame(state, cursor.frame);
			if next >= state.frames().len() {
				self.park(RuntimeCursor {
					elapsed_ms: elapsed,
					..cursor
				});
				break;
			}
			self.cursor = Some(RuntimeCursor {
				frame: next,
				elapsed_ms: elapsed,
				..cursor
			});
			self.enter_frame(events);
		}
	}

	fn park(&mut self, cursor: RuntimeCursor) {
		self.cursor = Some(RuntimeCursor {
			ended: true,
			..cursor
		});
	}

	/// Index of the frame that follows `index`.
	fn next_frame(&mut self, state: &AnimationState, index: usize) -> usize {
		let Some(frame) = state.frame(index) else {
			return index + 1;
		};
		if !self.pending.is_empty() {
			if let Some(exit) = frame.exit_frame {
				return usize::from(exit);
			}
		}
		if !frame.branches.is_empty() {
			let draw = self.rng.random_range(0..FrameBranch::PERCENT_SCALE);
			if let Some(target) = frame.pick_frame_branch(draw) {
				return usize::from(target);
			}
		}
		index + 1
	}

	/// Handles a completed sequence: queued requests first, then the branch
	/// table.
	fn resolve_end(&mut self, events: &mut Vec<PlaybackEvent>) {
		let Some(cursor) = self.cursor else {
			return;
		};
		let definition = Arc::clone(&self.definition);
		let mut current = cursor.state;
		let leftover = cursor.elapsed_ms;

		// empty sequences resolve without consuming time
		for _ in 0..=definition.states().len() {
			if self.terminal == Some(current) {
				self.finish(current, events);
				return;
			}
			let next = match self.pending.pop_front() {
				Some(next) => next,
				None => match definition.select_branch(current, &mut self.rng) {
					BranchTarget::State(next) => next,
					BranchTarget::Exit => match self.reappear_state(current) {
						Some(show) => show,
						None => {
							self.finish(current, events);
							return;
						}
					},
				},
			};
			log::debug!("{} -> {}", definition.state_name(current), definition.state_name(next));

			if definition.state(next).is_some_and(|s| !s.frames().is_empty()) {
				self.enter_state(next, leftover, events);
				return;
			}
			current = next;
		}

		log::warn!("Branches of {} only reach empty states", definition.state_name(current));
		self.finish(current, events);
	}

	/// State that brings the character back after `hidden` left the screen.
	fn reappear_state(&mut self, hidden: StateId) -> Option<StateId> {
		if !self.config.reappear_after_hide || !self.definition.is_hiding_state(hidden) {
			return None;
		}
		let show = self.definition.random_showing(&mut self.rng)?;
		log::debug!("Reappearing with {}", self.definition.state_name(show));
		Some(show)
	}

	fn finish(&mut self, state: StateId, events: &mut Vec<PlaybackEvent>) {
		log::debug!("Finished {}", self.definition.state_name(state));
		self.cursor = None;
		self.pending.clear();
		self.terminal = None;
		events.push(PlaybackEvent::AnimationFinished {
			state,
			name: self.definition.state_name(state).to_string(),
		});
	}

	/// Points the cursor at the first frame of `id`.
	fn enter_state(&mut self, id: StateId, elapsed_ms: u64, events: &mut Vec<PlaybackEvent>) {
		self.cursor = Some(RuntimeCursor::at_start(id, elapsed_ms));
		let has_frames = self.definition.state(id).is_some_and(|s| !s.frames().is_empty());
		if has_frames {
			self.enter_frame(events);
		} else {
			self.resolve_end(events);
		}
	}

	/// Emits the events for the frame the cursor now points at.
	fn enter_frame(&mut self, events: &mut Vec<PlaybackEvent>) {
		let Some(cursor) = self.cursor else {
			return;
		};
		let Some(frame) = self.definition.state(cursor.state).and_then(|s| s.frame(cursor.frame))
		else {
			return;
		};

		if frame.duration_ms > 0 || self.config.emit_zero_duration_frames {
			events.push(PlaybackEvent::FrameChanged {
				state: cursor.state,
				frame: cursor.frame,
				image: frame.image(),
				position: self.origin.offset_by(frame.offset()),
			});
		}
		if frame.has_cue() {
			events.push(PlaybackEvent::CueFired {
				state: cursor.state,
				frame: cursor.frame,
				sound: frame.sound,
				text: frame.text,
			});
		}
	}
}
