//! Pointer and command handling on top of the scheduler.
//!
//! | State           | Entered by                       | Left by                      |
//! |-----------------|----------------------------------|------------------------------|
//! | `Idle`          | start, pointer up                | pointer down, exit request   |
//! | `Dragging`      | pointer down on the character    | pointer up, exit request     |
//! | `ExitRequested` | secondary double click, exit     | exit animation finishing     |
//! | `Exiting`       | exit animation finishing         | never                        |
//!
//! Dragging only moves the character origin; the animation keeps playing
//! underneath and is the same one when the pointer is released.

use std::fmt;

use kairu_types::model::Point;
use rand::Rng;

use crate::{PlaybackEvent, PlaybackWarning, Scheduler};

/// Interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
	/// Waiting for input
	#[default]
	Idle,
	/// The character follows the pointer
	Dragging,
	/// The exit animation plays
	ExitRequested,
	/// The exit animation finished; the host should shut down
	Exiting,
}

impl fmt::Display for InteractionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Idle => write!(f, "Idle"),
			Self::Dragging => write!(f, "Dragging"),
			Self::ExitRequested => write!(f, "ExitRequested"),
			Self::Exiting => write!(f, "Exiting"),
		}
	}
}

/// Input delivered to a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stimulus {
	/// Primary button pressed at a screen position
	PointerDown(Point),
	/// Pointer moved
	PointerMove(Point),
	/// Primary button released
	PointerUp(Point),
	/// Primary button double click
	PrimaryDoubleClick,
	/// Secondary button click
	SecondaryClick,
	/// Secondary button double click
	SecondaryDoubleClick,
	/// Play an animation (or `#group`) by name
	StartAnimation(String),
	/// Go back to the return state
	RequestReturn,
	/// Play the exit animation and leave
	RequestExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
	grab: Point,
	origin: Point,
}

/// Interaction state machine of one character.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
	state: InteractionState,
	drag: Option<Drag>,
	idle_countdown: Option<u64>,
}

impl Interaction {
	/// Creates an idle state machine.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current state.
	pub fn state(&self) -> InteractionState {
		self.state
	}

	/// Returns `true` once the host should shut down.
	pub fn is_exiting(&self) -> bool {
		self.state == InteractionState::Exiting
	}

	/// Time left before an idle animation starts, when counting down.
	pub fn idle_countdown(&self) -> Option<u64> {
		self.idle_countdown
	}

	/// Applies a stimulus.
	///
	/// # Errors
	///
	/// Returns a warning for animation requests that cannot be honored; the
	/// scheduler is left untouched in that case.
	pub fn handle(
		&mut self,
		scheduler: &mut Scheduler,
		stimulus: Stimulus,
	) -> Result<Vec<PlaybackEvent>, PlaybackWarning> {
		if self.state == InteractionState::Exiting {
			log::debug!("Ignoring {stimulus:?} while exiting");
			return Ok(Vec::new());
		}

		let events = match stimulus {
			Stimulus::PointerDown(at) => self.pointer_down(scheduler, at),
			Stimulus::PointerMove(at) => self.drag_to(scheduler, at),
			Stimulus::PointerUp(at) => {
				let events = self.drag_to(scheduler, at);
				if self.drag.take().is_some() {
					self.state = InteractionState::Idle;
				}
				events
			}
			Stimulus::PrimaryDoubleClick => self.play_random_idle(scheduler),
			Stimulus::SecondaryClick => {
				if self.state == InteractionState::Idle {
					scheduler.request_return()
				} else {
					Vec::new()
				}
			}
			Stimulus::RequestReturn => {
				if self.state == InteractionState::ExitRequested {
					Vec::new()
				} else {
					scheduler.request_return()
				}
			}
			Stimulus::SecondaryDoubleClick => {
				if self.state == InteractionState::Idle {
					self.request_exit(scheduler)
				} else {
					Vec::new()
				}
			}
			Stimulus::RequestExit => {
				if self.state == InteractionState::ExitRequested {
					Vec::new()
				} else {
					self.request_exit(scheduler)
				}
			}
			Stimulus::StartAnimation(name) => {
				if self.state == InteractionState::ExitRequested {
					let warning = PlaybackWarning::Exiting {
						name,
					};
					log::warn!("{warning}");
					return Err(warning);
				}
				scheduler.request_interrupt(&name)?
			}
		};

		self.observe(scheduler, &events);
		Ok(events)
	}

	/// Reacts to scheduler output: an exit animation finishing moves the
	/// machine to [`InteractionState::Exiting`].
	pub fn observe(&mut self, scheduler: &Scheduler, events: &[PlaybackEvent]) {
		if self.state == InteractionState::ExitRequested
			&& scheduler.is_stopped()
			&& events.iter().any(PlaybackEvent::is_finished)
		{
			log::info!("Exit animation finished");
			self.state = InteractionState::Exiting;
		}
	}

	/// Counts down to the next idle animation while nothing plays.
	pub fn tick_idle(&mut self, scheduler: &mut Scheduler, delta_ms: u64) -> Vec<PlaybackEvent> {
		if !scheduler.config().auto_idle
			|| self.state != InteractionState::Idle
			|| !scheduler.is_stopped()
		{
			self.idle_countdown = None;
			return Vec::new();
		}

		let remaining = match self.idle_countdown {
			Some(remaining) => remaining,
			None => {
				let range = scheduler.config().idle_delay_range();
				scheduler.rng_mut().random_range(range)
			}
		};
		if remaining > delta_ms {
			self.idle_countdown = Some(remaining - delta_ms);
			return Vec::new();
		}

		self.idle_countdown = None;
		self.play_random_idle(scheduler)
	}

	fn pointer_down(&mut self, scheduler: &Scheduler, at: Point) -> Vec<PlaybackEvent> {
		if self.state != InteractionState::Idle || !hit_test(scheduler, at) {
			return Vec::new();
		}
		self.state = InteractionState::Dragging;
		self.drag = Some(Drag {
			grab: at,
			origin: scheduler.origin(),
		});
		Vec::new()
	}

	fn drag_to(&mut self, scheduler: &mut Scheduler, at: Point) -> Vec<PlaybackEvent> {
		let Some(drag) = self.drag else {
			return Vec::new();
		};
		let origin = drag.origin.offset_by(drag.grab.delta_to(at));
		if origin == scheduler.origin() {
			return Vec::new();
		}
		scheduler.set_origin(origin);
		scheduler.current_frame_event().into_iter().collect()
	}

	fn play_random_idle(&mut self, scheduler: &mut Scheduler) -> Vec<PlaybackEvent> {
		if self.state != InteractionState::Idle || !scheduler.is_stopped() {
			return Vec::new();
		}
		let definition = std::sync::Arc::clone(scheduler.definition());
		let picked = if scheduler.config().idle_all_states {
			definition.random_state(scheduler.rng_mut())
		} else {
			definition.random_idle(scheduler.rng_mut())
		};
		let id = picked.unwrap_or(definition.roles().idle_state);
		log::debug!("Idling with {}", definition.state_name(id));
		scheduler.interrupt(id)
	}

	fn request_exit(&mut self, scheduler: &mut Scheduler) -> Vec<PlaybackEvent> {
		self.drag = None;
		self.idle_countdown = None;
		self.state = InteractionState::ExitRequested;
		scheduler.request_exit()
	}
}

/// Returns `true` when `at` lies on the character rectangle.
fn hit_test(scheduler: &Scheduler, at: Point) -> bool {
	let origin = scheduler.origin();
	let definition = scheduler.definition();
	let offset = origin.delta_to(at);
	offset.x >= 0
		&& offset.y >= 0
		&& offset.x < i32::from(definition.width())
		&& offset.y < i32::from(definition.height())
}
