//! A character driven by a single tick loop.
//!
//! The [`Agent`] owns the scheduler and the interaction state machine, so
//! every change to playback happens on the thread calling [`Agent::tick`] or
//! [`Agent::handle`]. Other threads (a chat front end, a command line) talk to
//! it through a [`RequestSender`]: requests go into a bounded queue that the
//! agent drains once per tick and never waits on.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError, bounded};
use kairu_types::model::CharacterDefinition;
use rand::{SeedableRng, rngs::SmallRng};

use crate::{
	Interaction, InteractionState, PlaybackConfig, PlaybackEvent, PlaybackWarning, RequestError,
	Scheduler, Stimulus,
};

/// Request delivered through the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
	/// Play an animation or `#group`, superseding earlier requests
	Animate(String),
	/// Play an animation after the ones already requested
	Enqueue(String),
	/// Show (`Some`) or hide (`None`) balloon text
	Say(Option<String>),
	/// Go back to the return state
	Return,
	/// Play the exit animation and leave
	Exit,
}

/// Cloneable handle for queuing requests from any thread.
#[derive(Debug, Clone)]
pub struct RequestSender {
	tx: Sender<Request>,
}

impl RequestSender {
	/// Queues a request without blocking.
	///
	/// # Errors
	///
	/// Returns [`RequestError::QueueFull`] when the queue is at capacity and
	/// [`RequestError::Disconnected`] when the agent is gone.
	pub fn send(&self, request: Request) -> Result<(), RequestError> {
		self.tx.try_send(request).map_err(|err| match err {
			TrySendError::Full(_) => RequestError::QueueFull,
			TrySendError::Disconnected(_) => RequestError::Disconnected,
		})
	}

	/// Queues [`Request::Animate`].
	///
	/// # Errors
	///
	/// See [`RequestSender::send`].
	pub fn animate(&self, name: impl Into<String>) -> Result<(), RequestError> {
		self.send(Request::Animate(name.into()))
	}

	/// Queues [`Request::Say`].
	///
	/// # Errors
	///
	/// See [`RequestSender::send`].
	pub fn say(&self, text: Option<String>) -> Result<(), RequestError> {
		self.send(Request::Say(text))
	}
}

/// Whether the host should keep running the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentStatus {
	/// Keep ticking
	Running,
	/// The exit animation has finished
	Exit,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutput {
	/// Events in emission order
	pub events: Vec<PlaybackEvent>,
	/// Warnings raised by queued requests
	pub warnings: Vec<PlaybackWarning>,
	/// Status after the tick
	pub status: AgentStatus,
}

/// One on-screen character.
#[derive(Debug)]
pub struct Agent {
	scheduler: Scheduler,
	interaction: Interaction,
	tx: Sender<Request>,
	rx: Receiver<Request>,
	balloon: Option<String>,
}

impl Agent {
	/// Creates an agent seeded from the operating system.
	pub fn new(definition: Arc<CharacterDefinition>, config: PlaybackConfig) -> Self {
		Self::with_rng(definition, config, SmallRng::from_os_rng())
	}

	/// Creates an agent with a fixed seed.
	pub fn with_seed(definition: Arc<CharacterDefinition>, config: PlaybackConfig, seed: u64) -> Self {
		Self::with_rng(definition, config, SmallRng::seed_from_u64(seed))
	}

	/// Creates an agent using `rng` for every random choice.
	pub fn with_rng(definition: Arc<CharacterDefinition>, config: PlaybackConfig, rng: SmallRng) -> Self {
		let (tx, rx) = bounded(config.request_queue_capacity.max(1));
		Self {
			scheduler: Scheduler::with_rng(definition, config, rng),
			interaction: Interaction::new(),
			tx,
			rx,
			balloon: None,
		}
	}

	/// Handle for queuing requests.
	pub fn sender(&self) -> RequestSender {
		RequestSender {
			tx: self.tx.clone(),
		}
	}

	/// Scheduler.
	pub fn scheduler(&self) -> &Scheduler {
		&self.scheduler
	}

	/// Interaction state machine.
	pub fn interaction(&self) -> &Interaction {
		&self.interaction
	}

	/// Balloon text currently shown.
	pub fn balloon(&self) -> Option<&str> {
		self.balloon.as_deref()
	}

	/// Current status.
	pub fn status(&self) -> AgentStatus {
		if self.interaction.is_exiting() {
			AgentStatus::Exit
		} else {
			AgentStatus::Running
		}
	}

	/// Shows the character by playing its default state.
	pub fn show(&mut self) -> Vec<PlaybackEvent> {
		let id = self.scheduler.definition().roles().default_state;
		log::info!("Showing {}", self.scheduler.definition().metadata().name());
		self.scheduler.interrupt(id)
	}

	/// Applies a stimulus immediately.
	///
	/// # Errors
	///
	/// Returns a warning for animation requests that cannot be honored.
	pub fn handle(&mut self, stimulus: Stimulus) -> Result<Vec<PlaybackEvent>, PlaybackWarning> {
		self.interaction.handle(&mut self.scheduler, stimulus)
	}

	/// Drains the request queue, then advances playback by `delta_ms`.
	pub fn tick(&mut self, delta_ms: u64) -> TickOutput {
		let mut events = Vec::new();
		let mut warnings = Vec::new();

		loop {
			let request = match self.rx.try_recv() {
				Ok(request) => request,
				Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
			};
			match self.apply(request) {
				Ok(mut emitted) => events.append(&mut emitted),
				Err(warning) => warnings.push(warning),
			}
		}

		let emitted = self.scheduler.tick(delta_ms);
		self.interaction.observe(&self.scheduler, &emitted);
		events.extend(emitted);

		events.extend(self.interaction.tick_idle(&mut self.scheduler, delta_ms));

		TickOutput {
			events,
			warnings,
			status: self.status(),
		}
	}

	fn apply(&mut self, request: Request) -> Result<Vec<PlaybackEvent>, PlaybackWarning> {
		log::debug!("Request {request:?}");
		match request {
			Request::Animate(name) => self.handle(Stimulus::StartAnimation(name)),
			Request::Return => self.handle(Stimulus::RequestReturn),
			Request::Exit => self.handle(Stimulus::RequestExit),
			Request::Enqueue(name) => {
				if self.interaction.state() == InteractionState::ExitRequested
					|| self.interaction.is_exiting()
				{
					return Err(PlaybackWarning::Exiting {
						name,
					});
				}
				self.scheduler.enqueue(&name)
			}
			Request::Say(text) => {
				self.balloon.clone_from(&text);
				Ok(vec![PlaybackEvent::Balloon {
					text,
				}])
			}
		}
	}
}
