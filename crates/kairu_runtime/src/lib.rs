//! Playback runtime for the `kairu-rs` project.
//!
//! Plays a decoded [`kairu_types::model::CharacterDefinition`]:
//!
//! - [`Scheduler`] moves a [`RuntimeCursor`] through frames and states as
//!   time passes and reports [`PlaybackEvent`]s
//! - [`Interaction`] turns pointer input and commands into scheduler requests
//! - [`Agent`] bundles both behind a single tick loop fed by a bounded request
//!   queue
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kairu_runtime::{Agent, AgentStatus, PlaybackConfig};
//! use kairu_types::file::acs;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let definition = Arc::new(acs::File::open("merlin.acs")?.into_definition());
//! let mut agent = Agent::new(definition, PlaybackConfig::default());
//! let requests = agent.sender();
//!
//! agent.show();
//! requests.animate("Greet")?;
//! while agent.tick(10).status == AgentStatus::Running {
//!     // render, sleep
//! #   break;
//! }
//! # Ok(())
//! # }
//! ```

mod agent;
mod config;
mod cursor;
mod error;
mod event;
mod interaction;
mod scheduler;

#[cfg(test)]
mod tests;

pub use agent::{Agent, AgentStatus, Request, RequestSender, TickOutput};
pub use config::PlaybackConfig;
pub use cursor::RuntimeCursor;
pub use error::{PlaybackWarning, RequestError};
pub use event::PlaybackEvent;
pub use interaction::{Interaction, InteractionState, Stimulus};
pub use scheduler::{Scheduler, SchedulerState};
