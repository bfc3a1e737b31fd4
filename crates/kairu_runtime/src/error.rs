//! Runtime error types.
//!
//! Nothing here is fatal: playback keeps running after any of these, and the
//! cursor is left exactly as it was before the failed request.

use thiserror::Error;

/// Non-fatal condition reported by a playback request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackWarning {
	/// No state (or state group) with that name exists
	#[error("Unknown animation {name:?}")]
	UnknownAnimation {
		/// Requested name
		name: String,
	},

	/// `start` was called while a non-interruptible animation is playing
	#[error("Animation {current:?} cannot be interrupted")]
	NotInterruptible {
		/// Name of the playing state
		current: String,
	},

	/// The character is leaving and ignores further animation requests
	#[error("Character is exiting, request for {name:?} ignored")]
	Exiting {
		/// Requested name
		name: String,
	},
}

/// Failure to deliver a request to an [`crate::Agent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RequestError {
	/// The bounded request queue is full
	#[error("Request queue is full")]
	QueueFull,

	/// The agent has been dropped
	#[error("Agent is gone")]
	Disconnected,
}
