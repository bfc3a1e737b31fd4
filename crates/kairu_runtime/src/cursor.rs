//! Playback position.

use kairu_types::model::StateId;

/// Where playback currently is: the state, the frame within it and the time
/// already spent on that frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuntimeCursor {
	pub(crate) state: StateId,
	pub(crate) frame: usize,
	pub(crate) elapsed_ms: u64,
	pub(crate) ended: bool,
}

impl RuntimeCursor {
	pub(crate) fn at_start(state: StateId, elapsed_ms: u64) -> Self {
		Self {
			state,
			frame: 0,
			elapsed_ms,
			ended: false,
		}
	}

	/// Playing state.
	pub fn state(&self) -> StateId {
		self.state
	}

	/// Current frame index.
	pub fn frame(&self) -> usize {
		self.frame
	}

	/// Time spent on the current frame.
	pub fn elapsed_ms(&self) -> u64 {
		self.elapsed_ms
	}

	/// Returns `true` once the last frame has elapsed and the branch table
	/// is about to be consulted.
	pub fn is_at_end(&self) -> bool {
		self.ended
	}
}
