//! Events emitted by playback.
//!
//! Frame changes go to the renderer, cues to the audio and balloon side, and
//! `AnimationFinished` to whoever waits for an animation to end.

use kairu_types::model::{Point, StateId};

/// Something a collaborator has to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
	/// A new frame is displayed
	FrameChanged {
		/// Playing state
		state: StateId,
		/// Index of the frame within the state
		frame: usize,
		/// Top layer image, `None` for a blank frame
		image: Option<u32>,
		/// Rendered position of the top layer
		position: Point,
	},

	/// The entered frame carries a sound or text cue
	CueFired {
		/// Playing state
		state: StateId,
		/// Index of the frame within the state
		frame: usize,
		/// Sound table index
		sound: Option<u16>,
		/// String table index
		text: Option<u16>,
	},

	/// Playback reached the exit sentinel and stopped
	AnimationFinished {
		/// State that finished
		state: StateId,
		/// Its name
		name: String,
	},

	/// Balloon text was set (`Some`) or cleared (`None`)
	Balloon {
		/// Text to show
		text: Option<String>,
	},
}

impl PlaybackEvent {
	/// Returns `true` for [`PlaybackEvent::FrameChanged`].
	pub fn is_frame_change(&self) -> bool {
		matches!(self, Self::FrameChanged { .. })
	}

	/// Returns `true` for [`PlaybackEvent::AnimationFinished`].
	pub fn is_finished(&self) -> bool {
		matches!(self, Self::AnimationFinished { .. })
	}
}
