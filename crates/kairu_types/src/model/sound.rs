//! Sound cues.

use std::io::Cursor;

/// An opaque audio blob referenced by frame sound cues.
///
/// The bytes are kept exactly as stored; in practice they are RIFF/WAVE
/// files and [`SoundCue::wav_spec`] can describe them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SoundCue {
	data: Vec<u8>,
}

impl SoundCue {
	/// Wraps raw audio bytes.
	pub fn new(data: Vec<u8>) -> Self {
		Self {
			data,
		}
	}

	/// Raw bytes.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Size in bytes.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` for an empty blob.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Returns `true` when the blob starts with a RIFF/WAVE header.
	pub fn is_wave(&self) -> bool {
		self.data.len() >= 12 && &self.data[0..4] == b"RIFF" && &self.data[8..12] == b"WAVE"
	}

	/// Reads the format of a WAVE blob.
	///
	/// Returns `None` when the blob is not a WAVE file `hound` understands.
	pub fn wav_spec(&self) -> Option<hound::WavSpec> {
		if !self.is_wave() {
			return None;
		}
		hound::WavReader::new(Cursor::new(self.data.as_slice())).ok().map(|reader| reader.spec())
	}

	/// Playback length in milliseconds for PCM WAVE blobs.
	pub fn duration_ms(&self) -> Option<u64> {
		let reader = hound::WavReader::new(Cursor::new(self.data.as_slice())).ok()?;
		let spec = reader.spec();
		if spec.sample_rate == 0 {
			return None;
		}
		Some(u64::from(reader.duration()) * 1000 / u64::from(spec.sample_rate))
	}
}
