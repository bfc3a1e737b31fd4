//! Audio table chunk.
//!
//! A `u32` count of (locator, `u32` checksum) entries, each pointing to a
//! complete RIFF/WAVE file that is kept as is.

use crate::{file::DecodeError, model::SoundCue};

use super::{constants, cursor::ByteCursor};

/// Reads every sound blob listed in the table.
pub fn read_table(mut cursor: ByteCursor<'_>) -> Result<Vec<SoundCue>, DecodeError> {
	let count = cursor.read_u32()? as usize;
	let mut sounds = Vec::with_capacity(cursor.capacity_hint(count, constants::TABLE_ENTRY_SIZE));

	for index in 0..count {
		let mut blob = cursor.locate()?;
		let _checksum = cursor.read_u32()?;
		let sound = SoundCue::new(blob.read(blob.len())?.to_vec());
		if !sound.is_wave() {
			log::debug!("Sound #{index} at {:#x} is not a WAVE file", blob.base());
		}
		sounds.push(sound);
	}

	log::debug!("Read {} sounds", sounds.len());
	Ok(sounds)
}
