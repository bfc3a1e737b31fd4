//! Whole-file decoding into a [`CharacterDefinition`].

use crate::{
	file::{ChunkKind, DecodeError},
	model::{CharacterDefinition, StateSpec, TargetSpec, TransitionKind},
};

use super::{
	animation::{self, AnimationRecord},
	audio,
	character::CharacterInfo,
	header::Header,
	image, DecodeConfig,
};

/// Decodes a character file with the default configuration.
///
/// Decoding is a pure function of `data`: the same bytes always produce an
/// equal definition, and any failure aborts the whole decode.
///
/// # Errors
///
/// Returns the first [`DecodeError`] encountered.
pub fn decode(data: &[u8]) -> Result<CharacterDefinition, DecodeError> {
	decode_with_config(data, &DecodeConfig::default())
}

/// Decodes a character file.
///
/// # Errors
///
/// Returns the first [`DecodeError`] encountered.
pub fn decode_with_config(
	data: &[u8],
	config: &DecodeConfig,
) -> Result<CharacterDefinition, DecodeError> {
	let header = Header::read(data)?;

	let character = CharacterInfo::read(header.character.cursor(data)?)?;
	let records = animation::read_table(header.animation.cursor(data)?)?;
	let images = image::read_table(header.image.cursor(data)?, config.exact_image_size)?;
	let sounds = audio::read_table(header.audio.cursor(data)?)?;

	let mut builder = CharacterDefinition::builder()
		.metadata(character.metadata)
		.palette(character.palette)
		.images(images)
		.sounds(sounds)
		.states(records.into_iter().map(state_from_record).collect())
		.roles(config.roles.clone())
		.strict_groups(config.strict_groups)
		.source(ChunkKind::Animation);
	for (name, members) in character.groups {
		builder = builder.group(name, members);
	}

	let definition = builder.build()?;
	log::info!(
		"Decoded character {:?}: {} states, {} images, {} sounds",
		definition.metadata().name(),
		definition.states().len(),
		definition.images().len(),
		definition.sounds().len()
	);
	Ok(definition)
}

/// Maps an animation record to a state.
///
/// Animations that hand over to a return animation branch to it with weight
/// 1; every other animation ends playback when its sequence completes.
fn state_from_record(record: AnimationRecord) -> StateSpec {
	let target = match record.return_target() {
		Some(name) => TargetSpec::state(name),
		None => TargetSpec::Exit,
	};
	let idle = record.name.to_uppercase().starts_with("IDLE");

	StateSpec {
		branches: vec![(target, 1)],
		interruptible: record.transition != TransitionKind::ExitBranches,
		idle_eligible: idle,
		transition: record.transition,
		source_offset: record.offset,
		frames: record.frames,
		name: record.name,
	}
}
