//! Character info chunk.
//!
//! ## Layout
//!
//! | Field                   | Type                                   |
//! |-------------------------|----------------------------------------|
//! | Minor / major version   | `u16`, `u16`                           |
//! | Localized info          | locator                                |
//! | GUID                    | 16 bytes                               |
//! | Width / height          | `u16`, `u16`                           |
//! | Transparent index       | `u8`                                   |
//! | Flags                   | `u32`                                  |
//! | Animation set version   | `u16`, `u16`                           |
//! | Voice info              | present when `flags & 0x20`            |
//! | Balloon info            | always present                         |
//! | Palette                 | `u32` count, BGRX quads                |
//! | Tray icon               | `u8` flag, two size-prefixed bitmaps   |
//! | State groups            | `u16` count of (name, `u16`-counted names) |

use crate::{
	file::DecodeError,
	model::{
		BalloonInfo, CharacterMetadata, Color, Guid, LocalizedInfo, Palette, VoiceExtra, VoiceInfo,
	},
};

use super::{constants, cursor::ByteCursor};

/// Decoded character info chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterInfo {
	/// Metadata
	pub metadata: CharacterMetadata,
	/// Palette with the transparent key applied
	pub palette: Palette,
	/// State groups by name, members as stored
	pub groups: Vec<(String, Vec<String>)>,
}

impl CharacterInfo {
	/// Reads the character info chunk.
	pub fn read(mut cursor: ByteCursor<'_>) -> Result<Self, DecodeError> {
		let minor = cursor.read_u16()?;
		let major = cursor.read_u16()?;

		let mut localized_cursor = cursor.locate()?;
		let localized = read_localized(&mut localized_cursor)?;

		let guid = read_guid(&mut cursor)?;
		let width = cursor.read_u16()?;
		let height = cursor.read_u16()?;
		let transparent_index = cursor.read_u8()?;
		let flags = cursor.read_u32()?;
		let set_major = cursor.read_u16()?;
		let set_minor = cursor.read_u16()?;

		let voice = if flags & constants::FLAG_VOICE_INFO != 0 {
			Some(read_voice(&mut cursor)?)
		} else {
			None
		};
		let balloon = read_balloon(&mut cursor)?;

		let palette_len = cursor.read_u32()? as usize;
		let mut colors =
			Vec::with_capacity(cursor.capacity_hint(palette_len, constants::PALETTE_ENTRY_SIZE));
		for _ in 0..palette_len {
			colors.push(Color::from_rgbquad(cursor.read_array()?));
		}
		let palette = Palette::new(colors, Some(transparent_index));

		let has_tray_icon = cursor.read_bool()?;
		if has_tray_icon {
			// monochrome and color bitmaps, not used for playback
			for _ in 0..2 {
				let size = cursor.read_u32()? as usize;
				cursor.skip(size)?;
			}
		}

		let group_count = usize::from(cursor.read_u16()?);
		let mut groups = Vec::with_capacity(cursor.capacity_hint(group_count, 6));
		for _ in 0..group_count {
			let name = cursor.read_string()?;
			let member_count = usize::from(cursor.read_u16()?);
			let mut members = Vec::with_capacity(cursor.capacity_hint(member_count, 4));
			for _ in 0..member_count {
				members.push(cursor.read_string()?);
			}
			groups.push((name, members));
		}

		let metadata = CharacterMetadata {
			version: (major, minor),
			guid,
			width,
			height,
			flags,
			animation_set_version: (set_major, set_minor),
			localized,
			voice,
			balloon: Some(balloon),
			has_tray_icon,
		};
		log::debug!(
			"Character {:?} {}: {}x{}, {} colors, {} groups",
			metadata.name(),
			metadata.guid,
			width,
			height,
			palette.len(),
			groups.len()
		);

		Ok(Self {
			metadata,
			palette,
			groups,
		})
	}
}

fn read_guid(cursor: &mut ByteCursor<'_>) -> Result<Guid, DecodeError> {
	Ok(Guid(cursor.read_array::<{ constants::GUID_SIZE }>()?))
}

fn read_localized(cursor: &mut ByteCursor<'_>) -> Result<Vec<LocalizedInfo>, DecodeError> {
	let count = usize::from(cursor.read_u16()?);
	let mut infos = Vec::with_capacity(cursor.capacity_hint(count, 14));
	for _ in 0..count {
		infos.push(LocalizedInfo {
			language: cursor.read_u16()?,
			name: cursor.read_string()?,
			description: cursor.read_string()?,
			extra: cursor.read_string()?,
		});
	}
	Ok(infos)
}

fn read_voice(cursor: &mut ByteCursor<'_>) -> Result<VoiceInfo, DecodeError> {
	let engine = read_guid(cursor)?;
	let mode = read_guid(cursor)?;
	let speed = cursor.read_u32()?;
	let pitch = cursor.read_u16()?;
	let extra = if cursor.read_bool()? {
		Some(VoiceExtra {
			language: cursor.read_u16()?,
			dialect: cursor.read_string()?,
			gender: cursor.read_u16()?,
			age: cursor.read_u16()?,
			style: cursor.read_string()?,
		})
	} else {
		None
	};

	Ok(VoiceInfo {
		engine,
		mode,
		speed,
		pitch,
		extra,
	})
}

fn read_balloon(cursor: &mut ByteCursor<'_>) -> Result<BalloonInfo, DecodeError> {
	let lines = cursor.read_u8()?;
	let chars_per_line = cursor.read_u8()?;
	let foreground = Color::from_rgbquad(cursor.read_array()?);
	let background = Color::from_rgbquad(cursor.read_array()?);
	let border = Color::from_rgbquad(cursor.read_array()?);
	let font_name = cursor.read_string()?;
	let font_height = cursor.read_i32()?;
	let font_weight = cursor.read_i32()?;
	let italic = cursor.read_bool()?;
	// unknown trailing byte
	cursor.skip(1)?;

	Ok(BalloonInfo {
		lines,
		chars_per_line,
		foreground,
		background,
		border,
		font_name,
		font_height,
		font_weight,
		italic,
	})
}
