//! Animation table chunk.
//!
//! ## Layout
//!
//! The chunk is a `u32` count of (`STRING name`, locator) entries. Each
//! locator points to an animation record:
//!
//! | Field              | Type                                          |
//! |--------------------|-----------------------------------------------|
//! | Name               | `STRING`                                      |
//! | Transition         | `u8` (0 return animation, 1 exit branches, 2 none) |
//! | Return animation   | `STRING`                                      |
//! | Frames             | `u16` count of frame records                  |
//!
//! Frame record:
//!
//! | Field       | Type                                              |
//! |-------------|---------------------------------------------------|
//! | Images      | `u16` count of (`u32` image, `i16` x, `i16` y)    |
//! | Sound       | `u16`, `0xFFFF` for none                          |
//! | Duration    | `u16`, centiseconds                               |
//! | Exit frame  | `i16`, `-1` for none                              |
//! | Branches    | `u8` count of (`u16` target frame, `u16` percent) |
//! | Overlays    | `u8` count of overlay records                     |

use crate::{
	file::DecodeError,
	model::{FrameBranch, FrameImage, FrameStep, Overlay, OverlayKind, Point, TransitionKind},
};

use super::{constants, cursor::ByteCursor};

/// One entry of the animation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationRecord {
	/// Name stored in the record
	pub name: String,
	/// Transition kind
	pub transition: TransitionKind,
	/// Return animation name, may be empty
	pub return_name: String,
	/// Frames
	pub frames: Vec<FrameStep>,
	/// Absolute offset of the record
	pub offset: usize,
}

impl AnimationRecord {
	/// Name of the state that follows this animation, if it hands over to one.
	pub fn return_target(&self) -> Option<&str> {
		match self.transition {
			TransitionKind::ReturnAnimation if !self.return_name.is_empty() => {
				Some(&self.return_name)
			}
			_ => None,
		}
	}
}

/// Reads every animation record listed in the table.
pub fn read_table(mut cursor: ByteCursor<'_>) -> Result<Vec<AnimationRecord>, DecodeError> {
	let count = cursor.read_u32()? as usize;
	let mut records = Vec::with_capacity(cursor.capacity_hint(count, 4 + constants::LOCATOR_SIZE));

	for _ in 0..count {
		let listed_name = cursor.read_string()?;
		let record = read_record(cursor.locate()?)?;
		if !listed_name.eq_ignore_ascii_case(&record.name) {
			log::warn!(
				"Animation listed as {listed_name:?} is named {:?} at {:#x}",
				record.name,
				record.offset
			);
		}
		records.push(record);
	}

	log::debug!("Read {} animations", records.len());
	Ok(records)
}

fn read_record(mut cursor: ByteCursor<'_>) -> Result<AnimationRecord, DecodeError> {
	let offset = cursor.position();
	let name = cursor.read_string()?;
	let transition = TransitionKind::from_u8(cursor.read_u8()?);
	let return_name = cursor.read_string()?;

	let frame_count = usize::from(cursor.read_u16()?);
	let mut frames = Vec::with_capacity(cursor.capacity_hint(frame_count, 12));
	for _ in 0..frame_count {
		frames.push(read_frame(&mut cursor, offset, &name)?);
	}

	Ok(AnimationRecord {
		name,
		transition,
		return_name,
		frames,
		offset,
	})
}

fn read_frame(
	cursor: &mut ByteCursor<'_>,
	record_offset: usize,
	name: &str,
) -> Result<FrameStep, DecodeError> {
	let image_count = usize::from(cursor.read_u16()?);
	let mut images = Vec::with_capacity(cursor.capacity_hint(image_count, 8));
	for _ in 0..image_count {
		images.push(FrameImage {
			image: cursor.read_u32()?,
			offset: read_point(cursor)?,
		});
	}

	let sound = match cursor.read_u16()? {
		constants::NO_SOUND => None,
		index => Some(index),
	};
	let duration_ms = u32::from(cursor.read_u16()?) * constants::DURATION_UNIT_MS;

	let exit_frame = match cursor.read_i16()? {
		constants::NO_EXIT_FRAME => None,
		frame => {
			let exit = u16::try_from(frame).ok();
			if exit.is_none() {
				log::debug!(
					"Animation {name:?} at {record_offset:#x} has exit frame {frame}, treating it as none"
				);
			}
			exit
		}
	};

	let branch_count = usize::from(cursor.read_u8()?);
	let mut branches = Vec::with_capacity(branch_count);
	for _ in 0..branch_count {
		branches.push(FrameBranch {
			target_frame: cursor.read_u16()?,
			percent: cursor.read_u16()?,
		});
	}

	let overlay_count = usize::from(cursor.read_u8()?);
	let mut overlays = Vec::with_capacity(overlay_count);
	for _ in 0..overlay_count {
		overlays.push(read_overlay(cursor)?);
	}

	Ok(FrameStep {
		images,
		duration_ms,
		sound,
		text: None,
		exit_frame,
		branches,
		overlays,
	})
}

fn read_overlay(cursor: &mut ByteCursor<'_>) -> Result<Overlay, DecodeError> {
	let kind = OverlayKind::from(cursor.read_u8()?);
	let replaces_top = cursor.read_bool()?;
	let image = u32::from(cursor.read_u16()?);
	// unused
	cursor.skip(1)?;
	let has_region = cursor.read_bool()?;
	let offset = read_point(cursor)?;
	let width = cursor.read_u16()?;
	let height = cursor.read_u16()?;
	if has_region {
		let size = cursor.read_u32()? as usize;
		cursor.skip(size)?;
	}

	Ok(Overlay {
		kind,
		replaces_top,
		image,
		offset,
		width,
		height,
	})
}

fn read_point(cursor: &mut ByteCursor<'_>) -> Result<Point, DecodeError> {
	let x = cursor.read_i16()?;
	let y = cursor.read_i16()?;
	Ok(Point::new(i32::from(x), i32::from(y)))
}
