//! Image table chunk.
//!
//! The chunk is a `u32` count of (locator, `u32` checksum) entries. Each
//! locator points to an image record:
//!
//! | Offset | Size | Field                         |
//! |--------|------|-------------------------------|
//! | 0x00   | 1    | Unused                        |
//! | 0x01   | 2    | Width                         |
//! | 0x03   | 2    | Height                        |
//! | 0x05   | 1    | Compressed flag               |
//! | 0x06   | 4    | Data size                     |
//! | 0x0A   | n    | Pixel data                    |
//!
//! Region data may follow the pixel data; it is not needed for playback and
//! is ignored. Pixel rows are stored bottom-up and padded to 4 bytes, see
//! [`super::compression`].

use crate::{
	file::DecodeError,
	model::{Compression, ImageFrame},
};

use super::{
	compression::{self, row_stride},
	constants,
	cursor::ByteCursor,
};

/// Reads and decodes every image listed in the table.
///
/// With `exact_size` set, stored images whose data is longer than the padded
/// rows are rejected instead of having the excess ignored.
pub fn read_table(mut cursor: ByteCursor<'_>, exact_size: bool) -> Result<Vec<ImageFrame>, DecodeError> {
	let count = cursor.read_u32()? as usize;
	let mut images = Vec::with_capacity(cursor.capacity_hint(count, constants::TABLE_ENTRY_SIZE));

	for index in 0..count {
		let record = cursor.locate()?;
		let _checksum = cursor.read_u32()?;
		images.push(read_image(record, index, exact_size)?);
	}

	log::debug!("Decoded {} images", images.len());
	Ok(images)
}

/// Decodes a single image record.
pub fn read_image(
	mut cursor: ByteCursor<'_>,
	index: usize,
	exact_size: bool,
) -> Result<ImageFrame, DecodeError> {
	let offset = cursor.position();
	let corrupt = |reason: String| DecodeError::CorruptImage {
		index,
		offset,
		reason,
	};

	cursor.skip(1)?;
	let width = cursor.read_u16()?;
	let height = cursor.read_u16()?;
	let compressed = cursor.read_bool()?;
	let size = cursor.read_u32()? as usize;
	let data = cursor.read(size)?;

	let kind = if compressed { Compression::Compressed } else { Compression::Stored };
	if width == 0 || height == 0 {
		log::debug!("Image #{index} at {offset:#x} is empty ({width}x{height})");
		return ImageFrame::new(width, height, kind, Vec::new())
			.ok_or_else(|| corrupt("pixel count does not match dimensions".to_string()));
	}

	let stride = row_stride(usize::from(width));
	let expected = stride * usize::from(height);

	let padded = if compressed {
		compression::decompress(data, expected).map_err(|err| corrupt(err.to_string()))?
	} else {
		if data.len() < expected || (exact_size && data.len() != expected) {
			return Err(corrupt(format!(
				"stored data is {} bytes, {width}x{height} needs {expected}",
				data.len()
			)));
		}
		data[..expected].to_vec()
	};

	let pixels = compression::unpack_rows(&padded, usize::from(width), usize::from(height));
	ImageFrame::new(width, height, kind, pixels)
		.ok_or_else(|| corrupt("pixel count does not match dimensions".to_string()))
}
