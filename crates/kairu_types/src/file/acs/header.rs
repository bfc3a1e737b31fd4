//! File header and chunk directory.

use crate::file::{ChunkKind, DecodeError};

use super::{
	constants,
	cursor::{ByteCursor, Locator},
};

/// A bounds-checked region of the container tagged with what it holds.
///
/// Invariant: `offset + len` never exceeds the file size; the only way to
/// obtain a chunk is through [`Header::read`], which enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChunk {
	kind: ChunkKind,
	offset: usize,
	len: usize,
}

impl RawChunk {
	/// What the chunk holds.
	pub fn kind(&self) -> ChunkKind {
		self.kind
	}

	/// Absolute offset of the first byte.
	pub fn offset(&self) -> usize {
		self.offset
	}

	/// Length in bytes.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` for an empty chunk.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Opens a cursor over the chunk bytes of `data`.
	pub fn cursor<'a>(&self, data: &'a [u8]) -> Result<ByteCursor<'a>, DecodeError> {
		ByteCursor::new(data, self.kind).sub_slice(self.offset, self.len)
	}
}

/// ACS file header.
///
/// | Offset | Size | Field                   |
/// |--------|------|-------------------------|
/// | 0x00   | 4    | Magic (`0xABCDABC3`)    |
/// | 0x04   | 8    | Character info locator  |
/// | 0x0C   | 8    | Animation info locator  |
/// | 0x14   | 8    | Image info locator      |
/// | 0x1C   | 8    | Audio info locator      |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
	/// Character metadata, palette and state groups
	pub character: RawChunk,
	/// Animation table
	pub animation: RawChunk,
	/// Image table
	pub image: RawChunk,
	/// Audio table
	pub audio: RawChunk,
}

impl Header {
	/// Reads and validates the header.
	///
	/// # Errors
	///
	/// - [`DecodeError::TruncatedInput`] if the file is shorter than the header
	/// - [`DecodeError::InvalidMagic`] if the magic number does not match
	/// - [`DecodeError::OutOfBounds`] if a locator points past the end of file
	pub fn read(data: &[u8]) -> Result<Self, DecodeError> {
		let mut cursor = ByteCursor::new(data, ChunkKind::Header);

		let magic = cursor.read_u32()?;
		if magic != constants::MAGIC {
			return Err(DecodeError::InvalidMagic {
				expected: constants::MAGIC,
				actual: magic,
			});
		}

		let character = Self::chunk(&mut cursor, ChunkKind::Character)?;
		let animation = Self::chunk(&mut cursor, ChunkKind::Animation)?;
		let image = Self::chunk(&mut cursor, ChunkKind::Image)?;
		let audio = Self::chunk(&mut cursor, ChunkKind::Audio)?;

		log::debug!(
			"ACS header: character {:#x}+{}, animation {:#x}+{}, image {:#x}+{}, audio {:#x}+{}",
			character.offset,
			character.len,
			animation.offset,
			animation.len,
			image.offset,
			image.len,
			audio.offset,
			audio.len
		);

		Ok(Self {
			character,
			animation,
			image,
			audio,
		})
	}

	fn chunk(cursor: &mut ByteCursor<'_>, kind: ChunkKind) -> Result<RawChunk, DecodeError> {
		let Locator {
			offset,
			size,
		} = cursor.read_locator()?;
		let view = cursor.sub_slice(offset as usize, size as usize).map_err(|err| match err {
			DecodeError::OutOfBounds {
				offset,
				length,
				size,
				..
			} => DecodeError::OutOfBounds {
				chunk: kind,
				offset,
				length,
				size,
			},
			other => other,
		})?;

		Ok(RawChunk {
			kind,
			offset: view.base(),
			len: view.len(),
		})
	}

	/// Chunks in directory order.
	pub fn chunks(&self) -> [RawChunk; 4] {
		[self.character, self.animation, self.image, self.audio]
	}
}
