//! Bounds-checked sequential reader over the container bytes.
//!
//! [`ByteCursor`] is the only place where untrusted lengths and offsets from
//! the file are checked. Every structure that carries a length, count or
//! locator is read through it, so a malformed file surfaces as
//! [`DecodeError::TruncatedInput`] or [`DecodeError::OutOfBounds`] instead of
//! a panic.

use crate::file::{ChunkKind, DecodeError};

use super::constants;

/// Absolute offset/size pair pointing at a region of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Locator {
	/// Absolute offset from the start of the file
	pub offset: u32,
	/// Size of the region in bytes
	pub size: u32,
}

/// Sequential little-endian reader over a view of the container.
///
/// A cursor always knows the whole file (`root`) so that locators, which are
/// absolute, can be resolved from any nested view.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
	root: &'a [u8],
	data: &'a [u8],
	base: usize,
	pos: usize,
	chunk: ChunkKind,
}

impl<'a> ByteCursor<'a> {
	/// Creates a cursor over the whole buffer.
	pub fn new(root: &'a [u8], chunk: ChunkKind) -> Self {
		Self {
			root,
			data: root,
			base: 0,
			pos: 0,
			chunk,
		}
	}

	/// Chunk this cursor reads from.
	pub fn chunk(&self) -> ChunkKind {
		self.chunk
	}

	/// Absolute offset of the next byte to be read.
	pub fn position(&self) -> usize {
		self.base + self.pos
	}

	/// Absolute offset of the first byte of this view.
	pub fn base(&self) -> usize {
		self.base
	}

	/// Number of bytes left in this view.
	pub fn remaining(&self) -> usize {
		self.data.len() - self.pos
	}

	/// Length of this view.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` when the view is empty.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Returns the next `n` bytes and advances past them.
	pub fn read(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
		if n > self.remaining() {
			return Err(DecodeError::TruncatedInput {
				chunk: self.chunk,
				offset: self.position(),
				needed: n,
				available: self.remaining(),
			});
		}
		let bytes = &self.data[self.pos..self.pos + n];
		self.pos += n;
		Ok(bytes)
	}

	/// Reads a fixed-size array.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
		let mut out = [0u8; N];
		out.copy_from_slice(self.read(N)?);
		Ok(out)
	}

	/// Advances by `n` bytes.
	pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
		self.read(n).map(|_| ())
	}

	/// Reads a single byte.
	pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Reads a byte and interprets any non-zero value as `true`.
	pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
		Ok(self.read_u8()? != 0)
	}

	/// Reads a little-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `i16`.
	pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
		Ok(i16::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `u32`.
	pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `i32`.
	pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Returns a view of `length` bytes starting at absolute `offset`.
	///
	/// The view inherits this cursor's chunk unless re-tagged with
	/// [`ByteCursor::with_chunk`].
	pub fn sub_slice(&self, offset: usize, length: usize) -> Result<ByteCursor<'a>, DecodeError> {
		let end = offset.checked_add(length).filter(|&end| end <= self.root.len()).ok_or(
			DecodeError::OutOfBounds {
				chunk: self.chunk,
				offset,
				length,
				size: self.root.len(),
			},
		)?;

		Ok(ByteCursor {
			root: self.root,
			data: &self.root[offset..end],
			base: offset,
			pos: 0,
			chunk: self.chunk,
		})
	}

	/// Re-tags the cursor with another chunk kind for diagnostics.
	pub fn with_chunk(mut self, chunk: ChunkKind) -> Self {
		self.chunk = chunk;
		self
	}

	/// Reads an offset/size pair.
	pub fn read_locator(&mut self) -> Result<Locator, DecodeError> {
		Ok(Locator {
			offset: self.read_u32()?,
			size: self.read_u32()?,
		})
	}

	/// Reads a locator and resolves it to a bounded view.
	pub fn locate(&mut self) -> Result<ByteCursor<'a>, DecodeError> {
		let locator = self.read_locator()?;
		self.resolve(locator)
	}

	/// Resolves a previously read locator to a bounded view.
	pub fn resolve(&self, locator: Locator) -> Result<ByteCursor<'a>, DecodeError> {
		self.sub_slice(locator.offset as usize, locator.size as usize)
	}

	/// Reads a length-prefixed UTF-16LE string.
	///
	/// Non-empty strings are followed by a two byte terminator that is
	/// consumed but not returned.
	pub fn read_string(&mut self) -> Result<String, DecodeError> {
		let units = self.read_u32()? as usize;
		if units == 0 {
			return Ok(String::new());
		}

		let byte_len = units.checked_mul(2).ok_or(DecodeError::TruncatedInput {
			chunk: self.chunk,
			offset: self.position(),
			needed: usize::MAX,
			available: self.remaining(),
		})?;
		let bytes = self.read(byte_len)?;
		self.skip(constants::STRING_TERMINATOR_SIZE)?;

		let (text, _) = encoding_rs::UTF_16LE.decode_without_bom_handling(bytes);
		Ok(text.into_owned())
	}

	/// Caps an untrusted element count to what could possibly fit in the
	/// remaining bytes, for use as a pre-allocation hint.
	pub fn capacity_hint(&self, count: usize, min_element_size: usize) -> usize {
		count.min(self.remaining() / min_element_size.max(1))
	}
}
