//! ACS image decompression.
//!
//! ## Overview
//!
//! Compressed pixel data is an LZ77 style bitstream. Bits are consumed least
//! significant bit first from each byte, and multi-bit values are assembled
//! with the first bit read as bit 0.
//!
//! ## Bitstream
//!
//! The first byte is a header and is skipped. Then, until the stream is
//! exhausted or the end marker is read:
//!
//! | Prefix | Operation                                             |
//! |--------|-------------------------------------------------------|
//! | `0`    | Literal: the next 8 bits are an output byte           |
//! | `1`    | Back-reference: offset, then length, copy from output |
//!
//! ### Back-references
//!
//! 1. Count up to 3 consecutive `1` bits (a `0` ends the run and is consumed).
//!    The count selects the offset width and bias:
//!
//!    | Ones | Offset bits | Bias |
//!    |------|-------------|------|
//!    | 0    | 6           | 1    |
//!    | 1    | 9           | 65   |
//!    | 2    | 12          | 577  |
//!    | 3    | 20          | 4673 |
//!
//!    A 20-bit offset of `0xFFFFF` is the end marker. Any other 20-bit offset
//!    adds one byte to the copy length.
//! 2. Count up to 11 consecutive `1` bits `n`, then read an `n`-bit value `v`.
//!    The copy length is `2 + (2^n - 1) + v`.
//! 3. Copy byte by byte from `output.len() - offset`. Copies may overlap the
//!    bytes they produce, which is how runs of a single color are encoded.

use thiserror::Error;

use super::constants;

const OFFSET_BITS: [u32; 4] = [6, 9, 12, 20];
const OFFSET_BIAS: [usize; 4] = [1, 65, 577, 4673];
const END_MARKER: usize = 0x000F_FFFF;
const MAX_LENGTH_PREFIX: u32 = 11;

/// Reason a compressed stream could not be expanded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecompressError {
	/// The bitstream ended in the middle of a token
	#[error("bitstream ended inside a token")]
	UnexpectedEnd,
	/// A length prefix used more than eleven one bits
	#[error("copy length prefix too long")]
	InvalidLength,
	/// A back-reference points before the start of the output
	#[error("back-reference distance {distance} exceeds {decoded} decoded bytes")]
	InvalidOffset {
		/// Distance of the reference
		distance: usize,
		/// Bytes decoded so far
		decoded: usize,
	},
	/// The stream produced more bytes than the image holds
	#[error("output exceeds {expected} bytes")]
	Overrun {
		/// Expected output size
		expected: usize,
	},
	/// The stream ended before the image was filled
	#[error("output is {actual} bytes, expected {expected}")]
	Underrun {
		/// Expected output size
		expected: usize,
		/// Bytes actually produced
		actual: usize,
	},
}

/// Little-endian-bit-order reader.
struct BitReader<'a> {
	data: &'a [u8],
	bit_pos: usize,
}

impl<'a> BitReader<'a> {
	fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			bit_pos: 0,
		}
	}

	fn has_remaining(&self) -> bool {
		self.bit_pos < self.data.len() * 8
	}

	fn read_bit(&mut self) -> Result<u32, DecompressError> {
		let byte = self.data.get(self.bit_pos / 8).ok_or(DecompressError::UnexpectedEnd)?;
		let bit = (byte >> (self.bit_pos % 8)) & 1;
		self.bit_pos += 1;
		Ok(u32::from(bit))
	}

	fn read_bits(&mut self, count: u32) -> Result<u32, DecompressError> {
		let mut value = 0;
		for shift in 0..count {
			value |= self.read_bit()? << shift;
		}
		Ok(value)
	}

	/// Counts consecutive one bits, stopping after `limit` ones or at the
	/// first zero (which is consumed).
	fn count_ones(&mut self, limit: u32) -> Result<u32, DecompressError> {
		let mut count = 0;
		while count < limit {
			if self.read_bit()? == 0 {
				break;
			}
			count += 1;
		}
		Ok(count)
	}
}

/// Expands a compressed stream into exactly `expected_len` bytes.
///
/// # Errors
///
/// Returns a [`DecompressError`] when the stream is malformed or does not
/// produce exactly `expected_len` bytes.
pub fn decompress(data: &[u8], expected_len: usize) -> Result<Vec<u8>, DecompressError> {
	// The declared size comes from the file, so it only bounds the initial reservation
	let mut output = Vec::with_capacity(expected_len.min(data.len().saturating_mul(8)));
	let mut reader = BitReader::new(data);

	// header byte
	reader.read_bits(8)?;

	while reader.has_remaining() {
		if reader.read_bit()? == 0 {
			if output.len() >= expected_len {
				return Err(DecompressError::Overrun {
					expected: expected_len,
				});
			}
			output.push(reader.read_bits(8)? as u8);
			continue;
		}

		let selector = reader.count_ones(3)? as usize;
		let mut distance = reader.read_bits(OFFSET_BITS[selector])? as usize;
		let mut length = 2;
		if selector == 3 {
			if distance == END_MARKER {
				break;
			}
			length += 1;
		}
		distance += OFFSET_BIAS[selector];

		let prefix = reader.count_ones(MAX_LENGTH_PREFIX + 1)?;
		if prefix > MAX_LENGTH_PREFIX {
			return Err(DecompressError::InvalidLength);
		}
		length += ((1usize << prefix) - 1) + reader.read_bits(prefix)? as usize;

		let decoded = output.len();
		if distance > decoded {
			return Err(DecompressError::InvalidOffset {
				distance,
				decoded,
			});
		}
		if decoded + length > expected_len {
			return Err(DecompressError::Overrun {
				expected: expected_len,
			});
		}

		let source = decoded - distance;
		for i in 0..length {
			let byte = output[source + i];
			output.push(byte);
		}
	}

	if output.len() != expected_len {
		return Err(DecompressError::Underrun {
			expected: expected_len,
			actual: output.len(),
		});
	}

	Ok(output)
}

/// Number of bytes in one stored pixel row.
pub fn row_stride(width: usize) -> usize {
	(width + constants::ROW_ALIGNMENT - 1) & !(constants::ROW_ALIGNMENT - 1)
}

/// Converts padded bottom-up rows into tightly packed top-down rows.
pub fn unpack_rows(padded: &[u8], width: usize, height: usize) -> Vec<u8> {
	let stride = row_stride(width);
	if stride == 0 || height == 0 {
		return Vec::new();
	}
	let mut pixels = Vec::with_capacity(width * height);
	for row in padded.chunks_exact(stride).take(height).rev() {
		pixels.extend_from_slice(&row[..width]);
	}
	pixels
}
