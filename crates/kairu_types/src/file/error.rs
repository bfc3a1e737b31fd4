//! Error types for character file decoding.

use std::fmt;

use thiserror::Error;

/// Region of the container an error refers to.
///
/// The four directory chunks map to the locators stored in the file header;
/// `Header` is used for failures before the directory has been read and
/// `Definition` for definitions assembled in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
	/// File header and chunk directory
	Header,
	/// Character metadata, palette, string and state tables
	Character,
	/// Animation table
	Animation,
	/// Image table
	Image,
	/// Sound table
	Audio,
	/// Definition built in memory, no backing bytes
	Definition,
}

impl fmt::Display for ChunkKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Header => write!(f, "header"),
			Self::Character => write!(f, "character info"),
			Self::Animation => write!(f, "animation table"),
			Self::Image => write!(f, "image table"),
			Self::Audio => write!(f, "audio table"),
			Self::Definition => write!(f, "definition"),
		}
	}
}

/// Kind of cross-reference that failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
	/// Frame or overlay image index
	Image,
	/// Frame sound cue index
	Sound,
	/// Frame text cue index
	Text,
}

impl fmt::Display for ReferenceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Image => write!(f, "image"),
			Self::Sound => write!(f, "sound"),
			Self::Text => write!(f, "text"),
		}
	}
}

/// Errors that can occur while decoding a character file.
///
/// Every variant carries the chunk and the absolute byte offset where the
/// problem was detected. Decoding never yields a partial definition.
#[derive(Debug, Error)]
pub enum DecodeError {
	/// A read needed more bytes than the chunk had left
	#[error(
		"Truncated input in {chunk} at offset {offset:#x}: needed {needed} bytes, {available} available"
	)]
	TruncatedInput {
		/// Chunk being read
		chunk: ChunkKind,
		/// Absolute offset of the failed read
		offset: usize,
		/// Number of bytes requested
		needed: usize,
		/// Number of bytes remaining
		available: usize,
	},

	/// An offset/length pair points outside the buffer
	#[error(
		"Out of bounds reference in {chunk}: {length} bytes at offset {offset:#x} exceed buffer of {size} bytes"
	)]
	OutOfBounds {
		/// Chunk holding the reference
		chunk: ChunkKind,
		/// Referenced absolute offset
		offset: usize,
		/// Referenced length
		length: usize,
		/// Size of the buffer the reference resolves against
		size: usize,
	},

	/// The file does not start with the expected magic number
	#[error("Invalid magic number: expected {expected:#010x}, found {actual:#010x}")]
	InvalidMagic {
		/// Expected magic value
		expected: u32,
		/// Magic value found in the file
		actual: u32,
	},

	/// Pixel data could not be expanded to the declared dimensions
	#[error("Corrupt image #{index} at offset {offset:#x}: {reason}")]
	CorruptImage {
		/// Index of the image in the image table
		index: usize,
		/// Absolute offset of the image record
		offset: usize,
		/// Human readable reason
		reason: String,
	},

	/// An index points past the end of the table it refers to
	#[error(
		"Dangling {kind} reference in {chunk} at offset {offset:#x}: index {index} but only {count} entries"
	)]
	DanglingReference {
		/// Chunk holding the reference
		chunk: ChunkKind,
		/// Absolute offset of the record holding the reference
		offset: usize,
		/// Table the index refers to
		kind: ReferenceKind,
		/// Offending index
		index: usize,
		/// Number of entries in the referenced table
		count: usize,
	},

	/// The animation graph does not resolve
	#[error("Invalid animation graph in {chunk} at offset {offset:#x}: {message}")]
	InvalidGraph {
		/// Chunk holding the bad reference
		chunk: ChunkKind,
		/// Absolute offset of the record, 0 for in-memory definitions
		offset: usize,
		/// Description of the failure
		message: String,
	},

	/// IO error while loading the file
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl DecodeError {
	/// Returns the chunk the error refers to, if any.
	pub fn chunk(&self) -> Option<ChunkKind> {
		match self {
			Self::TruncatedInput {
				chunk,
				..
			}
			| Self::OutOfBounds {
				chunk,
				..
			}
			| Self::DanglingReference {
				chunk,
				..
			}
			| Self::InvalidGraph {
				chunk,
				..
			} => Some(*chunk),
			Self::CorruptImage {
				..
			} => Some(ChunkKind::Image),
			Self::InvalidMagic {
				..
			} => Some(ChunkKind::Header),
			Self::Io(_) => None,
		}
	}

	/// Returns `true` for errors caused by missing bytes.
	pub fn is_truncation(&self) -> bool {
		matches!(
			self,
			Self::TruncatedInput {
				..
			} | Self::OutOfBounds {
				..
			}
		)
	}
}
