//! `.ACS` character file support for `kairu-rs` project.
//!
//! ACS files bundle everything a desktop character needs: metadata, a shared
//! 8-bit palette, compressed bitmaps, WAVE sound effects and a graph of named
//! animations whose frames reference those assets by index.
//!
//! # File Structure Overview
//!
//! All integers are little-endian. The header holds a magic number followed
//! by a directory of four absolute locators:
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  ---------------------------------------
//! 0x00    4     Magic 0xABCDABC3 (bytes C3 AB CD AB)
//! 0x04    8     Character info  (u32 offset, u32 size)
//! 0x0C    8     Animation info  (u32 offset, u32 size)
//! 0x14    8     Image info      (u32 offset, u32 size)
//! 0x1C    8     Audio info      (u32 offset, u32 size)
//! ```
//!
//! Strings (`STRING`) are a `u32` count of UTF-16 code units, the code units,
//! and a two byte NUL terminator that is only present for non-empty strings.
//!
//! Each chunk is described in its module: [`character`], [`animation`],
//! [`image`] and [`audio`]. Pixel data compression is covered in
//! [`compression`].
//!
//! # Decoding
//!
//! [`decode`] reads the header, each chunk in turn, and finally builds the
//! [`CharacterDefinition`], validating every cross-reference. Nothing is
//! returned unless the whole file is valid.
//!
//! ```no_run
//! use kairu_types::file::acs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = File::open("merlin.acs")?;
//! let definition = file.definition();
//! println!("{} has {} animations", definition.metadata().name(), definition.states().len());
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod audio;
pub mod character;
pub mod compression;
pub mod constants;
pub mod cursor;
pub mod header;
pub mod image;

mod config;
mod decode;


use std::io::Read;

pub use config::DecodeConfig;
pub use cursor::{ByteCursor, Locator};
pub use decode::{decode, decode_with_config};
pub use header::{Header, RawChunk};

use crate::{file::DecodeError, model::CharacterDefinition};

/// A decoded ACS file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	header: Header,
	size: usize,
	definition: CharacterDefinition,
}

impl File {
	/// Opens and decodes an ACS file.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or is not a valid
	/// character file.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, DecodeError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Opens and decodes an ACS file with a custom configuration.
	///
	/// # Errors
	///
	/// Same as [`File::open`].
	pub fn open_with_config(
		path: impl AsRef<std::path::Path>,
		config: &DecodeConfig,
	) -> Result<Self, DecodeError> {
		let data = std::fs::read(path)?;
		Self::from_bytes_with_config(&data, config)
	}

	/// Decodes an ACS file from bytes.
	///
	/// # Errors
	///
	/// Returns the first [`DecodeError`] encountered.
	pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
		Self::from_bytes_with_config(data, &DecodeConfig::default())
	}

	/// Decodes an ACS file from bytes with a custom configuration.
	///
	/// # Errors
	///
	/// Returns the first [`DecodeError`] encountered.
	pub fn from_bytes_with_config(data: &[u8], config: &DecodeConfig) -> Result<Self, DecodeError> {
		let definition = decode_with_config(data, config)?;
		Ok(Self {
			header: Header::read(data)?,
			size: data.len(),
			definition,
		})
	}

	/// Reads and decodes an ACS file from a reader.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the data is invalid.
	pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, DecodeError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Chunk directory.
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Size of the source file in bytes.
	pub fn size(&self) -> usize {
		self.size
	}

	/// Decoded definition.
	pub fn definition(&self) -> &CharacterDefinition {
		&self.definition
	}

	/// Consumes the file, returning the definition.
	pub fn into_definition(self) -> CharacterDefinition {
		self.definition
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"ACS File ({:?}, {} animations, {} images, {} sounds)",
			self.definition.metadata().name(),
			self.definition.states().len(),
			self.definition.images().len(),
			self.definition.sounds().len()
		)
	}
}
