//! Decoded bitmaps and the shared color palette.

use std::fmt;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Creates an opaque color from a Windows `RGBQUAD` (blue, green, red, reserved).
	pub const fn from_rgbquad(quad: [u8; 4]) -> Self {
		Self::rgb(quad[2], quad[1], quad[0])
	}

	/// Returns the components as `[r, g, b, a]`.
	pub const fn to_array(&self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::transparent()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Indexed color table shared by every image of a character.
///
/// The entry at the transparency index has alpha 0, every other entry is opaque.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
	colors: Vec<Color>,
	transparent_index: Option<u8>,
}

impl Palette {
	/// Creates a palette, clearing the alpha of the transparent entry.
	pub fn new(mut colors: Vec<Color>, transparent_index: Option<u8>) -> Self {
		if let Some(color) = transparent_index.and_then(|index| colors.get_mut(usize::from(index)))
		{
			color.a = 0;
		}
		Self {
			colors,
			transparent_index,
		}
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Returns `true` when the palette has no entries.
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Returns the color for an index; indices past the end are transparent.
	pub fn get(&self, index: u8) -> Color {
		self.colors.get(usize::from(index)).copied().unwrap_or_default()
	}

	/// Transparent color key.
	pub fn transparent_index(&self) -> Option<u8> {
		self.transparent_index
	}

	/// All entries.
	pub fn colors(&self) -> &[Color] {
		&self.colors
	}
}

/// How the pixel data of an image was stored in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
	/// Raw rows
	Stored,
	/// Back-reference run encoding
	Compressed,
}

impl fmt::Display for Compression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Stored => write!(f, "Stored"),
			Self::Compressed => write!(f, "Compressed"),
		}
	}
}

/// A decoded 8-bit indexed bitmap.
///
/// Pixels are palette indices in top-down row order with no row padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
	width: u16,
	height: u16,
	compression: Compression,
	pixels: Vec<u8>,
}

impl ImageFrame {
	/// Color depth of every image in the format.
	pub const BITS_PER_PIXEL: u8 = 8;

	/// Creates an image from packed top-down indices.
	///
	/// Returns `None` when `pixels.len() != width * height`.
	pub fn new(width: u16, height: u16, compression: Compression, pixels: Vec<u8>) -> Option<Self> {
		if pixels.len() != usize::from(width) * usize::from(height) {
			return None;
		}
		Some(Self {
			width,
			height,
			compression,
			pixels,
		})
	}

	/// Width in pixels.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Color depth in bits.
	pub fn depth(&self) -> u8 {
		Self::BITS_PER_PIXEL
	}

	/// Storage used in the container.
	pub fn compression(&self) -> Compression {
		self.compression
	}

	/// Palette indices, top-down.
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Palette index at `(x, y)`.
	pub fn index_at(&self, x: u16, y: u16) -> Option<u8> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.pixels.get(usize::from(y) * usize::from(self.width) + usize::from(x)).copied()
	}

	/// Expands the image to RGBA8 using `palette`.
	pub fn to_rgba(&self, palette: &Palette) -> Vec<u8> {
		let mut out = Vec::with_capacity(self.pixels.len() * 4);
		for &index in &self.pixels {
			out.extend_from_slice(&palette.get(index).to_array());
		}
		out
	}
}

impl fmt::Display for ImageFrame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ImageFrame({}x{}, {})", self.width, self.height, self.compression)
	}
}
