//! Character-wide metadata: identity, localized names, voice and balloon.

use std::fmt;

use super::image::Color;

/// 128-bit identifier in Windows `GUID` layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid(pub [u8; 16]);

impl Guid {
	/// Returns `true` for the all-zero GUID.
	pub fn is_nil(&self) -> bool {
		self.0.iter().all(|&b| b == 0)
	}
}

impl fmt::Display for Guid {
	/// Registry format, e.g. `{F496E5E3-8ED2-4C4E-8D0B-5A0E2A9E62E1}`.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let b = &self.0;
		let data1 = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
		let data2 = u16::from_le_bytes([b[4], b[5]]);
		let data3 = u16::from_le_bytes([b[6], b[7]]);
		write!(
			f,
			"{{{data1:08X}-{data2:04X}-{data3:04X}-{}-{}}}",
			hex::encode_upper(&b[8..10]),
			hex::encode_upper(&b[10..16])
		)
	}
}

/// Name and description for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedInfo {
	/// Windows language id; only the primary language bits are meaningful
	pub language: u16,
	/// Character name
	pub name: String,
	/// Character description
	pub description: String,
	/// Extra text, usually empty
	pub extra: String,
}

impl LocalizedInfo {
	/// Primary language id (low 10 bits).
	pub fn primary_language(&self) -> u16 {
		self.language & 0x03FF
	}
}

/// Optional speech settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
	/// Text-to-speech engine id
	pub engine: Guid,
	/// Text-to-speech mode id
	pub mode: Guid,
	/// Speaking speed
	pub speed: u32,
	/// Voice pitch
	pub pitch: u16,
	/// Extended voice description
	pub extra: Option<VoiceExtra>,
}

/// Extended speech settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceExtra {
	/// Language id
	pub language: u16,
	/// Dialect name
	pub dialect: String,
	/// Speaker gender
	pub gender: u16,
	/// Speaker age
	pub age: u16,
	/// Speaking style
	pub style: String,
}

/// Word balloon appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalloonInfo {
	/// Number of text lines
	pub lines: u8,
	/// Characters per line
	pub chars_per_line: u8,
	/// Text color
	pub foreground: Color,
	/// Fill color
	pub background: Color,
	/// Border color
	pub border: Color,
	/// Font face name
	pub font_name: String,
	/// Font height in logical units
	pub font_height: i32,
	/// Font weight
	pub font_weight: i32,
	/// Italic font
	pub italic: bool,
}

/// A named group of states, e.g. `IDLINGLEVEL1` or `HIDING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateGroup {
	pub(crate) name: String,
	pub(crate) members: Vec<super::StateId>,
}

impl StateGroup {
	/// Group name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Member states in stored order.
	pub fn members(&self) -> &[super::StateId] {
		&self.members
	}
}

/// Everything about a character that is not an image, sound or animation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterMetadata {
	/// Format version as `(major, minor)`
	pub version: (u16, u16),
	/// Character id
	pub guid: Guid,
	/// Frame width in pixels
	pub width: u16,
	/// Frame height in pixels
	pub height: u16,
	/// Character flags
	pub flags: u32,
	/// Animation set version as `(major, minor)`
	pub animation_set_version: (u16, u16),
	/// Names and descriptions
	pub localized: Vec<LocalizedInfo>,
	/// Speech settings
	pub voice: Option<VoiceInfo>,
	/// Balloon settings
	pub balloon: Option<BalloonInfo>,
	/// Whether a tray icon is embedded
	pub has_tray_icon: bool,
}

impl CharacterMetadata {
	/// Language id used when a requested language is not present (English).
	pub const FALLBACK_LANGUAGE: u16 = 0x0009;

	/// Flag bit enabling the word balloon.
	pub const FLAG_BALLOON_ENABLED: u32 = 0x0000_0200;

	/// Looks up localized info by primary language, falling back to English
	/// and then to the first entry.
	pub fn localized_info(&self, language: u16) -> Option<&LocalizedInfo> {
		let primary = language & 0x03FF;
		self.localized
			.iter()
			.find(|info| info.primary_language() == primary)
			.or_else(|| {
				self.localized.iter().find(|info| info.primary_language() == Self::FALLBACK_LANGUAGE)
			})
			.or_else(|| self.localized.first())
	}

	/// Display name in the fallback language.
	pub fn name(&self) -> &str {
		self.localized_info(Self::FALLBACK_LANGUAGE).map(|info| info.name.as_str()).unwrap_or("")
	}

	/// Returns `true` when the word balloon is enabled.
	pub fn balloon_enabled(&self) -> bool {
		self.flags & Self::FLAG_BALLOON_ENABLED != 0
	}
}
