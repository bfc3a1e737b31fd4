//! ACS file format constants.
//!
//! Structure offsets, sizes, flag bits and sentinel values used by the
//! character container.

/// Magic number at offset 0 (`C3 AB CD AB` on disk)
pub const MAGIC: u32 = 0xABCD_ABC3;

/// Size of the file header: magic + four locators
pub const HEADER_SIZE: usize = 4 + 4 * LOCATOR_SIZE;

/// Size of an offset/size locator pair
pub const LOCATOR_SIZE: usize = 8;

/// Size of the NUL terminator following a non-empty string
pub const STRING_TERMINATOR_SIZE: usize = 2;

/// Size of a GUID
pub const GUID_SIZE: usize = 16;

/// Character flag: voice output information follows the version fields
pub const FLAG_VOICE_INFO: u32 = 0x0000_0020;

/// Character flag: word balloon is enabled
pub const FLAG_BALLOON_ENABLED: u32 = 0x0000_0200;

/// Sound index meaning "no sound"
pub const NO_SOUND: u16 = 0xFFFF;

/// Exit frame index meaning "no exit branch"; any negative index is read the same way
pub const NO_EXIT_FRAME: i16 = -1;

/// Image and audio table entries: locator followed by a checksum
pub const TABLE_ENTRY_SIZE: usize = LOCATOR_SIZE + 4;

/// Centiseconds to milliseconds
pub const DURATION_UNIT_MS: u32 = 10;

/// Size of one RGBQUAD palette entry
pub const PALETTE_ENTRY_SIZE: usize = 4;

/// Row alignment of pixel data in bytes
pub const ROW_ALIGNMENT: usize = 4;

/// Transition type: play the return animation when the sequence ends
pub const TRANSITION_RETURN: u8 = 0;

/// Transition type: the animation is left through exit branches
pub const TRANSITION_EXIT_BRANCHES: u8 = 1;

/// Transition type: no transition
pub const TRANSITION_NONE: u8 = 2;

/// Language id used as localized info fallback (en-US)
pub const FALLBACK_LANGUAGE: u16 = 0x0009;
