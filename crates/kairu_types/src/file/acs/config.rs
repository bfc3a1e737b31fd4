//! Decode configuration for ACS character files.
//!
//! Real-world character files are not always tidy: stored images sometimes
//! carry a few bytes past their last row, and state groups occasionally list
//! animations that were removed from the file. [`DecodeConfig`] decides how
//! strictly such cases are treated and lets callers pin the special states
//! instead of relying on the naming heuristics.

use serde::{Deserialize, Serialize};

use crate::model::RoleNames;

/// Configuration for decoding character files.
///
/// # Presets
///
/// - `default()`: tolerant of excess image bytes, drops unknown group members
/// - `lenient()`: same as default
/// - `strict()`: rejects both
///
/// # Examples
///
/// ```
/// use kairu_types::file::acs::DecodeConfig;
/// use kairu_types::model::RoleNames;
///
/// let config = DecodeConfig::strict().with_roles(RoleNames {
///     exit_state: Some("Hide".to_string()),
///     ..RoleNames::default()
/// });
/// assert!(config.exact_image_size);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
	/// Reject stored images whose data is longer than the padded rows
	pub exact_image_size: bool,
	/// Reject state groups listing unknown animations
	pub strict_groups: bool,
	/// Role overrides
	pub roles: RoleNames,
}

impl DecodeConfig {
	/// Create a lenient configuration.
	pub fn lenient() -> Self {
		Self::default()
	}

	/// Create a strict configuration.
	pub fn strict() -> Self {
		Self {
			exact_image_size: true,
			strict_groups: true,
			roles: RoleNames::default(),
		}
	}

	/// Replaces the role overrides.
	pub fn with_roles(mut self, roles: RoleNames) -> Self {
		self.roles = roles;
		self
	}
}
