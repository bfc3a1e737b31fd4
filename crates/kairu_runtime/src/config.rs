//! Playback configuration.

use serde::{Deserialize, Serialize};

/// Settings for a running character.
///
/// Deserializable so front ends can load it from a config file; missing
/// fields take their defaults.
///
/// # Examples
///
/// ```
/// use kairu_runtime::PlaybackConfig;
///
/// let config = PlaybackConfig {
///     speed_percent: 200,
///     ..PlaybackConfig::default()
/// };
/// assert_eq!(config.scale_delta(50), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
	/// Playback speed in percent of real time
	pub speed_percent: u32,
	/// Start a random idle animation after a quiet period
	pub auto_idle: bool,
	/// Shortest quiet period before idling
	pub idle_delay_min_ms: u64,
	/// Longest quiet period before idling
	pub idle_delay_max_ms: u64,
	/// Capacity of the external request queue
	pub request_queue_capacity: usize,
	/// Report frames with zero duration to the renderer
	pub emit_zero_duration_frames: bool,
	/// Tick interval used by front ends driving the loop
	pub tick_interval_ms: u64,
	/// Play a `Showing` group member when `Hide` or `Goodbye` ends on its own
	pub reappear_after_hide: bool,
	/// Draw idle animations from every state instead of the idle-eligible ones
	pub idle_all_states: bool,
}

impl Default for PlaybackConfig {
	fn default() -> Self {
		Self {
			speed_percent: 100,
			auto_idle: true,
			idle_delay_min_ms: 5_000,
			idle_delay_max_ms: 15_000,
			request_queue_capacity: 16,
			emit_zero_duration_frames: false,
			tick_interval_ms: 10,
			reappear_after_hide: true,
			idle_all_states: false,
		}
	}
}

impl PlaybackConfig {
	/// Configuration for deterministic tests: real-time speed, no idling.
	pub fn manual() -> Self {
		Self {
			auto_idle: false,
			..Self::default()
		}
	}

	/// Converts wall-clock milliseconds to playback milliseconds.
	pub fn scale_delta(&self, delta_ms: u64) -> u64 {
		delta_ms.saturating_mul(u64::from(self.speed_percent)) / 100
	}

	/// Idle delay bounds with `min <= max`.
	pub fn idle_delay_range(&self) -> std::ops::RangeInclusive<u64> {
		let min = self.idle_delay_min_ms.min(self.idle_delay_max_ms);
		let max = self.idle_delay_min_ms.max(self.idle_delay_max_ms);
		min..=max
	}
}
