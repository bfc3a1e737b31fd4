//! Animation states, frame steps and branch tables.
//!
//! An [`AnimationState`] is an ordered list of [`FrameStep`]s plus a weighted
//! table of [`BranchEntry`]s that is consulted when the sequence runs out.
//! Frames can additionally branch *within* the state (percent weighted jumps
//! to another frame index) and name an exit frame that is taken when the
//! runtime asks the animation to wrap up.

use std::fmt::{self, Write as _};

use rand::Rng;

/// Index of a state in a [`super::CharacterDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
	/// Position of the state in definition order.
	pub fn index(self) -> usize {
		self.0
	}
}

impl fmt::Display for StateId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Screen or offset coordinate in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
	/// Horizontal component
	pub x: i32,
	/// Vertical component
	pub y: i32,
}

impl Point {
	/// Creates a point.
	pub const fn new(x: i32, y: i32) -> Self {
		Self {
			x,
			y,
		}
	}

	/// Component-wise sum.
	pub const fn offset_by(self, other: Point) -> Self {
		Self::new(self.x.saturating_add(other.x), self.y.saturating_add(other.y))
	}

	/// Component-wise difference.
	pub const fn delta_to(self, other: Point) -> Self {
		Self::new(other.x.saturating_sub(self.x), other.y.saturating_sub(self.y))
	}
}

impl fmt::Display for Point {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {})", self.x, self.y)
	}
}

/// One bitmap layer of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameImage {
	/// Index into the definition's image list
	pub image: u32,
	/// Offset of the layer from the character origin
	pub offset: Point,
}

/// Percent weighted jump to another frame of the same state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameBranch {
	/// Frame index to continue at
	pub target_frame: u16,
	/// Probability in percent
	pub percent: u16,
}

impl FrameBranch {
	/// Exclusive upper bound of the draw passed to [`FrameStep::pick_frame_branch`]
	pub const PERCENT_SCALE: u32 = 100;
}

/// Kind of a mouth overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
	/// Closed mouth
	Closed,
	/// Wide open mouth, first shape
	Wide1,
	/// Wide open mouth, second shape
	Wide2,
	/// Wide open mouth, third shape
	Wide3,
	/// Wide open mouth, fourth shape
	Wide4,
	/// Medium open mouth
	Medium,
	/// Narrow open mouth
	Narrow,
	/// Value not assigned by the format
	Other(u8),
}

impl From<u8> for OverlayKind {
	fn from(value: u8) -> Self {
		match value {
			0 => Self::Closed,
			1 => Self::Wide1,
			2 => Self::Wide2,
			3 => Self::Wide3,
			4 => Self::Wide4,
			5 => Self::Medium,
			6 => Self::Narrow,
			other => Self::Other(other),
		}
	}
}

/// Image drawn over a frame while the character is speaking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
	/// Mouth shape the overlay represents
	pub kind: OverlayKind,
	/// Whether the overlay replaces the frame's top layer
	pub replaces_top: bool,
	/// Index into the definition's image list
	pub image: u32,
	/// Position relative to the character origin
	pub offset: Point,
	/// Overlay width in pixels
	pub width: u16,
	/// Overlay height in pixels
	pub height: u16,
}

/// One displayed entry of an animation sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameStep {
	/// Layers, topmost first; may be empty for a blank frame
	pub images: Vec<FrameImage>,
	/// Display time in milliseconds
	pub duration_ms: u32,
	/// Sound cue index
	pub sound: Option<u16>,
	/// Text cue index
	pub text: Option<u16>,
	/// Frame to jump to when the animation is asked to exit
	pub exit_frame: Option<u16>,
	/// Weighted jumps within the state, evaluated after the frame elapses
	pub branches: Vec<FrameBranch>,
	/// Mouth overlays
	pub overlays: Vec<Overlay>,
}

impl FrameStep {
	/// Creates a single-layer frame.
	pub fn new(image: u32, duration_ms: u32) -> Self {
		Self {
			images: vec![FrameImage {
				image,
				offset: Point::default(),
			}],
			duration_ms,
			..Self::default()
		}
	}

	/// Sets the sound cue.
	pub fn with_sound(mut self, sound: u16) -> Self {
		self.sound = Some(sound);
		self
	}

	/// Sets the text cue.
	pub fn with_text(mut self, text: u16) -> Self {
		self.text = Some(text);
		self
	}

	/// Sets the exit frame.
	pub fn with_exit_frame(mut self, frame: u16) -> Self {
		self.exit_frame = Some(frame);
		self
	}

	/// Adds an intra-state branch.
	pub fn with_branch(mut self, target_frame: u16, percent: u16) -> Self {
		self.branches.push(FrameBranch {
			target_frame,
			percent,
		});
		self
	}

	/// Offsets the top layer.
	pub fn with_offset(mut self, offset: Point) -> Self {
		if let Some(layer) = self.images.first_mut() {
			layer.offset = offset;
		}
		self
	}

	/// Image index of the top layer.
	pub fn image(&self) -> Option<u32> {
		self.images.first().map(|layer| layer.image)
	}

	/// Offset of the top layer.
	pub fn offset(&self) -> Point {
		self.images.first().map(|layer| layer.offset).unwrap_or_default()
	}

	/// Returns `true` when the frame fires a sound or text cue.
	pub fn has_cue(&self) -> bool {
		self.sound.is_some() || self.text.is_some()
	}

	/// Picks the next frame index from the intra-state branches.
	///
	/// `draw` is a value in `[0, 100)`. Returns `None` when no branch covers it,
	/// meaning playback continues with the following frame.
	pub fn pick_frame_branch(&self, draw: u32) -> Option<u16> {
		pick_weighted(self.branches.iter().map(|b| u32::from(b.percent)), draw)
			.map(|i| self.branches[i].target_frame)
	}
}

/// Destination of a state-level branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchTarget {
	/// Continue with another state
	State(StateId),
	/// End playback
	Exit,
}

/// Weighted entry of a state's branch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchEntry {
	/// Destination
	pub target: BranchTarget,
	/// Relative weight
	pub weight: u32,
}

/// Unresolved branch destination used while assembling a definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetSpec {
	/// State referenced by name
	State(String),
	/// End playback
	Exit,
}

impl TargetSpec {
	/// Named state target.
	pub fn state(name: impl Into<String>) -> Self {
		Self::State(name.into())
	}
}

/// How an animation hands over control when its sequence completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransitionKind {
	/// Continue with a return animation
	ReturnAnimation,
	/// Leave through exit branches; the animation cannot be cut short
	ExitBranches,
	/// No transition
	#[default]
	None,
}

impl TransitionKind {
	/// Maps the on-disk value; unknown values behave like `None`.
	pub fn from_u8(value: u8) -> Self {
		match value {
			0 => Self::ReturnAnimation,
			1 => Self::ExitBranches,
			_ => Self::None,
		}
	}
}

impl fmt::Display for TransitionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ReturnAnimation => write!(f, "Uses Return Animation"),
			Self::ExitBranches => write!(f, "Uses Exit Branches"),
			Self::None => write!(f, "No Transition"),
		}
	}
}

/// State description with name based branch targets.
///
/// Turned into an [`AnimationState`] by [`super::DefinitionBuilder::build`],
/// which resolves and validates every reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSpec {
	/// State name
	pub name: String,
	/// Frame sequence
	pub frames: Vec<FrameStep>,
	/// Branch table
	pub branches: Vec<(TargetSpec, u32)>,
	/// Transition kind reported by the container
	pub transition: TransitionKind,
	/// Eligible for random idle selection
	pub idle_eligible: bool,
	/// May be cut short by an interrupt
	pub interruptible: bool,
	/// Absolute offset of the record, for diagnostics
	pub source_offset: usize,
}

impl StateSpec {
	/// Creates an interruptible state without frames or branches.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			frames: Vec::new(),
			branches: Vec::new(),
			transition: TransitionKind::None,
			idle_eligible: false,
			interruptible: true,
			source_offset: 0,
		}
	}

	/// Appends a frame.
	pub fn frame(mut self, frame: FrameStep) -> Self {
		self.frames.push(frame);
		self
	}

	/// Appends a branch entry.
	pub fn branch(mut self, target: TargetSpec, weight: u32) -> Self {
		self.branches.push((target, weight));
		self
	}

	/// Marks the state idle-eligible.
	pub fn idle(mut self, idle: bool) -> Self {
		self.idle_eligible = idle;
		self
	}

	/// Sets whether the state may be interrupted mid-sequence.
	pub fn interruptible(mut self, interruptible: bool) -> Self {
		self.interruptible = interruptible;
		self
	}
}

/// A named, validated animation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationState {
	pub(crate) name: String,
	pub(crate) frames: Vec<FrameStep>,
	pub(crate) branches: Vec<BranchEntry>,
	pub(crate) transition: TransitionKind,
	pub(crate) idle_eligible: bool,
	pub(crate) interruptible: bool,
}

impl AnimationState {
	/// State name as stored in the container.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Frame sequence.
	pub fn frames(&self) -> &[FrameStep] {
		&self.frames
	}

	/// Frame at `index`.
	pub fn frame(&self, index: usize) -> Option<&FrameStep> {
		self.frames.get(index)
	}

	/// Branch table.
	pub fn branches(&self) -> &[BranchEntry] {
		&self.branches
	}

	/// Transition kind reported by the container.
	pub fn transition(&self) -> TransitionKind {
		self.transition
	}

	/// Whether the state takes part in random idle selection.
	pub fn is_idle_eligible(&self) -> bool {
		self.idle_eligible
	}

	/// Whether an interrupt may cut the sequence short.
	pub fn is_interruptible(&self) -> bool {
		self.interruptible
	}

	/// Sum of all frame durations in milliseconds.
	pub fn total_duration_ms(&self) -> u64 {
		self.frames.iter().map(|f| u64::from(f.duration_ms)).sum()
	}

	/// Sum of the branch weights.
	pub fn total_weight(&self) -> u64 {
		self.branches.iter().map(|b| u64::from(b.weight)).sum()
	}

	/// Weighted branch selection.
	///
	/// Draws a value in `[0, sum)` and walks the table in stored order; the
	/// first entry whose half-open interval contains the draw wins. Returns
	/// `None` when the weights sum to zero, leaving the fallback to the caller.
	pub fn pick_branch<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<BranchTarget> {
		let total = self.total_weight();
		if total == 0 {
			return None;
		}
		let draw = rng.random_range(0..total);
		pick_weighted_u64(self.branches.iter().map(|b| u64::from(b.weight)), draw)
			.map(|i| self.branches[i].target)
	}

	/// Human readable outline of frame ranges and their branches.
	///
	/// Frames are grouped between junctions (sequence start/end, frames that
	/// branch, and branch targets).
	pub fn describe(&self) -> String {
		let mut junctions = vec![0, self.frames.len()];
		for (i, frame) in self.frames.iter().enumerate() {
			if !frame.branches.is_empty() {
				junctions.push(i + 1);
				junctions.extend(frame.branches.iter().map(|b| usize::from(b.target_frame)));
			}
		}
		junctions.sort_unstable();
		junctions.dedup();

		let mut text = String::new();
		for pair in junctions.windows(2) {
			let (start, end) = (pair[0], pair[1] - 1);
			if start == end {
				let _ = write!(text, "Frame {start:>3}    : ");
			} else {
				let _ = write!(text, "Frame {start:>3}-{end:<3}: ");
			}
			let Some(frame) = self.frames.get(end) else {
				text.push('\n');
				continue;
			};
			let branches: Vec<String> = frame
				.branches
				.iter()
				.map(|b| format!("[->{} {}%]", b.target_frame, b.percent))
				.collect();
			text.push_str(&branches.join(", "));
			if let Some(exit) = frame.exit_frame {
				let _ = write!(text, " (exit ->{exit})");
			}
			text.push('\n');
		}
		text
	}
}

impl fmt::Display for AnimationState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "AnimationState({}, {} frames)", self.name, self.frames.len())
	}
}

/// Walks `weights` in order and returns the index whose half-open interval
/// `[sum_before, sum_before + weight)` contains `draw`.
pub fn pick_weighted(weights: impl IntoIterator<Item = u32>, draw: u32) -> Option<usize> {
	pick_weighted_u64(weights.into_iter().map(u64::from), u64::from(draw))
}

fn pick_weighted_u64(weights: impl IntoIterator<Item = u64>, draw: u64) -> Option<usize> {
	let mut upper = 0u64;
	for (i, weight) in weights.into_iter().enumerate() {
		upper += weight;
		if draw < upper {
			return Some(i);
		}
	}
	None
}
