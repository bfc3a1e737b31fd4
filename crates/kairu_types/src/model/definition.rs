//! The immutable character definition and its builder.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::file::{ChunkKind, DecodeError, ReferenceKind};

use super::{
	AnimationState, BranchEntry, BranchTarget, CharacterMetadata, FrameStep, ImageFrame, Palette,
	SoundCue, StateGroup, StateId, StateSpec, TargetSpec,
};

/// Names of the states that play a special role, by name.
///
/// Unset roles are filled in by heuristics when the definition is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleNames {
	/// State shown when nothing else plays
	pub default_state: Option<String>,
	/// State played when the character is idle
	pub idle_state: Option<String>,
	/// Fallback for states whose branch weights sum to zero
	pub return_state: Option<String>,
	/// State played when the character is dismissed
	pub exit_state: Option<String>,
}

/// Resolved special states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Roles {
	/// State shown when nothing else plays
	pub default_state: StateId,
	/// State played when the character is idle
	pub idle_state: StateId,
	/// Fallback for states whose branch weights sum to zero
	pub return_state: StateId,
	/// State played when the character is dismissed
	pub exit_state: StateId,
}

/// Fully validated character: images, palette, sounds, strings and the
/// animation graph.
///
/// Every index stored anywhere in the definition (images of a frame, sound
/// and text cues, branch targets, roles) has been checked against the table
/// it refers to, so lookups through a [`StateId`] obtained from this
/// definition always succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDefinition {
	metadata: CharacterMetadata,
	palette: Palette,
	images: Vec<ImageFrame>,
	sounds: Vec<SoundCue>,
	strings: Vec<String>,
	states: Vec<AnimationState>,
	index: HashMap<String, StateId>,
	groups: Vec<StateGroup>,
	roles: Roles,
}

impl CharacterDefinition {
	/// Starts assembling a definition.
	pub fn builder() -> DefinitionBuilder {
		DefinitionBuilder::new()
	}

	/// Character metadata.
	pub fn metadata(&self) -> &CharacterMetadata {
		&self.metadata
	}

	/// Character width in pixels.
	pub fn width(&self) -> u16 {
		self.metadata.width
	}

	/// Character height in pixels.
	pub fn height(&self) -> u16 {
		self.metadata.height
	}

	/// Shared palette.
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// All images.
	pub fn images(&self) -> &[ImageFrame] {
		&self.images
	}

	/// Image by index.
	pub fn image(&self, index: u32) -> Option<&ImageFrame> {
		self.images.get(index as usize)
	}

	/// All sound cues.
	pub fn sounds(&self) -> &[SoundCue] {
		&self.sounds
	}

	/// Sound cue by index.
	pub fn sound(&self, index: u16) -> Option<&SoundCue> {
		self.sounds.get(usize::from(index))
	}

	/// String table for text cues.
	pub fn strings(&self) -> &[String] {
		&self.strings
	}

	/// Text cue by index.
	pub fn text(&self, index: u16) -> Option<&str> {
		self.strings.get(usize::from(index)).map(String::as_str)
	}

	/// All states in stored order.
	pub fn states(&self) -> &[AnimationState] {
		&self.states
	}

	/// State ids in stored order.
	pub fn state_ids(&self) -> impl Iterator<Item = StateId> + '_ {
		(0..self.states.len()).map(StateId)
	}

	/// State by id.
	pub fn state(&self, id: StateId) -> Option<&AnimationState> {
		self.states.get(id.0)
	}

	/// Case-insensitive state lookup.
	pub fn state_id(&self, name: &str) -> Option<StateId> {
		self.index.get(&name.to_uppercase()).copied()
	}

	/// Case-insensitive state lookup returning the state itself.
	pub fn state_by_name(&self, name: &str) -> Option<(StateId, &AnimationState)> {
		let id = self.state_id(name)?;
		self.state(id).map(|state| (id, state))
	}

	/// Name of a state, empty for foreign ids.
	pub fn state_name(&self, id: StateId) -> &str {
		self.state(id).map(AnimationState::name).unwrap_or("")
	}

	/// Resolved roles.
	pub fn roles(&self) -> Roles {
		self.roles
	}

	/// State groups.
	pub fn groups(&self) -> &[StateGroup] {
		&self.groups
	}

	/// Case-insensitive group lookup.
	pub fn group(&self, name: &str) -> Option<&StateGroup> {
		self.groups.iter().find(|group| group.name.eq_ignore_ascii_case(name))
	}

	/// Picks a uniformly random member of a group.
	pub fn random_in_group<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Option<StateId> {
		let members = self.group(name)?.members();
		if members.is_empty() {
			return None;
		}
		Some(members[rng.random_range(0..members.len())])
	}

	/// Resolves an animation request.
	///
	/// A leading `#` names a state group and selects a random member;
	/// anything else is a case-insensitive state name.
	pub fn resolve_request<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Option<StateId> {
		match name.strip_prefix('#') {
			Some(group) => self.random_in_group(group, rng),
			None => self.state_id(name),
		}
	}

	/// Ids of all idle-eligible states.
	pub fn idle_states(&self) -> impl Iterator<Item = StateId> + '_ {
		self.state_ids().filter(|&id| self.states[id.0].idle_eligible)
	}

	/// Picks a uniformly random idle-eligible state.
	pub fn random_idle<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<StateId> {
		let idle: Vec<StateId> = self.idle_states().collect();
		if idle.is_empty() {
			return None;
		}
		Some(idle[rng.random_range(0..idle.len())])
	}

	/// Picks a uniformly random state of any kind.
	pub fn random_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<StateId> {
		if self.states.is_empty() {
			return None;
		}
		Some(StateId(rng.random_range(0..self.states.len())))
	}

	/// Returns `true` for states after which the character is off screen.
	pub fn is_hiding_state(&self, id: StateId) -> bool {
		let name = self.state_name(id);
		name.eq_ignore_ascii_case("HIDE") || name.eq_ignore_ascii_case("GOODBYE")
	}

	/// Picks a random member of the `Showing` group, if the character has one.
	pub fn random_showing<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<StateId> {
		self.random_in_group("SHOWING", rng)
	}

	/// Weighted choice of the state that follows `id`.
	///
	/// Falls back to the return role when the weights sum to zero.
	pub fn select_branch<R: Rng + ?Sized>(&self, id: StateId, rng: &mut R) -> BranchTarget {
		self.state(id)
			.and_then(|state| state.pick_branch(rng))
			.unwrap_or(BranchTarget::State(self.roles.return_state))
	}

	/// Name of the state [`CharacterDefinition::select_branch`] picks, or
	/// `None` for the exit sentinel.
	pub fn select_branch_name<R: Rng + ?Sized>(&self, id: StateId, rng: &mut R) -> Option<&str> {
		match self.select_branch(id, rng) {
			BranchTarget::State(next) => Some(self.state_name(next)),
			BranchTarget::Exit => None,
		}
	}

	/// Renders a frame to a `width * height` RGBA8 canvas.
	///
	/// Layers are drawn bottom to top at their offsets; pixels using the
	/// transparent palette index are skipped, pixels outside the canvas are
	/// clipped.
	pub fn compose_frame(&self, frame: &FrameStep) -> Vec<u8> {
		let width = i64::from(self.metadata.width);
		let height = i64::from(self.metadata.height);
		let mut canvas = vec![0u8; (width * height * 4) as usize];
		let transparent = self.palette.transparent_index();

		for layer in frame.images.iter().rev() {
			let Some(image) = self.image(layer.image) else {
				continue;
			};
			for y in 0..image.height() {
				let dy = i64::from(layer.offset.y) + i64::from(y);
				if dy < 0 || dy >= height {
					continue;
				}
				for x in 0..image.width() {
					let dx = i64::from(layer.offset.x) + i64::from(x);
					if dx < 0 || dx >= width {
						continue;
					}
					let Some(index) = image.index_at(x, y) else {
						continue;
					};
					if Some(index) == transparent {
						continue;
					}
					let at = ((dy * width + dx) * 4) as usize;
					canvas[at..at + 4].copy_from_slice(&self.palette.get(index).to_array());
				}
			}
		}
		canvas
	}
}

/// Assembles and validates a [`CharacterDefinition`].
///
/// The decoder feeds it with data read from a file; tests and tools can
/// build definitions in memory the same way.
#[derive(Debug, Clone)]
pub struct DefinitionBuilder {
	metadata: CharacterMetadata,
	palette: Palette,
	images: Vec<ImageFrame>,
	sounds: Vec<SoundCue>,
	strings: Vec<String>,
	states: Vec<StateSpec>,
	groups: Vec<(String, Vec<String>)>,
	roles: RoleNames,
	strict_groups: bool,
	source: ChunkKind,
}

impl Default for DefinitionBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl DefinitionBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self {
			metadata: CharacterMetadata::default(),
			palette: Palette::default(),
			images: Vec::new(),
			sounds: Vec::new(),
			strings: Vec::new(),
			states: Vec::new(),
			groups: Vec::new(),
			roles: RoleNames::default(),
			strict_groups: false,
			source: ChunkKind::Definition,
		}
	}

	/// Sets the metadata.
	pub fn metadata(mut self, metadata: CharacterMetadata) -> Self {
		self.metadata = metadata;
		self
	}

	/// Sets the character size.
	pub fn size(mut self, width: u16, height: u16) -> Self {
		self.metadata.width = width;
		self.metadata.height = height;
		self
	}

	/// Sets the palette.
	pub fn palette(mut self, palette: Palette) -> Self {
		self.palette = palette;
		self
	}

	/// Appends an image.
	pub fn image(mut self, image: ImageFrame) -> Self {
		self.images.push(image);
		self
	}

	/// Replaces the image list.
	pub fn images(mut self, images: Vec<ImageFrame>) -> Self {
		self.images = images;
		self
	}

	/// Appends a sound cue.
	pub fn sound(mut self, sound: SoundCue) -> Self {
		self.sounds.push(sound);
		self
	}

	/// Replaces the sound list.
	pub fn sounds(mut self, sounds: Vec<SoundCue>) -> Self {
		self.sounds = sounds;
		self
	}

	/// Appends a text cue string.
	pub fn string(mut self, text: impl Into<String>) -> Self {
		self.strings.push(text.into());
		self
	}

	/// Appends a state.
	pub fn state(mut self, state: StateSpec) -> Self {
		self.states.push(state);
		self
	}

	/// Replaces the state list.
	pub fn states(mut self, states: Vec<StateSpec>) -> Self {
		self.states = states;
		self
	}

	/// Appends a state group.
	pub fn group(mut self, name: impl Into<String>, members: Vec<String>) -> Self {
		self.groups.push((name.into(), members));
		self
	}

	/// Sets role overrides.
	pub fn roles(mut self, roles: RoleNames) -> Self {
		self.roles = roles;
		self
	}

	/// Rejects group members that name unknown states instead of dropping them.
	pub fn strict_groups(mut self, strict: bool) -> Self {
		self.strict_groups = strict;
		self
	}

	/// Chunk reported in validation errors.
	pub fn source(mut self, chunk: ChunkKind) -> Self {
		self.source = chunk;
		self
	}

	/// Resolves every reference and produces the definition.
	///
	/// # Errors
	///
	/// - [`DecodeError::DanglingReference`] for image, sound or text indices
	///   past the end of their tables
	/// - [`DecodeError::InvalidGraph`] for duplicate or unresolvable state
	///   names, frame jumps past the sequence end and unresolvable roles
	pub fn build(self) -> Result<CharacterDefinition, DecodeError> {
		let chunk = self.source;
		if self.states.is_empty() {
			return Err(invalid(chunk, 0, "definition has no states"));
		}

		let mut index = HashMap::with_capacity(self.states.len());
		for (i, spec) in self.states.iter().enumerate() {
			if index.insert(spec.name.to_uppercase(), StateId(i)).is_some() {
				return Err(invalid(
					chunk,
					spec.source_offset,
					format!("duplicate state name {:?}", spec.name),
				));
			}
		}

		let tables = TableSizes {
			images: self.images.len(),
			sounds: self.sounds.len(),
			strings: self.strings.len(),
		};

		let mut states = Vec::with_capacity(self.states.len());
		for spec in self.states {
			for (i, frame) in spec.frames.iter().enumerate() {
				check_frame(chunk, &spec, i, frame, &tables)?;
			}

			let mut branches = Vec::with_capacity(spec.branches.len());
			for (target, weight) in &spec.branches {
				let target = match target {
					TargetSpec::Exit => BranchTarget::Exit,
					TargetSpec::State(name) => {
						let id = index.get(&name.to_uppercase()).copied().ok_or_else(|| {
							invalid(
								chunk,
								spec.source_offset,
								format!("state {:?} branches to unknown state {name:?}", spec.name),
							)
						})?;
						BranchTarget::State(id)
					}
				};
				branches.push(BranchEntry {
					target,
					weight: *weight,
				});
			}

			states.push(AnimationState {
				name: spec.name,
				frames: spec.frames,
				branches,
				transition: spec.transition,
				idle_eligible: spec.idle_eligible,
				interruptible: spec.interruptible,
			});
		}

		let mut groups = Vec::with_capacity(self.groups.len());
		for (name, member_names) in self.groups {
			let mut members = Vec::with_capacity(member_names.len());
			for member in &member_names {
				match index.get(&member.to_uppercase()) {
					Some(&id) => members.push(id),
					None if self.strict_groups => {
						return Err(invalid(
							chunk,
							0,
							format!("state group {name:?} lists unknown state {member:?}"),
						));
					}
					None => log::warn!("State group {name:?} lists unknown state {member:?}, skipped"),
				}
			}
			if name.to_uppercase().starts_with("IDLING") {
				for id in &members {
					states[id.0].idle_eligible = true;
				}
			}
			groups.push(StateGroup {
				name,
				members,
			});
		}

		let roles = resolve_roles(chunk, &self.roles, &index, &states, &groups)?;
		log::debug!(
			"Built definition: {} states, {} images, {} sounds, {} groups",
			states.len(),
			self.images.len(),
			self.sounds.len(),
			groups.len()
		);

		Ok(CharacterDefinition {
			metadata: self.metadata,
			palette: self.palette,
			images: self.images,
			sounds: self.sounds,
			strings: self.strings,
			states,
			index,
			groups,
			roles,
		})
	}
}

struct TableSizes {
	images: usize,
	sounds: usize,
	strings: usize,
}

fn invalid(chunk: ChunkKind, offset: usize, message: impl Into<String>) -> DecodeError {
	DecodeError::InvalidGraph {
		chunk,
		offset,
		message: message.into(),
	}
}

fn dangling(
	chunk: ChunkKind,
	spec: &StateSpec,
	kind: ReferenceKind,
	index: usize,
	count: usize,
) -> DecodeError {
	DecodeError::DanglingReference {
		chunk,
		offset: spec.source_offset,
		kind,
		index,
		count,
	}
}

fn check_frame(
	chunk: ChunkKind,
	spec: &StateSpec,
	position: usize,
	frame: &FrameStep,
	tables: &TableSizes,
) -> Result<(), DecodeError> {
	let images = frame
		.images
		.iter()
		.map(|layer| layer.image as usize)
		.chain(frame.overlays.iter().map(|overlay| overlay.image as usize));
	for image in images {
		if image >= tables.images {
			return Err(dangling(chunk, spec, ReferenceKind::Image, image, tables.images));
		}
	}
	if let Some(sound) = frame.sound.map(usize::from).filter(|&s| s >= tables.sounds) {
		return Err(dangling(chunk, spec, ReferenceKind::Sound, sound, tables.sounds));
	}
	if let Some(text) = frame.text.map(usize::from).filter(|&t| t >= tables.strings) {
		return Err(dangling(chunk, spec, ReferenceKind::Text, text, tables.strings));
	}

	// A jump to `len` means "end of sequence"
	let frame_count = spec.frames.len();
	let jumps = frame
		.branches
		.iter()
		.map(|branch| usize::from(branch.target_frame))
		.chain(frame.exit_frame.map(usize::from));
	for target in jumps {
		if target > frame_count {
			return Err(invalid(
				chunk,
				spec.source_offset,
				format!(
					"frame {position} of {:?} jumps to frame {target} of {frame_count}",
					spec.name
				),
			));
		}
	}
	Ok(())
}

fn resolve_roles(
	chunk: ChunkKind,
	names: &RoleNames,
	index: &HashMap<String, StateId>,
	states: &[AnimationState],
	groups: &[StateGroup],
) -> Result<Roles, DecodeError> {
	let lookup = |name: &str| index.get(&name.to_uppercase()).copied();
	let explicit = |role: &str, name: &Option<String>| -> Result<Option<StateId>, DecodeError> {
		match name {
			Some(name) => lookup(name)
				.map(Some)
				.ok_or_else(|| invalid(chunk, 0, format!("{role} state {name:?} does not exist"))),
			None => Ok(None),
		}
	};
	let first_of_group = |group: &str| {
		groups
			.iter()
			.find(|g| g.name.eq_ignore_ascii_case(group))
			.and_then(|g| g.members.first().copied())
	};

	let default_state = match explicit("default", &names.default_state)? {
		Some(id) => id,
		None => lookup("RESTPOSE").unwrap_or(StateId(0)),
	};

	let idle_state = match explicit("idle", &names.idle_state)? {
		Some(id) => id,
		None => first_of_group("IDLINGLEVEL1")
			.or_else(|| states.iter().position(|s| s.idle_eligible).map(StateId))
			.unwrap_or(default_state),
	};

	let return_state = match explicit("return", &names.return_state)? {
		Some(id) => id,
		None => lookup("RESTPOSE").unwrap_or(idle_state),
	};

	let exit_state = match explicit("exit", &names.exit_state)? {
		Some(id) => id,
		None => lookup("GOODBYE")
			.or_else(|| lookup("HIDE"))
			.or_else(|| first_of_group("HIDING"))
			.ok_or_else(|| invalid(chunk, 0, "no exit state (GOODBYE, HIDE or HIDING group)"))?,
	};

	Ok(Roles {
		default_state,
		idle_state,
		return_state,
		exit_state,
	})
}
