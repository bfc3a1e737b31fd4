//! ACS character utility.
//!
//! Provides three subcommands:
//! - `inspect`: print the metadata, roles, groups and animation graph of a
//!   character, as text or JSON
//! - `play`: run a character headless on a simulated clock and print every
//!   playback event
//! - `export`: render the frames of one animation to PNG files
//!
//! # Usage
//!
//! ```bash
//! # Summary of a character
//! cargo run --example acs_utils -- inspect clippit.acs
//!
//! # Frame outline of one animation, as JSON
//! cargo run --example acs_utils -- inspect clippit.acs -a Greeting --json
//!
//! # Play two animations, then exit
//! cargo run --example acs_utils -- play clippit.acs -a Greeting -a Wave --exit
//!
//! # Playback settings from a TOML file, overridden by the environment
//! KAIRU_SPEED_PERCENT=200 cargo run --example acs_utils -- play clippit.acs -c kairu.toml
//!
//! # Render every frame of an animation
//! cargo run --example acs_utils -- export clippit.acs Greeting -o frames/
//! ```

use std::{
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::RgbaImage;
use kairu_rs::prelude::*;
use serde::Serialize;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Inspect(args) => run_inspect(args),
		Command::Play(args) => run_play(args),
		Command::Export(args) => run_export(args),
	}
}

#[derive(Parser)]
#[command(name = "acs_utils")]
#[command(author = "kairu-rs project")]
#[command(version)]
#[command(about = "Inspect, play and export animated characters (.ACS)", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Print what a character file contains
	Inspect(InspectArgs),
	/// Play a character on a simulated clock
	Play(PlayArgs),
	/// Render the frames of one animation to PNG files
	Export(ExportArgs),
}

#[derive(Args)]
struct DecodeArgs {
	/// Path to the .ACS file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Reject oversized image records and unknown group members
	#[arg(long, default_value_t = false)]
	strict: bool,
}

#[derive(Args)]
struct InspectArgs {
	#[command(flatten)]
	decode: DecodeArgs,

	/// Only show this animation, with its frame outline
	#[arg(short, long, value_name = "NAME")]
	animation: Option<String>,

	/// Print JSON instead of text
	#[arg(long, default_value_t = false)]
	json: bool,
}

#[derive(Args)]
struct PlayArgs {
	#[command(flatten)]
	decode: DecodeArgs,

	/// Animations to request, in order
	#[arg(short, long = "animation", value_name = "NAME")]
	animations: Vec<String>,

	/// Request the exit animation after the others
	#[arg(long, default_value_t = false)]
	exit: bool,

	/// TOML file with playback settings
	#[arg(short, long, value_name = "CONFIG")]
	config: Option<PathBuf>,

	/// Simulated time to run for, in milliseconds
	#[arg(short, long, value_name = "MS", default_value_t = 10_000)]
	duration: u64,

	/// Seed for branch selection
	#[arg(short, long, value_name = "SEED")]
	seed: Option<u64>,
}

#[derive(Args)]
struct ExportArgs {
	#[command(flatten)]
	decode: DecodeArgs,

	/// Animation to render
	#[arg(value_name = "ANIMATION")]
	animation: String,

	/// Output directory (defaults to `<file>_<animation>/`)
	#[arg(short, long, value_name = "OUTPUT_DIR")]
	output: Option<PathBuf>,
}

fn load(args: &DecodeArgs) -> Result<AcsFile> {
	let config = if args.strict {
		AcsDecodeConfig::strict()
	} else {
		AcsDecodeConfig::default()
	};
	AcsFile::open_with_config(&args.file, &config)
		.with_context(|| format!("Failed to decode {}", args.file.display()))
}

#[derive(Serialize)]
struct CharacterSummary {
	name: String,
	guid: String,
	version: String,
	width: u16,
	height: u16,
	palette_colors: usize,
	images: usize,
	sounds: Vec<SoundSummary>,
	languages: Vec<String>,
	roles: RoleSummary,
	groups: Vec<GroupSummary>,
	animations: Vec<AnimationSummary>,
}

#[derive(Serialize)]
struct SoundSummary {
	bytes: usize,
	wave: bool,
	duration_ms: Option<u64>,
	magic: String,
}

#[derive(Serialize)]
struct RoleSummary {
	default_state: String,
	idle_state: String,
	return_state: String,
	exit_state: String,
}

#[derive(Serialize)]
struct GroupSummary {
	name: String,
	members: Vec<String>,
}

#[derive(Serialize)]
struct AnimationSummary {
	name: String,
	frames: usize,
	duration_ms: u64,
	transition: String,
	idle: bool,
	interruptible: bool,
	branches: Vec<BranchSummary>,
	#[serde(skip_serializing_if = "Option::is_none")]
	outline: Option<String>,
}

#[derive(Serialize)]
struct BranchSummary {
	target: Option<String>,
	weight: u32,
}

fn summarize(definition: &CharacterDefinition, only: Option<StateId>) -> CharacterSummary {
	let metadata = definition.metadata();
	let roles = definition.roles();
	let name = |id: StateId| definition.state_name(id).to_string();

	let animations = definition
		.state_ids()
		.filter(|id| only.is_none_or(|only| only == *id))
		.filter_map(|id| definition.state(id))
		.map(|state| AnimationSummary {
			name: state.name().to_string(),
			frames: state.frames().len(),
			duration_ms: state.total_duration_ms(),
			transition: state.transition().to_string(),
			idle: state.is_idle_eligible(),
			interruptible: state.is_interruptible(),
			branches: state
				.branches()
				.iter()
				.map(|entry| BranchSummary {
					target: match entry.target {
						BranchTarget::State(id) => Some(name(id)),
						BranchTarget::Exit => None,
					},
					weight: entry.weight,
				})
				.collect(),
			outline: only.map(|_| state.describe()),
		})
		.collect();

	CharacterSummary {
		name: metadata.name().to_string(),
		guid: metadata.guid.to_string(),
		version: format!("{}.{}", metadata.version.0, metadata.version.1),
		width: metadata.width,
		height: metadata.height,
		palette_colors: definition.palette().len(),
		images: definition.images().len(),
		sounds: definition
			.sounds()
			.iter()
			.map(|sound| SoundSummary {
				bytes: sound.len(),
				wave: sound.is_wave(),
				duration_ms: sound.duration_ms(),
				magic: hex::encode(&sound.data()[..sound.len().min(4)]),
			})
			.collect(),
		languages: metadata
			.localized
			.iter()
			.map(|info| format!("0x{:04X} {}", info.language, info.name))
			.collect(),
		roles: RoleSummary {
			default_state: name(roles.default_state),
			idle_state: name(roles.idle_state),
			return_state: name(roles.return_state),
			exit_state: name(roles.exit_state),
		},
		groups: definition
			.groups()
			.iter()
			.map(|group| GroupSummary {
				name: group.name().to_string(),
				members: group.members().iter().map(|&id| name(id)).collect(),
			})
			.collect(),
		animations,
	}
}

fn run_inspect(args: InspectArgs) -> Result<()> {
	let file = load(&args.decode)?;
	let definition = file.definition();

	let only = match &args.animation {
		Some(animation) => match definition.state_id(animation) {
			Some(id) => Some(id),
			None => bail!("No animation named {animation:?}"),
		},
		None => None,
	};
	let summary = summarize(definition, only);

	if args.json {
		println!("{}", serde_json::to_string_pretty(&summary)?);
		return Ok(());
	}

	println!("File: {} ({} bytes)", args.decode.file.display(), file.size());
	println!("Name: {} | GUID: {} | version {}", summary.name, summary.guid, summary.version);
	println!(
		"Size: {}x{} | palette: {} colors | images: {} | sounds: {}",
		summary.width,
		summary.height,
		summary.palette_colors,
		summary.images,
		summary.sounds.len()
	);
	for language in &summary.languages {
		println!("  language {language}");
	}
	println!(
		"Roles: default {} | idle {} | return {} | exit {}",
		summary.roles.default_state,
		summary.roles.idle_state,
		summary.roles.return_state,
		summary.roles.exit_state
	);
	for group in &summary.groups {
		println!("Group {}: {}", group.name, group.members.join(", "));
	}

	println!("Animations: {}", summary.animations.len());
	for animation in &summary.animations {
		let branches: Vec<String> = animation
			.branches
			.iter()
			.map(|b| format!("{}:{}", b.target.as_deref().unwrap_or("<exit>"), b.weight))
			.collect();
		println!(
			"  {:<28} frames {:3} {:6} ms | {:<14} | idle {:5} | -> {}",
			animation.name,
			animation.frames,
			animation.duration_ms,
			animation.transition,
			animation.idle,
			branches.join(", ")
		);
		if let Some(outline) = &animation.outline {
			for line in outline.lines() {
				println!("    {line}");
			}
		}
	}

	Ok(())
}

/// Defaults, then the optional TOML file, then `KAIRU_*` variables.
fn load_playback_config(path: Option<&Path>) -> Result<PlaybackConfig> {
	let mut builder = config::Config::builder();
	if let Some(path) = path {
		builder = builder.add_source(config::File::from(path).required(true));
	}
	let config = builder
		.add_source(config::Environment::with_prefix("KAIRU").try_parsing(true))
		.build()
		.context("Failed to load playback settings")?
		.try_deserialize()
		.context("Invalid playback settings")?;
	Ok(config)
}

fn run_play(args: PlayArgs) -> Result<()> {
	let file = load(&args.decode)?;
	let config = load_playback_config(args.config.as_deref())?;
	let step = config.tick_interval_ms.max(1);
	log::info!("Playback settings: {config:?}");

	let definition = Arc::new(file.into_definition());
	let mut agent = match args.seed {
		Some(seed) => Agent::with_seed(Arc::clone(&definition), config, seed),
		None => Agent::new(Arc::clone(&definition), config),
	};

	let requests = agent.sender();
	for (i, animation) in args.animations.iter().enumerate() {
		let request = if i == 0 {
			Request::Animate(animation.clone())
		} else {
			Request::Enqueue(animation.clone())
		};
		requests.send(request).context("Request queue rejected an animation")?;
	}
	if args.exit {
		requests.send(Request::Exit).context("Request queue rejected the exit request")?;
	}

	print_events(&definition, 0, &agent.show());
	let mut now = 0;
	while now < args.duration {
		now += step;
		let output = agent.tick(step);
		for warning in &output.warnings {
			println!("{now:>8} ms  warning: {warning}");
		}
		print_events(&definition, now, &output.events);
		if output.status == AgentStatus::Exit {
			println!("{now:>8} ms  exit");
			break;
		}
	}

	Ok(())
}

fn print_events(definition: &CharacterDefinition, now: u64, events: &[PlaybackEvent]) {
	for event in events {
		match event {
			PlaybackEvent::FrameChanged {
				state,
				frame,
				image,
				position,
			} => println!(
				"{now:>8} ms  {} frame {frame} image {} at {position}",
				definition.state_name(*state),
				image.map_or_else(|| "-".to_string(), |i| i.to_string())
			),
			PlaybackEvent::CueFired {
				state,
				frame,
				sound,
				text,
			} => println!(
				"{now:>8} ms  {} frame {frame} cue sound {sound:?} text {:?}",
				definition.state_name(*state),
				text.and_then(|t| definition.text(t))
			),
			PlaybackEvent::AnimationFinished {
				name,
				..
			} => println!("{now:>8} ms  {name} finished"),
			PlaybackEvent::Balloon {
				text,
			} => println!("{now:>8} ms  balloon {text:?}"),
		}
	}
}

fn run_export(args: ExportArgs) -> Result<()> {
	let file = load(&args.decode)?;
	let definition = file.definition();
	let Some((_, state)) = definition.state_by_name(&args.animation) else {
		bail!("No animation named {:?}", args.animation);
	};

	let output = args.output.unwrap_or_else(|| {
		let stem = args.decode.file.file_stem().and_then(|s| s.to_str()).unwrap_or("character");
		PathBuf::from(format!("{stem}_{}", state.name()))
	});
	fs::create_dir_all(&output)
		.with_context(|| format!("Failed to create {}", output.display()))?;

	let width = u32::from(definition.width());
	let height = u32::from(definition.height());
	for (i, frame) in state.frames().iter().enumerate() {
		let canvas = definition.compose_frame(frame);
		let Some(img) = RgbaImage::from_raw(width, height, canvas) else {
			bail!("Frame {i} does not fit a {width}x{height} canvas");
		};
		let path = output.join(format!("frame_{i:03}.png"));
		img.save(&path).with_context(|| format!("Failed to write {}", path.display()))?;
	}

	println!(
		"Exported {} frames of {} to {}",
		state.frames().len(),
		state.name(),
		output.display()
	);
	Ok(())
}
