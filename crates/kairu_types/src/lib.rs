//! This crate provides the character file decoder and the animation model for
//! the `kairu-rs` project.
//!
//! # Layout
//!
//! - [`file`]: the `.ACS` container decoder and its error type
//! - [`model`]: the immutable [`model::CharacterDefinition`] produced by the
//!   decoder: images, palette, sounds, and the graph of animation states
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use kairu_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = AcsFile::open("clippit.acs")?;
//! let definition = file.definition();
//! let (_, greet) = definition.state_by_name("Greeting").expect("no greeting");
//! println!("{}", greet.describe());
//! # Ok(())
//! # }
//! ```
//!
//! Or decode bytes directly:
//!
//! ```no_run
//! use kairu_types::file::acs;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("clippit.acs")?;
//! let definition = acs::decode(&data)?;
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod model;

/// `use kairu_types::prelude::*;` to import commonly used items.
pub mod prelude;
