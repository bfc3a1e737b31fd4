#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `kairu-rs` decodes legacy animated desktop characters (`.ACS` files) and
//! plays them back.
//!
//! - [`kairu_types`] reads the container into an immutable
//!   [`CharacterDefinition`]
//! - [`kairu_runtime`] drives a definition through its animation graph and
//!   reacts to pointer input
//!
pub use kairu_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use kairu_dylib;
