//! Forces dynamic linking of `kairu_internal` when the `dynamic_linking` feature is enabled.

#[allow(unused_imports)]
#[allow(clippy::single_component_path_imports)]
use kairu_internal;
