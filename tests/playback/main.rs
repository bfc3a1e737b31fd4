//! End-to-end playback tests for `kairu-rs`

mod agent;
mod character;
mod drag;
