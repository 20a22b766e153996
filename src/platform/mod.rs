// Collection Report - platform/mod.rs
//
// Platform layer: real filesystem access, config directories, config.toml.
// Dependencies: core (for the LogSource trait), util, directories crate.

pub mod config;
pub mod fs;
