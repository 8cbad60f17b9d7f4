//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod config;
pub mod preset;
pub mod price;
