//! Subcommand implementations.

pub mod analyze;
pub mod config;
pub mod generate;
pub mod presets;
pub mod process;
