//! Tooling & Integration Layer
//!
//! The `gradetree` command-line interface and its text renderers.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands, OutputFormat};
