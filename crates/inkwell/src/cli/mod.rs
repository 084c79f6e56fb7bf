//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the inkwell binary.

mod commands;
mod extract;
mod storyboard;

pub use commands::{Cli, Commands};
pub use extract::{ExtractOptions, run_extract};
pub use storyboard::run_storyboard;
