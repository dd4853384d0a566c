//! CLI module for blurdistill
//!
//! Command handler and stdout logging helpers.

mod commands;
mod logging;

pub use commands::{run_command, run_experiment};
pub use logging::{log, LogLevel};

// Re-export Cli from config for convenience
pub use crate::config::Cli;
