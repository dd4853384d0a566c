//! Command-line interface

use super::ExperimentConfig;
use crate::cli::LogLevel;
use clap::Parser;

/// Multi-exit self-distillation on blurred grayscale CIFAR
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "blurdistill")]
#[command(version)]
#[command(about = "Train a multi-exit classifier with self-distillation under random blur")]
pub struct Cli {
    #[command(flatten)]
    pub experiment: ExperimentConfig,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> LogLevel {
        if self.quiet {
            LogLevel::Quiet
        } else if self.verbose {
            LogLevel::Verbose
        } else {
            LogLevel::Normal
        }
    }
}

/// Parse arguments (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
