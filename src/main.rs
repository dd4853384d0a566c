//! blurdistill CLI
//!
//! Trains a multi-exit backbone on CIFAR with self-distillation.
//!
//! # Usage
//!
//! ```bash
//! # CIFAR-10, resnet18, lambda 0.5
//! blurdistill --data-root data
//!
//! # CIFAR-100, resnet34, no distillation
//! blurdistill --class-num 100 --depth 34 --lambda-kd 0.0
//! ```

use blurdistill::cli::{run_command, Cli};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_user_error() => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
