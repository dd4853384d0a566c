//! Startup configuration
//!
//! Command-line options are parsed with clap into a [`Cli`]; the experiment
//! part ([`ExperimentConfig`]) is also the JSON snapshot written next to the
//! run's outputs.

mod cli;
mod experiment;

pub use cli::{parse_args, Cli};
pub use experiment::ExperimentConfig;
