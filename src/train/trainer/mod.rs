//! Trainer for multi-exit models

mod core;
mod epoch;
mod evaluate;
mod fit;
mod result;
mod step;

pub use core::Trainer;
pub use result::{EpochReport, EvalReport, TrainResult};
