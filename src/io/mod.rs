//! Model checkpoints and experiment directories

mod experiment;
mod load;
mod save;

pub use experiment::{format_lambda, ExperimentDir};
pub use load::{load_checkpoint, read_checkpoint_metadata};
pub use save::{save_checkpoint, CheckpointMetadata};
