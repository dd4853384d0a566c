//! Image data pipeline
//!
//! Datasets yield single `(C, H, W)` images in `[0, 1]` with an integer label.
//! A [`DataLoader`] shuffles indices per epoch, runs the transform chain,
//! and stacks samples into [`Batch`]es, optionally on a fixed pool of
//! worker threads.

mod batch;
mod cifar;
mod config;
mod dataset;
mod iter;
mod loader;
mod synthetic;
pub mod transform;

pub use batch::Batch;
pub use cifar::{load_cifar, CifarVariant};
pub use config::LoaderConfig;
pub use dataset::{Dataset, InMemoryDataset};
pub use iter::BatchIter;
pub use loader::DataLoader;
pub use synthetic::synthetic_dataset;
pub use transform::{test_transforms, train_transforms, Compose, Transform};
