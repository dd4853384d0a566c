//! # blurdistill
//!
//! Multi-exit image classification with self-distillation across exits,
//! trained under a grayscale + random Gaussian blur augmentation chain.
//!
//! ## Architecture
//!
//! - `autograd`: tape-based automatic differentiation over 1-D tensors
//! - `model`: multi-exit residual backbones and their exit outputs
//! - `distill`: composed self-distillation loss
//! - `optim`: SGD with momentum and a milestone learning-rate schedule
//! - `data`: CIFAR readers, augmentations and a threaded batch loader
//! - `train`: epoch loop, evaluation, accuracy counters
//! - `io`: checkpoints and experiment directories
//! - `config` / `cli`: startup options and the command handler

pub mod autograd;
pub mod cli;
pub mod config;
pub mod data;
pub mod distill;
pub mod error;
pub mod io;
pub mod model;
pub mod optim;
pub mod train;

pub use autograd::Tensor;
pub use error::{Error, Result};
