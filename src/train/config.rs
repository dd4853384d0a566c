//! Training hyperparameters

use crate::distill::{DEFAULT_DISTILL_SCALE, DEFAULT_FEATURE_COEFF, DEFAULT_TEMPERATURE};
use serde::{Deserialize, Serialize};

/// Hyperparameters of a self-distillation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Number of epochs
    pub epochs: usize,
    /// Samples per batch
    pub batch_size: usize,
    /// Initial learning rate
    pub lr: f32,
    /// SGD momentum
    pub momentum: f32,
    /// L2 weight decay added to every gradient
    pub weight_decay: f32,
    /// Epochs at which the learning rate is divided by `lr_decay`
    pub milestones: Vec<usize>,
    pub lr_decay: f32,
    /// Distillation coefficient
    pub lambda_kd: f32,
    pub temperature: f32,
    pub distill_scale: f32,
    pub feature_coeff: f32,
    /// Seed for initialization, shuffling and augmentation
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 200,
            batch_size: 128,
            lr: 0.1,
            momentum: 0.9,
            weight_decay: 5e-4,
            milestones: vec![75, 130, 180],
            lr_decay: 10.0,
            lambda_kd: 0.5,
            temperature: DEFAULT_TEMPERATURE,
            distill_scale: DEFAULT_DISTILL_SCALE,
            feature_coeff: DEFAULT_FEATURE_COEFF,
            seed: 100,
        }
    }
}

impl TrainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_lr(mut self, lr: f32) -> Self {
        self.lr = lr;
        self
    }

    pub fn with_lambda_kd(mut self, lambda_kd: f32) -> Self {
        self.lambda_kd = lambda_kd;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
