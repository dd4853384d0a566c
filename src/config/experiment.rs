//! Experiment options and their JSON snapshot

use crate::train::TrainConfig;
use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Options of one training run
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Experiment ID
    #[arg(long, default_value = "blur-gray")]
    pub tag: String,

    /// Directory holding cifar-10-batches-bin/ or cifar-100-binary/
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,

    /// Backbone depth (9, 18 or 34)
    #[arg(long, default_value_t = 18)]
    pub depth: usize,

    /// Number of classes (10 or 100)
    #[arg(long, default_value_t = 10, alias = "class_num")]
    pub class_num: usize,

    /// Training epochs
    #[arg(long, default_value_t = 200)]
    pub epoch: usize,

    /// Distillation coefficient
    #[arg(long = "lambda-kd", default_value_t = 0.5, alias = "lambda_KD")]
    #[serde(rename = "lambda_KD")]
    pub lambda_kd: f32,

    /// Maximum Gaussian SD of the blur augmentation
    #[arg(long, default_value_t = 0.9)]
    pub blur_std: f32,

    /// Parent directory of the run directory
    #[arg(long, default_value = "expt/train")]
    pub output_root: PathBuf,

    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Initial learning rate
    #[arg(long, default_value_t = 0.1)]
    pub lr: f32,

    /// Data-loading worker threads (0 loads on the training thread)
    #[arg(long, default_value_t = 4)]
    pub num_workers: usize,

    /// Seed for initialization, shuffling and augmentation
    #[arg(long, default_value_t = 100)]
    pub seed: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            tag: "blur-gray".to_string(),
            data_root: PathBuf::from("data"),
            depth: 18,
            class_num: 10,
            epoch: 200,
            lambda_kd: 0.5,
            blur_std: 0.9,
            output_root: PathBuf::from("expt/train"),
            batch_size: 128,
            lr: 0.1,
            num_workers: 4,
            seed: 100,
        }
    }
}

impl ExperimentConfig {
    /// Training hyperparameters implied by these options
    pub fn train_config(&self) -> TrainConfig {
        TrainConfig::new()
            .with_epochs(self.epoch)
            .with_batch_size(self.batch_size)
            .with_lr(self.lr)
            .with_lambda_kd(self.lambda_kd)
            .with_seed(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_keys() {
        let json = serde_json::to_value(ExperimentConfig::default()).unwrap();
        for key in ["tag", "data_root", "depth", "class_num", "epoch", "lambda_KD", "blur_std"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json.get("lambda_kd").is_none());
    }

    #[test]
    fn test_train_config() {
        let config = ExperimentConfig { epoch: 3, lambda_kd: 0.0, ..Default::default() };
        let train = config.train_config();
        assert_eq!(train.epochs, 3);
        assert_eq!(train.lambda_kd, 0.0);
        assert_eq!(train.seed, 100);
        assert_eq!(train.milestones, vec![75, 130, 180]);
    }
}
