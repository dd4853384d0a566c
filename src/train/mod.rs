//! Multi-exit training loop
//!
//! The [`Trainer`] owns a multi-exit model, its optimizer and learning-rate
//! schedule, and the composed self-distillation loss. Each epoch it trains
//! over the shuffled training loader, evaluates on the held-out loader,
//! appends a summary line and saves the model whenever exit 0 accuracy
//! strictly improves.
//!
//! ```no_run
//! use blurdistill::data::{synthetic_dataset, test_transforms, train_transforms, DataLoader, LoaderConfig};
//! use blurdistill::distill::SelfDistillationLoss;
//! use blurdistill::io::ExperimentDir;
//! use blurdistill::model::build_model;
//! use blurdistill::optim::{MultiStepLR, SGD};
//! use blurdistill::train::Trainer;
//! use std::sync::Arc;
//!
//! let train = DataLoader::new(
//!     Arc::new(synthetic_dataset(256, 10, (3, 32, 32), 0)),
//!     train_transforms(0.9),
//!     LoaderConfig::new(),
//! );
//! let test = DataLoader::new(
//!     Arc::new(synthetic_dataset(64, 10, (3, 32, 32), 1)),
//!     test_transforms(0.9),
//!     LoaderConfig::new().with_shuffle(false),
//! );
//! let model = build_model(18, 10, 100).expect("supported depth");
//! let mut trainer = Trainer::new(
//!     model,
//!     Box::new(SGD::new(0.1, 0.9).with_weight_decay(5e-4)),
//!     Box::new(MultiStepLR::new(0.1, [75, 130, 180], 10.0)),
//!     SelfDistillationLoss::new(0.5),
//! );
//! let dir = ExperimentDir::at("expt/train/demo")?;
//! let result = trainer.fit(200, &train, &test, &dir)?;
//! println!("best exit 0 accuracy: {:.2}%", result.best_accuracy);
//! # Ok::<(), blurdistill::Error>(())
//! ```

mod checkpoint;
mod config;
mod metrics;
mod trainer;

pub use checkpoint::BestAccuracy;
pub use config::TrainConfig;
pub use metrics::{argmax_rows, ExitAccuracy};
pub use trainer::{EpochReport, EvalReport, TrainResult, Trainer};
