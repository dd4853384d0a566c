//! Core Trainer struct and basic methods

use crate::cli::LogLevel;
use crate::distill::SelfDistillationLoss;
use crate::model::MultiExitModel;
use crate::optim::{LRScheduler, Optimizer};

/// Owns everything one training run mutates
pub struct Trainer {
    pub(crate) model: Box<dyn MultiExitModel>,
    pub(crate) optimizer: Box<dyn Optimizer>,
    /// Queried at each epoch start, stepped at each epoch end
    pub(crate) scheduler: Box<dyn LRScheduler>,
    pub(crate) loss_fn: SelfDistillationLoss,
    pub(crate) log_level: LogLevel,
}

impl Trainer {
    pub fn new(
        model: Box<dyn MultiExitModel>,
        optimizer: Box<dyn Optimizer>,
        scheduler: Box<dyn LRScheduler>,
        loss_fn: SelfDistillationLoss,
    ) -> Self {
        Self { model, optimizer, scheduler, loss_fn, log_level: LogLevel::Normal }
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn model(&self) -> &dyn MultiExitModel {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> &mut dyn MultiExitModel {
        self.model.as_mut()
    }

    /// Current optimizer learning rate
    pub fn lr(&self) -> f32 {
        self.optimizer.lr()
    }

    pub fn loss_fn(&self) -> &SelfDistillationLoss {
        &self.loss_fn
    }

    /// Consume the trainer, keeping the trained model
    pub fn into_model(self) -> Box<dyn MultiExitModel> {
        self.model
    }
}
