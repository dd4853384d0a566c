//! Milestone step learning rate scheduler

use super::LRScheduler;

/// Multi-step Learning Rate Scheduler
///
/// Divides the learning rate by `factor` once at each milestone epoch.
///
/// Formula: lr_e = lr_initial / factor^|{m in milestones : m <= e}|
///
/// The division is applied one milestone at a time, so the value matches an
/// optimizer whose rate was divided in place at each milestone.
#[derive(Debug, Clone)]
pub struct MultiStepLR {
    lr_initial: f32,
    milestones: Vec<usize>,
    factor: f32,
    current_epoch: usize,
}

impl MultiStepLR {
    /// Create a new multi-step scheduler
    ///
    /// # Arguments
    /// * `lr_initial` - Initial learning rate
    /// * `milestones` - Epochs (0-based) at which the rate is divided
    /// * `factor` - Divisor applied at each milestone (e.g., 10.0)
    pub fn new(lr_initial: f32, milestones: impl Into<Vec<usize>>, factor: f32) -> Self {
        let mut milestones = milestones.into();
        milestones.sort_unstable();
        milestones.dedup();
        Self { lr_initial, milestones, factor, current_epoch: 0 }
    }

    pub fn milestones(&self) -> &[usize] {
        &self.milestones
    }

    /// Learning rate in effect during `epoch`
    pub fn lr_at(&self, epoch: usize) -> f32 {
        self.milestones
            .iter()
            .take_while(|&&m| m <= epoch)
            .fold(self.lr_initial, |lr, _| lr / self.factor)
    }
}

impl LRScheduler for MultiStepLR {
    fn get_lr(&self) -> f32 {
        self.lr_at(self.current_epoch)
    }

    fn step(&mut self) {
        self.current_epoch += 1;
    }
}
