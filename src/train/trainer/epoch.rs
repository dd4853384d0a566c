//! Epoch-level training

use super::core::Trainer;
use super::result::EpochReport;
use crate::cli::{log, LogLevel};
use crate::data::DataLoader;
use crate::train::ExitAccuracy;

impl Trainer {
    /// Bring the optimizer to the scheduled rate for this epoch
    fn apply_schedule(&mut self, epoch: usize) {
        let lr = self.scheduler.get_lr();
        if lr != self.optimizer.lr() {
            log(
                self.log_level,
                LogLevel::Verbose,
                &format!("Epoch {epoch}: learning rate {} -> {lr}", self.optimizer.lr()),
            );
            self.optimizer.set_lr(lr);
        }
    }

    /// Train over every batch of `loader` once
    ///
    /// Prints one progress line per batch with the running average loss and
    /// the running accuracy of each exit and of the training ensemble.
    pub fn train_epoch(&mut self, epoch: usize, loader: &DataLoader) -> EpochReport {
        self.apply_schedule(epoch);
        let lr = self.optimizer.lr();

        let len = loader.len();
        let mut accuracy = ExitAccuracy::new(self.model.num_exits());
        let mut loss_sum = 0.0;
        let mut batches = 0usize;

        for (i, batch) in loader.iter_epoch(epoch).enumerate() {
            loss_sum += self.train_step(&batch, &mut accuracy);
            batches += 1;
            log(
                self.log_level,
                LogLevel::Normal,
                &format!(
                    "[epoch:{}, iter:{}] Loss: {:.03} | Acc: {}",
                    epoch + 1,
                    i + 1 + epoch * len,
                    loss_sum / batches as f32,
                    accuracy.format(2)
                ),
            );
        }

        self.scheduler.step();

        EpochReport {
            epoch,
            average_loss: if batches > 0 { loss_sum / batches as f32 } else { 0.0 },
            lr,
            accuracy,
        }
    }
}
