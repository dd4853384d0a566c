//! Training result types

use crate::train::ExitAccuracy;

/// Outcome of one training epoch
#[derive(Debug, Clone)]
pub struct EpochReport {
    pub epoch: usize,
    /// Mean of the per-batch losses
    pub average_loss: f32,
    /// Learning rate used throughout the epoch
    pub lr: f32,
    /// Counters against the training ensemble
    pub accuracy: ExitAccuracy,
}

/// Outcome of one evaluation pass
#[derive(Debug, Clone)]
pub struct EvalReport {
    pub epoch: usize,
    /// Counters against the all-exit ensemble
    pub accuracy: ExitAccuracy,
}

impl EvalReport {
    /// Exit 0 accuracy in percent, the checkpointing criterion
    pub fn reference_accuracy(&self) -> f32 {
        self.accuracy.exit_percent(0)
    }

    /// `Epoch: <e> Acc: ...` line written to the summary log
    pub fn summary_line(&self) -> String {
        format!("Epoch: {:>3} Acc: {}", self.epoch, self.accuracy.format(4))
    }
}

/// Result of a full run
#[derive(Debug, Clone)]
pub struct TrainResult {
    /// Epochs completed
    pub epochs: usize,
    /// Best exit 0 test accuracy in percent
    pub best_accuracy: f32,
    /// Epoch that produced the saved checkpoint, if any
    pub best_epoch: Option<usize>,
    /// Per-epoch training and evaluation reports
    pub history: Vec<(EpochReport, EvalReport)>,
    /// Total training time in seconds
    pub elapsed_secs: f64,
}

impl TrainResult {
    pub fn final_loss(&self) -> Option<f32> {
        self.history.last().map(|(train, _)| train.average_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line_format() {
        let report = EvalReport { epoch: 7, accuracy: ExitAccuracy::new(4) };
        assert_eq!(
            report.summary_line(),
            "Epoch:   7 Acc: 4/4: 0.0000% 3/4: 0.0000% 2/4: 0.0000%  1/4: 0.0000% Ensemble: 0.0000%"
        );
    }

    #[test]
    fn test_final_loss_of_empty_run() {
        let result = TrainResult {
            epochs: 0,
            best_accuracy: 0.0,
            best_epoch: None,
            history: Vec::new(),
            elapsed_secs: 0.0,
        };
        assert!(result.final_loss().is_none());
    }
}
