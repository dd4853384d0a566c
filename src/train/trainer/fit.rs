//! Multi-epoch run with evaluation and checkpointing

use super::core::Trainer;
use super::result::{EpochReport, EvalReport, TrainResult};
use crate::cli::{log, LogLevel};
use crate::data::DataLoader;
use crate::io::{save_checkpoint, CheckpointMetadata, ExperimentDir};
use crate::train::BestAccuracy;
use crate::Result;
use std::time::Instant;

impl Trainer {
    /// Train, evaluate and checkpoint for one epoch.
    ///
    /// Takes the best accuracy so far and returns the updated value. The
    /// summary line is always appended to the run's summary log; the model
    /// is saved only when exit 0 accuracy strictly improves.
    pub fn run_epoch(
        &mut self,
        epoch: usize,
        best: BestAccuracy,
        train: &DataLoader,
        test: &DataLoader,
        dir: &ExperimentDir,
    ) -> Result<(BestAccuracy, EpochReport, EvalReport)> {
        let started = Instant::now();
        let train_report = self.train_epoch(epoch, train);

        log(self.log_level, LogLevel::Normal, "Waiting Test!");
        let eval_report = self.evaluate(epoch, test);

        let line = eval_report.summary_line();
        log(self.log_level, LogLevel::Normal, &line);
        dir.append_summary(&line)?;

        let accuracy = eval_report.reference_accuracy();
        let (best, improved) = best.update(accuracy);
        if improved {
            let metadata = CheckpointMetadata::for_model(self.model.as_ref(), epoch, accuracy);
            save_checkpoint(self.model.as_ref(), dir.checkpoint_path(), &metadata)?;
            log(self.log_level, LogLevel::Normal, "model saved");
        }

        log(
            self.log_level,
            LogLevel::Verbose,
            &format!("Epoch {epoch} took {:.1}s", started.elapsed().as_secs_f64()),
        );
        Ok((best, train_report, eval_report))
    }

    /// Run `epochs` epochs, saving the best model into `dir`
    pub fn fit(
        &mut self,
        epochs: usize,
        train: &DataLoader,
        test: &DataLoader,
        dir: &ExperimentDir,
    ) -> Result<TrainResult> {
        let started = Instant::now();
        let mut best = BestAccuracy::new();
        let mut best_epoch = None;
        let mut history = Vec::with_capacity(epochs);

        for epoch in 0..epochs {
            let previous = best;
            let (next, train_report, eval_report) = self.run_epoch(epoch, best, train, test, dir)?;
            if next > previous {
                best_epoch = Some(epoch);
            }
            best = next;
            history.push((train_report, eval_report));
        }

        log(
            self.log_level,
            LogLevel::Normal,
            &format!("Training Finished, Total Epochs = {epochs}"),
        );

        Ok(TrainResult {
            epochs,
            best_accuracy: best.value(),
            best_epoch,
            history,
            elapsed_secs: started.elapsed().as_secs_f64(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{add_bias, is_grad_enabled};
    use crate::data::{synthetic_dataset, Compose, LoaderConfig};
    use crate::distill::SelfDistillationLoss;
    use crate::io::read_checkpoint_metadata;
    use crate::model::{ExitOutputs, MultiExitModel};
    use crate::optim::{MultiStepLR, SGD};
    use crate::Tensor;
    use std::cell::Cell;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Two-exit classifier that gets a fixed number of held-out samples
    /// right at each evaluation. Labels are assumed to cycle 0, 1, 0, 1.
    struct Scripted {
        correct_per_eval: Vec<usize>,
        evals: Cell<usize>,
        bias: Tensor,
    }

    impl Scripted {
        fn new(correct_per_eval: Vec<usize>) -> Self {
            Self { correct_per_eval, evals: Cell::new(0), bias: Tensor::zeros(2, true) }
        }
    }

    impl MultiExitModel for Scripted {
        fn forward(&self, _inputs: &Tensor, batch_size: usize) -> ExitOutputs {
            let correct = if is_grad_enabled() {
                batch_size
            } else {
                let eval = self.evals.get();
                self.evals.set(eval + 1);
                self.correct_per_eval[eval]
            };
            let raw: Vec<f32> = (0..batch_size)
                .flat_map(|row| {
                    let label = row % 2;
                    let predicted = if row < correct { label } else { 1 - label };
                    if predicted == 0 { [1.0, 0.0] } else { [0.0, 1.0] }
                })
                .collect();
            let logits = add_bias(&Tensor::from_vec(raw, false), &self.bias, batch_size, 2);
            ExitOutputs::new(vec![logits.clone(), logits], Tensor::zeros(1, false), batch_size, 2)
        }

        fn num_exits(&self) -> usize {
            2
        }

        fn num_classes(&self) -> usize {
            2
        }

        fn input_dim(&self) -> usize {
            12
        }

        fn architecture(&self) -> String {
            "scripted".to_string()
        }

        fn named_parameters(&self) -> Vec<(String, &Tensor, Vec<usize>)> {
            vec![("bias".to_string(), &self.bias, vec![2])]
        }

        fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
            vec![&mut self.bias]
        }
    }

    fn single_batch_loader() -> DataLoader {
        DataLoader::new(
            Arc::new(synthetic_dataset(4, 2, (3, 2, 2), 0)),
            Compose::new(),
            LoaderConfig::new().with_batch_size(4).with_shuffle(false).with_num_workers(0),
        )
    }

    #[test]
    fn test_checkpoint_rewritten_only_on_strict_improvement() {
        let tmp = TempDir::new().unwrap();
        let dir = ExperimentDir::at(tmp.path().join("run")).unwrap();
        let loader = single_batch_loader();
        let mut trainer = Trainer::new(
            Box::new(Scripted::new(vec![1, 2, 2, 3])),
            Box::new(SGD::new(0.0, 0.9)),
            Box::new(MultiStepLR::new(0.0, [75, 130, 180], 10.0)),
            SelfDistillationLoss::new(0.5),
        )
        .with_log_level(LogLevel::Quiet);

        let mut best = BestAccuracy::new();
        let mut accuracies = Vec::new();
        let mut saved_epochs = Vec::new();
        let mut files = Vec::new();
        for epoch in 0..4 {
            let (next, _, eval) = trainer.run_epoch(epoch, best, &loader, &loader, &dir).unwrap();
            best = next;
            accuracies.push(eval.reference_accuracy());
            saved_epochs.push(read_checkpoint_metadata(dir.checkpoint_path()).unwrap().epoch);
            files.push(fs::read(dir.checkpoint_path()).unwrap());
        }

        assert_eq!(accuracies, vec![25.0, 50.0, 50.0, 75.0]);
        assert_eq!(saved_epochs, vec![0, 1, 1, 3]);
        assert_eq!(files[1], files[2]);
        assert_ne!(files[2], files[3]);
        assert_eq!(best.value(), 75.0);
        assert_eq!(fs::read_to_string(dir.summary_path()).unwrap().lines().count(), 4);
    }

    #[test]
    fn test_fit_reports_last_improving_epoch() {
        let tmp = TempDir::new().unwrap();
        let dir = ExperimentDir::at(tmp.path().join("run")).unwrap();
        let loader = single_batch_loader();
        let mut trainer = Trainer::new(
            Box::new(Scripted::new(vec![2, 3, 1])),
            Box::new(SGD::new(0.0, 0.9)),
            Box::new(MultiStepLR::new(0.0, [75, 130, 180], 10.0)),
            SelfDistillationLoss::new(0.0),
        )
        .with_log_level(LogLevel::Quiet);

        let result = trainer.fit(3, &loader, &loader, &dir).unwrap();
        assert_eq!(result.best_epoch, Some(1));
        assert_eq!(result.best_accuracy, 75.0);
        assert_eq!(read_checkpoint_metadata(dir.checkpoint_path()).unwrap().epoch, 1);
    }
}
