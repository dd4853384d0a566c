//! Held-out evaluation

use super::core::Trainer;
use super::result::EvalReport;
use crate::autograd::no_grad;
use crate::data::DataLoader;
use crate::train::ExitAccuracy;

impl Trainer {
    /// Accuracy of every exit and of the all-exit ensemble over `loader`.
    ///
    /// Runs without recording a graph and never touches the parameters.
    /// `epoch` selects the augmentation stream of the held-out transforms.
    pub fn evaluate(&self, epoch: usize, loader: &DataLoader) -> EvalReport {
        no_grad(|| {
            let mut accuracy = ExitAccuracy::new(self.model.num_exits());
            for batch in loader.iter_epoch(epoch) {
                let outputs = self.model.forward(&batch.inputs(), batch.size());
                let ensemble = outputs.eval_ensemble();
                accuracy.update(&outputs, ensemble.view(), &batch.labels);
            }
            EvalReport { epoch, accuracy }
        })
    }
}
