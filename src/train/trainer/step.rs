//! Single training step

use super::core::Trainer;
use crate::autograd::backward;
use crate::data::Batch;
use crate::train::ExitAccuracy;

impl Trainer {
    /// Forward, backward and one optimizer update on `batch`.
    ///
    /// Counts the batch into `accuracy` (per exit, plus the training
    /// ensemble) and returns the loss value.
    pub fn train_step(&mut self, batch: &Batch, accuracy: &mut ExitAccuracy) -> f32 {
        let outputs = self.model.forward(&batch.inputs(), batch.size());
        let ensemble = outputs.training_ensemble();
        let loss = self.loss_fn.forward(&outputs, &batch.labels);

        let mut params = self.model.parameters_mut();
        self.optimizer.zero_grad(&mut params);
        backward(&loss, None);

        let loss_value = loss.item();
        accuracy.update(&outputs, ensemble.view(), &batch.labels);

        // Release the graph so parameter buffers are updated in place
        drop(loss);
        drop(outputs);
        self.optimizer.step(&mut params);

        loss_value
    }
}
