//! Forward-pass result of a multi-exit model

use crate::Tensor;
use ndarray::{Array2, ArrayView2};

/// Ordered exit logits plus the feature-alignment penalty
#[derive(Debug, Clone)]
pub struct ExitOutputs {
    logits: Vec<Tensor>,
    feature_penalty: Tensor,
    batch_size: usize,
    num_classes: usize,
}

impl ExitOutputs {
    /// # Panics
    ///
    /// Panics if there are no exits or a logits tensor is not
    /// `batch_size x num_classes`.
    pub fn new(
        logits: Vec<Tensor>,
        feature_penalty: Tensor,
        batch_size: usize,
        num_classes: usize,
    ) -> Self {
        assert!(!logits.is_empty(), "A multi-exit model needs at least one exit");
        for (i, l) in logits.iter().enumerate() {
            assert_eq!(
                l.len(),
                batch_size * num_classes,
                "Exit {i} logits must be batch x classes"
            );
        }
        assert_eq!(feature_penalty.len(), 1, "Feature penalty must be a scalar");
        Self { logits, feature_penalty, batch_size, num_classes }
    }

    pub fn logits(&self) -> &[Tensor] {
        &self.logits
    }

    pub fn exit_count(&self) -> usize {
        self.logits.len()
    }

    pub fn feature_penalty(&self) -> &Tensor {
        &self.feature_penalty
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Detached `batch x classes` view of one exit
    pub fn exit_matrix(&self, index: usize) -> ArrayView2<'_, f32> {
        ArrayView2::from_shape(
            (self.batch_size, self.num_classes),
            self.logits[index].data().as_slice().expect("logits are contiguous"),
        )
        .expect("shape checked in ExitOutputs::new")
    }

    /// Reporting ensemble during training: mean of every exit except the last.
    ///
    /// A single-exit model has nothing to leave out and reports that exit.
    pub fn training_ensemble(&self) -> Array2<f32> {
        let count = self.exit_count().saturating_sub(1).max(1);
        self.mean_of_first(count)
    }

    /// Evaluation ensemble: mean of all exits
    pub fn eval_ensemble(&self) -> Array2<f32> {
        self.mean_of_first(self.exit_count())
    }

    fn mean_of_first(&self, count: usize) -> Array2<f32> {
        let mut acc = Array2::<f32>::zeros((self.batch_size, self.num_classes));
        for i in 0..count {
            acc += &self.exit_matrix(i);
        }
        acc / count as f32
    }
}
