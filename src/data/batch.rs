//! Batch data structure

use crate::Tensor;
use ndarray::Array4;

/// A batch of images `(N, C, H, W)` and their labels
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Image data
    pub images: Array4<f32>,
    /// Class index per image
    pub labels: Vec<usize>,
}

impl Batch {
    /// Create a new batch
    ///
    /// # Panics
    ///
    /// Panics if the number of labels differs from the number of images.
    pub fn new(images: Array4<f32>, labels: Vec<usize>) -> Self {
        assert_eq!(images.shape()[0], labels.len(), "One label per image");
        Self { images, labels }
    }

    /// Number of samples
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Flattened size of one sample (C * H * W)
    pub fn sample_dim(&self) -> usize {
        let shape = self.images.shape();
        shape[1] * shape[2] * shape[3]
    }

    /// Images as a flattened `N x (C*H*W)` tensor outside the graph
    pub fn inputs(&self) -> Tensor {
        Tensor::from_vec(self.images.iter().copied().collect(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_creation() {
        let batch = Batch::new(Array4::zeros((2, 3, 4, 4)), vec![0, 1]);
        assert_eq!(batch.size(), 2);
        assert_eq!(batch.sample_dim(), 48);
        assert_eq!(batch.inputs().len(), 96);
    }

    #[test]
    fn test_inputs_are_row_major_per_sample() {
        let mut images = Array4::zeros((2, 1, 1, 2));
        images[[1, 0, 0, 1]] = 7.0;
        let batch = Batch::new(images, vec![0, 0]);
        assert_eq!(batch.inputs().data()[3], 7.0);
        assert!(!batch.inputs().requires_grad());
    }

    #[test]
    #[should_panic(expected = "One label per image")]
    fn test_label_count_mismatch_panics() {
        Batch::new(Array4::zeros((2, 1, 2, 2)), vec![0]);
    }
}
