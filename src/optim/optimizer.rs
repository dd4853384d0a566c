//! Optimizer trait

use crate::Tensor;

/// Trait for optimization algorithms over parameters borrowed from a model
pub trait Optimizer {
    /// Perform a single optimization step
    ///
    /// `params` must be passed in the same order on every call: per-parameter
    /// state (momentum buffers) is keyed by position.
    fn step(&mut self, params: &mut [&mut Tensor]);

    /// Zero out all gradients
    fn zero_grad(&mut self, params: &mut [&mut Tensor]) {
        for param in params.iter_mut() {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    /// Minimal optimizer implementation for testing default trait methods
    struct PlainDescent {
        learning_rate: f32,
    }

    impl Optimizer for PlainDescent {
        fn step(&mut self, params: &mut [&mut Tensor]) {
            for param in params.iter_mut() {
                if let Some(grad) = param.grad() {
                    let lr = self.learning_rate;
                    param.data_mut().scaled_add(-lr, &grad);
                }
            }
        }

        fn lr(&self) -> f32 {
            self.learning_rate
        }

        fn set_lr(&mut self, lr: f32) {
            self.learning_rate = lr;
        }
    }

    #[test]
    fn test_zero_grad_clears_every_param() {
        let mut opt = PlainDescent { learning_rate: 0.1 };
        let mut a = Tensor::from_vec(vec![1.0, 2.0], true);
        let mut b = Tensor::from_vec(vec![3.0], true);
        a.set_grad(arr1(&[0.5, 1.0]));
        b.set_grad(arr1(&[1.5]));

        opt.zero_grad(&mut [&mut a, &mut b]);

        assert!(a.grad().is_none());
        assert!(b.grad().is_none());
    }

    #[test]
    fn test_set_lr() {
        let mut opt = PlainDescent { learning_rate: 0.1 };
        opt.set_lr(0.01);
        assert_eq!(opt.lr(), 0.01);
    }

    #[test]
    fn test_step_without_grad_is_noop() {
        let mut opt = PlainDescent { learning_rate: 0.1 };
        let mut param = Tensor::from_vec(vec![1.0, 2.0, 3.0], true);
        opt.step(&mut [&mut param]);
        assert_eq!(param.data().to_vec(), vec![1.0, 2.0, 3.0]);
    }
}
