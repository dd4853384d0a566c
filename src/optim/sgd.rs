//! Stochastic Gradient Descent optimizer

use super::Optimizer;
use crate::Tensor;
use ndarray::Array1;

/// SGD with momentum and L2 weight decay
///
/// ```text
/// g = grad + weight_decay * p
/// v = momentum * v + g        (v = g on the first step)
/// p = p - lr * v
/// ```
pub struct SGD {
    lr: f32,
    momentum: f32,
    weight_decay: f32,
    velocities: Vec<Option<Array1<f32>>>,
}

impl SGD {
    /// Create a new SGD optimizer
    pub fn new(lr: f32, momentum: f32) -> Self {
        Self { lr, momentum, weight_decay: 0.0, velocities: Vec::new() }
    }

    /// Set the L2 penalty folded into every gradient
    pub fn with_weight_decay(mut self, weight_decay: f32) -> Self {
        self.weight_decay = weight_decay;
        self
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    pub fn weight_decay(&self) -> f32 {
        self.weight_decay
    }

    /// Initialize velocities if needed
    fn ensure_velocities(&mut self, count: usize) {
        if self.velocities.len() < count {
            self.velocities.resize(count, None);
        }
    }
}

impl Optimizer for SGD {
    fn step(&mut self, params: &mut [&mut Tensor]) {
        self.ensure_velocities(params.len());

        for (i, param) in params.iter_mut().enumerate() {
            let Some(mut grad) = param.grad() else {
                continue;
            };
            if self.weight_decay != 0.0 {
                grad.scaled_add(self.weight_decay, param.data());
            }

            let update = if self.momentum > 0.0 {
                let velocity = match self.velocities[i].take() {
                    Some(mut v) => {
                        v *= self.momentum;
                        v += &grad;
                        v
                    }
                    None => grad,
                };
                let update = velocity.clone();
                self.velocities[i] = Some(velocity);
                update
            } else {
                grad
            };

            param.data_mut().scaled_add(-self.lr, &update);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    #[test]
    fn test_sgd_plain_step() {
        let mut opt = SGD::new(0.1, 0.0);
        let mut p = Tensor::from_vec(vec![1.0, 2.0], true);
        p.set_grad(arr1(&[0.5, 1.0]));

        opt.step(&mut [&mut p]);

        assert_abs_diff_eq!(p.data()[0], 0.95, epsilon = 1e-6);
        assert_abs_diff_eq!(p.data()[1], 1.9, epsilon = 1e-6);
    }

    #[test]
    fn test_sgd_momentum_accumulates() {
        let mut opt = SGD::new(0.1, 0.9);
        let mut p = Tensor::from_vec(vec![0.0], true);

        p.set_grad(arr1(&[1.0]));
        opt.step(&mut [&mut p]);
        // v = 1, p = -0.1
        assert_abs_diff_eq!(p.data()[0], -0.1, epsilon = 1e-6);

        p.set_grad(arr1(&[1.0]));
        opt.step(&mut [&mut p]);
        // v = 0.9 + 1 = 1.9, p = -0.1 - 0.19
        assert_abs_diff_eq!(p.data()[0], -0.29, epsilon = 1e-6);
    }

    #[test]
    fn test_sgd_weight_decay_pulls_toward_zero() {
        let mut opt = SGD::new(0.1, 0.0).with_weight_decay(0.5);
        let mut p = Tensor::from_vec(vec![2.0], true);
        p.set_grad(arr1(&[0.0]));

        opt.step(&mut [&mut p]);

        // g = 0 + 0.5 * 2 = 1 → p = 2 - 0.1
        assert_abs_diff_eq!(p.data()[0], 1.9, epsilon = 1e-6);
    }

    #[test]
    fn test_sgd_skips_params_without_grad() {
        let mut opt = SGD::new(0.1, 0.9).with_weight_decay(5e-4);
        let mut p = Tensor::from_vec(vec![1.0], true);
        opt.step(&mut [&mut p]);
        assert_eq!(p.data()[0], 1.0);
    }

    #[test]
    fn test_sgd_set_lr() {
        let mut opt = SGD::new(0.1, 0.9);
        opt.set_lr(0.01);
        assert_eq!(opt.lr(), 0.01);
        assert_eq!(opt.momentum(), 0.9);
    }
}
