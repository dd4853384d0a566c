//! Dense layer building block

use crate::autograd::{add_bias, matmul};
use crate::Tensor;
use rand::rngs::StdRng;
use rand::Rng;

/// Fully connected layer: `y = x @ W + b`
///
/// `W` is stored `in_features x out_features`, row-major.
pub struct Linear {
    name: String,
    weight: Tensor,
    bias: Tensor,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// He-uniform weights (`U(±gain·√(6/in))`), bias `U(±1/√in)`
    pub fn new(
        name: impl Into<String>,
        in_features: usize,
        out_features: usize,
        gain: f32,
        rng: &mut StdRng,
    ) -> Self {
        let w_bound = gain * (6.0 / in_features as f32).sqrt();
        let b_bound = 1.0 / (in_features as f32).sqrt();

        let weight: Vec<f32> = (0..in_features * out_features)
            .map(|_| uniform(rng, w_bound))
            .collect();
        let bias: Vec<f32> = (0..out_features).map(|_| uniform(rng, b_bound)).collect();

        Self {
            name: name.into(),
            weight: Tensor::from_vec(weight, true),
            bias: Tensor::from_vec(bias, true),
            in_features,
            out_features,
        }
    }

    /// Forward a `rows x in_features` batch
    pub fn forward(&self, x: &Tensor, rows: usize) -> Tensor {
        let y = matmul(x, &self.weight, rows, self.in_features, self.out_features);
        add_bias(&y, &self.bias, rows, self.out_features)
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }

    /// `(name, tensor, shape)` for each parameter
    pub fn named_parameters(&self) -> Vec<(String, &Tensor, Vec<usize>)> {
        vec![
            (
                format!("{}.weight", self.name),
                &self.weight,
                vec![self.in_features, self.out_features],
            ),
            (format!("{}.bias", self.name), &self.bias, vec![self.out_features]),
        ]
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.weight, &mut self.bias]
    }
}

fn uniform(rng: &mut StdRng, bound: f32) -> f32 {
    if bound == 0.0 {
        0.0
    } else {
        rng.random_range(-bound..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_linear_forward_shape() {
        let mut rng = StdRng::seed_from_u64(0);
        let layer = Linear::new("fc", 3, 2, 1.0, &mut rng);
        let x = Tensor::from_vec(vec![1.0; 12], false); // 4 x 3
        let y = layer.forward(&x, 4);
        assert_eq!(y.len(), 8);
    }

    #[test]
    fn test_linear_init_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = Linear::new("fc", 24, 8, 1.0, &mut rng);
        let bound = (6.0f32 / 24.0).sqrt();
        let params = layer.named_parameters();
        assert!(params[0].1.data().iter().all(|w| w.abs() <= bound));
        assert_eq!(params[0].0, "fc.weight");
        assert_eq!(params[0].2, vec![24, 8]);
        assert_eq!(params[1].0, "fc.bias");
    }

    #[test]
    fn test_zero_gain_gives_zero_weights() {
        let mut rng = StdRng::seed_from_u64(2);
        let layer = Linear::new("fc", 4, 4, 0.0, &mut rng);
        assert!(layer.named_parameters()[0].1.data().iter().all(|&w| w == 0.0));
    }

    #[test]
    fn test_same_seed_same_weights() {
        let a = Linear::new("fc", 5, 3, 1.0, &mut StdRng::seed_from_u64(9));
        let b = Linear::new("fc", 5, 3, 1.0, &mut StdRng::seed_from_u64(9));
        assert_eq!(a.named_parameters()[0].1.data(), b.named_parameters()[0].1.data());
    }
}
