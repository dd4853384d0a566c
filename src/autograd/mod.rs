//! Tape-based autograd engine
//!
//! Provides automatic differentiation using a computational graph with
//! gradient cells shared between a tensor and the ops that consume it.
//!
//! ```
//! use blurdistill::autograd::{backward, mul, sum, Tensor};
//!
//! let x = Tensor::from_vec(vec![1.0, 2.0], true);
//! let loss = sum(&mul(&x, &x));
//! backward(&loss, None);
//! assert_eq!(x.grad().unwrap().to_vec(), vec![2.0, 4.0]);
//! ```

mod backward;
mod context;
mod ops;
mod tensor;

#[cfg(test)]
mod tests;

pub use backward::{backward, BackwardOp};
pub use context::{is_grad_enabled, no_grad};
pub use ops::*;
pub use tensor::Tensor;
