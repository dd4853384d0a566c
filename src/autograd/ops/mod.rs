//! Autograd operations with backward passes
//!
//! This module provides differentiable operations for automatic differentiation.

mod activations;
mod basic;
mod loss;
mod matmul;

// Re-export all public operations
pub use activations::relu;
pub use basic::{add, add_bias, mul, scale, sub, sum};
pub use loss::{cross_entropy, log_softmax_rows, soft_target_cross_entropy, softmax_rows};
pub use matmul::{matmul, matmul_compute};
