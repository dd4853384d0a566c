//! Matrix multiplication autograd operation
//!
//! Row-major flattened operands; the GEMM itself is ndarray's `dot`.

use crate::autograd::context::tracks;
use crate::autograd::{BackwardOp, Tensor};
use ndarray::{Array1, Array2, ArrayView2};
use std::cell::RefCell;
use std::rc::Rc;

/// Compute C = A @ B on flattened row-major buffers
pub fn matmul_compute(a: &[f32], b: &[f32], m: usize, k: usize, n: usize) -> Vec<f32> {
    let a = ArrayView2::from_shape((m, k), a).expect("matrix A is m x k");
    let b = ArrayView2::from_shape((k, n), b).expect("matrix B is k x n");
    a.dot(&b).iter().copied().collect()
}

/// Matrix multiplication
///
/// Computes C = A @ B where:
/// - A is m×k (flattened to length m*k)
/// - B is k×n (flattened to length k*n)
/// - C is m×n (flattened to length m*n)
pub fn matmul(a: &Tensor, b: &Tensor, m: usize, k: usize, n: usize) -> Tensor {
    assert_eq!(a.len(), m * k, "Matrix A size mismatch");
    assert_eq!(b.len(), k * n, "Matrix B size mismatch");

    let result_data = matmul_compute(
        a.data().as_slice().expect("matrix A must be contiguous"),
        b.data().as_slice().expect("matrix B must be contiguous"),
        m,
        k,
        n,
    );

    let requires_grad = tracks(&[a, b]);
    let mut result = Tensor::new(Array1::from(result_data), requires_grad);

    if requires_grad {
        let backward_op = Rc::new(MatmulBackward {
            a: a.clone(),
            b: b.clone(),
            m,
            k,
            n,
            result_grad: result.grad_cell(),
        });
        result.set_backward_op(backward_op);
    }

    result
}

struct MatmulBackward {
    a: Tensor,
    b: Tensor,
    m: usize,
    k: usize,
    n: usize,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for MatmulBackward {
    fn backward(&self) {
        let Some(grad) = self.result_grad.borrow().clone() else {
            return;
        };
        let grad = Array2::from_shape_vec((self.m, self.n), grad.to_vec()).expect("gradient is m x n");

        if self.a.requires_grad() {
            // ∂L/∂A = ∂L/∂C @ Bᵀ
            let b = ArrayView2::from_shape((self.k, self.n), self.b.data().as_slice().expect("contiguous"))
                .expect("matrix B is k x n");
            let grad_a = grad.dot(&b.t());
            self.a.accumulate_grad(grad_a.iter().copied().collect());
        }
        if self.b.requires_grad() {
            // ∂L/∂B = Aᵀ @ ∂L/∂C
            let a = ArrayView2::from_shape((self.m, self.k), self.a.data().as_slice().expect("contiguous"))
                .expect("matrix A is m x k");
            let grad_b = a.t().dot(&grad);
            self.b.accumulate_grad(grad_b.iter().copied().collect());
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.a.clone(), self.b.clone()]
    }
}
