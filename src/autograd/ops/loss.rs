//! Classification loss operations over row-major logits
//!
//! Both losses average over the batch and return a one-element tensor.

use crate::autograd::context::tracks;
use crate::autograd::{BackwardOp, Tensor};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use std::cell::RefCell;
use std::rc::Rc;

/// Row-wise log-softmax of a `rows x cols` matrix
pub fn log_softmax_rows(x: ArrayView2<'_, f32>) -> Array2<f32> {
    let mut result = x.to_owned();
    for mut row in result.axis_iter_mut(Axis(0)) {
        // Subtract max for numerical stability
        let max_val = row.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        let log_sum = row.iter().map(|&v| (v - max_val).exp()).sum::<f32>().ln();
        row.mapv_inplace(|v| v - max_val - log_sum);
    }
    result
}

/// Row-wise softmax of a `rows x cols` matrix
pub fn softmax_rows(x: ArrayView2<'_, f32>) -> Array2<f32> {
    log_softmax_rows(x).mapv(f32::exp)
}

fn as_matrix(t: &Tensor, rows: usize, cols: usize) -> ArrayView2<'_, f32> {
    ArrayView2::from_shape(
        (rows, cols),
        t.data().as_slice().expect("logits must be contiguous"),
    )
    .expect("logits are rows x cols")
}

/// Mean cross-entropy of `logits` (`labels.len() x classes`) against integer labels
///
/// L = -1/N Σ_n log softmax(x_n)[y_n]
pub fn cross_entropy(logits: &Tensor, labels: &[usize], classes: usize) -> Tensor {
    let rows = labels.len();
    assert_eq!(logits.len(), rows * classes, "Logits must be batch x classes");
    assert!(rows > 0, "Cross-entropy needs a non-empty batch");

    let log_probs = log_softmax_rows(as_matrix(logits, rows, classes));
    let loss = -labels
        .iter()
        .enumerate()
        .map(|(n, &y)| log_probs[[n, y]])
        .sum::<f32>()
        / rows as f32;

    let requires_grad = tracks(&[logits]);
    let mut result = Tensor::from_vec(vec![loss], requires_grad);

    if requires_grad {
        // ∂L/∂x = (softmax(x) - onehot(y)) / N
        let mut grad = log_probs.mapv(f32::exp);
        for (n, &y) in labels.iter().enumerate() {
            grad[[n, y]] -= 1.0;
        }
        grad /= rows as f32;

        result.set_backward_op(Rc::new(ConstantGradBackward {
            input: logits.clone(),
            local_grad: grad.iter().copied().collect(),
            result_grad: result.grad_cell(),
        }));
    }

    result
}

/// Temperature-scaled soft-target cross-entropy
///
/// L = -1/N Σ_n Σ_c log_softmax(s_n / T)_c · softmax(t_n / T)_c
///
/// `target` is treated as a constant: it never receives gradient, whether
/// or not it is attached to the graph.
pub fn soft_target_cross_entropy(
    student: &Tensor,
    target: &Tensor,
    rows: usize,
    classes: usize,
    temperature: f32,
) -> Tensor {
    assert_eq!(student.len(), rows * classes, "Student logits must be batch x classes");
    assert_eq!(student.len(), target.len(), "Student and target logits must have same shape");
    assert!(rows > 0, "Distillation needs a non-empty batch");

    let student_log_probs =
        log_softmax_rows(as_matrix(student, rows, classes).mapv(|v| v / temperature).view());
    let target_probs =
        softmax_rows(as_matrix(target, rows, classes).mapv(|v| v / temperature).view());

    let loss = -(&student_log_probs * &target_probs).sum() / rows as f32;

    let requires_grad = tracks(&[student]);
    let mut result = Tensor::from_vec(vec![loss], requires_grad);

    if requires_grad {
        // Target rows sum to one, so ∂L/∂s = (softmax(s/T) - p_t) / (T · N)
        let grad = (student_log_probs.mapv(f32::exp) - &target_probs) / (temperature * rows as f32);

        result.set_backward_op(Rc::new(ConstantGradBackward {
            input: student.clone(),
            local_grad: grad.iter().copied().collect(),
            result_grad: result.grad_cell(),
        }));
    }

    result
}

/// Scalar-output op whose input gradient was fixed during the forward pass
struct ConstantGradBackward {
    input: Tensor,
    local_grad: Array1<f32>,
    result_grad: Rc<RefCell<Option<Array1<f32>>>>,
}

impl BackwardOp for ConstantGradBackward {
    fn backward(&self) {
        if let Some(grad) = self.result_grad.borrow().as_ref() {
            if self.input.requires_grad() {
                self.input.accumulate_grad(&self.local_grad * grad[0]);
            }
        }
    }

    fn inputs(&self) -> Vec<Tensor> {
        vec![self.input.clone()]
    }
}
