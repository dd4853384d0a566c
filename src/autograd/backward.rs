//! Backward operation trait and graph traversal

use super::Tensor;
use ndarray::Array1;
use std::collections::HashSet;
use std::rc::Rc;

/// Gradient propagation step recorded by a differentiable operation.
///
/// `backward` reads the gradient of the op's result and accumulates the
/// corresponding gradients into its inputs. It must not recurse: ordering is
/// owned by [`backward`].
pub trait BackwardOp {
    /// Accumulate gradients into the inputs
    fn backward(&self);

    /// Tensors this op propagates into
    fn inputs(&self) -> Vec<Tensor>;
}

/// Run the backward pass from `tensor`.
///
/// Without `grad_output` the seed gradient is all ones (scalar loss).
/// Ops run in reverse topological order, so a tensor consumed by several
/// ops has its full gradient before it propagates further.
pub fn backward(tensor: &Tensor, grad_output: Option<Array1<f32>>) {
    let seed = grad_output.unwrap_or_else(|| Array1::ones(tensor.len()));
    tensor.set_grad(seed);

    for op in topological_order(tensor).into_iter().rev() {
        op.backward();
    }
}

/// Ops reachable from `root`, each listed after every op feeding into it.
fn topological_order(root: &Tensor) -> Vec<Rc<dyn BackwardOp>> {
    let mut order = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![(root.clone(), false)];

    while let Some((node, expanded)) = stack.pop() {
        let Some(op) = node.backward_op() else {
            continue;
        };
        if expanded {
            order.push(op);
            continue;
        }
        if !visited.insert(node.node_id()) {
            continue;
        }
        stack.push((node, true));
        for input in op.inputs() {
            if input.backward_op().is_some() && !visited.contains(&input.node_id()) {
                stack.push((input, false));
            }
        }
    }

    order
}
