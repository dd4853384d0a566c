//! Gradient-tracking mode

use std::cell::Cell;

thread_local! {
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// Whether ops on this thread currently record backward ops
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(Cell::get)
}

/// Run `f` without recording the graph (evaluation).
///
/// The previous mode is restored when `f` returns, including on panic.
pub fn no_grad<T>(f: impl FnOnce() -> T) -> T {
    struct Restore(bool);

    impl Drop for Restore {
        fn drop(&mut self) {
            GRAD_ENABLED.with(|g| g.set(self.0));
        }
    }

    let _restore = Restore(GRAD_ENABLED.with(|g| g.replace(false)));
    f()
}

/// True when an op over `inputs` has to record a backward op
pub(crate) fn tracks(inputs: &[&super::Tensor]) -> bool {
    is_grad_enabled() && inputs.iter().any(|t| t.requires_grad())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::{add, Tensor};

    #[test]
    fn test_grad_enabled_by_default() {
        assert!(is_grad_enabled());
    }

    #[test]
    fn test_no_grad_scope() {
        let inside = no_grad(is_grad_enabled);
        assert!(!inside);
        assert!(is_grad_enabled());
    }

    #[test]
    fn test_nested_no_grad_restores() {
        no_grad(|| {
            no_grad(|| assert!(!is_grad_enabled()));
            assert!(!is_grad_enabled());
        });
        assert!(is_grad_enabled());
    }

    #[test]
    fn test_ops_skip_graph_under_no_grad() {
        let a = Tensor::from_vec(vec![1.0], true);
        let b = Tensor::from_vec(vec![2.0], true);
        let c = no_grad(|| add(&a, &b));
        assert!(!c.requires_grad());
        assert!(c.backward_op().is_none());
        assert_eq!(c.data()[0], 3.0);
    }
}
