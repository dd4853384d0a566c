//! Property-based tests for the classification losses

use super::test_utils::{finite_difference, seeded_values};
use crate::autograd::{backward, cross_entropy, soft_target_cross_entropy, Tensor};
use proptest::prelude::*;

fn labels_for(seed: u64, rows: usize, classes: usize) -> Vec<usize> {
    (0..rows).map(|i| ((seed as usize) + i * 7) % classes).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_cross_entropy_non_negative_and_finite(
        rows in 1usize..8,
        classes in 2usize..12,
        seed in 0u64..1000,
    ) {
        let logits: Vec<f32> = seeded_values(seed, rows * classes).iter().map(|v| v * 20.0).collect();
        let labels = labels_for(seed, rows, classes);

        let loss = cross_entropy(&Tensor::from_vec(logits, false), &labels, classes);
        prop_assert!(loss.item().is_finite());
        prop_assert!(loss.item() >= 0.0);
    }

    #[test]
    fn prop_soft_target_cross_entropy_non_negative(
        rows in 1usize..8,
        classes in 2usize..12,
        seed in 0u64..1000,
    ) {
        let student: Vec<f32> = seeded_values(seed, rows * classes).iter().map(|v| v * 10.0).collect();
        let teacher: Vec<f32> = seeded_values(seed + 1, rows * classes).iter().map(|v| v * 10.0).collect();

        let loss = soft_target_cross_entropy(
            &Tensor::from_vec(student, false),
            &Tensor::from_vec(teacher, false),
            rows,
            classes,
            3.0,
        );
        prop_assert!(loss.item().is_finite());
        prop_assert!(loss.item() >= 0.0);
    }

    #[test]
    fn prop_cross_entropy_gradient_check(
        rows in 1usize..5,
        classes in 2usize..6,
        seed in 0u64..1000,
    ) {
        let x = seeded_values(seed, rows * classes);
        let labels = labels_for(seed, rows, classes);

        let logits = Tensor::from_vec(x.clone(), true);
        backward(&cross_entropy(&logits, &labels, classes), None);
        let analytical = logits.grad().expect("gradient should be available");

        let numerical = finite_difference(
            |v| cross_entropy(&Tensor::from_vec(v.to_vec(), false), &labels, classes).item(),
            &x,
            1e-2,
        );
        for i in 0..x.len() {
            let diff = (analytical[i] - numerical[i]).abs();
            prop_assert!(diff < 5e-3, "mismatch at {}: {} vs {}", i, analytical[i], numerical[i]);
        }
    }

    #[test]
    fn prop_soft_target_gradient_check(
        rows in 1usize..5,
        classes in 2usize..6,
        seed in 0u64..1000,
    ) {
        let s = seeded_values(seed, rows * classes);
        let t = seeded_values(seed + 3, rows * classes);
        let target = Tensor::from_vec(t, false);

        let student = Tensor::from_vec(s.clone(), true);
        backward(&soft_target_cross_entropy(&student, &target, rows, classes, 3.0), None);
        let analytical = student.grad().expect("gradient should be available");

        let numerical = finite_difference(
            |v| {
                soft_target_cross_entropy(&Tensor::from_vec(v.to_vec(), false), &target, rows, classes, 3.0)
                    .item()
            },
            &s,
            1e-2,
        );
        for i in 0..s.len() {
            let diff = (analytical[i] - numerical[i]).abs();
            prop_assert!(diff < 5e-3, "mismatch at {}: {} vs {}", i, analytical[i], numerical[i]);
        }
    }
}
