//! Tests for learning rate schedulers

use super::*;
use approx::assert_relative_eq;

fn schedule() -> MultiStepLR {
    MultiStepLR::new(0.1, vec![75, 130, 180], 10.0)
}

#[test]
fn test_multi_step_initial_lr() {
    assert_eq!(schedule().get_lr(), 0.1);
}

#[test]
fn test_multi_step_divides_exactly_at_milestones() {
    let mut s = schedule();
    let mut previous = s.get_lr();
    for epoch in 1..200 {
        s.step();
        let lr = s.get_lr();
        if s.milestones().contains(&epoch) {
            assert_eq!(lr, previous / 10.0, "epoch {epoch}");
        } else {
            assert_eq!(lr, previous, "epoch {epoch}");
        }
        previous = lr;
    }
}

#[test]
fn test_multi_step_after_all_milestones() {
    let s = schedule();
    assert_eq!(s.lr_at(199), 0.1 / 10.0 / 10.0 / 10.0);
    assert_relative_eq!(s.lr_at(199), 0.1 / 1000.0, max_relative = 1e-6);
}

#[test]
fn test_multi_step_boundaries() {
    let s = schedule();
    assert_eq!(s.lr_at(74), 0.1);
    assert_eq!(s.lr_at(75), 0.1 / 10.0);
    assert_eq!(s.lr_at(129), 0.1 / 10.0);
    assert_eq!(s.lr_at(130), 0.1 / 10.0 / 10.0);
}

#[test]
fn test_multi_step_sorts_and_dedups_milestones() {
    let s = MultiStepLR::new(1.0, vec![5, 2, 5], 2.0);
    assert_eq!(s.milestones(), &[2, 5]);
    assert_eq!(s.lr_at(10), 0.25);
}

#[test]
fn test_multi_step_no_milestones_is_constant() {
    let s = MultiStepLR::new(0.3, Vec::new(), 10.0);
    assert_eq!(s.lr_at(1000), 0.3);
}

#[test]
fn test_multi_step_epoch_counts_steps() {
    let mut s = schedule();
    for _ in 0..130 {
        s.step();
    }
    assert_eq!(s.get_lr(), s.lr_at(130));
    assert_eq!(s.get_lr(), 0.1 / 10.0 / 10.0);
}
