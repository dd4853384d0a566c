//! Self-distillation across the exits of one network
//!
//! The deepest exit acts as the teacher for every shallower exit: each
//! student matches the teacher's temperature-softened distribution in
//! addition to the ground-truth labels.
//!
//! ```
//! use blurdistill::distill::SelfDistillationLoss;
//! use blurdistill::model::{build_model, MultiExitModel};
//! use blurdistill::Tensor;
//!
//! let model = build_model(9, 10, 0).unwrap();
//! let outputs = model.forward(&Tensor::zeros(2 * model.input_dim(), false), 2);
//! let loss = SelfDistillationLoss::new(0.5).forward(&outputs, &[3, 7]);
//! assert!(loss.item().is_finite());
//! ```

mod loss;

pub use loss::{
    soft_distillation, SelfDistillationLoss, DEFAULT_DISTILL_SCALE, DEFAULT_FEATURE_COEFF,
    DEFAULT_TEMPERATURE,
};
