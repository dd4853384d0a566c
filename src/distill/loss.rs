//! Multi-exit self-distillation loss

use crate::autograd::{add, cross_entropy, scale, soft_target_cross_entropy};
use crate::model::ExitOutputs;
use crate::Tensor;

/// Default softening temperature
pub const DEFAULT_TEMPERATURE: f32 = 3.0;
/// Default multiplier on the soft term (T² for T = 3)
pub const DEFAULT_DISTILL_SCALE: f32 = 9.0;
/// Default weight of the feature-alignment penalty
pub const DEFAULT_FEATURE_COEFF: f32 = 5e-7;

/// Temperature-scaled soft-target loss of `student` against a teacher.
///
/// ```text
/// L = -1/N Σ_n Σ_c log_softmax(s_n / T)_c · softmax(t_n / T)_c
/// ```
///
/// `teacher` acts as a constant target.
pub fn soft_distillation(
    student: &Tensor,
    teacher: &Tensor,
    batch_size: usize,
    num_classes: usize,
    temperature: f32,
) -> Tensor {
    soft_target_cross_entropy(student, teacher, batch_size, num_classes, temperature)
}

/// Composed loss over every exit of a multi-exit model.
///
/// # Formula
///
/// ```text
/// L = CE(o_0, y)
///   + Σ_{i≥1} [ λ · s · soft(o_i, sg(o_0)) + (1 − λ) · CE(o_i, y) ]
///   + [λ ≠ 0] · c · feature_penalty
/// ```
///
/// where `sg` stops the gradient, `s` is the distillation scale and `c` the
/// feature coefficient. The penalty term is dropped entirely when λ is
/// exactly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfDistillationLoss {
    /// Distillation coefficient (λ)
    pub lambda_kd: f32,
    /// Softening temperature
    pub temperature: f32,
    /// Multiplier on each soft term
    pub distill_scale: f32,
    /// Weight on the feature-alignment penalty
    pub feature_coeff: f32,
}

impl SelfDistillationLoss {
    /// Loss with the default temperature, scale and feature coefficient
    pub fn new(lambda_kd: f32) -> Self {
        Self {
            lambda_kd,
            temperature: DEFAULT_TEMPERATURE,
            distill_scale: DEFAULT_DISTILL_SCALE,
            feature_coeff: DEFAULT_FEATURE_COEFF,
        }
    }

    /// # Panics
    ///
    /// Panics if `temperature <= 0`.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        assert!(temperature > 0.0, "Temperature must be positive, got {temperature}");
        self.temperature = temperature;
        self
    }

    pub fn with_distill_scale(mut self, distill_scale: f32) -> Self {
        self.distill_scale = distill_scale;
        self
    }

    pub fn with_feature_coeff(mut self, feature_coeff: f32) -> Self {
        self.feature_coeff = feature_coeff;
        self
    }

    /// Compose the scalar training loss
    ///
    /// # Panics
    ///
    /// Panics if `labels` does not match the batch size of `outputs`.
    pub fn forward(&self, outputs: &ExitOutputs, labels: &[usize]) -> Tensor {
        assert_eq!(
            outputs.batch_size(),
            labels.len(),
            "Batch size must match number of labels"
        );
        let rows = outputs.batch_size();
        let classes = outputs.num_classes();
        let logits = outputs.logits();

        let mut loss = cross_entropy(&logits[0], labels, classes);

        let teacher = logits[0].detach();
        for student in &logits[1..] {
            let soft = soft_distillation(student, &teacher, rows, classes, self.temperature);
            loss = add(&loss, &scale(&soft, self.lambda_kd * self.distill_scale));

            let hard = cross_entropy(student, labels, classes);
            loss = add(&loss, &scale(&hard, 1.0 - self.lambda_kd));
        }

        if self.lambda_kd != 0.0 {
            loss = add(&loss, &scale(outputs.feature_penalty(), self.feature_coeff));
        }

        loss
    }
}
