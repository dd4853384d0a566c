//! Per-exit and ensemble accuracy counters

use crate::model::ExitOutputs;
use ndarray::ArrayView2;
use std::fmt::Write;

/// Index of the largest value in each row; ties go to the first index
pub fn argmax_rows(scores: ArrayView2<'_, f32>) -> Vec<usize> {
    scores
        .outer_iter()
        .map(|row| {
            let mut best = 0;
            for (j, &v) in row.iter().enumerate() {
                if v > row[best] {
                    best = j;
                }
            }
            best
        })
        .collect()
}

/// Correct counts for each of K exits plus the ensemble, over one epoch
#[derive(Debug, Clone, PartialEq)]
pub struct ExitAccuracy {
    correct: Vec<usize>,
    total: usize,
}

impl ExitAccuracy {
    pub fn new(num_exits: usize) -> Self {
        Self { correct: vec![0; num_exits + 1], total: 0 }
    }

    pub fn num_exits(&self) -> usize {
        self.correct.len() - 1
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Count correct top-1 predictions of every exit and of `ensemble`
    ///
    /// # Panics
    ///
    /// Panics if the exit count or batch size disagree with the counters.
    pub fn update(&mut self, outputs: &ExitOutputs, ensemble: ArrayView2<'_, f32>, labels: &[usize]) {
        assert_eq!(outputs.exit_count(), self.num_exits(), "Exit count changed mid-epoch");
        assert_eq!(outputs.batch_size(), labels.len(), "One label per sample");

        for i in 0..outputs.exit_count() {
            self.correct[i] += count_correct(outputs.exit_matrix(i), labels);
        }
        let k = self.num_exits();
        self.correct[k] += count_correct(ensemble, labels);
        self.total += labels.len();
    }

    /// Accuracy in percent: exits in order, then the ensemble
    pub fn percentages(&self) -> Vec<f32> {
        self.correct
            .iter()
            .map(|&c| {
                if self.total == 0 {
                    0.0
                } else {
                    100.0 * c as f32 / self.total as f32
                }
            })
            .collect()
    }

    /// Accuracy of exit `index` in percent
    pub fn exit_percent(&self, index: usize) -> f32 {
        self.percentages()[index]
    }

    pub fn ensemble_percent(&self) -> f32 {
        self.percentages()[self.num_exits()]
    }

    /// `4/4: a% 3/4: b% 2/4: c%  1/4: d% Ensemble: e%` with `decimals` digits
    pub fn format(&self, decimals: usize) -> String {
        format_percentages(&self.percentages(), decimals)
    }
}

/// Render exit accuracies followed by the ensemble accuracy.
///
/// Exit `i` of `K` is labelled `K-i/K`; the shallowest label is preceded
/// by two spaces.
pub(crate) fn format_percentages(percentages: &[f32], decimals: usize) -> String {
    let k = percentages.len() - 1;
    let mut line = String::new();
    for (i, pct) in percentages[..k].iter().enumerate() {
        if i > 0 {
            line.push_str(if i + 1 == k { "  " } else { " " });
        }
        let _ = write!(line, "{}/{k}: {pct:.decimals$}%", k - i);
    }
    let _ = write!(line, " Ensemble: {:.decimals$}%", percentages[k]);
    line
}

fn count_correct(scores: ArrayView2<'_, f32>, labels: &[usize]) -> usize {
    argmax_rows(scores).iter().zip(labels).filter(|(p, l)| p == l).count()
}
