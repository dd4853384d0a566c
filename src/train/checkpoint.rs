//! Best-accuracy tracking

use serde::{Deserialize, Serialize};

/// Best exit 0 test accuracy seen so far, in percent.
///
/// Starts at zero and never decreases.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct BestAccuracy(f32);

impl BestAccuracy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Fold in a new accuracy.
    ///
    /// Returns the updated best and whether `accuracy` strictly improved on
    /// it (the signal to save a checkpoint).
    #[must_use]
    pub fn update(self, accuracy: f32) -> (Self, bool) {
        if accuracy > self.0 {
            (Self(accuracy), true)
        } else {
            (self, false)
        }
    }
}
