//! Learning rate schedulers
//!
//! - `MultiStepLR` - Divide the learning rate at fixed milestone epochs

mod multi_step;

#[cfg(test)]
mod tests;

pub use multi_step::MultiStepLR;

/// Learning rate scheduler trait
pub trait LRScheduler {
    /// Get the current learning rate
    fn get_lr(&self) -> f32;

    /// Step the scheduler (called after each epoch)
    fn step(&mut self);
}
