//! Multi-exit classifier models
//!
//! A multi-exit model attaches a classifier to several depths of one
//! backbone. Its forward pass returns every exit's logits plus the
//! feature-alignment penalty between exits.
//!
//! ```
//! use blurdistill::model::{build_model, MultiExitModel};
//! use blurdistill::Tensor;
//!
//! let model = build_model(9, 10, 0).expect("depth 9 is supported");
//! let images = Tensor::zeros(2 * model.input_dim(), false);
//! let outputs = model.forward(&images, 2);
//! assert_eq!(outputs.exit_count(), 4);
//! ```

mod factory;
mod layers;
mod outputs;
mod resnet;

pub use factory::{build_model, Depth};
pub use layers::Linear;
pub use outputs::ExitOutputs;
pub use resnet::{BackboneConfig, MultiExitResNet};

use crate::Tensor;

/// Classifier with several ordered exits
pub trait MultiExitModel {
    /// Forward a flattened `batch_size x input_dim` batch.
    ///
    /// Exit 0 is the reference (deepest) classifier; later exits are
    /// progressively shallower.
    fn forward(&self, inputs: &Tensor, batch_size: usize) -> ExitOutputs;

    /// Number of exits (K); constant for a model
    fn num_exits(&self) -> usize;

    fn num_classes(&self) -> usize;

    /// Flattened per-sample input size (C * H * W)
    fn input_dim(&self) -> usize;

    /// Short architecture tag, e.g. `resnet18`
    fn architecture(&self) -> String;

    /// `(name, tensor, shape)` for every parameter, in a fixed order
    fn named_parameters(&self) -> Vec<(String, &Tensor, Vec<usize>)>;

    /// Mutable parameters, in the same order as [`named_parameters`](Self::named_parameters)
    fn parameters_mut(&mut self) -> Vec<&mut Tensor>;

    /// Total number of scalar parameters
    fn num_parameters(&self) -> usize {
        self.named_parameters().iter().map(|(_, t, _)| t.len()).sum()
    }
}
