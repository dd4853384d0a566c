//! Checkpoint saving

use crate::model::MultiExitModel;
use crate::{Error, Result};
use safetensors::tensor::{Dtype, TensorView};
use std::collections::HashMap;
use std::path::Path;

/// Facts recorded alongside the weights
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointMetadata {
    /// Epoch (0-based) that produced the weights
    pub epoch: usize,
    /// Exit 0 test accuracy in percent
    pub accuracy: f32,
    pub architecture: String,
    pub num_classes: usize,
}

impl CheckpointMetadata {
    pub fn for_model(model: &dyn MultiExitModel, epoch: usize, accuracy: f32) -> Self {
        Self {
            epoch,
            accuracy,
            architecture: model.architecture(),
            num_classes: model.num_classes(),
        }
    }

    pub(crate) fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            ("epoch".to_string(), self.epoch.to_string()),
            ("accuracy".to_string(), format!("{:.4}", self.accuracy)),
            ("architecture".to_string(), self.architecture.clone()),
            ("class_num".to_string(), self.num_classes.to_string()),
        ])
    }
}

/// Write every parameter of `model` to a SafeTensors file, replacing any
/// existing file at `path`.
///
/// # Example
///
/// ```no_run
/// use blurdistill::io::{save_checkpoint, CheckpointMetadata};
/// use blurdistill::model::build_model;
///
/// let model = build_model(18, 10, 0).unwrap();
/// let meta = CheckpointMetadata::for_model(model.as_ref(), 0, 42.0);
/// save_checkpoint(model.as_ref(), "bestmodel.safetensors", &meta)?;
/// # Ok::<(), blurdistill::Error>(())
/// ```
pub fn save_checkpoint(
    model: &dyn MultiExitModel,
    path: impl AsRef<Path>,
    metadata: &CheckpointMetadata,
) -> Result<()> {
    let path = path.as_ref();

    let tensor_data: Vec<(String, Vec<u8>, Vec<usize>)> = model
        .named_parameters()
        .into_iter()
        .map(|(name, tensor, shape)| {
            let data = tensor.data();
            let bytes = data
                .as_slice()
                .map(|s| bytemuck::cast_slice::<f32, u8>(s).to_vec())
                .unwrap_or_else(|| data.iter().flat_map(|v| v.to_le_bytes()).collect());
            (name, bytes, shape)
        })
        .collect();

    let views = tensor_data
        .iter()
        .map(|(name, bytes, shape)| {
            TensorView::new(Dtype::F32, shape.clone(), bytes)
                .map(|view| (name.as_str(), view))
                .map_err(|e| Error::Checkpoint(format!("Tensor {name} does not match its shape: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let bytes = safetensors::serialize(views, Some(metadata.to_map()))
        .map_err(|e| Error::Serialization(format!("SafeTensors serialization failed: {e}")))?;

    std::fs::write(path, bytes)
        .map_err(|e| Error::io(format!("writing checkpoint {}", path.display()), e))
}
