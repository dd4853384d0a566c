//! Checkpoint loading

use super::CheckpointMetadata;
use crate::model::MultiExitModel;
use crate::{Error, Result};
use safetensors::tensor::Dtype;
use safetensors::SafeTensors;
use std::path::Path;

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::io(format!("reading checkpoint {}", path.display()), e))
}

/// Restore every parameter of `model` from a file written by
/// [`save_checkpoint`](super::save_checkpoint).
///
/// Each parameter is matched by name and must have the same shape.
pub fn load_checkpoint(model: &mut dyn MultiExitModel, path: impl AsRef<Path>) -> Result<()> {
    let bytes = read(path.as_ref())?;
    let tensors = SafeTensors::deserialize(&bytes)
        .map_err(|e| Error::Checkpoint(format!("Failed to deserialize checkpoint: {e}")))?;

    let layout: Vec<(String, Vec<usize>)> = model
        .named_parameters()
        .into_iter()
        .map(|(name, _, shape)| (name, shape))
        .collect();

    let mut values = Vec::with_capacity(layout.len());
    for (name, shape) in &layout {
        let view = tensors
            .tensor(name)
            .map_err(|_| Error::Checkpoint(format!("Missing tensor {name}")))?;
        if view.dtype() != Dtype::F32 {
            return Err(Error::Checkpoint(format!("Tensor {name} is {:?}, expected F32", view.dtype())));
        }
        if view.shape() != shape.as_slice() {
            return Err(Error::Checkpoint(format!(
                "Tensor {name} has shape {:?}, model expects {shape:?}",
                view.shape()
            )));
        }
        values.push(
            view.data()
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect::<Vec<f32>>(),
        );
    }

    for (param, data) in model.parameters_mut().into_iter().zip(values) {
        param.data_mut().iter_mut().zip(data).for_each(|(dst, src)| *dst = src);
    }
    Ok(())
}

/// Read only the metadata header of a checkpoint
pub fn read_checkpoint_metadata(path: impl AsRef<Path>) -> Result<CheckpointMetadata> {
    let bytes = read(path.as_ref())?;
    let (_, header) = SafeTensors::read_metadata(&bytes)
        .map_err(|e| Error::Checkpoint(format!("Failed to read checkpoint header: {e}")))?;
    let map = header
        .metadata()
        .clone()
        .ok_or_else(|| Error::Checkpoint("Checkpoint has no metadata".to_string()))?;

    let field = |key: &str| {
        map.get(key)
            .cloned()
            .ok_or_else(|| Error::Checkpoint(format!("Checkpoint metadata lacks `{key}`")))
    };
    let parse_err = |key: &str| Error::Checkpoint(format!("Checkpoint metadata `{key}` is malformed"));

    Ok(CheckpointMetadata {
        epoch: field("epoch")?.parse().map_err(|_| parse_err("epoch"))?,
        accuracy: field("accuracy")?.parse().map_err(|_| parse_err("accuracy"))?,
        architecture: field("architecture")?,
        num_classes: field("class_num")?.parse().map_err(|_| parse_err("class_num"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{save_checkpoint, CheckpointMetadata};
    use crate::model::{BackboneConfig, MultiExitResNet};
    use tempfile::TempDir;

    fn tiny(seed: u64, classes: usize) -> MultiExitResNet {
        MultiExitResNet::new(
            BackboneConfig {
                input_dim: 4,
                stage_widths: vec![3, 3],
                blocks_per_stage: vec![1, 1],
                align_dim: 2,
                num_classes: classes,
                name: "tiny".to_string(),
            },
            seed,
        )
    }

    #[test]
    fn test_restores_saved_weights() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("best.safetensors");
        let saved = tiny(1, 2);
        let meta = CheckpointMetadata::for_model(&saved, 3, 55.5);
        save_checkpoint(&saved, &path, &meta).unwrap();

        let mut restored = tiny(2, 2);
        load_checkpoint(&mut restored, &path).unwrap();

        for ((name, a, _), (_, b, _)) in saved.named_parameters().iter().zip(restored.named_parameters()) {
            assert_eq!(a.data(), b.data(), "{name} differs");
        }
    }

    #[test]
    fn test_metadata_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("best.safetensors");
        let model = tiny(1, 2);
        save_checkpoint(&model, &path, &CheckpointMetadata::for_model(&model, 7, 61.25)).unwrap();

        let meta = read_checkpoint_metadata(&path).unwrap();
        assert_eq!(meta.epoch, 7);
        assert_eq!(meta.accuracy, 61.25);
        assert_eq!(meta.architecture, "tiny");
        assert_eq!(meta.num_classes, 2);
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("best.safetensors");
        let model = tiny(1, 2);
        save_checkpoint(&model, &path, &CheckpointMetadata::for_model(&model, 0, 1.0)).unwrap();

        let mut other = tiny(1, 5);
        let err = load_checkpoint(&mut other, &path).unwrap_err();
        assert!(matches!(err, Error::Checkpoint(_)));
        assert!(err.to_string().contains("shape"));
    }

    #[test]
    fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        let mut model = tiny(1, 2);
        let err = load_checkpoint(&mut model, tmp.path().join("nope.safetensors")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("best.safetensors");
        let model = tiny(1, 2);
        save_checkpoint(&model, &path, &CheckpointMetadata::for_model(&model, 0, 10.0)).unwrap();
        save_checkpoint(&model, &path, &CheckpointMetadata::for_model(&model, 4, 20.0)).unwrap();
        assert_eq!(read_checkpoint_metadata(&path).unwrap().epoch, 4);
    }
}
