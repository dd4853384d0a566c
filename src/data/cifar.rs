//! CIFAR binary-format readers
//!
//! Reads the "binary version" archives as extracted on disk:
//! `cifar-10-batches-bin/` (1 label byte + 3072 pixel bytes per record) and
//! `cifar-100-binary/` (coarse label byte, fine label byte, 3072 pixel bytes).

use super::InMemoryDataset;
use crate::error::{Error, Result};
use std::path::Path;

const IMAGE_SHAPE: (usize, usize, usize) = (3, 32, 32);
const IMAGE_BYTES: usize = 3 * 32 * 32;

/// Which CIFAR archive to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CifarVariant {
    Cifar10,
    Cifar100,
}

impl CifarVariant {
    /// Map a class count to a variant
    pub fn from_classes(class_num: usize) -> Option<Self> {
        match class_num {
            10 => Some(Self::Cifar10),
            100 => Some(Self::Cifar100),
            _ => None,
        }
    }

    pub fn num_classes(self) -> usize {
        match self {
            Self::Cifar10 => 10,
            Self::Cifar100 => 100,
        }
    }

    /// Dataset name as printed at startup
    pub fn name(self) -> &'static str {
        match self {
            Self::Cifar10 => "CIFAR10",
            Self::Cifar100 => "CIFAR100",
        }
    }

    fn dir_name(self) -> &'static str {
        match self {
            Self::Cifar10 => "cifar-10-batches-bin",
            Self::Cifar100 => "cifar-100-binary",
        }
    }

    fn train_files(self) -> Vec<String> {
        match self {
            Self::Cifar10 => (1..=5).map(|i| format!("data_batch_{i}.bin")).collect(),
            Self::Cifar100 => vec!["train.bin".to_string()],
        }
    }

    fn test_files(self) -> Vec<String> {
        match self {
            Self::Cifar10 => vec!["test_batch.bin".to_string()],
            Self::Cifar100 => vec!["test.bin".to_string()],
        }
    }

    /// Bytes preceding the pixels in each record
    fn label_bytes(self) -> usize {
        match self {
            Self::Cifar10 => 1,
            Self::Cifar100 => 2,
        }
    }

    fn record_len(self) -> usize {
        self.label_bytes() + IMAGE_BYTES
    }
}

/// Load the `(train, test)` split of `variant` from under `data_root`
pub fn load_cifar(
    data_root: impl AsRef<Path>,
    variant: CifarVariant,
) -> Result<(InMemoryDataset, InMemoryDataset)> {
    let dir = data_root.as_ref().join(variant.dir_name());
    if !dir.is_dir() {
        return Err(Error::DatasetNotFound { path: dir });
    }
    let train = read_split(&dir, &variant.train_files(), variant)?;
    let test = read_split(&dir, &variant.test_files(), variant)?;
    Ok((train, test))
}

fn read_split(dir: &Path, files: &[String], variant: CifarVariant) -> Result<InMemoryDataset> {
    let mut pixels = Vec::new();
    let mut labels = Vec::new();
    for file in files {
        let path = dir.join(file);
        let bytes = read_file(&path)?;
        parse_records(&bytes, &path, variant, &mut pixels, &mut labels)?;
    }
    Ok(InMemoryDataset::new(pixels, labels, IMAGE_SHAPE, variant.num_classes()))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(Error::DatasetNotFound { path: path.to_path_buf() });
    }
    std::fs::read(path).map_err(|e| Error::io(format!("reading {}", path.display()), e))
}

fn parse_records(
    bytes: &[u8],
    path: &Path,
    variant: CifarVariant,
    pixels: &mut Vec<u8>,
    labels: &mut Vec<usize>,
) -> Result<()> {
    let record_len = variant.record_len();
    if bytes.is_empty() || bytes.len() % record_len != 0 {
        return Err(Error::DatasetFormat {
            path: path.to_path_buf(),
            message: format!(
                "size {} is not a positive multiple of the {record_len}-byte record",
                bytes.len()
            ),
        });
    }

    let classes = variant.num_classes();
    for record in bytes.chunks_exact(record_len) {
        // CIFAR-100 stores (coarse, fine); the fine label is the target
        let label = usize::from(record[variant.label_bytes() - 1]);
        if label >= classes {
            return Err(Error::DatasetFormat {
                path: path.to_path_buf(),
                message: format!("label {label} out of range for {classes} classes"),
            });
        }
        labels.push(label);
        pixels.extend_from_slice(&record[variant.label_bytes()..]);
    }
    Ok(())
}
