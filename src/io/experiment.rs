//! Per-run output directory

use crate::config::ExperimentConfig;
use crate::{Error, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";
const SUMMARY_FILE: &str = "summary.log";
const CHECKPOINT_FILE: &str = "bestmodel.safetensors";

/// Render a float the way Python's `str()` does for ordinary values:
/// shortest round-trip digits, always with a decimal point.
pub fn format_lambda(value: f32) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

/// Directory holding one run's config snapshot, summary log and best model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentDir {
    path: PathBuf,
}

impl ExperimentDir {
    /// Create `<output_root>/<tag>_<timestamp>_resnet<depth>_cifar<classes>_ep<epochs>_lkd<lambda>`
    /// and write the config snapshot into it
    pub fn create(config: &ExperimentConfig) -> Result<Self> {
        let dir = Self::at(config.output_root.join(run_name(config, Local::now())))?;
        dir.write_config(config)?;
        Ok(dir)
    }

    /// Use (and create if needed) an explicit directory
    pub fn at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path)
            .map_err(|e| Error::io(format!("creating experiment directory {}", path.display()), e))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config_path(&self) -> PathBuf {
        self.path.join(CONFIG_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.path.join(SUMMARY_FILE)
    }

    pub fn checkpoint_path(&self) -> PathBuf {
        self.path.join(CHECKPOINT_FILE)
    }

    /// Write `config` as pretty JSON to `config.json`
    pub fn write_config<T: Serialize>(&self, config: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| Error::Serialization(format!("Failed to serialize config: {e}")))?;
        let path = self.config_path();
        fs::write(&path, json).map_err(|e| Error::io(format!("writing {}", path.display()), e))
    }

    /// Append one line to `summary.log`
    pub fn append_summary(&self, line: &str) -> Result<()> {
        let path = self.summary_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::io(format!("opening {}", path.display()), e))?;
        writeln!(file, "{line}").map_err(|e| Error::io(format!("appending to {}", path.display()), e))
    }
}

pub(crate) fn run_name(config: &ExperimentConfig, timestamp: DateTime<Local>) -> String {
    format!(
        "{}_{}_resnet{}_cifar{}_ep{}_lkd{}",
        config.tag,
        timestamp.format("%Y.%m.%d_%H.%M.%S"),
        config.depth,
        config.class_num,
        config.epoch,
        format_lambda(config.lambda_kd)
    )
}
