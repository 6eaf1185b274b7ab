// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved per training run:
//   1. Model weights (model.mpk.gz) — all learned parameters
//   2. train_config.json            — model architecture config
//   3. tokenizer.json               — written by TokenizerStore
//
// Why save the config separately?
//   When loading for inference, we need to know the exact
//   model architecture (d_model, layer counts, etc.) to rebuild
//   the model before loading the weights into it.
//
// Persistence is all-or-nothing per run: there is exactly one
// weights file, overwritten by each training run. Retiring a
// checkpoint deletes the whole directory; training is destructive
// and never resumes from a prior fine-tune.
//
// Burn's CompactRecorder:
//   - Serialises model parameters to MessagePack format
//   - Compresses with gzip for smaller file size
//   - Type-safe: loading fails if architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, io, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::FineTuneConfig;
use crate::ml::model::ExplainModel;

const WEIGHTS_FILE: &str = "model";
const CONFIG_FILE:  &str = "train_config.json";

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Save model weights. The recorder appends its own extension
    /// (.mpk.gz) to the path.
    pub fn save_model<B: AutodiffBackend>(&self, model: &ExplainModel<B>) -> Result<()> {
        let path = self.dir.join(WEIGHTS_FILE);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        tracing::debug!("Saved model weights to '{}'", path.display());
        Ok(())
    }

    /// Load model weights into a freshly initialised model of the
    /// same architecture. load_record() returns a new model with
    /// the loaded weights.
    pub fn load_model<B: Backend>(
        &self,
        model:  ExplainModel<B>,
        device: &B::Device,
    ) -> Result<ExplainModel<B>> {
        let path = self.dir.join(WEIGHTS_FILE);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load checkpoint '{}'", path.display()))?;

        Ok(model.load_record(record))
    }

    /// Save the fine-tuning configuration to JSON so inference can
    /// rebuild the exact architecture later.
    pub fn save_config(&self, cfg: &FineTuneConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the fine-tuning configuration from JSON.
    pub fn load_config(&self) -> Result<FineTuneConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Delete a persisted checkpoint directory before retraining.
    ///
    /// A missing directory is fine (nothing to retire). Any other
    /// filesystem error — a locked file, a permission problem — is
    /// reported and swallowed: retirement must never crash the
    /// process, and the subsequent save will overwrite what it can.
    pub fn retire(dir: impl AsRef<Path>) {
        let dir = dir.as_ref();
        match fs::remove_dir_all(dir) {
            Ok(()) => tracing::info!("Retired old checkpoint at '{}'", dir.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No checkpoint to retire at '{}'", dir.display());
            }
            Err(e) => tracing::warn!("Could not retire checkpoint '{}': {}", dir.display(), e),
        }
    }

    /// True when the directory exists, is a directory, and holds at
    /// least one entry — the sole "fine-tuned model available" signal.
    pub fn is_available(dir: impl AsRef<Path>) -> bool {
        let dir = dir.as_ref();
        dir.is_dir()
            && fs::read_dir(dir)
                .map(|mut entries| entries.next().is_some())
                .unwrap_or(false)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_retire_missing_directory_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("never_created");
        CheckpointManager::retire(&gone);
        assert!(!gone.exists());
    }

    #[test]
    fn test_retire_removes_directory_and_contents() {
        let dir  = TempDir::new().unwrap();
        let ckpt = dir.path().join("checkpoints");
        fs::create_dir_all(&ckpt).unwrap();
        fs::write(ckpt.join("model.mpk.gz"), b"weights").unwrap();

        CheckpointManager::retire(&ckpt);
        assert!(!ckpt.exists());
    }

    #[test]
    fn test_availability_signal() {
        let dir  = TempDir::new().unwrap();
        let ckpt = dir.path().join("checkpoints");

        // Absent
        assert!(!CheckpointManager::is_available(&ckpt));

        // Present but empty
        fs::create_dir_all(&ckpt).unwrap();
        assert!(!CheckpointManager::is_available(&ckpt));

        // Non-empty
        fs::write(ckpt.join("tokenizer.json"), b"{}").unwrap();
        assert!(CheckpointManager::is_available(&ckpt));
    }
}
