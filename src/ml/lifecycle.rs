// ============================================================
// Layer 5 — Model Lifecycle
// ============================================================
// Owns the one live model + tokenizer instance the whole process
// shares. Everything that touches that instance goes through the
// mutex here: generation holds the lock while it runs, training
// swaps the freshly trained state in under the same lock, so the
// two can never interleave against half-replaced weights.
//
// Initialization policy (evaluated once at startup):
//   1. checkpoint dir exists, is a dir, and is non-empty
//        → try to load config + tokenizer + weights from it
//        → on ANY load failure: log why, fall back to stock
//   2. otherwise → stock state directly
//
// "Stock" is a deterministic replacement for a pretrained base
// checkpoint: the word-level tokenizer built from the curated
// corpus plus a freshly initialized model of the configured base
// architecture. The stock path writes nothing into the checkpoint
// directory — its non-emptiness is the sole signal that a
// fine-tuned model exists, and faking it would break the policy.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tokenizers::Tokenizer;

use crate::application::train_use_case::FineTuneConfig;
use crate::data::curated::CuratedExamples;
use crate::domain::traits::ExampleSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::tokenizer_store::TokenizerStore;
use crate::ml::model::{ExplainModel, ExplainModelConfig};
use crate::ml::{InferBackend, TrainBackend};

type Device = burn::backend::wgpu::WgpuDevice;

/// The shared mutable model state: weights, tokenizer, device.
/// The device is chosen once and fixed for the state's lifetime.
pub struct ModelState {
    pub model:       ExplainModel<InferBackend>,
    pub tokenizer:   Tokenizer,
    pub device:      Device,
    pub max_seq_len: usize,
}

pub struct ModelLifecycle {
    checkpoint_dir: String,
    state:          Mutex<ModelState>,
}

impl ModelLifecycle {
    /// Load the fine-tuned checkpoint if one is usable, else build
    /// the stock state. Never fails because of a bad checkpoint —
    /// only if even the stock state cannot be built.
    pub fn initialize(cfg: &FineTuneConfig) -> Result<Self> {
        // WGPU picks the best available adapter (discrete GPU first,
        // CPU fallback last); the choice is fixed from here on.
        let device = Device::default();

        let state = if CheckpointManager::is_available(&cfg.checkpoint_dir) {
            match Self::load_fine_tuned(&cfg.checkpoint_dir, &device) {
                Ok(state) => {
                    tracing::info!("Loaded fine-tuned model from '{}'", cfg.checkpoint_dir);
                    state
                }
                Err(e) => {
                    tracing::warn!(
                        "Checkpoint at '{}' is unusable ({e:#}); falling back to stock model",
                        cfg.checkpoint_dir
                    );
                    Self::stock_state(cfg, &device)?
                }
            }
        } else {
            tracing::info!(
                "No fine-tuned checkpoint at '{}' — using stock model",
                cfg.checkpoint_dir
            );
            Self::stock_state(cfg, &device)?
        };

        Ok(Self {
            checkpoint_dir: cfg.checkpoint_dir.clone(),
            state:          Mutex::new(state),
        })
    }

    fn load_fine_tuned(checkpoint_dir: &str, device: &Device) -> Result<ModelState> {
        let ckpt      = CheckpointManager::new(checkpoint_dir);
        let saved_cfg = ckpt.load_config()?;
        let tokenizer = TokenizerStore::new(checkpoint_dir).load()?;

        // Rebuild the exact trained architecture, dropout disabled
        // for deterministic inference
        let mut model_cfg = Self::architecture(&saved_cfg);
        model_cfg.dropout = 0.0;
        let model: ExplainModel<InferBackend> = model_cfg.init(device);
        let model = ckpt.load_model(model, device)?;

        Ok(ModelState {
            model,
            tokenizer,
            device:      device.clone(),
            max_seq_len: saved_cfg.max_seq_len,
        })
    }

    fn stock_state(cfg: &FineTuneConfig, device: &Device) -> Result<ModelState> {
        let corpus: Vec<String> = CuratedExamples::new()
            .load_examples()?
            .into_iter()
            .flat_map(|ex| [ex.input_text, ex.output_text])
            .collect();
        let tokenizer = TokenizerStore::build_stock(&corpus, cfg.vocab_size)?;

        let mut model_cfg = Self::architecture(cfg);
        model_cfg.dropout = 0.0;
        let model: ExplainModel<InferBackend> = model_cfg.init(device);

        Ok(ModelState {
            model,
            tokenizer,
            device:      device.clone(),
            max_seq_len: cfg.max_seq_len,
        })
    }

    /// The model architecture a config describes.
    pub fn architecture(cfg: &FineTuneConfig) -> ExplainModelConfig {
        ExplainModelConfig::new(
            cfg.vocab_size,
            cfg.max_seq_len,
            cfg.d_model,
            cfg.num_heads,
            cfg.num_encoder_layers,
            cfg.num_decoder_layers,
            cfg.d_ff,
            cfg.dropout,
        )
    }

    /// Acquire the state for the duration of a generation run or a
    /// post-training swap. This lock IS the concurrency model:
    /// training and inference against the same instance are
    /// mutually exclusive, nothing more.
    pub fn lock(&self) -> Result<MutexGuard<'_, ModelState>> {
        self.state
            .lock()
            .map_err(|_| anyhow::anyhow!("model state lock poisoned by an earlier panic"))
    }

    /// Delete the persisted checkpoint before retraining.
    /// Reports rather than crashes on filesystem errors.
    pub fn retire(&self) {
        CheckpointManager::retire(Path::new(&self.checkpoint_dir));
    }

    /// Persist a freshly trained model, its config and tokenizer to
    /// the checkpoint directory. All-or-nothing per training run.
    pub fn persist(
        &self,
        model:     &ExplainModel<TrainBackend>,
        tokenizer: &Tokenizer,
        cfg:       &FineTuneConfig,
    ) -> Result<()> {
        let ckpt = CheckpointManager::new(&self.checkpoint_dir);
        ckpt.save_model(model)
            .context("saving model weights")?;
        ckpt.save_config(cfg)
            .context("saving training config")?;
        TokenizerStore::new(&self.checkpoint_dir)
            .save(tokenizer)
            .context("saving tokenizer")?;
        tracing::info!("Checkpoint persisted to '{}'", self.checkpoint_dir);
        Ok(())
    }

    pub fn checkpoint_dir(&self) -> &str {
        &self.checkpoint_dir
    }
}
