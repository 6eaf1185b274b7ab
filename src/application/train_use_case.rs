// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full fine-tuning pipeline in order:
//
//   Step 1: Build training set        (Layer 4 - data)
//           corrections + curated table; skip run if empty
//   Step 2: Retire old checkpoint     (Layer 6 - infra)
//   Step 3: Build stock tokenizer     (Layer 6 - infra)
//   Step 4: Tokenise into dataset     (Layer 4 - data)
//   Step 5: Run training loop         (Layer 5 - ml)
//   Step 6: Persist model + tokenizer (Layer 6 - infra)
//   Step 7: Swap live model state     (Layer 5 - ml)
//   Step 8: Smoke-test one question
//
// The lifecycle lock is held from before the retire until after
// the swap: a concurrent answer request can never observe the
// model mid-replacement.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use burn::module::AutodiffModule;
use serde::{Deserialize, Serialize};

use crate::data::{
    corrections::CorrectionLog,
    curated::CuratedExamples,
    dataset::ExplanationDataset,
};
use crate::domain::training_example::TrainingExample;
use crate::domain::traits::ExampleSource;
use crate::infra::metrics::MetricsLogger;
use crate::infra::tokenizer_store::TokenizerStore;
use crate::ml::generator::Generator;
use crate::ml::lifecycle::{ModelLifecycle, ModelState};
use crate::ml::trainer::{run_fine_tune, TrainingReport};
use crate::physics::{composer::AnswerComposer, extractor::UnitExtractor, solver::TorqueSolver};

/// Fixed problem used to sanity-check a freshly trained model
const SMOKE_TEST_QUESTION: &str =
    "A 15N force is applied perpendicular to a 2m lever. Calculate the torque.";

// ─── Fine-Tuning Configuration ───────────────────────────────────────────────
// All hyperparameters for a training run, serialisable so the
// architecture can be saved to disk and reloaded for inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FineTuneConfig {
    pub corrections_file:   String,
    pub checkpoint_dir:     String,
    pub max_seq_len:        usize,
    pub batch_size:         usize,
    pub epochs:             usize,
    pub lr:                 f64,
    pub d_model:            usize,
    pub num_heads:          usize,
    pub num_encoder_layers: usize,
    pub num_decoder_layers: usize,
    pub d_ff:               usize,
    pub dropout:            f64,
    pub vocab_size:         usize,
}

impl Default for FineTuneConfig {
    fn default() -> Self {
        Self {
            corrections_file:   "user_corrections.txt".to_string(),
            checkpoint_dir:     "checkpoints".to_string(),
            max_seq_len:        128,
            batch_size:         2,
            epochs:             10,
            lr:                 1e-5,
            d_model:            256,
            num_heads:          8,
            num_encoder_layers: 3,
            num_decoder_layers: 3,
            d_ff:               1024,
            dropout:            0.1,
            vocab_size:         4096,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: FineTuneConfig,
}

impl TrainUseCase {
    pub fn new(config: FineTuneConfig) -> Self {
        Self { config }
    }

    /// Execute the full fine-tuning pipeline end to end, replacing
    /// the lifecycle's live model on success.
    pub fn execute(&self, lifecycle: &ModelLifecycle) -> Result<TrainingReport> {
        let cfg = &self.config;

        // ── Step 1: Build the training set ────────────────────────────────────
        let corrections = CorrectionLog::new(&cfg.corrections_file);
        let examples = build_training_set(&corrections, &CuratedExamples::new())?;
        if examples.is_empty() {
            tracing::warn!("No training data found — skipping fine-tuning run");
            return Ok(TrainingReport::default());
        }
        tracing::info!("Training with {} examples", examples.len());

        // Serialise against answer requests for the rest of the run
        let mut state = lifecycle.lock()?;
        let device = state.device.clone();

        // ── Step 2: Retire the old checkpoint ─────────────────────────────────
        // Training is destructive and overwrite-only
        lifecycle.retire();

        // ── Step 3: Stock tokenizer over the combined corpus ──────────────────
        let corpus: Vec<String> = examples
            .iter()
            .flat_map(|ex| [ex.input_text.clone(), ex.output_text.clone()])
            .collect();
        let tokenizer = TokenizerStore::build_stock(&corpus, cfg.vocab_size)?;

        // ── Step 4: Tokenise into a dataset ───────────────────────────────────
        let dataset = ExplanationDataset::from_examples(&examples, &tokenizer, cfg.max_seq_len)?;

        // ── Step 5: Run the training loop ─────────────────────────────────────
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;
        let (trained, report) = run_fine_tune(cfg, dataset, &metrics, device.clone())?;

        // ── Step 6: Persist ───────────────────────────────────────────────────
        // A save failure is reported, not fatal: the in-memory model
        // stays usable for this process lifetime either way
        if let Err(e) = lifecycle.persist(&trained, &tokenizer, cfg) {
            tracing::warn!("Could not persist trained model: {e:#}");
        }

        // ── Step 7: Swap the live state ───────────────────────────────────────
        *state = ModelState {
            model:       trained.valid(),
            tokenizer,
            device,
            max_seq_len: cfg.max_seq_len,
        };
        tracing::info!("Live model replaced with freshly trained state");

        // ── Step 8: Smoke test ────────────────────────────────────────────────
        self.smoke_test(&state);

        Ok(report)
    }

    /// Run one fixed problem through both halves of the pipeline and
    /// log the results, mirroring what an answer request would see.
    fn smoke_test(&self, state: &ModelState) {
        let quantities = UnitExtractor::new().extract(SMOKE_TEST_QUESTION);
        match TorqueSolver::new().solve(&quantities) {
            Ok(result) => tracing::info!(
                "Smoke test (deterministic):\n{}",
                AnswerComposer::new().compose(&result)
            ),
            Err(e) => tracing::warn!("Smoke test solver error: {e}"),
        }

        match Generator::new().generate(SMOKE_TEST_QUESTION, state) {
            Ok(answer) => tracing::info!("Smoke test (model): {answer}"),
            Err(e) => tracing::warn!("Smoke test generation error: {e:#}"),
        }
    }
}

/// Corrections first, then the curated table — the combined,
/// ephemeral training set for one run.
pub fn build_training_set(
    corrections: &dyn ExampleSource,
    curated:     &dyn ExampleSource,
) -> Result<Vec<TrainingExample>> {
    let mut examples = corrections.load_examples()?;
    examples.extend(curated.load_examples()?);
    Ok(examples)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<TrainingExample>);

    impl ExampleSource for Fixed {
        fn load_examples(&self) -> Result<Vec<TrainingExample>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_empty_sources_give_empty_set() {
        let set = build_training_set(&Fixed(vec![]), &Fixed(vec![])).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_corrections_precede_curated() {
        let correction = TrainingExample::from_correction("q1", "a1");
        let curated    = TrainingExample::from_correction("q2", "a2");
        let set = build_training_set(
            &Fixed(vec![correction]),
            &Fixed(vec![curated]),
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set[0].output_text, "a1");
        assert_eq!(set[1].output_text, "a2");
    }

    #[test]
    fn test_missing_corrections_still_train_on_curated() {
        let log = CorrectionLog::new("does/not/exist.txt");
        let set = build_training_set(&log, &CuratedExamples::new()).unwrap();
        assert_eq!(set.len(), CuratedExamples::new().load_examples().unwrap().len());
    }
}
