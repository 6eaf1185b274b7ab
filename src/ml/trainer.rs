// ============================================================
// Layer 5 — Fine-Tuning Loop
// ============================================================
// Supervised fine-tuning of the explainer on (prompt, explanation)
// pairs, using Burn's DataLoader and Adam.
//
// Deliberately plain: fixed learning rate, fixed epoch count, no
// schedule, no early stopping, no validation split. The dataset is
// a handful of curated rows plus user corrections; anything
// fancier would be tuning noise.
//
// Key backend insight:
//   - Training uses TrainBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() strips autodiff for the inference swap
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::FineTuneConfig;
use crate::data::{batcher::Seq2SeqBatcher, dataset::ExplanationDataset};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::lifecycle::ModelLifecycle;
use crate::ml::model::ExplainModel;
use crate::ml::TrainBackend;

/// Ordered per-epoch average losses for one fine-tuning run.
/// Empty when training was skipped for lack of data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingReport {
    pub epoch_losses: Vec<f64>,
}

/// Run the full fine-tuning loop over an already tokenised dataset.
/// Returns the trained model (still on the autodiff backend) and
/// the per-epoch loss report.
pub fn run_fine_tune(
    cfg:     &FineTuneConfig,
    dataset: ExplanationDataset,
    metrics: &MetricsLogger,
    device:  burn::backend::wgpu::WgpuDevice,
) -> Result<(ExplainModel<TrainBackend>, TrainingReport)> {
    // ── Fresh base model ──────────────────────────────────────────────────────
    // Training is overwrite-only: every run starts from the stock
    // architecture, never from a prior fine-tune.
    let model_cfg = ModelLifecycle::architecture(cfg);
    let mut model: ExplainModel<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {}+{} layers, d_model={}",
        cfg.num_encoder_layers, cfg.num_decoder_layers, cfg.d_model
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Data loader, reshuffled every epoch ───────────────────────────────────
    let batcher = Seq2SeqBatcher::<TrainBackend>::new(device.clone());
    let loader  = DataLoaderBuilder::new(batcher)
        .batch_size(cfg.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut report = TrainingReport::default();

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in loader.iter() {
            let loss = model.forward_loss(
                batch.input_ids,
                batch.encoder_pad_mask,
                batch.decoder_input_ids,
                batch.labels,
            );

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            loss_sum += loss_val;
            batches  += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_loss = if batches > 0 {
            loss_sum / batches as f64
        } else {
            f64::NAN
        };

        println!("Epoch {:>2}/{} | avg_loss={:.4}", epoch, cfg.epochs, avg_loss);
        metrics.log(&EpochMetrics::new(epoch, avg_loss))?;
        report.epoch_losses.push(avg_loss);
    }

    tracing::info!("Fine-tuning complete: {} epochs", cfg.epochs);
    Ok((model, report))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_report_is_empty() {
        // A skipped run reports no epochs at all, not zeroed ones
        assert!(TrainingReport::default().epoch_losses.is_empty());
    }
}
