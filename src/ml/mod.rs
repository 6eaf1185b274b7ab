// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// and the infra checkpoint module.
//
// What's in this layer:
//
//   model.rs     — The encoder–decoder transformer
//                  Token + positional embeddings, self-attention
//                  encoder, causal + cross-attention decoder,
//                  LM head, and the seq2seq cross-entropy loss.
//
//   lifecycle.rs — Ownership of the live model + tokenizer.
//                  Load-from-checkpoint-or-fall-back-to-stock,
//                  mutex guard serialising training against
//                  inference, retire/persist/swap.
//
//   trainer.rs   — The fine-tuning loop: forward pass, loss,
//                  backward pass, optimiser step, per-epoch
//                  average loss reporting.
//
//   generator.rs — The inference engine: prompt building, beam
//                  search generation, token decoding.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need

/// Encoder–decoder explanation model architecture
pub mod model;

/// Owned model state, load/fallback/retire/persist/swap
pub mod lifecycle;

/// Fine-tuning loop and training report
pub mod trainer;

/// Beam-search generation of the explanatory half
pub mod generator;

/// Backend used for fine-tuning (autodiff on top of WGPU)
pub type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// Backend used for inference (no autodiff overhead)
pub type InferBackend = burn::backend::Wgpu;
