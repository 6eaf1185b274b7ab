// ============================================================
// Layer 4 — Training Data Pipeline
// ============================================================
// Everything between raw correction text and GPU-ready tensor
// batches. The pipeline flows in this order:
//
//   user_corrections.txt        curated table
//       │                           │
//       ▼                           ▼
//   CorrectionLog             CuratedExamples
//       └──────────┬────────────────┘
//                  ▼
//   TrainingExample list     → ephemeral, rebuilt per run
//                  │
//                  ▼
//   ExplanationDataset        → tokenised, padded samples
//                  │
//                  ▼
//   Seq2SeqBatcher            → stacks samples into tensor batches
//                  │
//                  ▼
//   DataLoader                → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads and appends the tab-separated user correction log
pub mod corrections;

/// The curated example table bundled with the system
pub mod curated;

/// Tokenised samples and Burn's Dataset impl
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
