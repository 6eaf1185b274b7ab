// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   checkpoint.rs      — Saving, loading and retiring model
//                        weights via Burn's CompactRecorder,
//                        plus the FineTuneConfig JSON so
//                        inference can rebuild the architecture.
//
//   tokenizer_store.rs — Tokenizer persistence. Loads the
//                        fine-tuned tokenizer from the checkpoint
//                        directory, or builds the stock word-level
//                        tokenizer in memory from a corpus.
//
//   metrics.rs         — Per-epoch training loss appended to a
//                        CSV file for later analysis.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving, loading and retiring
pub mod checkpoint;

/// Tokenizer building, saving, and loading
pub mod tokenizer_store;

/// Training metrics CSV logger
pub mod metrics;
