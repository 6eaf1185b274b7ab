// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (answering a question or fine-tuning).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No UI or printing here (that's Layer 1)
//   - No direct tensor work (that's Layers 4 and 5)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The question-answering workflow (deterministic + generative)
pub mod answer_use_case;

// The fine-tuning workflow
pub mod train_use_case;
