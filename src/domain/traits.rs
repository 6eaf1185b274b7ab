// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them:
//   - CorrectionLog implements ExampleSource
//   - CuratedExamples implements ExampleSource
//   - The training pipeline only sees ExampleSource and
//     consumes both without caring where examples come from
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::training_example::TrainingExample;

// ─── QuestionAnswerer ─────────────────────────────────────────────────────────
/// Any component that can answer natural language torque questions.
///
/// Implementations:
///   - AnswerUseCase → deterministic solver + generative explainer
pub trait QuestionAnswerer {
    /// Given a question string, return the full answer text.
    fn answer(&self, question: &str) -> Result<String>;
}

// ─── ExampleSource ────────────────────────────────────────────────────────────
/// Any component that can supply training examples for fine-tuning.
///
/// Implementations:
///   - CorrectionLog    → user-submitted corrections on disk
///   - CuratedExamples  → the bundled curated table
pub trait ExampleSource {
    /// Load all available examples from this source.
    /// An empty Vec is a valid result, not an error.
    fn load_examples(&self) -> Result<Vec<TrainingExample>>;
}
