// ============================================================
// Layer 3 — TrainingExample Domain Type
// ============================================================
// One supervised pair for fine-tuning the explainer model:
//   input_text  — the conditioning prompt (formula context + question)
//   output_text — the target explanation the model should produce
//
// The prompt is built here, by one function, for every caller:
// user corrections, the curated table, and serving-time inference
// all condition the model on exactly the same text shape. If the
// prompt drifted between training and inference the model would be
// asked questions in a format it was never trained on.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// The constant formula context every prompt starts with.
const FORMULA_CONTEXT: &str =
    "Physics Formulas: Torque (τ, Nm) = Force (F, N) * Distance (r, m) * sin(θ).";

/// Build the model-facing input text for a question.
/// Shared by TrainingPipeline and InferenceEngine.
pub fn build_input_text(question: &str) -> String {
    format!("{FORMULA_CONTEXT} Solve: {question}")
}

/// A labelled (prompt, explanation) pair.
/// Ephemeral — rebuilt from the correction log and the curated
/// table on every training run, never persisted itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub input_text:  String,
    pub output_text: String,
}

impl TrainingExample {
    /// Build an example from a raw (question, corrected answer) pair,
    /// wrapping the question in the shared prompt.
    pub fn from_correction(question: &str, corrected_answer: &str) -> Self {
        Self {
            input_text:  build_input_text(question),
            output_text: corrected_answer.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_context_and_question() {
        let text = build_input_text("What is the torque?");
        assert!(text.starts_with("Physics Formulas:"));
        assert!(text.ends_with("Solve: What is the torque?"));
    }

    #[test]
    fn test_correction_uses_shared_prompt() {
        let ex = TrainingExample::from_correction("A 5N force on a 2m lever.", "Torque = 10 Nm");
        assert_eq!(ex.input_text, build_input_text("A 5N force on a 2m lever."));
        assert_eq!(ex.output_text, "Torque = 10 Nm");
    }
}
