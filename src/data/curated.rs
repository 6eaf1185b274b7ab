// ============================================================
// Layer 4 — Curated Example Table
// ============================================================
// The fixed training set bundled with the system: worked torque
// problems with explicit units, covering the basic product form,
// angled forces, rearranged variables, and unit conversion. Every
// training run appends these after the user corrections so the
// model never regresses below this baseline.
//
// Targets use "*" for multiplication and "÷" for division, matching
// the style the deterministic solver renders.

use anyhow::Result;

use crate::domain::training_example::TrainingExample;
use crate::domain::traits::ExampleSource;

/// (question, target explanation) rows. Inputs are wrapped in the
/// shared formula-context prompt at load time.
const CURATED: &[(&str, &str)] = &[
    // Very basic problems
    (
        "A force of 10 Newtons is applied at a distance of 2 meters from the pivot.",
        "Torque = 10 N * 2 m = 20 Nm",
    ),
    (
        "A 5N force acts on a 4m lever. Calculate torque.",
        "Torque = 5 N * 4 m = 20 Nm",
    ),
    (
        "A 15 Newton force is applied at 3 meters from the pivot.",
        "Torque = 15 N * 3 m = 45 Nm",
    ),
    (
        "What is the torque when a 7N force is applied at a distance of 6m?",
        "Torque = 7 N * 6 m = 42 Nm",
    ),
    (
        "A force of 20N acts at a distance of 1.5m from the pivot.",
        "Torque = 20 N * 1.5 m = 30 Nm",
    ),
    // Basic problems with angles
    (
        "A 12N force acts at 45 degrees on a 3m lever arm.",
        "Torque = 12 N * 3 m * sin(45°) = 12 N * 3 m * 0.7071 = 25.46 Nm",
    ),
    (
        "Calculate the torque when a 25N force acts at 30° on a 2m bar.",
        "Torque = 25 N * 2 m * sin(30°) = 25 N * 2 m * 0.5 = 25 Nm",
    ),
    // Rearranging variables
    (
        "Calculate the force needed to produce 60Nm of torque with a 3m wrench.",
        "Force = Torque ÷ Distance = 60 Nm ÷ 3 m = 20 N",
    ),
    (
        "A 40N force acts at 60° on a lever. The torque is 60Nm. What is the lever length?",
        "Lever length = Torque ÷ (Force * sin(θ)) = 60 Nm ÷ (40 N * sin(60°)) = 60 Nm ÷ (40 N * 0.866) = 1.73 m",
    ),
    // Unit conversion
    (
        "A 2 kg mass hangs from a 50 cm lever arm. Calculate the torque.",
        "Force = mass * gravity = 2 kg * 9.8 m/s² = 19.6 N\nDistance = 50 cm = 0.5 m\nTorque = 19.6 N * 0.5 m = 9.8 Nm",
    ),
];

/// The bundled curated set as an ExampleSource.
pub struct CuratedExamples;

impl CuratedExamples {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CuratedExamples {
    fn default() -> Self {
        Self::new()
    }
}

impl ExampleSource for CuratedExamples {
    fn load_examples(&self) -> Result<Vec<TrainingExample>> {
        Ok(CURATED
            .iter()
            .map(|(question, answer)| TrainingExample::from_correction(question, answer))
            .collect())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_non_empty() {
        let examples = CuratedExamples::new().load_examples().unwrap();
        assert!(examples.len() >= 10);
    }

    #[test]
    fn test_every_input_has_the_shared_prompt() {
        for ex in CuratedExamples::new().load_examples().unwrap() {
            assert!(ex.input_text.starts_with("Physics Formulas:"));
            assert!(ex.input_text.contains("Solve: "));
            assert!(!ex.output_text.is_empty());
        }
    }
}
