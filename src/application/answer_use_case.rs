// ============================================================
// Layer 2 — Answer Use Case
// ============================================================
// Hybrid deterministic + neural answer:
//   1. Extract unit-tagged quantities from the question
//   2. Solve for the one missing torque variable
//   3. Render the deterministic explanation block
//   4. Generate the supplementary model explanation
//   5. Concatenate the two halves with a blank line between
//
// The deterministic half is authoritative; the generative half is
// supplementary. If generation fails, the deterministic half is
// still returned with a fixed unavailability note instead of
// failing the whole request (policy recorded in DESIGN.md).

use anyhow::Result;

use crate::domain::traits::QuestionAnswerer;
use crate::ml::generator::Generator;
use crate::ml::lifecycle::ModelLifecycle;
use crate::physics::{composer::AnswerComposer, extractor::UnitExtractor, solver::TorqueSolver};

const GENERATION_UNAVAILABLE: &str =
    "Additional AI Model Answer is unavailable for this question.";

pub struct AnswerUseCase<'a> {
    lifecycle: &'a ModelLifecycle,
    extractor: UnitExtractor,
    solver:    TorqueSolver,
    composer:  AnswerComposer,
    generator: Generator,
}

impl<'a> AnswerUseCase<'a> {
    pub fn new(lifecycle: &'a ModelLifecycle) -> Self {
        Self {
            lifecycle,
            extractor: UnitExtractor::new(),
            solver:    TorqueSolver::new(),
            composer:  AnswerComposer::new(),
            generator: Generator::new(),
        }
    }

    pub fn answer_question(&self, question: &str) -> Result<String> {
        // ── Deterministic half ────────────────────────────────────────────────
        let quantities = self.extractor.extract(question);
        // DegenerateGeometry is the one extraction-side failure that
        // must surface to the caller rather than render as text
        let result = self.solver.solve(&quantities)?;
        let deterministic = self.composer.compose(&result);

        // ── Generative half ───────────────────────────────────────────────────
        // The lock is held for the whole generation: training and
        // inference are mutually exclusive against the shared model.
        let generative = {
            let state = self.lifecycle.lock()?;
            match self.generator.generate(question, &state) {
                Ok(text) => format!("Additional AI Model Answer: {text}"),
                Err(e) => {
                    tracing::warn!("Generation failed for this request: {e:#}");
                    GENERATION_UNAVAILABLE.to_string()
                }
            }
        };

        Ok(format!("{deterministic}\n\n{generative}"))
    }
}

impl QuestionAnswerer for AnswerUseCase<'_> {
    fn answer(&self, question: &str) -> Result<String> {
        self.answer_question(question)
    }
}
