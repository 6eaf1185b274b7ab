// ============================================================
// Layer 4 — Answer Composer
// ============================================================
// Renders a SolveResult as the deterministic half of an answer.
// Same SolveResult in, same string out — no randomness, no model
// access, no configuration.
//
// Output shape:
//
//   Detected variables:
//   - Torque: Unknown N·m
//   - Force: 10 N
//   - Distance: 2 m
//   - Angle: 90 °
//
//   Calculated values:
//   - τ = F * d * sin(θ) = 10N * 2m * sin(90°) = Torque = 20.00 N·m
//
// The torque case shows the full substituted derivation; force and
// distance show only the rounded result line. When nothing could be
// computed and variables are missing, an explicit not-enough-
// information line replaces the calculation block.

use crate::domain::quantities::{SolveResult, Variable};

pub struct AnswerComposer;

impl AnswerComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(&self, result: &SolveResult) -> String {
        let q = &result.quantities;
        let mut lines = vec![
            "Detected variables:".to_string(),
            format!("- Torque: {} N·m", fmt_opt(q.torque)),
            format!("- Force: {} N", fmt_opt(q.force)),
            format!("- Distance: {} m", fmt_opt(q.distance)),
            format!("- Angle: {} °", q.angle),
        ];

        match &result.computed {
            Some(c) => {
                lines.push(String::new());
                lines.push("Calculated values:".to_string());
                lines.push(match c.variable {
                    Variable::Torque => match (q.force, q.distance) {
                        (Some(force), Some(distance)) => format!(
                            "- τ = F * d * sin(θ) = {}N * {}m * sin({}°) = Torque = {:.2} N·m",
                            force, distance, q.angle, c.value
                        ),
                        // Rule 1 requires force and distance; kept total anyway
                        _ => format!("- Torque = {:.2} N·m", c.value),
                    },
                    Variable::Force    => format!("- Force = {:.2} N", c.value),
                    Variable::Distance => format!("- Distance = {:.2} m", c.value),
                });
            }
            None if !result.missing.is_empty() => {
                let names: Vec<&str> = result.missing.iter().map(Variable::name).collect();
                lines.push(String::new());
                lines.push(format!(
                    "There is not enough information to solve this problem. Missing: {}.",
                    names.join(", ")
                ));
            }
            None => {
                lines.push(String::new());
                lines.push(
                    "All of torque, force and distance are given. Nothing left to solve."
                        .to_string(),
                );
            }
        }

        lines.join("\n")
    }
}

impl Default for AnswerComposer {
    fn default() -> Self {
        Self::new()
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None    => "Unknown".to_string(),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::extractor::UnitExtractor;
    use crate::physics::solver::TorqueSolver;

    fn compose_for(question: &str) -> String {
        let q = UnitExtractor::new().extract(question);
        let r = TorqueSolver::new().solve(&q).unwrap();
        AnswerComposer::new().compose(&r)
    }

    #[test]
    fn test_torque_derivation_block() {
        let text =
            compose_for("A force of 10 Newtons is applied at a distance of 2 meters from the pivot.");
        assert!(text.contains("- Torque: Unknown N·m"));
        assert!(text.contains("- Force: 10 N"));
        assert!(text.contains("- Distance: 2 m"));
        assert!(text.contains("- Angle: 90 °"));
        assert!(text.contains("- τ = F * d * sin(θ) = 10N * 2m * sin(90°) = Torque = 20.00 N·m"));
    }

    #[test]
    fn test_force_result_line_only() {
        let text = compose_for("Calculate the force needed to produce 60Nm of torque with a 3m wrench.");
        assert!(text.contains("- Force = 20.00 N"));
        assert!(!text.contains("τ = F * d"));
    }

    #[test]
    fn test_mass_and_cm_scenario() {
        let text = compose_for("A 2 kg mass hangs from a 50 cm lever arm. Calculate the torque.");
        assert!(text.contains("- Force: 19.6 N"));
        assert!(text.contains("- Distance: 0.5 m"));
        assert!(text.contains("Torque = 9.80 N·m"));
    }

    #[test]
    fn test_insufficient_information() {
        let text = compose_for("What even is torque?");
        assert!(text.contains("not enough information"));
        assert!(text.contains("force, distance, torque"));
        assert!(!text.contains("Calculated values:"));
    }

    #[test]
    fn test_deterministic() {
        let a = compose_for("A 5N force acts on a 4m lever.");
        let b = compose_for("A 5N force acts on a 4m lever.");
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_trip_through_rendered_text() {
        // Re-extracting from the composer's own output must recover
        // the same numeric values
        let text = compose_for("A force of 10 Newtons is applied at 2 meters.");
        let q = UnitExtractor::new().extract(&text);
        assert_eq!(q.force, Some(10.0));
        assert_eq!(q.distance, Some(2.0));
        assert_eq!(q.angle, 90.0);
        assert_eq!(q.torque, Some(20.0));
    }
}
