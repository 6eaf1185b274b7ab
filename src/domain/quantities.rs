// ============================================================
// Layer 3 — Physical Quantities Domain Types
// ============================================================
// The vocabulary of the deterministic half of the system:
// which quantities a question mentions, which one the solver
// derived, and which ones are still unknown.
//
// All values are in SI base units by the time they land here:
// Newtons, meters, degrees, Newton-meters. Unit conversion
// (centimeters, kilograms) is the extractor's job.
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every quantity the torque relation τ = F·d·sin(θ) can involve.
/// `angle` is not listed: it is never solved for, only supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variable {
    Torque,
    Force,
    Distance,
}

impl Variable {
    /// Lowercase name used in missing-variable reporting
    pub fn name(&self) -> &'static str {
        match self {
            Variable::Torque   => "torque",
            Variable::Force    => "force",
            Variable::Distance => "distance",
        }
    }
}

/// Quantities extracted from one question.
///
/// Invariants:
///   - `angle` always has a value; 90.0° (perpendicular force)
///     when the question does not state one
///   - `distance` is already normalised to meters
///   - `force` may have been derived from a mass (m × 9.8)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitySet {
    /// Applied force in Newtons
    pub force: Option<f64>,

    /// Lever arm length in meters
    pub distance: Option<f64>,

    /// Angle between force and lever in degrees — always set
    pub angle: f64,

    /// Torque in Newton-meters
    pub torque: Option<f64>,
}

impl Default for QuantitySet {
    fn default() -> Self {
        Self {
            force:    None,
            distance: None,
            angle:    90.0,
            torque:   None,
        }
    }
}

/// The single value the solver derived, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Computation {
    pub variable: Variable,
    pub value:    f64,
}

/// Outcome of running the solver over a QuantitySet.
///
/// `computed` holds at most one entry (the solver derives exactly
/// one unknown, or nothing). `missing` lists the variables that
/// are unknown after extraction, excluding the computed one:
/// a variable is never simultaneously computed and missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub quantities: QuantitySet,
    pub computed:   Option<Computation>,
    pub missing:    Vec<Variable>,
}

/// Solver failures. Extraction never errors (an absent quantity is
/// `None`, not an error), so the only failure left is geometric.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    /// sin(θ) is zero, so the force/distance back-solve would divide
    /// by zero. Raised for 0° and 180° instead of returning infinity.
    #[error("cannot solve: force is parallel to the lever (angle {angle_deg}° gives sin(θ) = 0)")]
    DegenerateGeometry { angle_deg: f64 },
}
