// ============================================================
// Layer 4 — Torque Solver
// ============================================================
// Picks exactly one missing variable among {torque, force,
// distance} and computes it from τ = F·d·sin(θ). The three rules
// are mutually exclusive by construction: each requires the other
// two variables to be known and its own to be unknown.
//
// Rule priority: torque → force → distance.
//
// The degeneracy check compares sin(θ) against a small epsilon
// rather than zero: sin(180°) after degree-to-radian conversion
// is ~1.2e-16 in f64, and dividing by it would yield a ~1e16
// magnitude result instead of the infinity the pure-math reading
// suggests. Both 0° and 180° must fail identically.

use crate::domain::quantities::{
    Computation, QuantitySet, SolveError, SolveResult, Variable,
};

/// Below this, sin(θ) is treated as zero (force parallel to lever)
const SIN_EPSILON: f64 = 1e-9;

pub struct TorqueSolver;

impl TorqueSolver {
    pub fn new() -> Self {
        Self
    }

    /// Derive at most one unknown from the extracted quantities.
    ///
    /// Errors only when a back-solve for force or distance would
    /// divide by sin(θ) = 0. Computing torque never divides, so a
    /// parallel force legitimately yields zero torque there.
    pub fn solve(&self, q: &QuantitySet) -> Result<SolveResult, SolveError> {
        let sin_theta = q.angle.to_radians().sin();

        let computed = match (q.torque, q.force, q.distance) {
            (None, Some(force), Some(distance)) => Some(Computation {
                variable: Variable::Torque,
                value:    force * distance * sin_theta,
            }),
            (Some(torque), None, Some(distance)) => {
                Self::check_geometry(q.angle, sin_theta)?;
                Some(Computation {
                    variable: Variable::Force,
                    value:    torque / (distance * sin_theta),
                })
            }
            (Some(torque), Some(force), None) => {
                Self::check_geometry(q.angle, sin_theta)?;
                Some(Computation {
                    variable: Variable::Distance,
                    value:    torque / (force * sin_theta),
                })
            }
            // All three known, or two or more unknown: nothing to do —
            // the composer reports insufficient data from `missing`.
            _ => None,
        };

        let missing = Self::missing_after(q, computed.as_ref());

        Ok(SolveResult {
            quantities: q.clone(),
            computed,
            missing,
        })
    }

    fn check_geometry(angle_deg: f64, sin_theta: f64) -> Result<(), SolveError> {
        if sin_theta.abs() < SIN_EPSILON {
            Err(SolveError::DegenerateGeometry { angle_deg })
        } else {
            Ok(())
        }
    }

    /// Variables still unknown after extraction, minus the one the
    /// solver just derived: `computed` is the authoritative
    /// post-solve value and is never also reported missing.
    fn missing_after(q: &QuantitySet, computed: Option<&Computation>) -> Vec<Variable> {
        let solved = computed.map(|c| c.variable);
        let mut missing = Vec::new();
        if q.force.is_none() && solved != Some(Variable::Force) {
            missing.push(Variable::Force);
        }
        if q.distance.is_none() && solved != Some(Variable::Distance) {
            missing.push(Variable::Distance);
        }
        if q.torque.is_none() && solved != Some(Variable::Torque) {
            missing.push(Variable::Torque);
        }
        missing
    }
}

impl Default for TorqueSolver {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn quantities(
        force: Option<f64>,
        distance: Option<f64>,
        angle: f64,
        torque: Option<f64>,
    ) -> QuantitySet {
        QuantitySet { force, distance, angle, torque }
    }

    fn solve(q: &QuantitySet) -> Result<SolveResult, SolveError> {
        TorqueSolver::new().solve(q)
    }

    #[test]
    fn test_computes_torque_perpendicular() {
        let r = solve(&quantities(Some(10.0), Some(2.0), 90.0, None)).unwrap();
        let c = r.computed.unwrap();
        assert_eq!(c.variable, Variable::Torque);
        assert!((c.value - 20.0).abs() < 5e-3);
        assert!(r.missing.is_empty());
    }

    #[test]
    fn test_computes_torque_with_angle() {
        // 25 N * 2 m * sin(30°) = 25 Nm
        let r = solve(&quantities(Some(25.0), Some(2.0), 30.0, None)).unwrap();
        assert!((r.computed.unwrap().value - 25.0).abs() < 5e-3);
    }

    #[test]
    fn test_computes_force() {
        // F = 60 / (3 * sin(90°)) = 20 N
        let r = solve(&quantities(None, Some(3.0), 90.0, Some(60.0))).unwrap();
        let c = r.computed.unwrap();
        assert_eq!(c.variable, Variable::Force);
        assert!((c.value - 20.0).abs() < 5e-3);
        assert!(r.missing.is_empty());
    }

    #[test]
    fn test_computes_distance() {
        // d = 60 / (40 * sin(60°)) ≈ 1.73 m
        let r = solve(&quantities(Some(40.0), None, 60.0, Some(60.0))).unwrap();
        let c = r.computed.unwrap();
        assert_eq!(c.variable, Variable::Distance);
        assert!((c.value - 1.73).abs() < 5e-3);
    }

    #[test]
    fn test_parallel_force_gives_zero_torque() {
        // Rule 1 never divides, so 0° is a valid zero-torque case
        let r = solve(&quantities(Some(10.0), Some(2.0), 0.0, None)).unwrap();
        assert!(r.computed.unwrap().value.abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_force_backsolve_at_zero_degrees() {
        let err = solve(&quantities(None, Some(3.0), 0.0, Some(60.0))).unwrap_err();
        assert!(matches!(err, SolveError::DegenerateGeometry { .. }));
    }

    #[test]
    fn test_degenerate_distance_backsolve_at_180_degrees() {
        // sin(180°) is not exactly zero in f64; the epsilon must catch it
        let err = solve(&quantities(Some(40.0), None, 180.0, Some(60.0))).unwrap_err();
        assert!(matches!(err, SolveError::DegenerateGeometry { angle_deg } if angle_deg == 180.0));
    }

    #[test]
    fn test_nothing_known() {
        let r = solve(&QuantitySet::default()).unwrap();
        assert!(r.computed.is_none());
        assert_eq!(
            r.missing,
            vec![Variable::Force, Variable::Distance, Variable::Torque]
        );
    }

    #[test]
    fn test_only_one_known() {
        let r = solve(&quantities(Some(10.0), None, 90.0, None)).unwrap();
        assert!(r.computed.is_none());
        assert_eq!(r.missing, vec![Variable::Distance, Variable::Torque]);
    }

    #[test]
    fn test_all_three_known() {
        let r = solve(&quantities(Some(10.0), Some(2.0), 90.0, Some(20.0))).unwrap();
        assert!(r.computed.is_none());
        assert!(r.missing.is_empty());
    }
}
