// ============================================================
// Layer 4 — Physics Pipeline
// ============================================================
// The deterministic half of an answer, in three steps:
//
//   question text
//       │
//       ▼
//   UnitExtractor    → finds unit-tagged numbers (N, m, cm, kg, °, Nm)
//       │
//       ▼
//   TorqueSolver     → derives the one missing variable via τ = F·d·sin(θ)
//       │
//       ▼
//   AnswerComposer   → renders variables + calculation as fixed text
//
// Each module is responsible for exactly one step, is pure
// (no I/O, no model access), and is independently testable.
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Parses free text for unit-tagged physical quantities
pub mod extractor;

/// Picks and applies the correct torque relation
pub mod solver;

/// Renders extracted variables and the computed result as text
pub mod composer;
