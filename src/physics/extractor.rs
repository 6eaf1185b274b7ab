// ============================================================
// Layer 4 — Unit Extractor
// ============================================================
// Finds physical quantities in free question text by matching
// "number + unit token" pairs, case-insensitively.
//
// One pattern, one pass: every alternative in the unit group is
// tried left to right at each match position, so longer unit
// spellings must come first. "Newton-meters" has to classify as
// torque before the "Newtons" alternative can claim the same text
// as a force, and "cm" before "m" for the same reason.
//
// The numeric grammar is `\d+(\.\d+)?` — no sign. Negative
// magnitudes (directional torque) are not recognised; this is a
// documented limitation, not an error path.
//
// Reference: regex crate documentation

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::quantities::QuantitySet;

/// Standard gravity, used to derive force from mass (F = m·g)
const GRAVITY: f64 = 9.8;

static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        (\d+(?:\.\d+)?)          # magnitude, unsigned
        \s*
        ( n·m | n\*m | nm\b      # torque spellings first
        | newton[\ -]meters?
        | newtons?\b | n\b       # then force
        | kilograms?\b | kg\b
        | centimeters?\b | cm\b  # cm before m
        | meters?\b | m\b
        | degrees?\b | °
        )",
    )
    .expect("valid quantity pattern")
});

/// Which quantity class a unit token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitClass {
    Torque,
    Force,
    Mass,
    Centimeters,
    Meters,
    Degrees,
}

fn classify(unit: &str) -> UnitClass {
    let unit = unit.to_lowercase();
    if unit == "nm" || unit.contains('·') || unit.contains('*')
        || (unit.starts_with("newton") && unit.contains("meter"))
    {
        UnitClass::Torque
    } else if unit == "n" || unit.starts_with("newton") {
        UnitClass::Force
    } else if unit == "kg" || unit.starts_with("kilogram") {
        UnitClass::Mass
    } else if unit == "cm" || unit.starts_with("centimeter") {
        UnitClass::Centimeters
    } else if unit == "m" || unit.starts_with("meter") {
        UnitClass::Meters
    } else {
        UnitClass::Degrees
    }
}

/// Pure text-to-quantities parser. No side effects, never fails:
/// a quantity the text does not mention is simply absent.
pub struct UnitExtractor;

impl UnitExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract all recognisable quantities from a question.
    ///
    /// Derivation rules (matching the units table):
    ///   - centimeters are used only when no meter-tagged distance
    ///     exists, converted ÷ 100
    ///   - mass yields force (× 9.8) only when no Newton-tagged
    ///     force exists
    ///   - angle defaults to 90° (perpendicular force) when unstated
    pub fn extract(&self, question: &str) -> QuantitySet {
        let mut force:       Option<f64> = None;
        let mut meters:      Option<f64> = None;
        let mut centimeters: Option<f64> = None;
        let mut mass:        Option<f64> = None;
        let mut angle:       Option<f64> = None;
        let mut torque:      Option<f64> = None;

        for caps in QUANTITY_RE.captures_iter(question) {
            let Ok(value) = caps[1].parse::<f64>() else {
                continue;
            };
            // First occurrence of each class wins, like re.search
            let slot = match classify(&caps[2]) {
                UnitClass::Torque      => &mut torque,
                UnitClass::Force       => &mut force,
                UnitClass::Mass        => &mut mass,
                UnitClass::Centimeters => &mut centimeters,
                UnitClass::Meters      => &mut meters,
                UnitClass::Degrees     => &mut angle,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        QuantitySet {
            force:    force.or(mass.map(|m| m * GRAVITY)),
            distance: meters.or(centimeters.map(|cm| cm / 100.0)),
            angle:    angle.unwrap_or(90.0),
            torque,
        }
    }
}

impl Default for UnitExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> QuantitySet {
        UnitExtractor::new().extract(text)
    }

    #[test]
    fn test_force_and_distance_in_words() {
        let q = extract("A force of 10 Newtons is applied at a distance of 2 meters from the pivot.");
        assert_eq!(q.force, Some(10.0));
        assert_eq!(q.distance, Some(2.0));
        assert_eq!(q.angle, 90.0);
        assert_eq!(q.torque, None);
    }

    #[test]
    fn test_tight_unit_tokens() {
        let q = extract("Calculate the force needed to produce 60Nm of torque with a 3m wrench.");
        assert_eq!(q.torque, Some(60.0));
        assert_eq!(q.distance, Some(3.0));
        assert_eq!(q.force, None);
    }

    #[test]
    fn test_mass_and_centimeters_are_converted() {
        let q = extract("A 2 kg mass hangs from a 50 cm lever arm. Calculate the torque.");
        assert!((q.force.unwrap() - 19.6).abs() < 1e-9);
        assert_eq!(q.distance, Some(0.5));
        assert_eq!(q.angle, 90.0);
    }

    #[test]
    fn test_meters_win_over_centimeters() {
        let q = extract("The 2 m bar has a 30 cm grip.");
        assert_eq!(q.distance, Some(2.0));
    }

    #[test]
    fn test_newtons_win_over_mass() {
        let q = extract("A 5 kg block is pushed with 12 N.");
        assert_eq!(q.force, Some(12.0));
    }

    #[test]
    fn test_angle_in_degrees_and_symbol() {
        assert_eq!(extract("a 12N force at 45 degrees on a 3m arm").angle, 45.0);
        assert_eq!(extract("a 25N force at 30° on a 2m bar").angle, 30.0);
    }

    #[test]
    fn test_newton_meter_is_torque_not_force() {
        let q = extract("The bolt needs 60 Newton-meters.");
        assert_eq!(q.torque, Some(60.0));
        assert_eq!(q.force, None);
    }

    #[test]
    fn test_case_insensitive() {
        let q = extract("apply 7 NEWTONS at 1.5 METERS");
        assert_eq!(q.force, Some(7.0));
        assert_eq!(q.distance, Some(1.5));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let q = extract("First 10 N, then 20 N.");
        assert_eq!(q.force, Some(10.0));
    }

    #[test]
    fn test_no_quantities_at_all() {
        let q = extract("What even is torque?");
        assert_eq!(q, QuantitySet::default());
    }
}
