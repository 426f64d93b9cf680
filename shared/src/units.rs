//! Unit conversion module
//!
//! The calculators accept measurements in either the metric (cm, kg) or the
//! imperial (inches, lbs) system. The chosen [`UnitSystem`] is always passed
//! explicitly; nothing in this crate reads a global unit preference.
//!
//! Conversions between systems round to one decimal place, matching what the
//! measurement forms display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Pounds per kilogram
pub const LBS_PER_KG: f64 = 2.20462;

/// Meters per inch
pub const METERS_PER_INCH: f64 = 0.0254;

/// Round a value to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// Unit System
// ============================================================================

/// Measurement system shared by all calculators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Length unit used for circumference and height inputs
    pub fn length_unit(&self) -> LengthUnit {
        match self {
            UnitSystem::Metric => LengthUnit::Cm,
            UnitSystem::Imperial => LengthUnit::Inches,
        }
    }

    /// Weight unit used for body weight inputs and mass outputs
    pub fn weight_unit(&self) -> WeightUnit {
        match self {
            UnitSystem::Metric => WeightUnit::Kg,
            UnitSystem::Imperial => WeightUnit::Lbs,
        }
    }

    /// The other unit system
    pub fn other(&self) -> UnitSystem {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    /// Height in meters for a height given in this system
    pub fn height_to_meters(&self, height: f64) -> f64 {
        match self {
            UnitSystem::Metric => height / 100.0,
            UnitSystem::Imperial => height * METERS_PER_INCH,
        }
    }

    /// Weight in kilograms for a weight given in this system
    pub fn weight_to_kg(&self, weight: f64) -> f64 {
        match self {
            UnitSystem::Metric => weight,
            UnitSystem::Imperial => weight / LBS_PER_KG,
        }
    }

    /// Express a weight in kilograms in this system
    pub fn weight_from_kg(&self, kg: f64) -> f64 {
        match self {
            UnitSystem::Metric => kg,
            UnitSystem::Imperial => kg * LBS_PER_KG,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    /// Accepts the body-fat form spellings ("cm" / "inches") as well
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "cm" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "inches" | "in" | "usc" => Ok(UnitSystem::Imperial),
            _ => Err(format!("Unknown unit system: {}", s)),
        }
    }
}

// ============================================================================
// Weight Units
// ============================================================================

/// Weight unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lbs" | "lb" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            _ => Err(format!("Unknown weight unit: {}", s)),
        }
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length unit for height and circumference measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Cm,
    Inches,
}

impl LengthUnit {
    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            LengthUnit::Cm => "cm",
            LengthUnit::Inches => "inches",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" => Ok(LengthUnit::Cm),
            "in" | "inch" | "inches" => Ok(LengthUnit::Inches),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

// ============================================================================
// Measurements
// ============================================================================

/// Unit attached to a single measurement value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
    Centimeters,
    Inches,
    Kilograms,
    Pounds,
}

impl MeasurementUnit {
    /// The unit this one converts into
    pub fn counterpart(&self) -> MeasurementUnit {
        match self {
            MeasurementUnit::Centimeters => MeasurementUnit::Inches,
            MeasurementUnit::Inches => MeasurementUnit::Centimeters,
            MeasurementUnit::Kilograms => MeasurementUnit::Pounds,
            MeasurementUnit::Pounds => MeasurementUnit::Kilograms,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            MeasurementUnit::Centimeters => "cm",
            MeasurementUnit::Inches => "inches",
            MeasurementUnit::Kilograms => "kg",
            MeasurementUnit::Pounds => "lbs",
        }
    }
}

impl From<LengthUnit> for MeasurementUnit {
    fn from(unit: LengthUnit) -> Self {
        match unit {
            LengthUnit::Cm => MeasurementUnit::Centimeters,
            LengthUnit::Inches => MeasurementUnit::Inches,
        }
    }
}

impl From<WeightUnit> for MeasurementUnit {
    fn from(unit: WeightUnit) -> Self {
        match unit {
            WeightUnit::Kg => MeasurementUnit::Kilograms,
            WeightUnit::Lbs => MeasurementUnit::Pounds,
        }
    }
}

impl std::str::FromStr for MeasurementUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(length) = s.parse::<LengthUnit>() {
            return Ok(length.into());
        }
        if let Ok(weight) = s.parse::<WeightUnit>() {
            return Ok(weight.into());
        }
        Err(format!("Unknown measurement unit: {}", s))
    }
}

/// A measured value together with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: MeasurementUnit,
}

impl Measurement {
    pub fn new(value: f64, unit: MeasurementUnit) -> Self {
        Self { value, unit }
    }

    /// Convert into the counterpart unit, rounded to one decimal
    pub fn converted(&self) -> Measurement {
        Measurement {
            value: convert_measurement(self.value, self.unit),
            unit: self.unit.counterpart(),
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} {}", self.value, self.unit.abbreviation())
    }
}

/// Convert a value from `from` into its counterpart unit
///
/// cm → inches, inches → cm, kg → lbs, lbs → kg. The result is rounded to
/// one decimal place.
pub fn convert_measurement(value: f64, from: MeasurementUnit) -> f64 {
    let converted = match from {
        MeasurementUnit::Centimeters => value / CM_PER_INCH,
        MeasurementUnit::Inches => value * CM_PER_INCH,
        MeasurementUnit::Kilograms => value * LBS_PER_KG,
        MeasurementUnit::Pounds => value / LBS_PER_KG,
    };
    round_to(converted, 1)
}

/// Convert a length given in `from` into the other unit system
pub fn convert_length(value: f64, from: UnitSystem) -> f64 {
    convert_measurement(value, from.length_unit().into())
}

/// Convert a weight given in `from` into the other unit system
pub fn convert_weight(value: f64, from: UnitSystem) -> f64 {
    convert_measurement(value, from.weight_unit().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Worst-case drift of cm -> inches -> cm with one-decimal rounding on
    // both legs: half an inch-tenth scaled to cm plus half a cm-tenth.
    const CM_ROUNDTRIP_TOLERANCE: f64 = 0.05 * CM_PER_INCH + 0.05 + 1e-9;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(16.1066, 1), 16.1);
        assert_eq!(round_to(112.499, 2), 112.5);
        assert_eq!(round_to(186.6, 0), 187.0);
    }

    #[test]
    fn test_known_conversions() {
        assert_eq!(convert_measurement(100.0, MeasurementUnit::Centimeters), 39.4);
        assert_eq!(convert_measurement(70.0, MeasurementUnit::Inches), 177.8);
        assert_eq!(convert_measurement(80.0, MeasurementUnit::Kilograms), 176.4);
        assert_eq!(convert_measurement(176.4, MeasurementUnit::Pounds), 80.0);
    }

    #[test]
    fn test_hundred_cm_roundtrip_drift() {
        let inches = convert_length(100.0, UnitSystem::Metric);
        let back = convert_length(inches, UnitSystem::Imperial);
        assert_eq!(back, 100.1);
        assert!((back - 100.0).abs() <= 0.1 + 1e-9);
    }

    #[test]
    fn test_measurement_converted() {
        let m = Measurement::new(72.0, MeasurementUnit::Inches).converted();
        assert_eq!(m.unit, MeasurementUnit::Centimeters);
        assert_eq!(m.value, 182.9);
        assert_eq!(m.to_string(), "182.9 cm");
    }

    #[test]
    fn test_unit_system_parsing() {
        assert_eq!("metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("cm".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("Inches".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert_eq!("imperial".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!("furlongs".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn test_measurement_unit_parsing() {
        assert_eq!("kg".parse::<MeasurementUnit>().unwrap(), MeasurementUnit::Kilograms);
        assert_eq!("in".parse::<MeasurementUnit>().unwrap(), MeasurementUnit::Inches);
        assert_eq!("pounds".parse::<MeasurementUnit>().unwrap(), MeasurementUnit::Pounds);
        assert!("stone".parse::<MeasurementUnit>().is_err());
    }

    #[test]
    fn test_unit_system_serde() {
        let json = serde_json::to_string(&UnitSystem::Imperial).unwrap();
        assert_eq!(json, "\"imperial\"");
        let back: UnitSystem = serde_json::from_str("\"metric\"").unwrap();
        assert_eq!(back, UnitSystem::Metric);
    }

    #[test]
    fn test_unit_system_helpers() {
        assert_eq!(UnitSystem::Metric.length_unit(), LengthUnit::Cm);
        assert_eq!(UnitSystem::Imperial.weight_unit(), WeightUnit::Lbs);
        assert_eq!(UnitSystem::Metric.other(), UnitSystem::Imperial);
        assert!((UnitSystem::Imperial.height_to_meters(70.0) - 1.778).abs() < 1e-9);
        assert!((UnitSystem::Imperial.weight_to_kg(220.462) - 100.0).abs() < 1e-9);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: inches -> cm -> inches stays within one decimal place
        #[test]
        fn prop_inches_roundtrip_within_tenth(tenths in 100u32..1000) {
            let inches = tenths as f64 / 10.0;
            let cm = convert_length(inches, UnitSystem::Imperial);
            let back = convert_length(cm, UnitSystem::Metric);
            prop_assert!((back - inches).abs() <= 0.1 + 1e-9,
                "Round-trip drifted: {} -> {} -> {}", inches, cm, back);
        }

        /// Property: cm -> inches -> cm drift is bounded by compounded rounding
        #[test]
        fn prop_cm_roundtrip_bounded(tenths in 300u32..2500) {
            let cm = tenths as f64 / 10.0;
            let inches = convert_length(cm, UnitSystem::Metric);
            let back = convert_length(inches, UnitSystem::Imperial);
            prop_assert!((back - cm).abs() <= CM_ROUNDTRIP_TOLERANCE,
                "Round-trip drifted: {} -> {} -> {}", cm, inches, back);
        }

        /// Property: weight round trip stays within one decimal place
        #[test]
        fn prop_weight_roundtrip(tenths in 200u32..3000) {
            let kg = tenths as f64 / 10.0;
            let lbs = convert_weight(kg, UnitSystem::Metric);
            let back = convert_weight(lbs, UnitSystem::Imperial);
            prop_assert!((back - kg).abs() <= 0.1 + 1e-9);
        }
    }
}
