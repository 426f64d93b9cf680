//! Navy Method body fat estimation
//!
//! Circumference-based body fat percentage from height, neck, waist and
//! (for women) hip measurements, in either unit system.

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::errors::{CalcResult, CalculatorError};
use crate::health_metrics::Gender;
use crate::units::{convert_length, round_to, UnitSystem};
use crate::validation::{require, validate_input};

/// Lower clamp for reported body fat
pub const MIN_BODY_FAT_PERCENT: f64 = 0.0;

/// Upper clamp for reported body fat
pub const MAX_BODY_FAT_PERCENT: f64 = 60.0;

/// Measurements for a Navy Method estimate
///
/// All lengths are in the unit system's length unit (cm or inches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct BodyFatInput {
    pub gender: Gender,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
    pub height: f64,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
    pub waist: f64,
    #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
    pub neck: f64,
    /// Required for female estimates only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
    pub hip: Option<f64>,
    #[serde(default)]
    pub unit_system: UnitSystem,
}

impl BodyFatInput {
    pub fn male(height: f64, waist: f64, neck: f64, unit_system: UnitSystem) -> Self {
        Self {
            gender: Gender::Male,
            height,
            waist,
            neck,
            hip: None,
            unit_system,
        }
    }

    pub fn female(height: f64, waist: f64, neck: f64, hip: f64, unit_system: UnitSystem) -> Self {
        Self {
            gender: Gender::Female,
            height,
            waist,
            neck,
            hip: Some(hip),
            unit_system,
        }
    }

    /// Re-express every measurement in `target`, rounding to one decimal
    ///
    /// Returns the input unchanged when it is already in `target`.
    pub fn to_unit_system(&self, target: UnitSystem) -> Self {
        if self.unit_system == target {
            return *self;
        }
        let from = self.unit_system;
        Self {
            gender: self.gender,
            height: convert_length(self.height, from),
            waist: convert_length(self.waist, from),
            neck: convert_length(self.neck, from),
            hip: self.hip.map(|hip| convert_length(hip, from)),
            unit_system: target,
        }
    }

    /// Argument of the circumference logarithm, validated to be positive
    fn circumference_term(&self) -> CalcResult<f64> {
        let term = match self.gender {
            Gender::Male => self.waist - self.neck,
            Gender::Female => self.waist + require("hip", self.hip)? - self.neck,
        };
        if term <= 0.0 {
            let reason = match self.gender {
                Gender::Male => "waist must be greater than neck",
                Gender::Female => "waist plus hip must be greater than neck",
            };
            return Err(CalculatorError::invalid("waist", reason));
        }
        Ok(term)
    }
}

/// Estimate body fat percentage using the US Navy circumference method
///
/// Metric (cm):
/// ```text
/// men:   495 / (1.0324 - 0.19077 × log10(waist - neck) + 0.15456 × log10(height)) - 450
/// women: 495 / (1.29579 - 0.35004 × log10(waist + hip - neck) + 0.22100 × log10(height)) - 450
/// ```
/// Imperial (inches):
/// ```text
/// men:   86.010 × log10(waist - neck) - 70.041 × log10(height) + 36.76
/// women: 163.205 × log10(waist + hip - neck) - 97.684 × log10(height) - 78.387
/// ```
///
/// The result is clamped to [0, 60] and rounded to one decimal.
pub fn calculate_body_fat(input: &BodyFatInput) -> CalcResult<f64> {
    validate_input(input)?;
    if input.gender == Gender::Female {
        require("hip", input.hip)?;
    }

    let term = input.circumference_term().map_err(|e| {
        debug!(gender = %input.gender, error = %e, "Rejected body fat measurements");
        e
    })?;
    let log_term = term.log10();
    let log_height = input.height.log10();

    let raw = match input.unit_system {
        UnitSystem::Metric => {
            let density = match input.gender {
                Gender::Male => 1.0324 - 0.19077 * log_term + 0.15456 * log_height,
                Gender::Female => 1.29579 - 0.35004 * log_term + 0.22100 * log_height,
            };
            if density <= 0.0 {
                return Err(CalculatorError::invalid(
                    "waist",
                    "measurements are outside the range supported by the formula",
                ));
            }
            495.0 / density - 450.0
        }
        UnitSystem::Imperial => match input.gender {
            Gender::Male => 86.010 * log_term - 70.041 * log_height + 36.76,
            Gender::Female => 163.205 * log_term - 97.684 * log_height - 78.387,
        },
    };

    let percent = round_to(raw.clamp(MIN_BODY_FAT_PERCENT, MAX_BODY_FAT_PERCENT), 1);
    debug!(
        gender = %input.gender,
        unit = %input.unit_system,
        raw,
        percent,
        "Calculated Navy body fat"
    );
    Ok(percent)
}
