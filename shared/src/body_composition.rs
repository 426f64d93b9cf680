//! Body composition analytics
//!
//! Derived quantities built on a body fat percentage: fat/lean split, the
//! BMI-based cross-check estimate, ideal body fat by age and the weights
//! implied by holding lean mass constant.
//!
//! The BMI-based estimate is an independent second opinion. It is never
//! reconciled with the Navy Method result.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::errors::CalcResult;
use crate::health_metrics::Gender;
use crate::units::{round_to, UnitSystem, WeightUnit};
use crate::validation::{validate_age, validate_body_fat_percent, validate_positive};

// ============================================================================
// Mass values
// ============================================================================

/// A body mass in the weight unit of the caller's unit system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mass {
    pub value: f64,
    pub unit: WeightUnit,
}

impl Mass {
    pub fn new(value: f64, unit_system: UnitSystem) -> Self {
        Self {
            value,
            unit: unit_system.weight_unit(),
        }
    }

    pub fn zero(unit_system: UnitSystem) -> Self {
        Self::new(0.0, unit_system)
    }

    /// Value rounded to one decimal
    pub fn rounded(&self) -> f64 {
        round_to(self.value, 1)
    }
}

impl fmt::Display for Mass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} {}", self.value, self.unit)
    }
}

/// An inclusive weight band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    pub low: Mass,
    pub high: Mass,
}

impl fmt::Display for WeightRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} - {:.1} {}", self.low.value, self.high.value, self.high.unit)
    }
}

// ============================================================================
// Ideal body fat by age
// ============================================================================

/// One point of an age → ideal body fat reference table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeBodyFatReference {
    pub age: u32,
    pub ideal_percent: f64,
}

const fn point(age: u32, ideal_percent: f64) -> AgeBodyFatReference {
    AgeBodyFatReference { age, ideal_percent }
}

/// Jackson & Pollock ideal body fat by age, men
pub static MALE_IDEAL_BODY_FAT: [AgeBodyFatReference; 8] = [
    point(20, 8.5),
    point(25, 10.5),
    point(30, 12.7),
    point(35, 13.7),
    point(40, 15.3),
    point(45, 16.4),
    point(50, 18.9),
    point(55, 20.9),
];

/// Jackson & Pollock ideal body fat by age, women
pub static FEMALE_IDEAL_BODY_FAT: [AgeBodyFatReference; 8] = [
    point(20, 17.7),
    point(25, 18.4),
    point(30, 19.3),
    point(35, 21.5),
    point(40, 22.2),
    point(45, 22.9),
    point(50, 25.2),
    point(55, 26.3),
];

pub fn ideal_body_fat_table(gender: Gender) -> &'static [AgeBodyFatReference] {
    match gender {
        Gender::Male => &MALE_IDEAL_BODY_FAT,
        Gender::Female => &FEMALE_IDEAL_BODY_FAT,
    }
}

/// Ideal body fat percentage for an age, one decimal
///
/// Ages outside 20-55 clamp to the nearest table end; ages between two
/// table points are linearly interpolated:
/// `y1 + (age - x1) × (y2 - y1) / (x2 - x1)`.
pub fn ideal_body_fat(age_years: f64, gender: Gender) -> f64 {
    let table = ideal_body_fat_table(gender);
    let first = table[0];
    let last = table[table.len() - 1];

    if age_years <= first.age as f64 {
        return first.ideal_percent;
    }
    if age_years >= last.age as f64 {
        return last.ideal_percent;
    }

    table
        .windows(2)
        .find(|pair| age_years >= pair[0].age as f64 && age_years <= pair[1].age as f64)
        .map(|pair| {
            let (x1, y1) = (pair[0].age as f64, pair[0].ideal_percent);
            let (x2, y2) = (pair[1].age as f64, pair[1].ideal_percent);
            round_to(y1 + (age_years - x1) * ((y2 - y1) / (x2 - x1)), 1)
        })
        // Only NaN ages fall through every window
        .unwrap_or(last.ideal_percent)
}

// ============================================================================
// Fat / lean split
// ============================================================================

/// Fat mass = weight × bf / 100
pub fn fat_mass(weight: f64, body_fat_percent: f64, unit: UnitSystem) -> Mass {
    Mass::new(weight * (body_fat_percent / 100.0), unit)
}

/// Lean mass = weight × (1 - bf / 100)
pub fn lean_mass(weight: f64, body_fat_percent: f64, unit: UnitSystem) -> Mass {
    Mass::new(weight * (1.0 - body_fat_percent / 100.0), unit)
}

/// Fat and lean mass together
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyComposition {
    pub body_fat_percent: f64,
    pub fat_mass: Mass,
    pub lean_mass: Mass,
}

pub fn calculate_body_composition(
    weight: f64,
    body_fat_percent: f64,
    unit: UnitSystem,
) -> CalcResult<BodyComposition> {
    validate_positive("weight", weight)?;
    validate_body_fat_percent(body_fat_percent)?;

    Ok(BodyComposition {
        body_fat_percent,
        fat_mass: fat_mass(weight, body_fat_percent, unit),
        lean_mass: lean_mass(weight, body_fat_percent, unit),
    })
}

/// Total weight at `target_percent` body fat with lean mass unchanged
///
/// `lean / (1 - target / 100)`
pub fn weight_holding_lean_mass(weight: f64, current_percent: f64, target_percent: f64) -> f64 {
    let lean = weight * (1.0 - current_percent / 100.0);
    lean / (1.0 - target_percent / 100.0)
}

// ============================================================================
// BMI-based estimate
// ============================================================================

/// Body fat estimate from BMI, one decimal
///
/// Formula: BF% = 1.20 × BMI + 0.23 × age - 10.8 × g - 5.4
/// where g = 1 for male, 0 for female. Inputs are converted to metric first.
pub fn bmi_based_body_fat(
    weight: f64,
    height: f64,
    age_years: f64,
    gender: Gender,
    unit: UnitSystem,
) -> CalcResult<f64> {
    validate_positive("weight", weight)?;
    validate_positive("height", height)?;
    validate_age(age_years)?;

    let height_m = unit.height_to_meters(height);
    let weight_kg = unit.weight_to_kg(weight);
    let bmi = weight_kg / (height_m * height_m);

    let gender_factor = match gender {
        Gender::Male => 1.0,
        Gender::Female => 0.0,
    };
    let body_fat = 1.20 * bmi + 0.23 * age_years - 10.8 * gender_factor - 5.4;
    Ok(round_to(body_fat, 1))
}

// ============================================================================
// Targets derived from ideal body fat
// ============================================================================

/// Fat mass to lose to reach the ideal body fat for this age
///
/// Zero when the current body fat is already at or below ideal. Otherwise
/// lean mass is held constant and the difference between current and ideal
/// fat mass is returned.
pub fn fat_to_lose(
    weight: f64,
    current_body_fat: f64,
    age_years: f64,
    gender: Gender,
    unit: UnitSystem,
) -> CalcResult<Mass> {
    validate_positive("weight", weight)?;
    validate_body_fat_percent(current_body_fat)?;

    let ideal = ideal_body_fat(age_years, gender);
    if current_body_fat <= ideal {
        return Ok(Mass::zero(unit));
    }

    let current_fat = weight * (current_body_fat / 100.0);
    let ideal_weight = weight_holding_lean_mass(weight, current_body_fat, ideal);
    let ideal_fat = ideal_weight * (ideal / 100.0);

    debug!(weight, current_body_fat, ideal, ideal_weight, "Calculated fat to lose");
    Ok(Mass::new(current_fat - ideal_fat, unit))
}

/// Weight at the ideal body fat for this age, lean mass unchanged
pub fn ideal_weight_by_fat(
    weight: f64,
    current_body_fat: f64,
    age_years: f64,
    gender: Gender,
    unit: UnitSystem,
) -> CalcResult<Mass> {
    validate_positive("weight", weight)?;
    validate_body_fat_percent(current_body_fat)?;

    let ideal = ideal_body_fat(age_years, gender);
    Ok(Mass::new(
        weight_holding_lean_mass(weight, current_body_fat, ideal),
        unit,
    ))
}

// ============================================================================
// Height-based reference weights
// ============================================================================

/// Reference BMI used for height-based weight estimates
pub fn reference_bmi(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 22.5,
        Gender::Female => 21.5,
    }
}

/// Healthy body fat bounds (percent) used for the ideal weight range
pub fn healthy_body_fat_bounds(gender: Gender) -> (f64, f64) {
    match gender {
        Gender::Male => (8.0, 19.0),
        Gender::Female => (21.0, 32.0),
    }
}

fn reference_weight_kg(height: f64, gender: Gender, unit: UnitSystem) -> f64 {
    let height_m = unit.height_to_meters(height);
    reference_bmi(gender) * height_m * height_m
}

/// Healthy weight band for a height
///
/// The reference weight (reference BMI × height²) is scaled across the
/// healthy body fat bounds: `ref / (1 - bf / 100)`.
pub fn ideal_weight_range(height: f64, gender: Gender, unit: UnitSystem) -> CalcResult<WeightRange> {
    validate_positive("height", height)?;

    let reference = reference_weight_kg(height, gender, unit);
    let (low_bf, high_bf) = healthy_body_fat_bounds(gender);
    let low = reference / (1.0 - low_bf / 100.0);
    let high = reference / (1.0 - high_bf / 100.0);

    Ok(WeightRange {
        low: Mass::new(unit.weight_from_kg(low), unit),
        high: Mass::new(unit.weight_from_kg(high), unit),
    })
}

/// Weight for a height at a given body fat, based on the reference BMI
pub fn weight_at_body_fat(
    height: f64,
    body_fat_percent: f64,
    gender: Gender,
    unit: UnitSystem,
) -> CalcResult<Mass> {
    validate_positive("height", height)?;
    validate_body_fat_percent(body_fat_percent)?;

    let reference = reference_weight_kg(height, gender, unit);
    let weight = reference / (1.0 - body_fat_percent / 100.0);
    Ok(Mass::new(unit.weight_from_kg(weight), unit))
}
