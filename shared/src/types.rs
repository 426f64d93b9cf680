//! Calculator catalog and aggregated result types

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::body_composition::{
    bmi_based_body_fat, calculate_body_composition, fat_to_lose, ideal_body_fat,
    ideal_weight_by_fat, ideal_weight_range, weight_at_body_fat, BodyComposition, Mass,
    WeightRange,
};
use crate::body_fat::{calculate_body_fat, BodyFatInput};
use crate::categories::{
    age_band_for, categorize, weight_for_band, BandWeightEstimate, CategoryMatch, CategoryStandard,
};
use crate::errors::{CalcResult, CalculatorError};
use crate::health_metrics::Gender;
use crate::units::UnitSystem;

// ============================================================================
// Calculator catalog
// ============================================================================

/// Navigation group of a calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculatorCategory {
    Basic,
    Fitness,
    #[serde(rename = "Body Measurement")]
    BodyMeasurement,
}

impl CalculatorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculatorCategory::Basic => "Basic",
            CalculatorCategory::Fitness => "Fitness",
            CalculatorCategory::BodyMeasurement => "Body Measurement",
        }
    }
}

/// Every available calculator, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Calculator {
    #[default]
    Bmi,
    Bmr,
    Orm,
    Mhr,
    Whr,
    Wth,
    Bf,
    Frame,
    Ctw,
}

impl Calculator {
    pub const ALL: [Calculator; 9] = [
        Calculator::Bmi,
        Calculator::Bmr,
        Calculator::Orm,
        Calculator::Mhr,
        Calculator::Whr,
        Calculator::Wth,
        Calculator::Bf,
        Calculator::Frame,
        Calculator::Ctw,
    ];

    /// Short navigation id
    pub fn id(&self) -> &'static str {
        match self {
            Calculator::Bmi => "bmi",
            Calculator::Bmr => "bmr",
            Calculator::Orm => "orm",
            Calculator::Mhr => "mhr",
            Calculator::Whr => "whr",
            Calculator::Wth => "wth",
            Calculator::Bf => "bf",
            Calculator::Frame => "frame",
            Calculator::Ctw => "ctw",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Calculator::Bmi => "BMI Calculator",
            Calculator::Bmr => "BMR Calculator",
            Calculator::Orm => "One Rep Max",
            Calculator::Mhr => "Max Heart Rate",
            Calculator::Whr => "Waist-to-Hip Ratio",
            Calculator::Wth => "Waist-to-Height",
            Calculator::Bf => "Body Fat %",
            Calculator::Frame => "Body Frame Size",
            Calculator::Ctw => "Chest-to-Waist",
        }
    }

    pub fn category(&self) -> CalculatorCategory {
        match self {
            Calculator::Bmi | Calculator::Bmr => CalculatorCategory::Basic,
            Calculator::Orm | Calculator::Mhr => CalculatorCategory::Fitness,
            _ => CalculatorCategory::BodyMeasurement,
        }
    }
}

impl std::str::FromStr for Calculator {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_lowercase();
        Calculator::ALL
            .into_iter()
            .find(|calc| calc.id() == id)
            .ok_or_else(|| CalculatorError::UnsupportedCategory(s.to_string()))
    }
}

/// Catalog entry for presentation layers
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub category: CalculatorCategory,
}

pub fn calculator_catalog() -> Vec<CalculatorInfo> {
    Calculator::ALL
        .iter()
        .map(|calc| CalculatorInfo {
            id: calc.id(),
            name: calc.name(),
            category: calc.category(),
        })
        .collect()
}

// ============================================================================
// Body fat report
// ============================================================================

/// Everything the body fat calculator shows for one set of measurements
#[derive(Debug, Clone, Serialize)]
pub struct BodyFatReport {
    pub gender: Gender,
    pub unit_system: UnitSystem,
    /// Navy Method estimate
    pub body_fat_percent: f64,
    pub composition: BodyComposition,
    /// BMI-based estimate, reported alongside the Navy result
    pub bmi_based_body_fat: f64,
    pub ideal_body_fat: f64,
    pub fat_to_lose: Mass,
    pub ideal_weight_by_fat: Mass,
    pub ideal_weight_range: WeightRange,
    /// Reference-BMI weight for this height at the current body fat
    pub weight_at_current_body_fat: Mass,
    pub standard: CategoryStandard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_band: Option<&'static str>,
    pub categories: Vec<CategoryMatch>,
    /// Weight at each band's bounds with lean mass unchanged, in `categories` order
    pub band_weights: Vec<BandWeightEstimate>,
}

impl BodyFatReport {
    /// Label of the band holding the Navy estimate
    pub fn current_category(&self) -> Option<&'static str> {
        self.categories
            .iter()
            .find(|m| m.is_current)
            .map(|m| m.band.label)
    }
}

/// Build a [`BodyFatReport`]
///
/// `weight` shares the input's unit system. An age outside the standard's
/// bands leaves `categories` empty.
pub fn body_fat_report(
    input: &BodyFatInput,
    weight: f64,
    age_years: f64,
    standard: CategoryStandard,
) -> CalcResult<BodyFatReport> {
    let unit = input.unit_system;
    let gender = input.gender;
    let body_fat_percent = calculate_body_fat(input)?;

    let age_band = if standard.uses_age_bands() {
        age_band_for(standard, age_years).ok()
    } else {
        None
    };
    let categories = categorize(body_fat_percent, gender, standard, age_band);
    debug!(%standard, ?age_band, matches = categories.len(), "Categorized body fat");
    let band_weights = categories
        .iter()
        .map(|m| weight_for_band(weight, body_fat_percent, &m.band, unit))
        .collect::<CalcResult<Vec<_>>>()?;

    Ok(BodyFatReport {
        gender,
        unit_system: unit,
        body_fat_percent,
        composition: calculate_body_composition(weight, body_fat_percent, unit)?,
        bmi_based_body_fat: bmi_based_body_fat(weight, input.height, age_years, gender, unit)?,
        ideal_body_fat: ideal_body_fat(age_years, gender),
        fat_to_lose: fat_to_lose(weight, body_fat_percent, age_years, gender, unit)?,
        ideal_weight_by_fat: ideal_weight_by_fat(weight, body_fat_percent, age_years, gender, unit)?,
        ideal_weight_range: ideal_weight_range(input.height, gender, unit)?,
        weight_at_current_body_fat: weight_at_body_fat(input.height, body_fat_percent, gender, unit)?,
        standard,
        age_band,
        categories,
        band_weights,
    })
}
