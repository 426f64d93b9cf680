//! BMI, BMR and TDEE
//!
//! Also home to [`Gender`], the selector every gender-specific formula in
//! this crate takes. Each calculation receives its [`UnitSystem`]
//! explicitly and rejects non-positive measurements.

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::units::{round_to, UnitSystem};
use crate::validation::validate_positive;

// ============================================================================
// Gender
// ============================================================================

/// Gender selector for the published formulas
/// Note: The source formulas only define coefficients for these two values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(format!("Invalid gender. Must be one of: male, female (got {})", s)),
        }
    }
}

// ============================================================================
// Activity Level
// ============================================================================

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job
    ExtraActive,
}

impl ActivityLevel {
    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary (little or no exercise)",
            ActivityLevel::LightlyActive => "Lightly active (light exercise 1-3 days/week)",
            ActivityLevel::ModeratelyActive => "Moderately active (moderate exercise 3-5 days/week)",
            ActivityLevel::VeryActive => "Very active (hard exercise 6-7 days/week)",
            ActivityLevel::ExtraActive => "Extra active (very hard exercise & physical job)",
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" | "light" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" | "moderate" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" | "very" => Ok(ActivityLevel::VeryActive),
            "extra_active" | "extra" => Ok(ActivityLevel::ExtraActive),
            _ => Err(format!("Invalid activity level: {}", s)),
        }
    }
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Get the BMI range for this category
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::Underweight => (0.0, 18.5),
            BmiCategory::Normal => (18.5, 25.0),
            BmiCategory::Overweight => (25.0, 30.0),
            BmiCategory::Obese => (30.0, f64::INFINITY),
        }
    }

    /// Get a human-readable description
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// BMI calculation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiResult {
    /// BMI value, two decimals
    pub value: f64,
    pub category: BmiCategory,
    /// Healthy weight band (BMI 18.5-25) in the input unit system
    pub healthy_weight_range: (f64, f64),
    pub unit_system: UnitSystem,
}

/// Calculate BMI from weight and height
///
/// Metric: BMI = weight(kg) / height(m)²
/// Imperial: BMI = 703 × weight(lbs) / height(in)²
pub fn calculate_bmi(weight: f64, height: f64, unit: UnitSystem) -> CalcResult<f64> {
    validate_positive("weight", weight)?;
    validate_positive("height", height)?;

    let bmi = match unit {
        UnitSystem::Metric => {
            let height_m = height / 100.0;
            weight / (height_m * height_m)
        }
        UnitSystem::Imperial => 703.0 * weight / (height * height),
    };
    Ok(round_to(bmi, 2))
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Weight that produces `bmi` at the given height, rounded to a whole number
pub fn weight_for_bmi(height: f64, bmi: f64, unit: UnitSystem) -> f64 {
    let weight = match unit {
        UnitSystem::Metric => {
            let height_m = height / 100.0;
            bmi * height_m * height_m
        }
        UnitSystem::Imperial => bmi * height * height / 703.0,
    };
    weight.round()
}

/// Calculate healthy weight range for a given height
///
/// Based on BMI 18.5-25 (normal range)
pub fn healthy_weight_range(height: f64, unit: UnitSystem) -> (f64, f64) {
    (
        weight_for_bmi(height, 18.5, unit),
        weight_for_bmi(height, 25.0, unit),
    )
}

/// Calculate complete BMI result
pub fn calculate_bmi_result(weight: f64, height: f64, unit: UnitSystem) -> CalcResult<BmiResult> {
    let value = calculate_bmi(weight, height, unit)?;
    Ok(BmiResult {
        value,
        category: classify_bmi(value),
        healthy_weight_range: healthy_weight_range(height, unit),
        unit_system: unit,
    })
}

// ============================================================================
// BMR and TDEE Calculations
// ============================================================================

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr_mifflin(weight_kg: f64, height_cm: f64, age_years: f64, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Calculate BMR from inputs in either unit system
pub fn calculate_bmr(
    weight: f64,
    height: f64,
    age_years: f64,
    gender: Gender,
    unit: UnitSystem,
) -> CalcResult<f64> {
    validate_positive("weight", weight)?;
    validate_positive("height", height)?;
    validate_positive("age", age_years)?;

    let weight_kg = unit.weight_to_kg(weight);
    let height_cm = unit.height_to_meters(height) * 100.0;
    Ok(calculate_bmr_mifflin(weight_kg, height_cm, age_years, gender))
}

/// TDEE calculation result with breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TdeeResult {
    /// Basal Metabolic Rate (kcal/day)
    pub bmr: f64,
    /// Total Daily Energy Expenditure (kcal/day)
    pub tdee: f64,
    pub activity_level: ActivityLevel,
    pub activity_multiplier: f64,
}

/// Calculate Total Daily Energy Expenditure
///
/// TDEE = BMR × Activity Multiplier
pub fn calculate_tdee(
    weight: f64,
    height: f64,
    age_years: f64,
    gender: Gender,
    activity_level: ActivityLevel,
    unit: UnitSystem,
) -> CalcResult<TdeeResult> {
    let bmr = calculate_bmr(weight, height, age_years, gender, unit)?;
    Ok(TdeeResult {
        bmr,
        tdee: bmr * activity_level.multiplier(),
        activity_level,
        activity_multiplier: activity_level.multiplier(),
    })
}
