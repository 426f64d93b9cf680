//! FitCalc WASM Module
//!
//! WebAssembly bindings for the calculators. Scalar results come back as
//! numbers, structured results as JSON strings, and invalid input is thrown
//! as a JavaScript `Error`.

mod storage;

pub use storage::LocalStorage;

use std::str::FromStr;

use fitcalc_shared::{
    body_composition, body_fat, categories, health_metrics, heart_rate, proportions, strength,
    types, units, BodyFatInput, CalcResult, CalculatorError, CategoryStandard, Gender,
    HeartRateZone, MaxHeartRateFormula, OneRepMaxFormula, Session, TrainingLoad, UnitSystem,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn parse<T: FromStr>(value: &str) -> CalcResult<T> {
    value
        .parse()
        .map_err(|_| CalculatorError::UnsupportedCategory(value.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsError> {
    Ok(serde_json::to_string(value)?)
}

fn body_fat_input(
    gender: Gender,
    height: f64,
    waist: f64,
    neck: f64,
    hip: Option<f64>,
    unit_system: UnitSystem,
) -> BodyFatInput {
    BodyFatInput {
        gender,
        height,
        waist,
        neck,
        hip,
        unit_system,
    }
}

/// One-rep max with working weights
#[derive(Debug, Serialize)]
pub struct OneRepMaxReport {
    pub one_rep_max: f64,
    pub formula: OneRepMaxFormula,
    pub equation: &'static str,
    pub training_loads: Vec<TrainingLoad>,
}

impl OneRepMaxReport {
    fn new(one_rep_max: f64, formula: OneRepMaxFormula) -> Self {
        Self {
            one_rep_max,
            formula,
            equation: formula.equation(),
            training_loads: strength::training_loads(one_rep_max),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HeartRateReport {
    pub max_heart_rate: u32,
    pub formula: MaxHeartRateFormula,
    pub zones: Vec<HeartRateZone>,
}

fn heart_rate_report(age_years: f64, formula: &str) -> CalcResult<HeartRateReport> {
    let formula = parse(formula)?;
    let max_heart_rate = heart_rate::max_heart_rate(age_years, formula)?;
    Ok(HeartRateReport {
        max_heart_rate,
        formula,
        zones: heart_rate::heart_rate_zones(max_heart_rate),
    })
}

// ============================================================================
// Stateless calculators
// ============================================================================

/// BMI with category and healthy weight range (JSON)
#[wasm_bindgen]
pub fn calculate_bmi(weight: f64, height: f64, unit: &str) -> Result<String, JsError> {
    to_json(&health_metrics::calculate_bmi_result(weight, height, parse(unit)?)?)
}

/// BMR and TDEE (JSON)
#[wasm_bindgen]
pub fn calculate_bmr(
    weight: f64,
    height: f64,
    age_years: f64,
    gender: &str,
    activity_level: &str,
    unit: &str,
) -> Result<String, JsError> {
    let result = health_metrics::calculate_tdee(
        weight,
        height,
        age_years,
        parse(gender)?,
        parse(activity_level)?,
        parse(unit)?,
    )?;
    to_json(&result)
}

/// One-rep max with training loads (JSON)
#[wasm_bindgen]
pub fn calculate_one_rep_max(weight: f64, reps: u32, formula: &str) -> Result<String, JsError> {
    let formula = parse(formula)?;
    let orm = strength::one_rep_max(weight, reps, formula)?;
    to_json(&OneRepMaxReport::new(orm, formula))
}

/// Maximum heart rate with training zones (JSON)
#[wasm_bindgen]
pub fn calculate_max_heart_rate(age_years: f64, formula: &str) -> Result<String, JsError> {
    to_json(&heart_rate_report(age_years, formula)?)
}

/// Navy Method body fat percentage
#[wasm_bindgen]
pub fn calculate_body_fat(
    gender: &str,
    height: f64,
    waist: f64,
    neck: f64,
    hip: Option<f64>,
    unit: &str,
) -> Result<f64, JsError> {
    let input = body_fat_input(parse(gender)?, height, waist, neck, hip, parse(unit)?);
    Ok(body_fat::calculate_body_fat(&input)?)
}

/// Full body fat analysis (JSON)
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn body_fat_report(
    gender: &str,
    height: f64,
    waist: f64,
    neck: f64,
    hip: Option<f64>,
    unit: &str,
    weight: f64,
    age_years: f64,
    standard: &str,
) -> Result<String, JsError> {
    let input = body_fat_input(parse(gender)?, height, waist, neck, hip, parse(unit)?);
    to_json(&types::body_fat_report(&input, weight, age_years, parse(standard)?)?)
}

#[wasm_bindgen]
pub fn ideal_body_fat(age_years: f64, gender: &str) -> Result<f64, JsError> {
    Ok(body_composition::ideal_body_fat(age_years, parse(gender)?))
}

/// Category table with the current band flagged (JSON)
#[wasm_bindgen]
pub fn body_fat_categories(
    body_fat: f64,
    gender: &str,
    standard: &str,
    age_band: Option<String>,
) -> Result<String, JsError> {
    let matches = categories::categorize(
        body_fat,
        parse(gender)?,
        parse(standard)?,
        age_band.as_deref(),
    );
    to_json(&matches)
}

#[wasm_bindgen]
pub fn age_band_for(standard: &str, age_years: f64) -> Result<String, JsError> {
    let standard: CategoryStandard = parse(standard)?;
    Ok(categories::age_band_for(standard, age_years)?.to_string())
}

/// Healthy weight band for a height (JSON)
#[wasm_bindgen]
pub fn ideal_weight_range(height: f64, gender: &str, unit: &str) -> Result<String, JsError> {
    to_json(&body_composition::ideal_weight_range(
        height,
        parse(gender)?,
        parse(unit)?,
    )?)
}

#[wasm_bindgen]
pub fn body_frame(height: f64, wrist: f64, gender: &str) -> Result<String, JsError> {
    Ok(proportions::body_frame(height, wrist, parse(gender)?)?.to_string())
}

#[wasm_bindgen]
pub fn chest_to_waist(chest: f64, waist: f64, gender: &str) -> Result<String, JsError> {
    to_json(&proportions::chest_to_waist(chest, waist, parse(gender)?)?)
}

#[wasm_bindgen]
pub fn waist_to_hip(waist: f64, hip: f64, gender: &str) -> Result<String, JsError> {
    to_json(&proportions::waist_to_hip(waist, hip, parse(gender)?)?)
}

#[wasm_bindgen]
pub fn waist_to_height(waist: f64, height: f64) -> Result<String, JsError> {
    to_json(&proportions::waist_to_height(waist, height)?)
}

/// Convert a value from `from` ("cm", "inches", "kg", "lbs") to its counterpart
#[wasm_bindgen]
pub fn convert_measurement(value: f64, from: &str) -> Result<f64, JsError> {
    Ok(units::convert_measurement(value, parse(from)?))
}

/// Calculator catalog in navigation order (JSON)
#[wasm_bindgen]
pub fn calculators() -> Result<String, JsError> {
    to_json(&types::calculator_catalog())
}

// ============================================================================
// Session
// ============================================================================

/// Calculators that remember their inputs in `localStorage`
#[wasm_bindgen]
pub struct CalculatorSession {
    inner: Session<LocalStorage>,
}

#[wasm_bindgen]
impl CalculatorSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<CalculatorSession, JsError> {
        Ok(Self {
            inner: Session::new(LocalStorage::from_window()?),
        })
    }

    pub fn unit_system(&self) -> String {
        self.inner.unit_system().to_string()
    }

    /// Returns `true` when saved values were converted to the new unit
    pub fn set_unit_system(&mut self, unit: &str) -> Result<bool, JsError> {
        Ok(self.inner.set_unit_system(parse(unit)?)?)
    }

    /// Last-used inputs and results (JSON)
    pub fn saved(&self) -> Result<String, JsError> {
        to_json(&self.inner.saved())
    }

    pub fn clear(&mut self) -> Result<(), JsError> {
        Ok(self.inner.clear()?)
    }

    pub fn bmi(&mut self, weight: f64, height: f64) -> Result<String, JsError> {
        to_json(&self.inner.bmi(weight, height)?)
    }

    pub fn bmr(
        &mut self,
        weight: f64,
        height: f64,
        age_years: f64,
        gender: &str,
        activity_level: &str,
    ) -> Result<String, JsError> {
        let result = self.inner.bmr(
            weight,
            height,
            age_years,
            parse(gender)?,
            parse(activity_level)?,
        )?;
        to_json(&result)
    }

    pub fn one_rep_max(&mut self, weight: f64, reps: u32, formula: &str) -> Result<String, JsError> {
        let formula = parse(formula)?;
        let orm = self.inner.one_rep_max(weight, reps, formula)?;
        to_json(&OneRepMaxReport::new(orm, formula))
    }

    /// Body fat report for measurements in the session's unit (JSON)
    #[allow(clippy::too_many_arguments)]
    pub fn body_fat(
        &mut self,
        gender: &str,
        height: f64,
        waist: f64,
        neck: f64,
        hip: Option<f64>,
        weight: f64,
        age_years: f64,
        standard: &str,
    ) -> Result<String, JsError> {
        let unit = self.inner.unit_system();
        let input = body_fat_input(parse(gender)?, height, waist, neck, hip, unit);
        to_json(&self.inner.body_fat(&input, weight, age_years, parse(standard)?)?)
    }
}
