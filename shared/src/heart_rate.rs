//! Maximum heart rate and training zones

use serde::{Deserialize, Serialize};

use crate::errors::{CalcResult, CalculatorError};
use crate::validation::validate_age;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MaxHeartRateFormula {
    /// 220 - age
    #[default]
    Traditional,
    /// 208 - 0.7 × age
    Tanaka,
}

impl MaxHeartRateFormula {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaxHeartRateFormula::Traditional => "traditional",
            MaxHeartRateFormula::Tanaka => "tanaka",
        }
    }
}

impl std::fmt::Display for MaxHeartRateFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MaxHeartRateFormula {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "traditional" | "fox" => Ok(MaxHeartRateFormula::Traditional),
            "tanaka" => Ok(MaxHeartRateFormula::Tanaka),
            _ => Err(CalculatorError::UnsupportedCategory(s.to_string())),
        }
    }
}

/// Maximum heart rate in beats per minute, rounded to the nearest beat
pub fn max_heart_rate(age_years: f64, formula: MaxHeartRateFormula) -> CalcResult<u32> {
    validate_age(age_years)?;
    let mhr = match formula {
        MaxHeartRateFormula::Traditional => 220.0 - age_years,
        MaxHeartRateFormula::Tanaka => 208.0 - 0.7 * age_years,
    };
    if mhr <= 0.0 {
        return Err(CalculatorError::invalid("age", "is too high for this formula"));
    }
    Ok(mhr.round() as u32)
}

/// A heart rate training zone in bpm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeartRateZone {
    pub min: u32,
    pub max: u32,
    pub name: &'static str,
    pub description: &'static str,
}

const ZONES: [(f64, f64, &str, &str); 5] = [
    (0.5, 0.6, "Zone 1 - Recovery", "Very light activity, helps recovery"),
    (0.6, 0.7, "Zone 2 - Aerobic", "Light exercise, improves general endurance"),
    (0.7, 0.8, "Zone 3 - Endurance", "Moderate exercise, improves aerobic fitness"),
    (0.8, 0.9, "Zone 4 - Threshold", "Hard exercise, increases maximum performance"),
    (0.9, 1.0, "Zone 5 - Anaerobic", "Maximum effort, enhances sprint performance"),
];

pub fn heart_rate_zones(max_heart_rate: u32) -> Vec<HeartRateZone> {
    let mhr = f64::from(max_heart_rate);
    ZONES
        .iter()
        .map(|&(low, high, name, description)| HeartRateZone {
            min: (mhr * low).round() as u32,
            max: (mhr * high).round() as u32,
            name,
            description,
        })
        .collect()
}
