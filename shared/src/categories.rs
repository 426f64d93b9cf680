//! Body fat category standards
//!
//! Reference category tables from three independent sources:
//!
//! - **ACE** (American Council on Exercise): by gender only
//! - **NIH** (Gallagher et al.): by gender and age band 20-39 / 40-59 / 60-79
//! - **ACSM** (American College of Sports Medicine): by gender and age band
//!   20-29 / 30-39 / 40-49 / 50-59 / 60+
//!
//! Bands are half-open `[min, max)` with an unbounded top band. A band whose
//! minimum is zero also takes every value below its maximum.

use serde::{Deserialize, Serialize};

use crate::body_composition::{weight_holding_lean_mass, Mass};
use crate::errors::{CalcResult, CalculatorError};
use crate::health_metrics::Gender;
use crate::units::UnitSystem;
use crate::validation::{validate_body_fat_percent, validate_positive};

// ============================================================================
// Bands
// ============================================================================

/// One labeled body fat range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryBand {
    pub label: &'static str,
    pub min_percent: f64,
    /// `None` for the open-ended top band
    pub max_percent: Option<f64>,
}

const fn band(label: &'static str, min_percent: f64, max_percent: f64) -> CategoryBand {
    CategoryBand {
        label,
        min_percent,
        max_percent: Some(max_percent),
    }
}

const fn top(label: &'static str, min_percent: f64) -> CategoryBand {
    CategoryBand {
        label,
        min_percent,
        max_percent: None,
    }
}

impl CategoryBand {
    /// Whether `value` falls in this band
    pub fn contains(&self, value: f64) -> bool {
        match self.max_percent {
            None => value >= self.min_percent,
            Some(max) => {
                (self.min_percent == 0.0 && value < max)
                    || (self.min_percent <= value && value < max)
            }
        }
    }

    /// Display range, e.g. "14-17%" or "25%+"
    pub fn range_label(&self) -> String {
        match self.max_percent {
            None => format!("{}%+", self.min_percent),
            Some(max) => format!("{}-{}%", self.min_percent, max - 1.0),
        }
    }
}

/// A band from a lookup, flagged when it holds the looked-up value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryMatch {
    #[serde(flatten)]
    pub band: CategoryBand,
    pub is_current: bool,
}

// ============================================================================
// Standards
// ============================================================================

/// Source of a category table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStandard {
    #[default]
    Ace,
    Nih,
    Acsm,
}

impl CategoryStandard {
    pub fn name(&self) -> &'static str {
        match self {
            CategoryStandard::Ace => "ACE",
            CategoryStandard::Nih => "NIH",
            CategoryStandard::Acsm => "ACSM",
        }
    }

    /// Age band labels for this standard (empty for ACE)
    pub fn age_bands(&self) -> Vec<&'static str> {
        match self {
            CategoryStandard::Ace => Vec::new(),
            CategoryStandard::Nih => NIH_TABLES.iter().map(|t| t.label).collect(),
            CategoryStandard::Acsm => ACSM_TABLES.iter().map(|t| t.label).collect(),
        }
    }

    pub fn uses_age_bands(&self) -> bool {
        !matches!(self, CategoryStandard::Ace)
    }
}

impl std::fmt::Display for CategoryStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for CategoryStandard {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ace" => Ok(CategoryStandard::Ace),
            "nih" | "gallagher" => Ok(CategoryStandard::Nih),
            "acsm" => Ok(CategoryStandard::Acsm),
            _ => Err(CalculatorError::UnsupportedCategory(s.to_string())),
        }
    }
}

// ============================================================================
// Reference tables
// ============================================================================

/// Category tables for one age band
struct AgeBandTable {
    label: &'static str,
    min_age: f64,
    /// Exclusive; `None` for an open-ended band
    max_age: Option<f64>,
    male: &'static [CategoryBand],
    female: &'static [CategoryBand],
}

impl AgeBandTable {
    fn bands(&self, gender: Gender) -> &'static [CategoryBand] {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }

    fn covers(&self, age: f64) -> bool {
        age >= self.min_age && self.max_age.map_or(true, |max| age < max)
    }
}

static ACE_MALE: [CategoryBand; 5] = [
    band("Essential Fat", 2.0, 6.0),
    band("Athletic", 6.0, 14.0),
    band("Fitness", 14.0, 18.0),
    band("Average", 18.0, 25.0),
    top("Obese", 25.0),
];

static ACE_FEMALE: [CategoryBand; 5] = [
    band("Essential Fat", 10.0, 16.0),
    band("Athletic", 16.0, 21.0),
    band("Fitness", 21.0, 25.0),
    band("Average", 25.0, 32.0),
    top("Obese", 32.0),
];

const fn nih(healthy: f64, overfat: f64, obese: f64) -> [CategoryBand; 4] {
    [
        band("Underfat", 0.0, healthy),
        band("Healthy", healthy, overfat),
        band("Overfat", overfat, obese),
        top("Obese", obese),
    ]
}

static NIH_MALE_20_39: [CategoryBand; 4] = nih(8.0, 21.0, 25.0);
static NIH_MALE_40_59: [CategoryBand; 4] = nih(11.0, 22.0, 28.0);
static NIH_MALE_60_79: [CategoryBand; 4] = nih(13.0, 25.0, 30.0);
static NIH_FEMALE_20_39: [CategoryBand; 4] = nih(21.0, 33.0, 39.0);
static NIH_FEMALE_40_59: [CategoryBand; 4] = nih(23.0, 34.0, 40.0);
static NIH_FEMALE_60_79: [CategoryBand; 4] = nih(24.0, 36.0, 42.0);

static NIH_TABLES: [AgeBandTable; 3] = [
    AgeBandTable {
        label: "20-39",
        min_age: 20.0,
        max_age: Some(40.0),
        male: &NIH_MALE_20_39,
        female: &NIH_FEMALE_20_39,
    },
    AgeBandTable {
        label: "40-59",
        min_age: 40.0,
        max_age: Some(60.0),
        male: &NIH_MALE_40_59,
        female: &NIH_FEMALE_40_59,
    },
    AgeBandTable {
        label: "60-79",
        min_age: 60.0,
        max_age: Some(80.0),
        male: &NIH_MALE_60_79,
        female: &NIH_FEMALE_60_79,
    },
];

/// Thresholds are the lower bounds of Excellent through Very Poor
const fn acsm(t: [f64; 5]) -> [CategoryBand; 6] {
    [
        band("Very Lean", 0.0, t[0]),
        band("Excellent", t[0], t[1]),
        band("Good", t[1], t[2]),
        band("Fair", t[2], t[3]),
        band("Poor", t[3], t[4]),
        top("Very Poor", t[4]),
    ]
}

static ACSM_MALE_20_29: [CategoryBand; 6] = acsm([7.0, 11.0, 15.0, 19.0, 24.0]);
static ACSM_MALE_30_39: [CategoryBand; 6] = acsm([11.0, 15.0, 19.0, 22.0, 26.0]);
static ACSM_MALE_40_49: [CategoryBand; 6] = acsm([13.0, 17.0, 21.0, 24.0, 28.0]);
static ACSM_MALE_50_59: [CategoryBand; 6] = acsm([15.0, 19.0, 23.0, 26.0, 29.0]);
static ACSM_MALE_60_PLUS: [CategoryBand; 6] = acsm([16.0, 20.0, 23.0, 26.0, 30.0]);
static ACSM_FEMALE_20_29: [CategoryBand; 6] = acsm([14.0, 17.0, 21.0, 24.0, 29.0]);
static ACSM_FEMALE_30_39: [CategoryBand; 6] = acsm([15.0, 19.0, 22.0, 26.0, 31.0]);
static ACSM_FEMALE_40_49: [CategoryBand; 6] = acsm([17.0, 22.0, 26.0, 29.0, 34.0]);
static ACSM_FEMALE_50_59: [CategoryBand; 6] = acsm([20.0, 25.0, 29.0, 32.0, 36.0]);
static ACSM_FEMALE_60_PLUS: [CategoryBand; 6] = acsm([21.0, 25.0, 29.0, 33.0, 37.0]);

static ACSM_TABLES: [AgeBandTable; 5] = [
    AgeBandTable {
        label: "20-29",
        min_age: 20.0,
        max_age: Some(30.0),
        male: &ACSM_MALE_20_29,
        female: &ACSM_FEMALE_20_29,
    },
    AgeBandTable {
        label: "30-39",
        min_age: 30.0,
        max_age: Some(40.0),
        male: &ACSM_MALE_30_39,
        female: &ACSM_FEMALE_30_39,
    },
    AgeBandTable {
        label: "40-49",
        min_age: 40.0,
        max_age: Some(50.0),
        male: &ACSM_MALE_40_49,
        female: &ACSM_FEMALE_40_49,
    },
    AgeBandTable {
        label: "50-59",
        min_age: 50.0,
        max_age: Some(60.0),
        male: &ACSM_MALE_50_59,
        female: &ACSM_FEMALE_50_59,
    },
    AgeBandTable {
        label: "60+",
        min_age: 60.0,
        max_age: None,
        male: &ACSM_MALE_60_PLUS,
        female: &ACSM_FEMALE_60_PLUS,
    },
];

fn age_band_tables(standard: CategoryStandard) -> &'static [AgeBandTable] {
    match standard {
        CategoryStandard::Ace => &[],
        CategoryStandard::Nih => &NIH_TABLES,
        CategoryStandard::Acsm => &ACSM_TABLES,
    }
}

// ============================================================================
// Lookups
// ============================================================================

/// Category bands for a standard, gender and age band
///
/// ACE ignores `age_band`. For NIH and ACSM an unknown or missing age band
/// yields an empty slice.
pub fn category_bands(
    standard: CategoryStandard,
    gender: Gender,
    age_band: Option<&str>,
) -> &'static [CategoryBand] {
    match standard {
        CategoryStandard::Ace => match gender {
            Gender::Male => &ACE_MALE,
            Gender::Female => &ACE_FEMALE,
        },
        CategoryStandard::Nih | CategoryStandard::Acsm => age_band
            .and_then(|label| {
                age_band_tables(standard)
                    .iter()
                    .find(|table| table.label == label.trim())
            })
            .map(|table| table.bands(gender))
            .unwrap_or(&[]),
    }
}

/// Every band of the selected table, flagging the one that holds `body_fat`
pub fn categorize(
    body_fat: f64,
    gender: Gender,
    standard: CategoryStandard,
    age_band: Option<&str>,
) -> Vec<CategoryMatch> {
    category_bands(standard, gender, age_band)
        .iter()
        .map(|band| CategoryMatch {
            band: *band,
            is_current: band.contains(body_fat),
        })
        .collect()
}

/// The band holding `body_fat`, if any
pub fn current_category(
    body_fat: f64,
    gender: Gender,
    standard: CategoryStandard,
    age_band: Option<&str>,
) -> Option<&'static CategoryBand> {
    category_bands(standard, gender, age_band)
        .iter()
        .find(|band| band.contains(body_fat))
}

/// Age band label of `standard` that covers `age_years`
///
/// ACE has no age bands and always yields `"all"`.
pub fn age_band_for(standard: CategoryStandard, age_years: f64) -> CalcResult<&'static str> {
    if standard == CategoryStandard::Ace {
        return Ok("all");
    }
    age_band_tables(standard)
        .iter()
        .find(|table| table.covers(age_years))
        .map(|table| table.label)
        .ok_or(CalculatorError::UnsupportedAgeBand {
            standard: standard.name(),
            age: age_years,
        })
}

/// Estimated weight at a band's body fat bounds with lean mass unchanged
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandWeightEstimate {
    pub label: &'static str,
    /// Weight at the band's lower body fat bound
    pub at_min: Mass,
    /// Weight at the upper bound; `None` for the open-ended band
    pub at_max: Option<Mass>,
}

pub fn weight_for_band(
    weight: f64,
    current_body_fat: f64,
    band: &CategoryBand,
    unit: UnitSystem,
) -> CalcResult<BandWeightEstimate> {
    validate_positive("weight", weight)?;
    validate_body_fat_percent(current_body_fat)?;

    let at = |percent: f64| Mass::new(weight_holding_lean_mass(weight, current_body_fat, percent), unit);
    Ok(BandWeightEstimate {
        label: band.label,
        at_min: at(band.min_percent),
        at_max: band.max_percent.filter(|max| *max < 100.0).map(at),
    })
}
