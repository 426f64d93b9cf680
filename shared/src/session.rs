//! Calculator session over a persistent store
//!
//! Runs calculators in the stored unit preference and remembers the inputs
//! and results under the shared `fitCalc.*` keys, so a later run (or a
//! different calculator) can start from the last-used values.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::body_fat::BodyFatInput;
use crate::categories::CategoryStandard;
use crate::errors::{CalcResult, StorageError};
use crate::health_metrics::{
    calculate_bmi_result, calculate_tdee, ActivityLevel, BmiResult, Gender, TdeeResult,
};
use crate::persistence::{keys, KeyValueStore, Preferences};
use crate::strength::{one_rep_max, OneRepMaxFormula};
use crate::types::{body_fat_report, BodyFatReport};
use crate::units::{convert_length, convert_weight, UnitSystem};

/// Stored keys holding a length in the preferred unit
const LENGTH_KEYS: [&str; 4] = [keys::HEIGHT, keys::NECK, keys::WAIST, keys::HIP];

/// Stored keys holding a weight in the preferred unit
const WEIGHT_KEYS: [&str; 2] = [keys::WEIGHT, keys::LIFTING_WEIGHT];

/// Everything a session has remembered
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SavedState {
    pub unit_system: UnitSystem,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub neck: Option<f64>,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
    pub age: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub lifting_weight: Option<f64>,
    pub reps: Option<u32>,
    pub formula: Option<OneRepMaxFormula>,
    pub bmi_result: Option<f64>,
    pub body_fat_result: Option<f64>,
    pub bmr_result: Option<f64>,
    pub one_rep_max_result: Option<f64>,
}

pub struct Session<S> {
    prefs: Preferences<S>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self {
            prefs: Preferences::new(store),
        }
    }

    pub fn preferences(&self) -> &Preferences<S> {
        &self.prefs
    }

    pub fn into_inner(self) -> S {
        self.prefs.into_inner()
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.prefs.unit_system()
    }

    /// Record `default` as the unit preference when none is stored yet
    pub fn ensure_unit_system(&mut self, default: UnitSystem) -> Result<UnitSystem, StorageError> {
        match self.prefs.try_load::<String>(keys::UNIT_PREFERENCE) {
            Ok(Some(_)) => Ok(self.unit_system()),
            _ => {
                self.prefs.set_unit_system(default)?;
                Ok(default)
            }
        }
    }

    /// Switch the unit preference, re-expressing saved measurements
    ///
    /// Returns `true` when the preference changed.
    pub fn set_unit_system(&mut self, unit: UnitSystem) -> Result<bool, StorageError> {
        let current = self.unit_system();
        if current != unit {
            for key in LENGTH_KEYS {
                if let Some(value) = self.prefs.load::<Option<f64>>(key, None) {
                    self.prefs.save(key, &convert_length(value, current))?;
                }
            }
            for key in WEIGHT_KEYS {
                if let Some(value) = self.prefs.load::<Option<f64>>(key, None) {
                    self.prefs.save(key, &convert_weight(value, current))?;
                }
            }
            debug!(from = %current, to = %unit, "Converted saved measurements");
        }
        self.prefs.switch_unit_system(unit)
    }

    pub fn saved(&self) -> SavedState {
        SavedState {
            unit_system: self.unit_system(),
            gender: self.load(keys::GENDER),
            height: self.load(keys::HEIGHT),
            weight: self.load(keys::WEIGHT),
            neck: self.load(keys::NECK),
            waist: self.load(keys::WAIST),
            hip: self.load(keys::HIP),
            age: self.load(keys::AGE),
            activity_level: self.load(keys::ACTIVITY_LEVEL),
            lifting_weight: self.load(keys::LIFTING_WEIGHT),
            reps: self.load(keys::REPS),
            formula: self.load(keys::FORMULA),
            bmi_result: self.load(keys::BMI_RESULT),
            body_fat_result: self.load(keys::BODY_FAT_RESULT),
            bmr_result: self.load(keys::BMR_RESULT),
            one_rep_max_result: self.load(keys::ONE_REP_MAX_RESULT),
        }
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.prefs.clear_all()
    }

    pub fn bmi(&mut self, weight: f64, height: f64) -> CalcResult<BmiResult> {
        let result = calculate_bmi_result(weight, height, self.unit_system())?;
        self.remember(keys::WEIGHT, &weight);
        self.remember(keys::HEIGHT, &height);
        self.remember(keys::BMI_RESULT, &result.value);
        Ok(result)
    }

    pub fn bmr(
        &mut self,
        weight: f64,
        height: f64,
        age_years: f64,
        gender: Gender,
        activity_level: ActivityLevel,
    ) -> CalcResult<TdeeResult> {
        let unit = self.unit_system();
        let result = calculate_tdee(weight, height, age_years, gender, activity_level, unit)?;
        self.remember(keys::WEIGHT, &weight);
        self.remember(keys::HEIGHT, &height);
        self.remember(keys::AGE, &age_years);
        self.remember(keys::GENDER, &gender);
        self.remember(keys::ACTIVITY_LEVEL, &activity_level);
        self.remember(keys::BMR_RESULT, &result.bmr);
        Ok(result)
    }

    /// One-rep max; the lifted weight is kept apart from body weight
    pub fn one_rep_max(&mut self, weight: f64, reps: u32, formula: OneRepMaxFormula) -> CalcResult<f64> {
        let result = one_rep_max(weight, reps, formula)?;
        self.remember(keys::LIFTING_WEIGHT, &weight);
        self.remember(keys::REPS, &reps);
        self.remember(keys::FORMULA, &formula);
        self.remember(keys::ONE_REP_MAX_RESULT, &result);
        Ok(result)
    }

    /// Full body fat report; `input` is re-expressed in the preferred unit first
    pub fn body_fat(
        &mut self,
        input: &BodyFatInput,
        weight: f64,
        age_years: f64,
        standard: CategoryStandard,
    ) -> CalcResult<BodyFatReport> {
        let unit = self.unit_system();
        let weight = if input.unit_system == unit {
            weight
        } else {
            convert_weight(weight, input.unit_system)
        };
        let input = input.to_unit_system(unit);
        let report = body_fat_report(&input, weight, age_years, standard)?;

        self.remember(keys::GENDER, &input.gender);
        self.remember(keys::HEIGHT, &input.height);
        self.remember(keys::WAIST, &input.waist);
        self.remember(keys::NECK, &input.neck);
        if let Some(hip) = input.hip {
            self.remember(keys::HIP, &hip);
        }
        self.remember(keys::WEIGHT, &weight);
        self.remember(keys::AGE, &age_years);
        self.remember(keys::BODY_FAT_RESULT, &report.body_fat_percent);
        Ok(report)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.prefs.load(key, None)
    }

    /// Save errors never fail a calculation
    fn remember<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        if let Err(e) = self.prefs.save(key, value) {
            warn!(key, error = %e, "Failed to save calculator value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_bmi_remembers_inputs() {
        let mut session = Session::new(MemoryStore::new());
        let result = session.bmi(70.0, 175.0).unwrap();
        assert_eq!(result.value, 22.86);

        let saved = session.saved();
        assert_eq!(saved.weight, Some(70.0));
        assert_eq!(saved.height, Some(175.0));
        assert_eq!(saved.bmi_result, Some(22.86));
        assert_eq!(saved.body_fat_result, None);
    }

    #[test]
    fn test_ensure_unit_system_keeps_stored_preference() {
        let mut session = Session::new(MemoryStore::new());
        assert_eq!(session.ensure_unit_system(UnitSystem::Imperial).unwrap(), UnitSystem::Imperial);
        assert_eq!(session.ensure_unit_system(UnitSystem::Metric).unwrap(), UnitSystem::Imperial);
    }

    #[test]
    fn test_failed_calculation_saves_nothing() {
        let mut session = Session::new(MemoryStore::new());
        assert!(session.bmi(0.0, 175.0).is_err());
        assert!(session.into_inner().is_empty());
    }

    #[test]
    fn test_one_rep_max_uses_own_weight_key() {
        let mut session = Session::new(MemoryStore::new());
        session.bmi(80.0, 180.0).unwrap();
        session.one_rep_max(100.0, 5, OneRepMaxFormula::Epley).unwrap();

        let saved = session.saved();
        assert_eq!(saved.weight, Some(80.0));
        assert_eq!(saved.lifting_weight, Some(100.0));
        assert_eq!(saved.reps, Some(5));
        assert_eq!(saved.formula, Some(OneRepMaxFormula::Epley));
        assert_eq!(saved.one_rep_max_result, Some(116.65));
    }

    #[test]
    fn test_switching_units_converts_saved_values() {
        let mut session = Session::new(MemoryStore::new());
        session.bmi(80.0, 180.0).unwrap();

        assert!(session.set_unit_system(UnitSystem::Imperial).unwrap());
        let saved = session.saved();
        assert_eq!(saved.unit_system, UnitSystem::Imperial);
        assert_eq!(saved.height, Some(70.9));
        assert_eq!(saved.weight, Some(176.4));
        assert!(session.preferences().load(keys::UNIT_CONVERSION_DONE, false));

        // Same unit again leaves values alone
        assert!(!session.set_unit_system(UnitSystem::Imperial).unwrap());
        assert_eq!(session.saved().height, Some(70.9));
    }

    #[test]
    fn test_body_fat_converts_input_to_preferred_unit() {
        let mut session = Session::new(MemoryStore::new());
        let input = BodyFatInput::male(180.0, 85.0, 38.0, UnitSystem::Metric);
        let report = session.body_fat(&input, 80.0, 30.0, CategoryStandard::Ace).unwrap();
        assert_eq!(report.body_fat_percent, 16.1);
        assert_eq!(session.saved().body_fat_result, Some(16.1));
        assert_eq!(session.saved().gender, Some(Gender::Male));

        session.set_unit_system(UnitSystem::Imperial).unwrap();
        let report = session.body_fat(&input, 80.0, 30.0, CategoryStandard::Ace).unwrap();
        assert_eq!(report.unit_system, UnitSystem::Imperial);
        assert_eq!(session.saved().height, Some(70.9));
        assert_eq!(session.saved().weight, Some(176.4));
    }
}
