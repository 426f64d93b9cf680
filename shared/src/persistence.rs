//! Last-used value persistence
//!
//! Calculators remember their inputs, results and the shared unit
//! preference under fixed `fitCalc.*` keys. Values are stored as JSON text so
//! every backend (browser `localStorage`, a file, memory) sees the same
//! format.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::errors::StorageError;
use crate::units::UnitSystem;

/// Storage keys
pub mod keys {
    pub const UNIT_PREFERENCE: &str = "fitCalc.unitPreference";
    pub const GENDER: &str = "fitCalc.gender";
    pub const HEIGHT: &str = "fitCalc.height";
    pub const WEIGHT: &str = "fitCalc.weight";

    pub const BMI_RESULT: &str = "fitCalc.bmiResult";

    pub const NECK: &str = "fitCalc.neck";
    pub const WAIST: &str = "fitCalc.waist";
    pub const HIP: &str = "fitCalc.hip";
    pub const BODY_FAT_RESULT: &str = "fitCalc.bodyFatResult";

    pub const AGE: &str = "fitCalc.age";
    pub const ACTIVITY_LEVEL: &str = "fitCalc.activityLevel";
    pub const BMR_RESULT: &str = "fitCalc.bmrResult";

    pub const LIFTING_WEIGHT: &str = "fitCalc.liftingWeight";
    pub const REPS: &str = "fitCalc.reps";
    pub const FORMULA: &str = "fitCalc.formula";
    pub const ONE_REP_MAX_RESULT: &str = "fitCalc.oneRepMaxResult";

    /// Set once saved values have been re-expressed after a unit switch
    pub const UNIT_CONVERSION_DONE: &str = "fitCalc.unitConversionDone";

    pub const ALL: [&str; 17] = [
        UNIT_PREFERENCE,
        GENDER,
        HEIGHT,
        WEIGHT,
        BMI_RESULT,
        NECK,
        WAIST,
        HIP,
        BODY_FAT_RESULT,
        AGE,
        ACTIVITY_LEVEL,
        BMR_RESULT,
        LIFTING_WEIGHT,
        REPS,
        FORMULA,
        ONE_REP_MAX_RESULT,
        UNIT_CONVERSION_DONE,
    ];
}

/// A string key/value backend
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Typed JSON access over a [`KeyValueStore`]
#[derive(Debug, Clone, Default)]
pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Serialize `value` as JSON under `key`
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.store.set_item(key, &json)
    }

    /// Read `key`, returning `default` when absent or unreadable
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!(key, error = %e, "Falling back to default for stored value");
                default
            }
        }
    }

    /// Read `key`; `Ok(None)` when absent
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.store.get_item(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.store.remove_item(key)
    }

    /// Remove every `fitCalc.*` key
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        for key in keys::ALL {
            self.store.remove_item(key)?;
        }
        Ok(())
    }

    /// Shared unit preference, accepting the legacy `"cm"`/`"inches"` spellings
    pub fn unit_system(&self) -> UnitSystem {
        let stored: Option<String> = self.load(keys::UNIT_PREFERENCE, None);
        stored
            .and_then(|s| {
                s.parse()
                    .map_err(|e: String| warn!(value = %s, error = %e, "Ignoring stored unit preference"))
                    .ok()
            })
            .unwrap_or_default()
    }

    pub fn set_unit_system(&mut self, unit: UnitSystem) -> Result<(), StorageError> {
        self.save(keys::UNIT_PREFERENCE, unit.as_str())
    }

    /// Store a new unit preference and flag whether saved values were converted
    ///
    /// Returns `true` when the preference actually changed.
    pub fn switch_unit_system(&mut self, unit: UnitSystem) -> Result<bool, StorageError> {
        let changed = self.unit_system() != unit;
        self.set_unit_system(unit)?;
        self.save(keys::UNIT_CONVERSION_DONE, &changed)?;
        Ok(changed)
    }
}
