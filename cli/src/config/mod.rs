//! FitCalc CLI settings
//!
//! Later layers override earlier ones:
//! 1. In-code defaults
//! 2. `config/{RUST_ENV}.toml`, if present
//! 3. `FITCALC__SECTION__KEY` environment variables

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use fitcalc_shared::{
    ActivityLevel, CategoryStandard, Gender, MaxHeartRateFormula, OneRepMaxFormula, UnitSystem,
};
use serde::{Deserialize, Serialize};

/// Settings for one CLI run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values used when neither a flag nor a remembered value is available
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub unit_system: UnitSystem,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub heart_rate_formula: MaxHeartRateFormula,
    pub one_rep_max_formula: OneRepMaxFormula,
    pub category_standard: CategoryStandard,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            unit_system: UnitSystem::Metric,
            gender: Gender::Male,
            activity_level: ActivityLevel::Sedentary,
            heart_rate_formula: MaxHeartRateFormula::Traditional,
            one_rep_max_formula: OneRepMaxFormula::Brzycki,
            category_standard: CategoryStandard::Ace,
        }
    }
}

/// Last-used value storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub enabled: bool,
    /// Defaults to `fitcalc/preferences.json` under the local data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl StorageConfig {
    /// Storage file location, `None` when no data directory can be found
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            dirs::data_local_dir().map(|dir| dir.join("fitcalc").join("preferences.json"))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: if AppConfig::is_production() {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
            filter: "fitcalc=warn".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build the layered configuration for the current `RUST_ENV`
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (FITCALC__ prefix)
            // e.g., FITCALC__DEFAULTS__UNIT_SYSTEM=imperial sets defaults.unit_system
            .add_source(config::Environment::with_prefix("FITCALC").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
