//! Command-line interface definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fitcalc_shared::{
    ActivityLevel, CategoryStandard, Gender, MaxHeartRateFormula, MeasurementUnit,
    OneRepMaxFormula, UnitSystem,
};

#[derive(Debug, Parser)]
#[command(
    name = "fitcalc",
    version,
    about = "Health and fitness calculators",
    long_about = "Health and fitness calculators. Measurements you pass are remembered, \
                  so later runs only need the values that changed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Switch the unit preference before running (converts remembered values)
    #[arg(long, short = 'u', global = true)]
    pub unit: Option<UnitSystem>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Do not read or write remembered values
    #[arg(long, global = true, env = "FITCALC_NO_STORE")]
    pub no_store: bool,

    /// Preference file override
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Body Mass Index with healthy weight range
    Bmi {
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
    },

    /// Basal metabolic rate and daily energy expenditure
    Bmr {
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        age: Option<f64>,
        #[arg(long)]
        gender: Option<Gender>,
        /// sedentary, light, moderate, very or extra
        #[arg(long)]
        activity: Option<ActivityLevel>,
    },

    /// One-rep max estimate with training loads
    OneRepMax {
        /// Weight lifted
        #[arg(long)]
        weight: Option<f64>,
        /// Repetitions performed
        #[arg(long)]
        reps: Option<u32>,
        /// brzycki, epley or lombardi
        #[arg(long)]
        formula: Option<OneRepMaxFormula>,
    },

    /// Maximum heart rate and training zones
    MaxHeartRate {
        #[arg(long)]
        age: Option<f64>,
        /// traditional or tanaka
        #[arg(long)]
        formula: Option<MaxHeartRateFormula>,
    },

    /// Navy Method body fat with composition analysis
    BodyFat {
        #[arg(long)]
        gender: Option<Gender>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        waist: Option<f64>,
        #[arg(long)]
        neck: Option<f64>,
        /// Required for women
        #[arg(long)]
        hip: Option<f64>,
        /// Body weight, for the composition split
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        age: Option<f64>,
        /// ace, nih or acsm
        #[arg(long)]
        standard: Option<CategoryStandard>,
    },

    /// Body fat category table
    Categories {
        #[arg(long)]
        body_fat: f64,
        #[arg(long)]
        gender: Option<Gender>,
        #[arg(long)]
        standard: Option<CategoryStandard>,
        /// Age band label, e.g. 20-39 (NIH) or 60+ (ACSM)
        #[arg(long, conflicts_with = "age")]
        age_band: Option<String>,
        /// Pick the age band from an age
        #[arg(long)]
        age: Option<f64>,
    },

    /// Frame size from wrist circumference
    BodyFrame {
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        wrist: f64,
        #[arg(long)]
        gender: Option<Gender>,
    },

    /// Chest-to-waist ratio
    ChestToWaist {
        #[arg(long)]
        chest: f64,
        #[arg(long)]
        waist: Option<f64>,
        #[arg(long)]
        gender: Option<Gender>,
    },

    /// Waist-to-hip ratio
    WaistToHip {
        #[arg(long)]
        waist: Option<f64>,
        #[arg(long)]
        hip: Option<f64>,
        #[arg(long)]
        gender: Option<Gender>,
    },

    /// Waist-to-height ratio
    WaistToHeight {
        #[arg(long)]
        waist: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
    },

    /// Convert between cm/inches or kg/lbs
    Convert {
        value: f64,
        /// cm, inches, kg or lbs
        from: MeasurementUnit,
    },

    /// List the available calculators
    List,

    /// Show or reset remembered values
    Prefs {
        #[command(subcommand)]
        action: PrefsCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PrefsCommand {
    /// Print remembered inputs and results
    Show,
    /// Change the unit preference, converting remembered values
    SetUnit { unit: UnitSystem },
    /// Forget everything
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_body_fat() {
        let cli = Cli::try_parse_from([
            "fitcalc", "body-fat", "--gender", "F", "--height", "165", "--waist", "75", "--neck",
            "32", "--hip", "100", "--standard", "nih", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::BodyFat { gender, hip, standard, weight, .. } => {
                assert_eq!(gender, Some(Gender::Female));
                assert_eq!(hip, Some(100.0));
                assert_eq!(standard, Some(CategoryStandard::Nih));
                assert_eq!(weight, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_legacy_unit_spelling() {
        let cli = Cli::try_parse_from(["fitcalc", "--unit", "inches", "list"]).unwrap();
        assert_eq!(cli.unit, Some(UnitSystem::Imperial));
    }

    #[test]
    fn test_rejects_unknown_formula() {
        assert!(Cli::try_parse_from(["fitcalc", "one-rep-max", "--formula", "wathan"]).is_err());
    }
}
