//! End-to-end runs against a preference file on disk

use std::path::PathBuf;

use clap::Parser;
use fitcalc_cli::cli::Cli;
use fitcalc_cli::commands::{execute, Output};
use fitcalc_cli::config::DefaultsConfig;
use fitcalc_cli::error::{CliError, CliResult};
use fitcalc_cli::storage::FileStore;
use fitcalc_shared::{Session, UnitSystem};
use rstest::rstest;

struct TempStore {
    path: PathBuf,
}

impl TempStore {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir()
            .join(format!("fitcalc-it-{}-{}", std::process::id(), name))
            .join("preferences.json");
        Self { path }
    }

    /// Parse `args` and run them in a fresh session over the file, like one process would
    fn run(&self, args: &[&str]) -> CliResult<Output> {
        let cli = Cli::try_parse_from(std::iter::once("fitcalc").chain(args.iter().copied()))
            .expect("arguments should parse");
        let mut session = Session::new(FileStore::open(&self.path)?);
        session.ensure_unit_system(UnitSystem::Metric)?;
        if let Some(unit) = cli.unit {
            session.set_unit_system(unit)?;
        }
        execute(&cli.command, &mut session, &DefaultsConfig::default())
    }
}

impl Drop for TempStore {
    fn drop(&mut self) {
        if let Some(dir) = self.path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

#[test]
fn test_values_are_remembered_between_runs() {
    let store = TempStore::new("remember");
    store
        .run(&["bmi", "--weight", "80", "--height", "180"])
        .unwrap();

    // Height and weight come from the file
    let output = store
        .run(&["body-fat", "--gender", "M", "--waist", "85", "--neck", "38", "--age", "30"])
        .unwrap();
    assert_eq!(output.json["body_fat_percent"], 16.1);

    let prefs = store.run(&["prefs", "show"]).unwrap();
    assert_eq!(prefs.json["height"], 180.0);
    assert_eq!(prefs.json["bmi_result"], 24.69);
    assert_eq!(prefs.json["body_fat_result"], 16.1);
}

#[test]
fn test_unit_flag_converts_stored_measurements() {
    let store = TempStore::new("units");
    store
        .run(&["bmi", "--weight", "80", "--height", "180"])
        .unwrap();

    let output = store.run(&["--unit", "imperial", "prefs", "show"]).unwrap();
    assert_eq!(output.json["unit_system"], "imperial");
    assert_eq!(output.json["height"], 70.9);
    assert_eq!(output.json["weight"], 176.4);

    // The preference sticks without the flag
    let bmi = store.run(&["bmi"]).unwrap();
    assert!(bmi.text.contains("lbs"));
}

#[test]
fn test_clear_forgets_everything() {
    let store = TempStore::new("clear");
    store
        .run(&["one-rep-max", "--weight", "100", "--reps", "5"])
        .unwrap();
    store.run(&["prefs", "clear"]).unwrap();

    let err = store.run(&["one-rep-max"]).unwrap_err();
    assert!(matches!(err, CliError::MissingValue("weight")));
}

#[rstest]
#[case(&["waist-to-height", "--waist", "0", "--height", "170"], 65, "INVALID_MEASUREMENT")]
#[case(&["max-heart-rate"], 64, "MISSING_VALUE")]
#[case(&["categories", "--body-fat", "20", "--standard", "nih", "--age", "85"], 65, "UNSUPPORTED_AGE_BAND")]
fn test_errors_map_to_exit_codes(
    #[case] args: &[&str],
    #[case] exit_code: u8,
    #[case] code: &str,
) {
    let store = TempStore::new(&format!("error-{}", code.to_lowercase()));
    let err = store.run(args).unwrap_err();
    assert_eq!(err.exit_code(), exit_code);
    assert_eq!(err.to_response().error.code, code);
}
