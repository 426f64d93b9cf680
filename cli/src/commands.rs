//! Command execution
//!
//! Each command resolves its inputs (flag, then remembered value, then
//! configured default), runs the calculator through the session and renders
//! both a text and a JSON form of the result.

use std::fmt::Write as _;

use fitcalc_shared::{
    age_band_for, body_frame, calculator_catalog, categorize, chest_to_waist, convert_measurement,
    heart_rate_zones, max_heart_rate, training_loads, waist_to_height, waist_to_hip, BodyFatInput,
    BandWeightEstimate, CategoryMatch, Gender, KeyValueStore, Measurement, Session,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::cli::{Command, PrefsCommand};
use crate::config::DefaultsConfig;
use crate::error::{CliError, CliResult};

/// Rendered command output
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub text: String,
    pub json: Value,
}

impl Output {
    fn new<T: Serialize>(text: String, value: &T) -> CliResult<Self> {
        Ok(Self {
            text,
            json: serde_json::to_value(value)?,
        })
    }
}

fn resolve(field: &'static str, flag: Option<f64>, saved: Option<f64>) -> CliResult<f64> {
    flag.or(saved).ok_or(CliError::MissingValue(field))
}

fn render_categories(out: &mut String, matches: &[CategoryMatch]) {
    for m in matches {
        let marker = if m.is_current { "→" } else { " " };
        let _ = writeln!(out, "  {} {:<14} {}", marker, m.band.label, m.band.range_label());
    }
}

/// Category table with the weight each band implies at the current lean mass
fn render_band_weights(out: &mut String, matches: &[CategoryMatch], weights: &[BandWeightEstimate]) {
    for (m, w) in matches.iter().zip(weights) {
        let marker = if m.is_current { "→" } else { " " };
        let weight = match w.at_max {
            Some(max) => format!("{:.1} - {}", w.at_min.value, max),
            None => format!("{}+", w.at_min),
        };
        let _ = writeln!(
            out,
            "  {} {:<14} {:<8} {}",
            marker,
            m.band.label,
            m.band.range_label(),
            weight
        );
    }
}

/// Run one command against a session
pub fn execute<S: KeyValueStore>(
    command: &Command,
    session: &mut Session<S>,
    defaults: &DefaultsConfig,
) -> CliResult<Output> {
    let saved = session.saved();
    let unit = saved.unit_system;
    let mass = unit.weight_unit();
    debug!(?command, %unit, "Executing command");

    match command {
        Command::Bmi { weight, height } => {
            let weight = resolve("weight", *weight, saved.weight)?;
            let height = resolve("height", *height, saved.height)?;
            let result = session.bmi(weight, height)?;
            let (low, high) = result.healthy_weight_range;
            let text = format!(
                "BMI: {:.2} ({})\nHealthy weight range: {} - {} {}",
                result.value,
                result.category.label(),
                low,
                high,
                mass
            );
            Output::new(text, &result)
        }

        Command::Bmr {
            weight,
            height,
            age,
            gender,
            activity,
        } => {
            let weight = resolve("weight", *weight, saved.weight)?;
            let height = resolve("height", *height, saved.height)?;
            let age = resolve("age", *age, saved.age)?;
            let gender = gender.or(saved.gender).unwrap_or(defaults.gender);
            let activity = activity
                .or(saved.activity_level)
                .unwrap_or(defaults.activity_level);
            let result = session.bmr(weight, height, age, gender, activity)?;
            let text = format!(
                "BMR: {:.0} kcal/day\nTDEE: {:.0} kcal/day ({})",
                result.bmr,
                result.tdee,
                activity.description()
            );
            Output::new(text, &result)
        }

        Command::OneRepMax {
            weight,
            reps,
            formula,
        } => {
            let weight = resolve("weight", *weight, saved.lifting_weight)?;
            let reps = reps.or(saved.reps).ok_or(CliError::MissingValue("reps"))?;
            let formula = formula
                .or(saved.formula)
                .unwrap_or(defaults.one_rep_max_formula);
            let orm = session.one_rep_max(weight, reps, formula)?;
            let loads = training_loads(orm);

            let mut text = format!("One-rep max: {:.2} {} ({})\n", orm, mass, formula.equation());
            for load in &loads {
                let _ = writeln!(
                    text,
                    "  {:>3}%  {:>7.1} {}  {:>5} reps  {}",
                    load.percent, load.weight, mass, load.reps, load.goal
                );
            }
            Output::new(
                text.trim_end().to_string(),
                &json!({ "one_rep_max": orm, "formula": formula, "training_loads": loads }),
            )
        }

        Command::MaxHeartRate { age, formula } => {
            let age = resolve("age", *age, saved.age)?;
            let formula = formula.unwrap_or(defaults.heart_rate_formula);
            let mhr = max_heart_rate(age, formula)?;
            let zones = heart_rate_zones(mhr);

            let mut text = format!("Max heart rate: {} bpm ({})\n", mhr, formula);
            for zone in &zones {
                let _ = writeln!(
                    text,
                    "  {:<20} {:>3}-{:<3} bpm  {}",
                    zone.name, zone.min, zone.max, zone.description
                );
            }
            Output::new(
                text.trim_end().to_string(),
                &json!({ "max_heart_rate": mhr, "formula": formula, "zones": zones }),
            )
        }

        Command::BodyFat {
            gender,
            height,
            waist,
            neck,
            hip,
            weight,
            age,
            standard,
        } => {
            let gender = gender.or(saved.gender).unwrap_or(defaults.gender);
            let hip = match gender {
                Gender::Female => Some(resolve("hip", *hip, saved.hip)?),
                Gender::Male => None,
            };
            let input = BodyFatInput {
                gender,
                height: resolve("height", *height, saved.height)?,
                waist: resolve("waist", *waist, saved.waist)?,
                neck: resolve("neck", *neck, saved.neck)?,
                hip,
                unit_system: unit,
            };
            let weight = resolve("weight", *weight, saved.weight)?;
            let age = resolve("age", *age, saved.age)?;
            let standard = standard.unwrap_or(defaults.category_standard);
            let report = session.body_fat(&input, weight, age, standard)?;

            let mut text = String::new();
            let _ = writeln!(text, "Body fat (Navy): {:.1}%", report.body_fat_percent);
            let _ = writeln!(text, "Body fat (BMI-based): {:.1}%", report.bmi_based_body_fat);
            let _ = writeln!(text, "Fat mass: {}", report.composition.fat_mass);
            let _ = writeln!(text, "Lean mass: {}", report.composition.lean_mass);
            let _ = writeln!(text, "Ideal body fat for age {}: {:.1}%", age, report.ideal_body_fat);
            let _ = writeln!(text, "Fat to lose: {}", report.fat_to_lose);
            let _ = writeln!(text, "Ideal weight at ideal body fat: {}", report.ideal_weight_by_fat);
            let _ = writeln!(text, "Healthy weight range: {}", report.ideal_weight_range);
            let _ = writeln!(
                text,
                "Reference weight at {:.1}% body fat: {}",
                report.body_fat_percent, report.weight_at_current_body_fat
            );
            match report.age_band {
                Some(band) => {
                    let _ = writeln!(text, "{} categories ({}):", standard, band);
                }
                None => {
                    let _ = writeln!(text, "{} categories:", standard);
                }
            }
            if report.categories.is_empty() {
                let _ = writeln!(text, "  no {} table covers age {}", standard, age);
            }
            render_band_weights(&mut text, &report.categories, &report.band_weights);
            Output::new(text.trim_end().to_string(), &report)
        }

        Command::Categories {
            body_fat,
            gender,
            standard,
            age_band,
            age,
        } => {
            let gender = gender.or(saved.gender).unwrap_or(defaults.gender);
            let standard = standard.unwrap_or(defaults.category_standard);
            let band = match (age_band, age) {
                (Some(label), _) => Some(label.clone()),
                (None, Some(age)) => Some(age_band_for(standard, *age)?.to_string()),
                (None, None) => None,
            };
            let matches = categorize(*body_fat, gender, standard, band.as_deref());

            let mut text = format!(
                "{} categories for {} ({}):\n",
                standard,
                gender,
                band.as_deref().unwrap_or("all ages")
            );
            if matches.is_empty() {
                let _ = writeln!(
                    text,
                    "  no {} table for this age band; choose one of {}",
                    standard,
                    standard.age_bands().join(", ")
                );
            }
            render_categories(&mut text, &matches);
            Output::new(text.trim_end().to_string(), &matches)
        }

        Command::BodyFrame {
            height,
            wrist,
            gender,
        } => {
            let height = resolve("height", *height, saved.height)?;
            let gender = gender.or(saved.gender).unwrap_or(defaults.gender);
            let frame = body_frame(height, *wrist, gender)?;
            Output::new(format!("Body frame: {}", frame), &json!({ "frame": frame }))
        }

        Command::ChestToWaist {
            chest,
            waist,
            gender,
        } => {
            let waist = resolve("waist", *waist, saved.waist)?;
            let gender = gender.or(saved.gender).unwrap_or(defaults.gender);
            let result = chest_to_waist(*chest, waist, gender)?;
            Output::new(
                format!("Chest-to-waist ratio: {:.2} ({})", result.ratio, result.category),
                &result,
            )
        }

        Command::WaistToHip { waist, hip, gender } => {
            let waist = resolve("waist", *waist, saved.waist)?;
            let hip = resolve("hip", *hip, saved.hip)?;
            let gender = gender.or(saved.gender).unwrap_or(defaults.gender);
            let result = waist_to_hip(waist, hip, gender)?;
            Output::new(
                format!("Waist-to-hip ratio: {:.2} ({})", result.ratio, result.category),
                &result,
            )
        }

        Command::WaistToHeight { waist, height } => {
            let waist = resolve("waist", *waist, saved.waist)?;
            let height = resolve("height", *height, saved.height)?;
            let result = waist_to_height(waist, height)?;
            Output::new(
                format!("Waist-to-height ratio: {:.2} ({})", result.ratio, result.category),
                &result,
            )
        }

        Command::Convert { value, from } => {
            let converted = Measurement::new(convert_measurement(*value, *from), from.counterpart());
            let original = Measurement::new(*value, *from);
            Output::new(
                format!("{} = {}", original, converted),
                &json!({ "from": original, "to": converted }),
            )
        }

        Command::List => {
            let catalog = calculator_catalog();
            let mut text = String::new();
            for calc in &catalog {
                let _ = writeln!(text, "{:<6} {:<20} {}", calc.id, calc.name, calc.category.as_str());
            }
            Output::new(text.trim_end().to_string(), &catalog)
        }

        Command::Prefs { action } => match action {
            PrefsCommand::Show => {
                let json = serde_json::to_string_pretty(&saved)?;
                Output::new(json, &saved)
            }
            PrefsCommand::SetUnit { unit: target } => {
                let converted = session.set_unit_system(*target)?;
                info!(unit = %target, converted, "Unit preference updated");
                Output::new(
                    format!(
                        "Unit preference: {} ({} / {})",
                        target,
                        target.length_unit(),
                        target.weight_unit()
                    ),
                    &json!({ "unit_system": target, "converted": converted }),
                )
            }
            PrefsCommand::Clear => {
                session.clear()?;
                Output::new("Remembered values cleared".to_string(), &json!({ "cleared": true }))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitcalc_shared::{ActivityLevel, CategoryStandard, MemoryStore, UnitSystem};

    fn session() -> Session<MemoryStore> {
        Session::new(MemoryStore::new())
    }

    fn run(command: Command, session: &mut Session<MemoryStore>) -> CliResult<Output> {
        execute(&command, session, &DefaultsConfig::default())
    }

    #[test]
    fn test_bmi_then_reuse_remembered_values() {
        let mut session = session();
        let first = run(
            Command::Bmi {
                weight: Some(70.0),
                height: Some(175.0),
            },
            &mut session,
        )
        .unwrap();
        assert_eq!(first.text, "BMI: 22.86 (Normal weight)\nHealthy weight range: 57 - 77 kg");

        // Second run needs no flags
        let second = run(Command::Bmi { weight: None, height: None }, &mut session).unwrap();
        assert_eq!(second.json["value"], 22.86);
    }

    #[test]
    fn test_missing_value_is_reported() {
        let mut session = session();
        let err = run(Command::Bmi { weight: Some(70.0), height: None }, &mut session).unwrap_err();
        assert!(matches!(err, CliError::MissingValue("height")));
    }

    #[test]
    fn test_body_fat_report_output() {
        let mut session = session();
        let output = run(
            Command::BodyFat {
                gender: Some(Gender::Male),
                height: Some(180.0),
                waist: Some(85.0),
                neck: Some(38.0),
                hip: None,
                weight: Some(80.0),
                age: Some(30.0),
                standard: Some(CategoryStandard::Nih),
            },
            &mut session,
        )
        .unwrap();

        assert_eq!(output.json["body_fat_percent"], 16.1);
        assert!(output.text.starts_with("Body fat (Navy): 16.1%"));
        assert!(output.text.contains("NIH categories (20-39):"));
        assert!(output.text.contains("→ Healthy"));
        assert!(output.text.contains("Reference weight at 16.1% body fat: 86.9 kg"));
        assert!(output.text.contains("73.0 - 85.0 kg"));
        assert_eq!(output.json["band_weights"][1]["label"], "Healthy");
    }

    #[test]
    fn test_body_fat_female_requires_hip() {
        let mut session = session();
        let err = run(
            Command::BodyFat {
                gender: Some(Gender::Female),
                height: Some(165.0),
                waist: Some(75.0),
                neck: Some(32.0),
                hip: None,
                weight: Some(60.0),
                age: Some(30.0),
                standard: None,
            },
            &mut session,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::MissingValue("hip")));
    }

    #[test]
    fn test_invalid_measurement_propagates() {
        let mut session = session();
        let err = run(
            Command::WaistToHeight {
                waist: Some(80.0),
                height: Some(0.0),
            },
            &mut session,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 65);
    }

    #[test]
    fn test_bmr_uses_configured_activity_default() {
        let mut session = session();
        let output = run(
            Command::Bmr {
                weight: Some(80.0),
                height: Some(180.0),
                age: Some(30.0),
                gender: Some(Gender::Male),
                activity: None,
            },
            &mut session,
        )
        .unwrap();
        // 800 + 1125 - 150 + 5
        let bmr = output.json["bmr"].as_f64().unwrap();
        assert!((bmr - 1780.0).abs() < 1e-6);
        assert_eq!(output.json["activity_level"], "sedentary");
        assert_eq!(session.saved().activity_level, Some(ActivityLevel::Sedentary));
    }

    #[test]
    fn test_categories_from_age() {
        let mut session = session();
        let output = run(
            Command::Categories {
                body_fat: 18.2,
                gender: Some(Gender::Male),
                standard: Some(CategoryStandard::Acsm),
                age_band: None,
                age: Some(35.0),
            },
            &mut session,
        )
        .unwrap();
        assert_eq!(output.json[2]["label"], "Good");
        assert_eq!(output.json[2]["is_current"], true);

        let err = run(
            Command::Categories {
                body_fat: 18.2,
                gender: Some(Gender::Male),
                standard: Some(CategoryStandard::Nih),
                age_band: None,
                age: Some(85.0),
            },
            &mut session,
        )
        .unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_AGE_BAND");
    }

    #[test]
    fn test_unknown_age_band_lists_choices() {
        let mut session = session();
        let output = run(
            Command::Categories {
                body_fat: 18.2,
                gender: Some(Gender::Female),
                standard: Some(CategoryStandard::Nih),
                age_band: Some("80-99".to_string()),
                age: None,
            },
            &mut session,
        )
        .unwrap();
        assert_eq!(output.json, serde_json::json!([]));
        assert!(output.text.contains("choose one of 20-39, 40-59, 60-79"));
    }

    #[test]
    fn test_convert() {
        let mut session = session();
        let output = run(
            Command::Convert {
                value: 180.0,
                from: "cm".parse().unwrap(),
            },
            &mut session,
        )
        .unwrap();
        assert_eq!(output.text, "180.0 cm = 70.9 inches");
    }

    #[test]
    fn test_set_unit_converts_remembered_values() {
        let mut session = session();
        run(Command::Bmi { weight: Some(80.0), height: Some(180.0) }, &mut session).unwrap();
        let output = run(
            Command::Prefs {
                action: PrefsCommand::SetUnit {
                    unit: UnitSystem::Imperial,
                },
            },
            &mut session,
        )
        .unwrap();
        assert_eq!(output.json["converted"], true);
        assert_eq!(session.saved().height, Some(70.9));

        run(Command::Prefs { action: PrefsCommand::Clear }, &mut session).unwrap();
        assert_eq!(session.saved().height, None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            /// A flag always wins over the remembered value
            #[test]
            fn prop_flag_overrides_saved(flag in 1.0f64..300.0, saved in proptest::option::of(1.0f64..300.0)) {
                prop_assert_eq!(resolve("height", Some(flag), saved).unwrap(), flag);
            }

            /// Remembered weight and height are reused when flags are omitted
            #[test]
            fn prop_bmi_reuses_remembered_inputs(weight in 40.0f64..150.0, height in 140.0f64..210.0) {
                let mut session = session();
                let first = run(Command::Bmi { weight: Some(weight), height: Some(height) }, &mut session).unwrap();
                let second = run(Command::Bmi { weight: None, height: None }, &mut session).unwrap();
                prop_assert_eq!(first, second);
            }
        }
    }
}
