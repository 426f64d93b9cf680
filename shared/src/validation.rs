//! Input validation functions
//!
//! Custom validators for single measurements plus a bridge from the
//! `validator` crate's derive output into [`CalculatorError`].

use validator::{Validate, ValidationErrors};

use crate::errors::{CalcResult, CalculatorError};

/// Validate that a measurement is a finite, strictly positive number
pub fn validate_positive(field: &'static str, value: f64) -> CalcResult<()> {
    if value.is_nan() || value.is_infinite() {
        return Err(CalculatorError::invalid(field, "must be a valid number"));
    }
    if value <= 0.0 {
        return Err(CalculatorError::invalid(field, "must be greater than zero"));
    }
    Ok(())
}

/// Validate a body fat percentage for the lean-mass formulas (0 <= bf < 100)
pub fn validate_body_fat_percent(value: f64) -> CalcResult<()> {
    if value.is_nan() || value.is_infinite() {
        return Err(CalculatorError::invalid("body_fat", "must be a valid number"));
    }
    if !(0.0..100.0).contains(&value) {
        return Err(CalculatorError::invalid(
            "body_fat",
            "must be at least 0 and below 100",
        ));
    }
    Ok(())
}

/// Validate an age in years
pub fn validate_age(age_years: f64) -> CalcResult<()> {
    if age_years.is_nan() || age_years.is_infinite() {
        return Err(CalculatorError::invalid("age", "must be a valid number"));
    }
    if age_years < 0.0 {
        return Err(CalculatorError::invalid("age", "cannot be negative"));
    }
    Ok(())
}

/// Unwrap a required optional field
pub fn require(field: &'static str, value: Option<f64>) -> CalcResult<f64> {
    value.ok_or_else(|| CalculatorError::missing(field))
}

/// Map a field name to the label used in error messages
pub fn field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" => "Weight",
        "height" => "Height",
        "waist" => "Waist",
        "neck" => "Neck",
        "hip" => "Hip",
        "wrist" => "Wrist",
        "chest" => "Chest",
        "age" => "Age",
        "reps" => "Repetitions",
        "body_fat" => "Body Fat",
        _ => field_name,
    }
}

/// Run derive-based validation and report the first failing field
pub fn validate_input<T: Validate>(input: &T) -> CalcResult<()> {
    input.validate().map_err(first_error)
}

fn first_error(errors: ValidationErrors) -> CalculatorError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    match fields.first() {
        Some((field, errs)) => {
            let reason = errs
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "must be greater than zero".to_string());
            CalculatorError::invalid(static_field_name(field), reason)
        }
        None => CalculatorError::invalid("input", "validation failed"),
    }
}

/// `CalculatorError` carries `&'static str` field names; map back from the
/// derive output for the fields this crate validates
fn static_field_name(field: &str) -> &'static str {
    match field {
        "weight" => "weight",
        "height" => "height",
        "waist" => "waist",
        "neck" => "neck",
        "hip" => "hip",
        "wrist" => "wrist",
        "chest" => "chest",
        "age" => "age",
        _ => "input",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
        height: f64,
        #[validate(range(exclusive_min = 0.0, message = "must be greater than zero"))]
        neck: f64,
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("height", 180.0).is_ok());
        assert!(validate_positive("height", 0.0).is_err());
        assert!(validate_positive("height", -3.0).is_err());
        assert!(validate_positive("height", f64::NAN).is_err());
        assert!(validate_positive("height", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_body_fat_percent() {
        assert!(validate_body_fat_percent(0.0).is_ok());
        assert!(validate_body_fat_percent(99.9).is_ok());
        assert!(validate_body_fat_percent(100.0).is_err());
        assert!(validate_body_fat_percent(-0.1).is_err());
    }

    #[test]
    fn test_require() {
        assert_eq!(require("hip", Some(98.0)).unwrap(), 98.0);
        assert_eq!(require("hip", None).unwrap_err(), CalculatorError::missing("hip"));
    }

    #[test]
    fn test_validate_input_reports_field() {
        let ok = Sample { height: 180.0, neck: 38.0 };
        assert!(validate_input(&ok).is_ok());

        let bad = Sample { height: 180.0, neck: 0.0 };
        match validate_input(&bad) {
            Err(CalculatorError::InvalidMeasurement { field, reason }) => {
                assert_eq!(field, "neck");
                assert_eq!(reason, "must be greater than zero");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validation_message_uses_display_label() {
        let bad = Sample { height: -1.0, neck: 38.0 };
        let err = validate_input(&bad).unwrap_err();
        assert_eq!(err.to_string(), "Height: must be greater than zero");
        assert_eq!(field_display_label("unknown_field"), "unknown_field");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_positive_values_accepted(value in 0.001f64..1000.0) {
            prop_assert!(validate_positive("weight", value).is_ok());
        }

        #[test]
        fn prop_negative_values_rejected(value in -1000.0f64..=0.0) {
            prop_assert!(validate_positive("weight", value).is_err());
        }
    }
}
