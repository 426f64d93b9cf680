//! Body proportion ratios
//!
//! Frame size from wrist circumference plus chest-to-waist, waist-to-hip and
//! waist-to-height ratios. Every ratio divides two lengths in the same unit,
//! so all of these are unit-independent.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CalcResult;
use crate::health_metrics::Gender;
use crate::units::round_to;
use crate::validation::validate_positive;

/// A rounded ratio with its category label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioResult {
    pub ratio: f64,
    pub category: &'static str,
}

fn rounded_ratio(
    (numerator_field, numerator): (&'static str, f64),
    (denominator_field, denominator): (&'static str, f64),
) -> CalcResult<f64> {
    validate_positive(numerator_field, numerator)?;
    validate_positive(denominator_field, denominator)?;
    Ok(round_to(numerator / denominator, 2))
}

// ============================================================================
// Body frame
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameSize {
    Small,
    Medium,
    Large,
}

impl FrameSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameSize::Small => "Small",
            FrameSize::Medium => "Medium",
            FrameSize::Large => "Large",
        }
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame size from the height-to-wrist ratio
///
/// | | Small | Medium | Large |
/// |---|---|---|---|
/// | Men | r > 10.4 | 9.6 - 10.4 | r < 9.6 |
/// | Women | r > 11.0 | 10.1 - 11.0 | r < 10.1 |
pub fn body_frame(height: f64, wrist: f64, gender: Gender) -> CalcResult<FrameSize> {
    validate_positive("height", height)?;
    validate_positive("wrist", wrist)?;

    let r = height / wrist;
    let (small_above, medium_from) = match gender {
        Gender::Male => (10.4, 9.6),
        Gender::Female => (11.0, 10.1),
    };
    let frame = if r > small_above {
        FrameSize::Small
    } else if r >= medium_from {
        FrameSize::Medium
    } else {
        FrameSize::Large
    };
    debug!(%gender, ratio = r, %frame, "Calculated body frame");
    Ok(frame)
}

// ============================================================================
// Ratios
// ============================================================================

pub fn chest_to_waist(chest: f64, waist: f64, gender: Gender) -> CalcResult<RatioResult> {
    let ratio = rounded_ratio(("chest", chest), ("waist", waist))?;
    let (athletic, fit) = match gender {
        Gender::Male => (1.4, 1.2),
        Gender::Female => (1.3, 1.15),
    };
    let category = if ratio >= athletic {
        "Athletic/Bodybuilder"
    } else if ratio >= fit {
        "Fit/Average"
    } else {
        "Below Average"
    };
    Ok(RatioResult { ratio, category })
}

pub fn waist_to_hip(waist: f64, hip: f64, gender: Gender) -> CalcResult<RatioResult> {
    let ratio = rounded_ratio(("waist", waist), ("hip", hip))?;
    let (low_below, moderate_to) = match gender {
        Gender::Male => (0.9, 0.99),
        Gender::Female => (0.8, 0.89),
    };
    let category = if ratio < low_below {
        "Low health risk"
    } else if ratio <= moderate_to {
        "Moderate health risk"
    } else {
        "High health risk"
    };
    Ok(RatioResult { ratio, category })
}

pub fn waist_to_height(waist: f64, height: f64) -> CalcResult<RatioResult> {
    let ratio = rounded_ratio(("waist", waist), ("height", height))?;
    let category = if ratio < 0.4 {
        "Underweight possible"
    } else if ratio < 0.5 {
        "Healthy"
    } else if ratio < 0.6 {
        "Overweight"
    } else {
        "Obese"
    };
    Ok(RatioResult { ratio, category })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(180.0, 16.0, Gender::Male, FrameSize::Small)]
    #[case(180.0, 18.0, Gender::Male, FrameSize::Medium)]
    #[case(180.0, 19.0, Gender::Male, FrameSize::Large)]
    #[case(165.0, 14.0, Gender::Female, FrameSize::Small)]
    #[case(165.0, 15.5, Gender::Female, FrameSize::Medium)]
    #[case(165.0, 17.0, Gender::Female, FrameSize::Large)]
    fn test_body_frame(
        #[case] height: f64,
        #[case] wrist: f64,
        #[case] gender: Gender,
        #[case] expected: FrameSize,
    ) {
        assert_eq!(body_frame(height, wrist, gender).unwrap(), expected);
    }

    #[test]
    fn test_chest_to_waist() {
        let result = chest_to_waist(112.0, 80.0, Gender::Male).unwrap();
        assert_eq!(result.ratio, 1.4);
        assert_eq!(result.category, "Athletic/Bodybuilder");
        assert_eq!(chest_to_waist(100.0, 80.0, Gender::Male).unwrap().category, "Fit/Average");
        assert_eq!(chest_to_waist(100.0, 80.0, Gender::Female).unwrap().category, "Fit/Average");
        assert_eq!(chest_to_waist(90.0, 80.0, Gender::Female).unwrap().category, "Below Average");
    }

    #[rstest]
    #[case(80.0, 100.0, Gender::Male, "Low health risk")]
    #[case(95.0, 100.0, Gender::Male, "Moderate health risk")]
    #[case(99.0, 100.0, Gender::Male, "Moderate health risk")]
    #[case(105.0, 100.0, Gender::Male, "High health risk")]
    #[case(85.0, 100.0, Gender::Female, "Moderate health risk")]
    #[case(90.0, 100.0, Gender::Female, "High health risk")]
    fn test_waist_to_hip(
        #[case] waist: f64,
        #[case] hip: f64,
        #[case] gender: Gender,
        #[case] expected: &str,
    ) {
        assert_eq!(waist_to_hip(waist, hip, gender).unwrap().category, expected);
    }

    #[rstest]
    #[case(60.0, 180.0, "Underweight possible")]
    #[case(80.0, 180.0, "Healthy")]
    #[case(95.0, 180.0, "Overweight")]
    #[case(110.0, 180.0, "Obese")]
    fn test_waist_to_height(#[case] waist: f64, #[case] height: f64, #[case] expected: &str) {
        assert_eq!(waist_to_height(waist, height).unwrap().category, expected);
    }

    #[test]
    fn test_ratio_rejects_zero() {
        assert!(waist_to_height(80.0, 0.0).is_err());
        assert!(body_frame(180.0, 0.0, Gender::Male).is_err());
    }
}
