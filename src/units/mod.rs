//! Length conversion between canonical inches and user-facing units.
//!
//! Every stored length is a non-negative number of inches. Feet+inches and
//! centimeters only exist at the edges: when a value is typed into a form and
//! when it is rendered back to the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inches per foot.
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Placeholder shown for a length that was never recorded.
pub const UNKNOWN_LENGTH: &str = "—";

#[derive(Debug, Error, PartialEq)]
pub enum UnitsError {
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),

    #[error("Unknown unit '{0}'. Must be: imperial or metric")]
    UnknownUnit(String),
}

/// The user's display preference. Never affects what is stored.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Imperial,
    Metric,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Imperial => "imperial",
            Self::Metric => "metric",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "imperial" | "in" | "ft" => Ok(Self::Imperial),
            "metric" | "cm" => Ok(Self::Metric),
            _ => Err(UnitsError::UnknownUnit(s.to_string())),
        }
    }
}

/// How typed numbers are treated when they don't parse.
///
/// - `Lenient`: anything unparseable becomes 0 (the form stays usable)
/// - `Strict`: unparseable or negative input is rejected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Lenient,
    Strict,
}

/// A length split for imperial display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeetInches {
    pub feet: u64,
    pub inches: u64,
}

/// Map overflowed or NaN results to 0 so they can't reach storage.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn to_canonical_from_feet_inches(feet: f64, inches: f64) -> f64 {
    finite_or_zero(feet * INCHES_PER_FOOT + inches).max(0.0)
}

/// Split canonical inches into whole feet and rounded inches.
///
/// Rounding can push the inches to 12 (e.g. 23.6 → 1 ft 11.6 in → 1 ft 12 in);
/// that case carries into the next foot. Feet saturate at `u64::MAX`.
pub fn from_canonical_to_feet_inches(total_inches: f64) -> FeetInches {
    let total = finite_or_zero(total_inches).max(0.0);
    let feet = (total / INCHES_PER_FOOT).floor();
    let inches = (total - feet * INCHES_PER_FOOT).round();

    if inches >= INCHES_PER_FOOT {
        FeetInches {
            feet: (feet as u64).saturating_add(1),
            inches: 0,
        }
    } else {
        FeetInches {
            feet: feet as u64,
            inches: inches as u64,
        }
    }
}

pub fn to_canonical_from_cm(cm: f64) -> f64 {
    finite_or_zero(cm / CM_PER_INCH)
}

pub fn from_canonical_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Centimeters as shown to the user: rounded to the nearest whole number.
pub fn rounded_cm(inches: f64) -> i64 {
    from_canonical_to_cm(inches).round() as i64
}

/// Render a canonical length in the requested unit.
///
/// Zero means "not recorded" and renders as [`UNKNOWN_LENGTH`]. So does a
/// non-finite value, which no converter produces.
pub fn format_length(inches: f64, units: Units) -> String {
    if inches == 0.0 || !inches.is_finite() {
        return UNKNOWN_LENGTH.to_string();
    }

    match units {
        Units::Metric => format!("{} cm", rounded_cm(inches)),
        Units::Imperial => {
            let FeetInches { feet, inches } = from_canonical_to_feet_inches(inches);
            format!("{}'{}\"", feet, inches)
        }
    }
}

/// Parse a typed number, treating anything unusable as 0.
pub fn coerce_number(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parse a typed number, rejecting non-numeric or negative input.
///
/// Empty input is "not recorded" and yields 0.
pub fn parse_number(text: &str) -> Result<f64, UnitsError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(UnitsError::InvalidNumber(text.to_string())),
    }
}

fn read_number(text: &str, mode: InputMode) -> Result<f64, UnitsError> {
    match mode {
        InputMode::Lenient => Ok(coerce_number(text)),
        InputMode::Strict => parse_number(text),
    }
}

/// Parse a length typed in the given unit into canonical inches.
///
/// Imperial accepts `14'6"`, `14'6`, `14 6`, `14'` (feet only), `14`
/// (feet only) and `174"` (inches only). Metric accepts `440` or `440cm`.
///
/// A length too large to represent is an error in strict mode and 0 in
/// lenient mode.
pub fn parse_length(text: &str, units: Units, mode: InputMode) -> Result<f64, UnitsError> {
    let text = text.trim();

    let raw = match units {
        Units::Metric => {
            let cm = text.strip_suffix("cm").unwrap_or(text);
            read_number(cm, mode)? / CM_PER_INCH
        }
        Units::Imperial => match split_feet_inches(text) {
            (Some(feet), inches) => {
                let feet = read_number(feet, mode)?;
                let inches = read_number(inches.unwrap_or(""), mode)?;
                feet * INCHES_PER_FOOT + inches
            }
            (None, Some(inches)) => read_number(inches, mode)?,
            (None, None) => match mode {
                InputMode::Lenient => 0.0,
                InputMode::Strict => return Err(UnitsError::InvalidNumber(text.to_string())),
            },
        },
    };

    match mode {
        InputMode::Strict if !raw.is_finite() => Err(UnitsError::InvalidNumber(text.to_string())),
        _ => Ok(finite_or_zero(raw).max(0.0)),
    }
}

/// Split imperial text into its feet and inches parts.
///
/// Returns `(None, None)` when the text has more parts than it can place.
fn split_feet_inches(text: &str) -> (Option<&str>, Option<&str>) {
    if let Some((feet, rest)) = text.split_once('\'') {
        let inches = rest.trim().trim_end_matches('"');
        return (Some(feet), Some(inches));
    }

    if let Some(inches) = text.strip_suffix('"') {
        return (None, Some(inches));
    }

    let parts: Vec<&str> = text.split_whitespace().collect();
    match parts.as_slice() {
        [] => (Some(""), None),
        [feet] => (Some(feet), None),
        [feet, inches] => (Some(feet), Some(inches)),
        _ => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_inches_round_trip() {
        for feet in 0..25u64 {
            for inches in 0..12u64 {
                let total = to_canonical_from_feet_inches(feet as f64, inches as f64);
                assert_eq!(
                    from_canonical_to_feet_inches(total),
                    FeetInches { feet, inches }
                );
            }
        }
    }

    #[test]
    fn test_rounding_carries_into_next_foot() {
        assert_eq!(
            from_canonical_to_feet_inches(23.6),
            FeetInches { feet: 2, inches: 0 }
        );
        assert_eq!(
            from_canonical_to_feet_inches(23.4),
            FeetInches {
                feet: 1,
                inches: 11
            }
        );
    }

    #[test]
    fn test_negative_totals_clamp_to_zero() {
        assert_eq!(to_canonical_from_feet_inches(-1.0, 3.0), 0.0);
        assert_eq!(to_canonical_from_feet_inches(f64::NAN, 3.0), 0.0);
        assert_eq!(
            from_canonical_to_feet_inches(-5.0),
            FeetInches { feet: 0, inches: 0 }
        );
    }

    #[test]
    fn test_cm_round_trip_within_tolerance() {
        for x in [0.0, 0.5, 1.0, 150.0, 174.25, 236.2, 10_000.0] {
            let back = to_canonical_from_cm(from_canonical_to_cm(x));
            assert!((back - x).abs() < 1e-9, "{} came back as {}", x, back);
        }
    }

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(0.0, Units::Imperial), "—");
        assert_eq!(format_length(0.0, Units::Metric), "—");
        assert_eq!(format_length(150.0, Units::Imperial), "12'6\"");
        assert_eq!(format_length(150.0, Units::Metric), "381 cm");
        assert_eq!(format_length(23.6, Units::Imperial), "2'0\"");
    }

    #[test]
    fn test_units_from_str() {
        assert_eq!("imperial".parse::<Units>(), Ok(Units::Imperial));
        assert_eq!("Metric".parse::<Units>(), Ok(Units::Metric));
        assert_eq!("cm".parse::<Units>(), Ok(Units::Metric));
        assert_eq!(
            "furlongs".parse::<Units>(),
            Err(UnitsError::UnknownUnit("furlongs".to_string()))
        );
    }

    #[test]
    fn test_coerce_number_treats_garbage_as_zero() {
        assert_eq!(coerce_number("12.5"), 12.5);
        assert_eq!(coerce_number(" 7 "), 7.0);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
    }

    #[test]
    fn test_parse_number_is_strict() {
        assert_eq!(parse_number(""), Ok(0.0));
        assert_eq!(parse_number("16"), Ok(16.0));
        assert!(parse_number("sixteen").is_err());
        assert!(parse_number("-2").is_err());
    }

    #[test]
    fn test_parse_imperial_lengths() {
        let lenient = InputMode::Lenient;
        assert_eq!(parse_length("14'6\"", Units::Imperial, lenient), Ok(174.0));
        assert_eq!(parse_length("14'6", Units::Imperial, lenient), Ok(174.0));
        assert_eq!(parse_length("14 6", Units::Imperial, lenient), Ok(174.0));
        assert_eq!(parse_length("14'", Units::Imperial, lenient), Ok(168.0));
        assert_eq!(parse_length("14", Units::Imperial, lenient), Ok(168.0));
        assert_eq!(parse_length("174\"", Units::Imperial, lenient), Ok(174.0));
        assert_eq!(parse_length("", Units::Imperial, lenient), Ok(0.0));
    }

    #[test]
    fn test_parse_metric_lengths() {
        let inches = parse_length("381cm", Units::Metric, InputMode::Lenient).unwrap();
        assert!((inches - 150.0).abs() < 1e-9);
        let inches = parse_length("381", Units::Metric, InputMode::Strict).unwrap();
        assert!((inches - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_length_lenient_vs_strict() {
        assert_eq!(
            parse_length("ten'x", Units::Imperial, InputMode::Lenient),
            Ok(0.0)
        );
        assert!(parse_length("ten'x", Units::Imperial, InputMode::Strict).is_err());
        assert!(parse_length("1 2 3", Units::Imperial, InputMode::Strict).is_err());
        assert_eq!(
            parse_length("1 2 3", Units::Imperial, InputMode::Lenient),
            Ok(0.0)
        );
    }

    #[test]
    fn test_overflowing_lengths_never_become_infinite() {
        assert_eq!(to_canonical_from_feet_inches(1e308, 0.0), 0.0);
        assert_eq!(to_canonical_from_feet_inches(f64::INFINITY, 0.0), 0.0);
        assert_eq!(to_canonical_from_cm(f64::INFINITY), 0.0);
        assert_eq!(to_canonical_from_cm(f64::NAN), 0.0);

        assert_eq!(
            parse_length("1e308", Units::Imperial, InputMode::Lenient),
            Ok(0.0)
        );
        assert_eq!(
            parse_length("1e308'6", Units::Imperial, InputMode::Lenient),
            Ok(0.0)
        );
        assert_eq!(
            parse_length("1e308", Units::Imperial, InputMode::Strict),
            Err(UnitsError::InvalidNumber("1e308".to_string()))
        );
        assert!(parse_length("1e309cm", Units::Metric, InputMode::Strict).is_err());
        assert_eq!(
            parse_length("1e309cm", Units::Metric, InputMode::Lenient),
            Ok(0.0)
        );
    }

    #[test]
    fn test_large_finite_lengths_still_parse() {
        let inches = parse_length("1e300", Units::Metric, InputMode::Strict).unwrap();
        assert!(inches.is_finite());
        assert!(inches > 0.0);
    }

    #[test]
    fn test_extreme_values_format_without_panicking() {
        // feet land on u32::MAX and the inches round up to 12
        let edge = 12.0 * 4294967296.0 - 0.4;
        assert_eq!(
            from_canonical_to_feet_inches(edge),
            FeetInches {
                feet: 4294967296,
                inches: 0
            }
        );
        assert_eq!(format_length(edge, Units::Imperial), "4294967296'0\"");

        assert_eq!(from_canonical_to_feet_inches(f64::MAX).feet, u64::MAX);
        assert_eq!(
            from_canonical_to_feet_inches(f64::INFINITY),
            FeetInches { feet: 0, inches: 0 }
        );

        for value in [f64::MAX, 1e300, 1e20, f64::INFINITY, f64::NEG_INFINITY] {
            for units in [Units::Imperial, Units::Metric] {
                assert!(!format_length(value, units).is_empty());
            }
        }
        assert_eq!(format_length(f64::INFINITY, Units::Metric), "—");
    }
}
