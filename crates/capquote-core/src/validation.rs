//! # Validation Module
//!
//! Turns raw request numbers into validated decimal measurements.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web form                                                      │
//! │  ├── Basic presence checks                                              │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Request deserialization (serde)                               │
//! │  └── Type checks: numbers are numbers, holes is a count                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                   │
//! │  ├── Required measurements present                                      │
//! │  ├── Finite (no NaN / ±∞) and within decimal range                      │
//! │  └── Non-negative                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::decimal_from_f64;
use crate::types::PricingRequest;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a measurement that may be absent.
///
/// ```rust
/// use capquote_core::validation::validate_optional_measurement;
///
/// assert_eq!(validate_optional_measurement("pitch", None).unwrap(), None);
/// assert!(validate_optional_measurement("pitch", Some(f64::NAN)).is_err());
/// assert!(validate_optional_measurement("pitch", Some(-1.0)).is_err());
/// assert!(validate_optional_measurement("pitch", Some(1e30)).is_err());
/// ```
pub fn validate_optional_measurement(field: &str, value: Option<f64>) -> ValidationResult<Option<Decimal>> {
    let Some(value) = value else {
        return Ok(None);
    };
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    let decimal = decimal_from_f64(value).ok_or_else(|| ValidationError::OutOfRange {
        field: field.to_string(),
    })?;
    if decimal.is_sign_negative() && !decimal.is_zero() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(Some(decimal))
}

/// Validates a measurement that must be present.
pub fn validate_measurement(field: &str, value: Option<f64>) -> ValidationResult<Decimal> {
    validate_optional_measurement(field, value)?.ok_or_else(|| ValidationError::required(field))
}

/// Validated length and width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub length: Decimal,
    pub width: Decimal,
}

/// Validates the length/width every product needs.
pub fn validate_footprint(request: &PricingRequest) -> ValidationResult<Footprint> {
    Ok(Footprint {
        length: validate_measurement("length", request.length)?,
        width: validate_measurement("width", request.width)?,
    })
}

/// Validated multi-flue secondary measurements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecondaryMeasurements {
    pub screen: Option<Decimal>,
    pub overhang: Option<Decimal>,
    pub inset: Option<Decimal>,
    pub skirt: Option<Decimal>,
    pub pitch: Option<Decimal>,
}

/// Validates the optional secondary measurements.
pub fn validate_secondary(request: &PricingRequest) -> ValidationResult<SecondaryMeasurements> {
    Ok(SecondaryMeasurements {
        screen: validate_optional_measurement("screen", request.screen)?,
        overhang: validate_optional_measurement("overhang", request.overhang)?,
        inset: validate_optional_measurement("inset", request.inset)?,
        skirt: validate_optional_measurement("skirt", request.skirt)?,
        pitch: validate_optional_measurement("pitch", request.pitch)?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_required_measurement() {
        assert_eq!(validate_measurement("length", Some(30.0)).unwrap(), dec!(30));
        assert_eq!(
            validate_measurement("length", None).unwrap_err(),
            ValidationError::required("length")
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            validate_measurement("width", Some(f64::INFINITY)),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_finite_but_too_large_is_out_of_range() {
        let err = validate_measurement("length", Some(1e30)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "length".to_string()
            }
        );
        assert_eq!(err.to_string(), "length is out of range");
    }

    #[test]
    fn test_negative_rejected_but_negative_zero_allowed() {
        assert!(matches!(
            validate_measurement("width", Some(-0.5)),
            Err(ValidationError::MustBeNonNegative { .. })
        ));
        assert_eq!(validate_measurement("width", Some(-0.0)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_footprint_reports_first_missing_field() {
        let req = PricingRequest {
            width: Some(20.0),
            ..Default::default()
        };
        assert_eq!(
            validate_footprint(&req).unwrap_err(),
            ValidationError::required("length")
        );
    }

    #[test]
    fn test_secondary_measurements_are_optional() {
        let req = PricingRequest {
            screen: Some(8.0),
            pitch: Some(12.0),
            ..Default::default()
        };
        let m = validate_secondary(&req).unwrap();
        assert_eq!(m.screen, Some(dec!(8)));
        assert_eq!(m.overhang, None);
        assert_eq!(m.pitch, Some(dec!(12)));
    }
}
