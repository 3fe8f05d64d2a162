//! # Error Types
//!
//! Domain-specific error types for capquote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  capquote-core errors (this file)                                       │
//! │  ├── CoreError        - Snapshot provider failures (returned as Err)    │
//! │  ├── QuoteRejection   - Why a quote has no price (inside a result)      │
//! │  └── ValidationError  - Bad request fields                              │
//! │                                                                         │
//! │  capquote-store errors (separate crate)                                 │
//! │  └── StoreError       - Table file I/O and parse failures               │
//! │                                                                         │
//! │  Flow: StoreError → CoreError::SnapshotUnavailable → caller            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Predictable business conditions never surface as `Err`:
//! - missing or non-finite measurements → `PricingResult::error`
//! - unpriced shroud/chase combinations → `Price::NeedsManualPricing`
//! - missing multi-flue factor rows → `PricingResult::error`
//!
//! Only a snapshot that cannot be produced at all propagates as `Err`.

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Failures the pricing engine cannot turn into a result object.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The table snapshot could not be produced (missing, unreadable, corrupt).
    ///
    /// ## When This Occurs
    /// - Table directory was deleted
    /// - A table file contains invalid JSON
    /// - Permissions prevent reading the tables
    #[error("Pricing tables unavailable: {0}")]
    SnapshotUnavailable(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The engine renders these into the `error` field of a pricing result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A numeric field is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// A finite number too large to price with.
    #[error("{field} is out of range")]
    OutOfRange { field: String },

    /// A measurement is below zero.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// The product identifier matches no known product family.
    #[error("Unrecognized product: '{product}'")]
    UnknownProduct { product: String },
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Quote Rejection
// =============================================================================

/// Why a quote could not be priced.
///
/// Rendered into `PricingResult::error`; never returned as `Err` from the
/// engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteRejection {
    /// A request field failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Multi-flue products have no office-pricing fallback.
    #[error("No pricing factor for metal '{metal}' and product '{product}'")]
    MissingFactor { metal: String, product: String },

    /// No chase-cover size admits the measurements.
    #[error("No valid size category for {metal} chase cover {length}\" x {width}\" with {skirt}\" skirt")]
    NoValidSize {
        metal: String,
        length: Decimal,
        width: Decimal,
        skirt: Decimal,
    },

    /// A table value could not be used in arithmetic.
    #[error("Invalid table value: {0}")]
    InvalidTableValue(String),

    /// The amount does not fit in the money type.
    #[error("Price calculation overflowed")]
    Overflow,

    /// Adjustments drove the price below zero.
    #[error("Computed price is negative")]
    NegativePrice,
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("length").to_string(),
            "length is required"
        );

        let err = ValidationError::UnknownProduct {
            product: "gutter".to_string(),
        };
        assert_eq!(err.to_string(), "Unrecognized product: 'gutter'");
    }

    #[test]
    fn test_rejection_messages() {
        let err = QuoteRejection::MissingFactor {
            metal: "zinc".to_string(),
            product: "flat_top_outside_mount".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No pricing factor for metal 'zinc' and product 'flat_top_outside_mount'"
        );

        let err: QuoteRejection = ValidationError::required("width").into();
        assert_eq!(err.to_string(), "width is required");
    }

    #[test]
    fn test_snapshot_error_message() {
        let err = CoreError::SnapshotUnavailable("tiers.json: missing".to_string());
        assert_eq!(
            err.to_string(),
            "Pricing tables unavailable: tiers.json: missing"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("metal").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
