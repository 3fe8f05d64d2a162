//! # Surcharge Applier
//!
//! Flat and per-unit addons on top of a computed price.
//!
//! ```text
//! unsquare      +60 coated (black galvanized, kynar) / +85 otherwise
//! holes > 1     +(holes − 1) × 25 coated / × 45 otherwise
//! ```
//!
//! A manual-pricing sentinel passes through untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::tables::{SurchargeAmounts, SurchargeSchedule};
use crate::types::{Price, SurchargeClass};

/// What was added to the price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SurchargeBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub unsquare: Decimal,

    pub extra_holes: u32,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub holes: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub total: Decimal,
}

/// Price after surcharges, plus the breakdown when anything was added.
#[derive(Debug, Clone, PartialEq)]
pub struct SurchargeOutcome {
    pub price: Price,
    pub breakdown: Option<SurchargeBreakdown>,
}

fn pick(amounts: &SurchargeAmounts, class: SurchargeClass) -> Money {
    match class {
        SurchargeClass::Coated => amounts.coated,
        SurchargeClass::Standard => amounts.standard,
    }
}

/// Adds unsquare and extra-hole surcharges to a priced amount.
///
/// Returns `None` if the surcharged amount overflows.
///
/// ```rust
/// use capquote_core::money::Money;
/// use capquote_core::surcharge::apply_surcharges;
/// use capquote_core::tables::SurchargeSchedule;
/// use capquote_core::types::{Price, SurchargeClass};
///
/// let out = apply_surcharges(
///     Price::Priced(Money::from_dollars(200)),
///     SurchargeClass::Standard,
///     true,
///     3,
///     &SurchargeSchedule::default(),
/// )
/// .unwrap();
/// assert_eq!(out.price, Price::Priced(Money::from_dollars(375)));
/// ```
pub fn apply_surcharges(
    price: Price,
    class: SurchargeClass,
    unsquare: bool,
    holes: u32,
    schedule: &SurchargeSchedule,
) -> Option<SurchargeOutcome> {
    let Price::Priced(amount) = price else {
        return Some(SurchargeOutcome {
            price,
            breakdown: None,
        });
    };

    let unsquare_amount = if unsquare {
        pick(&schedule.unsquare, class)
    } else {
        Money::zero()
    };
    let extra_holes = holes.saturating_sub(1);
    let holes_amount = pick(&schedule.per_extra_hole, class).checked_mul_quantity(i64::from(extra_holes))?;
    let total = unsquare_amount.checked_add(holes_amount)?;

    if total.is_zero() {
        return Some(SurchargeOutcome {
            price,
            breakdown: None,
        });
    }

    Some(SurchargeOutcome {
        price: Price::Priced(amount.checked_add(total)?),
        breakdown: Some(SurchargeBreakdown {
            unsquare: unsquare_amount.to_decimal(),
            extra_holes,
            holes: holes_amount.to_decimal(),
            total: total.to_decimal(),
        }),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn priced(dollars: i64) -> Price {
        Price::Priced(Money::from_dollars(dollars))
    }

    #[test]
    fn test_stainless_unsquare_and_holes() {
        let out = apply_surcharges(priced(200), SurchargeClass::Standard, true, 3, &SurchargeSchedule::default()).unwrap();
        assert_eq!(out.price, priced(375));
        let b = out.breakdown.unwrap();
        assert_eq!(b.unsquare, dec!(85));
        assert_eq!(b.extra_holes, 2);
        assert_eq!(b.holes, dec!(90));
        assert_eq!(b.total, dec!(175));
    }

    #[test]
    fn test_coated_rates() {
        let out = apply_surcharges(priced(200), SurchargeClass::Coated, false, 3, &SurchargeSchedule::default()).unwrap();
        assert_eq!(out.price, priced(250));

        let out = apply_surcharges(priced(200), SurchargeClass::Coated, true, 0, &SurchargeSchedule::default()).unwrap();
        assert_eq!(out.price, priced(260));
    }

    #[test]
    fn test_single_hole_square_is_noop() {
        let schedule = SurchargeSchedule::default();
        let once = apply_surcharges(priced(200), SurchargeClass::Standard, false, 1, &schedule).unwrap();
        let twice = apply_surcharges(once.price, SurchargeClass::Standard, false, 1, &schedule).unwrap();
        assert_eq!(twice.price, priced(200));
        assert!(twice.breakdown.is_none());
    }

    #[test]
    fn test_sentinel_is_untouched() {
        let out = apply_surcharges(
            Price::NeedsManualPricing,
            SurchargeClass::Standard,
            true,
            5,
            &SurchargeSchedule::default(),
        )
        .unwrap();
        assert_eq!(out.price, Price::NeedsManualPricing);
        assert!(out.breakdown.is_none());
    }

    #[test]
    fn test_overflowing_surcharge_is_reported() {
        let out = apply_surcharges(
            Price::Priced(Money::from_cents(i64::MAX - 100)),
            SurchargeClass::Standard,
            true,
            1,
            &SurchargeSchedule::default(),
        );
        assert!(out.is_none());
    }
}
