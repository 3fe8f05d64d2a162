//! # Rounding & Money Pipeline
//!
//! Turns factor arithmetic into an exact amount of cents.
//!
//! ## Multi-Flue Cascade
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  adjustedFactor = round(baseFactor + totalAdjustment, 4dp)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tieredFactor   = round(adjustedFactor × tierMultiplier, 2dp)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  priceCents     = round(perimeter × tieredFactor × 100)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  finalPrice     = priceCents / 100                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both intermediate roundings happen, in that order. Dropping either one
//! moves boundary values by a cent.
//!
//! Table-priced products skip the cascade: `round(basePrice × tier, 2dp)`.

use rust_decimal::Decimal;

use crate::money::{round_half_up, Money};
use crate::types::Price;

/// Decimal places kept on the adjusted factor.
pub const ADJUSTED_FACTOR_DP: u32 = 4;

/// Decimal places kept on the tiered factor.
pub const TIERED_FACTOR_DP: u32 = 2;

/// Intermediate values of the multi-flue cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorComposition {
    pub adjusted_factor: Decimal,
    pub tiered_factor: Decimal,
    pub final_price: Money,
}

/// Runs the multi-flue rounding cascade.
///
/// Returns `None` only if the amount overflows i64 cents.
///
/// ```rust
/// use capquote_core::rounding::compose_factor_price;
/// use rust_decimal::Decimal;
///
/// let c = compose_factor_price(Decimal::ONE, Decimal::ZERO, Decimal::ONE, Decimal::from(50)).unwrap();
/// assert_eq!(c.final_price.cents(), 5000);
/// ```
pub fn compose_factor_price(
    base_factor: Decimal,
    total_adjustment: Decimal,
    tier_multiplier: Decimal,
    perimeter: Decimal,
) -> Option<FactorComposition> {
    let adjusted_factor = round_half_up(base_factor.checked_add(total_adjustment)?, ADJUSTED_FACTOR_DP);
    let tiered_factor = round_half_up(adjusted_factor.checked_mul(tier_multiplier)?, TIERED_FACTOR_DP);
    let final_price = Money::from_decimal(perimeter.checked_mul(tiered_factor)?)?;
    Some(FactorComposition {
        adjusted_factor,
        tiered_factor,
        final_price,
    })
}

/// Applies the tier multiplier to a table price.
///
/// The manual-pricing sentinel is returned untouched. Returns `None` only if
/// the amount overflows.
pub fn compose_table_price(base: Price, tier_multiplier: Decimal) -> Option<Price> {
    match base {
        Price::Priced(amount) => amount.apply_multiplier(tier_multiplier).map(Price::Priced),
        Price::NeedsManualPricing => Some(Price::NeedsManualPricing),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plain_factor() {
        let c = compose_factor_price(dec!(1.0), dec!(0), dec!(1.0), dec!(50)).unwrap();
        assert_eq!(c.adjusted_factor, dec!(1.0));
        assert_eq!(c.tiered_factor, dec!(1.0));
        assert_eq!(c.final_price, Money::from_cents(5000));
    }

    #[test]
    fn test_adjusted_factor_rounds_to_four_places() {
        let c = compose_factor_price(dec!(1.23456), dec!(0.00001), dec!(1), dec!(10)).unwrap();
        assert_eq!(c.adjusted_factor, dec!(1.2346));
    }

    #[test]
    fn test_tiered_factor_rounds_before_perimeter() {
        // 1.2345 × 0.9 = 1.11105 → 1.11; × 50 = 55.50
        // skipping the 2dp step would give 55.5525 → 55.55
        let c = compose_factor_price(dec!(1.2345), dec!(0), dec!(0.9), dec!(50)).unwrap();
        assert_eq!(c.tiered_factor, dec!(1.11));
        assert_eq!(c.final_price, Money::from_cents(5550));
    }

    #[test]
    fn test_four_place_step_changes_boundary_values() {
        // 1.004951 → 1.0050 (4dp) → 1.01 (2dp); rounding straight to 2dp gives 1.00
        let c = compose_factor_price(dec!(1.004951), dec!(0), dec!(1), dec!(100)).unwrap();
        assert_eq!(c.adjusted_factor, dec!(1.0050));
        assert_eq!(c.tiered_factor, dec!(1.01));
        assert_eq!(c.final_price, Money::from_cents(10100));
    }

    #[test]
    fn test_cents_rounding_half_up() {
        // 50.5 × 1.15 = 58.075 → 5808 cents
        let c = compose_factor_price(dec!(1.15), dec!(0), dec!(1), dec!(50.5)).unwrap();
        assert_eq!(c.final_price, Money::from_cents(5808));
    }

    #[test]
    fn test_table_price_tiering_and_sentinel() {
        let base = Price::Priced(Money::from_dollars(510));
        assert_eq!(
            compose_table_price(base, dec!(0.9)),
            Some(Price::Priced(Money::from_dollars(459)))
        );
        assert_eq!(
            compose_table_price(Price::NeedsManualPricing, dec!(0.9)),
            Some(Price::NeedsManualPricing)
        );
    }
}
