//! # Price/Factor Lookup
//!
//! Reads base prices (shrouds, chase covers) and base factors (multi-flue)
//! out of a table snapshot.
//!
//! A missing shroud or chase price is not an error: it is the same as a
//! stored `"DESIGN"` cell and sends the quote to the office. A missing
//! multi-flue factor row has no such fallback.
//!
//! Chase-cover prices carry a tier level between metal and size; the tier
//! is picked with [`select_tier_entry`].

use crate::tables::{FactorRow, PricingTables};
use crate::tier::select_tier_entry;
use crate::types::{MetalKey, Price, ProductKind, SizeCategory};

/// What the tables hold for one metal/product/size.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome<'a> {
    /// Direct table price (possibly the manual-pricing sentinel).
    Price(Price),
    /// Base factor and adjustment rules for a formula product.
    Factor(&'a FactorRow),
    /// No factor row for a multi-flue product.
    MissingFactor,
}

/// Looks up the base price or factor for a classified product.
///
/// `size` is ignored for multi-flue products; a table-priced product with
/// no size resolves to the manual-pricing sentinel. `tier` is the raw request
/// tier and only matters for chase covers.
pub fn lookup<'a>(
    tables: &'a PricingTables,
    metal: &MetalKey,
    product: &ProductKind,
    tier: Option<&str>,
    size: Option<&SizeCategory>,
) -> LookupOutcome<'a> {
    match product {
        ProductKind::MultiFlue { subtype } => factor_row(tables, metal, subtype)
            .map(LookupOutcome::Factor)
            .unwrap_or(LookupOutcome::MissingFactor),
        ProductKind::Shroud { model } => LookupOutcome::Price(
            size.map(|s| shroud_price(tables, metal, model.as_str(), s.as_str()))
                .unwrap_or(Price::NeedsManualPricing),
        ),
        ProductKind::ChaseCover => LookupOutcome::Price(
            size.map(|s| chase_cover_price(tables, metal, tier, s.as_str()))
                .unwrap_or(Price::NeedsManualPricing),
        ),
    }
}

/// Shroud price for metal/model/size; absent cells need manual pricing.
pub fn shroud_price(tables: &PricingTables, metal: &MetalKey, model: &str, size: &str) -> Price {
    tables
        .shrouds
        .prices
        .get(metal.as_str())
        .and_then(|models| models.get(model))
        .and_then(|sizes| sizes.get(size))
        .copied()
        .unwrap_or(Price::NeedsManualPricing)
}

/// Chase-cover price for metal/tier/size; absent cells need manual pricing.
pub fn chase_cover_price(tables: &PricingTables, metal: &MetalKey, tier: Option<&str>, size: &str) -> Price {
    tables
        .chase_covers
        .prices
        .get(metal.as_str())
        .and_then(|tiers| select_tier_entry(tier, tiers))
        .and_then(|(_, sizes)| sizes.get(size))
        .copied()
        .unwrap_or(Price::NeedsManualPricing)
}

/// Multi-flue factor row for metal/product.
pub fn factor_row<'a>(tables: &'a PricingTables, metal: &MetalKey, product: &str) -> Option<&'a FactorRow> {
    tables
        .multi_flue
        .get(metal.as_str())
        .and_then(|products| products.get(product))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::tables::AdjustmentRules;
    use crate::types::{ShroudModel, SizeBucket};
    use std::collections::BTreeMap;

    fn tables() -> PricingTables {
        let mut t = PricingTables::default();
        let mut sizes = BTreeMap::new();
        sizes.insert("small".to_string(), Price::Priced(Money::from_dollars(510)));
        sizes.insert("medium".to_string(), Price::NeedsManualPricing);
        t.shrouds
            .prices
            .entry("stainless".to_string())
            .or_default()
            .insert("dynasty".to_string(), sizes);
        let mut chase = BTreeMap::new();
        chase.insert("elite".to_string(), BTreeMap::from([("small".to_string(), Price::Priced(Money::from_dollars(300)))]));
        chase.insert("vg".to_string(), BTreeMap::from([("small".to_string(), Price::Priced(Money::from_dollars(270)))]));
        t.chase_covers.prices.insert("stainless".to_string(), chase);
        t.multi_flue.entry("stainless".to_string()).or_default().insert(
            "flat_top_outside_mount".to_string(),
            FactorRow {
                base_factor: 1.0,
                rules: AdjustmentRules::default(),
            },
        );
        t
    }

    #[test]
    fn test_shroud_price_hit_sentinel_and_miss() {
        let t = tables();
        let ss = MetalKey::new("stainless");
        let dynasty = ProductKind::Shroud {
            model: ShroudModel::Dynasty,
        };

        let small = SizeCategory::Bucket(SizeBucket::Small);
        assert_eq!(
            lookup(&t, &ss, &dynasty, None, Some(&small)),
            LookupOutcome::Price(Price::Priced(Money::from_dollars(510)))
        );

        let medium = SizeCategory::Bucket(SizeBucket::Medium);
        assert_eq!(
            lookup(&t, &ss, &dynasty, None, Some(&medium)),
            LookupOutcome::Price(Price::NeedsManualPricing)
        );

        let large = SizeCategory::Bucket(SizeBucket::Large);
        assert_eq!(
            lookup(&t, &ss, &dynasty, None, Some(&large)),
            LookupOutcome::Price(Price::NeedsManualPricing)
        );
        assert_eq!(
            lookup(&t, &ss, &dynasty, None, None),
            LookupOutcome::Price(Price::NeedsManualPricing)
        );
    }

    #[test]
    fn test_factor_row_hit_and_miss() {
        let t = tables();
        let mf = ProductKind::MultiFlue {
            subtype: "flat_top_outside_mount".to_string(),
        };
        assert!(matches!(
            lookup(&t, &MetalKey::new("stainless"), &mf, None, None),
            LookupOutcome::Factor(row) if row.base_factor == 1.0
        ));
        assert_eq!(
            lookup(&t, &MetalKey::new("unobtainium"), &mf, None, None),
            LookupOutcome::MissingFactor
        );
    }

    #[test]
    fn test_chase_cover_price_is_per_tier() {
        let t = tables();
        let ss = MetalKey::new("stainless");
        let small = SizeCategory::Labeled("small".to_string());
        let price = |tier| lookup(&t, &ss, &ProductKind::ChaseCover, tier, Some(&small));

        assert_eq!(price(Some("Value-Gold")), LookupOutcome::Price(Price::Priced(Money::from_dollars(270))));
        assert_eq!(price(Some("wholesale")), LookupOutcome::Price(Price::Priced(Money::from_dollars(300))));
        assert_eq!(price(None), LookupOutcome::Price(Price::Priced(Money::from_dollars(300))));

        let medium = SizeCategory::Labeled("medium".to_string());
        assert_eq!(
            lookup(&t, &ss, &ProductKind::ChaseCover, Some("vg"), Some(&medium)),
            LookupOutcome::Price(Price::NeedsManualPricing)
        );
    }
}
