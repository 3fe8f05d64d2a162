//! # Pricing Engine
//!
//! Composes the pipeline stages into one quote.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PricingRequest                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  normalize (product family, metal key, tier)                            │
//! │       │                                                                 │
//! │       ├── Shroud ─────► size (cutoff | copper) ──► price × tier ─┐      │
//! │       │                                                          │      │
//! │       ├── ChaseCover ─► tier's sizes (skirt, max L, max W)       │      │
//! │       │                   ──► tier's price (no multiplier) ──────┤      │
//! │       │                                                          │      │
//! │       └── MultiFlue ──► factor row ──► adjustments ──► cascade ──┤      │
//! │                                                                  ▼      │
//! │                                                             surcharges  │
//! │                                                                  │      │
//! │                                                                  ▼      │
//! │                                                           PricingResult │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No state survives between quotes; the table snapshot is taken fresh on
//! every call and dropped at the end of it. Every sum and product on the
//! way is checked, so an input too large to price comes back as a rejected
//! result instead of a panic.

use rust_decimal::Decimal;
use tracing::debug;

use crate::adjustment::{compute_adjustment, AdjustmentInput};
use crate::error::{CoreResult, QuoteRejection, ValidationError};
use crate::lookup::{lookup, LookupOutcome};
use crate::money::decimal_from_f64;
use crate::normalize::{classify_product, normalize_metal};
use crate::rounding::{compose_factor_price, compose_table_price};
use crate::sizing::{resolve_chase_cover_size, resolve_shroud_size};
use crate::surcharge::{apply_surcharges, SurchargeOutcome};
use crate::tables::{PricingTables, TableSource};
use crate::tier::{resolve_tier, select_tier_entry, TierResolution};
use crate::types::{MetalKey, Price, PricingRequest, PricingResult, ProductKind, SizeCategory};
use crate::validation::{validate_footprint, validate_measurement, validate_secondary, Footprint};
use crate::{MESSAGE_OFFICE_TO_PRICE, MESSAGE_PRICED, MESSAGE_REJECTED};

/// Quotes requests against whatever tables the source currently holds.
///
/// ## Usage
/// ```rust
/// use capquote_core::{PricingEngine, PricingRequest, PricingTables, StaticTables};
///
/// let engine = PricingEngine::new(StaticTables::new(PricingTables::default()));
/// let result = engine
///     .quote(&PricingRequest::new("dynasty", "stainless", "elite").with_size(20.0, 18.0))
///     .unwrap();
///
/// // empty tables: nothing is priced, the office takes it
/// assert_eq!(result.message, "Office to Price");
/// ```
#[derive(Debug, Clone)]
pub struct PricingEngine<S> {
    source: S,
}

impl<S: TableSource> PricingEngine<S> {
    pub fn new(source: S) -> Self {
        PricingEngine { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Prices one request against a fresh snapshot.
    ///
    /// Returns `Err` only when the snapshot cannot be produced.
    pub fn quote(&self, request: &PricingRequest) -> CoreResult<PricingResult> {
        let tables = self.source.snapshot()?;
        Ok(price_request(&tables, request))
    }
}

/// Prices one request against a snapshot the caller already holds.
pub fn price_request(tables: &PricingTables, request: &PricingRequest) -> PricingResult {
    let metal = normalize_metal(request.raw_metal());
    let tier = resolve_tier(request.tier.as_deref(), &tables.tiers);

    let mut result = PricingResult::blank(
        metal.as_ref().map(|m| m.as_str().to_string()),
        request.product.clone(),
        Some(tier.tier_key.clone()),
    );

    if let Err(rejection) = fill_result(&mut result, tables, request, metal, &tier) {
        debug!(product = ?result.product, metal = ?result.metal, %rejection, "Quote rejected");
        result.message = MESSAGE_REJECTED.to_string();
        result.error = Some(rejection.to_string());
    }
    result
}

/// The resolved multiplier as a decimal; not finite or negative is a rejection.
fn tier_multiplier(tier: &TierResolution) -> Result<Decimal, QuoteRejection> {
    decimal_from_f64(tier.multiplier)
        .filter(|m| !m.is_sign_negative())
        .ok_or_else(|| QuoteRejection::InvalidTableValue(format!("tier multiplier for '{}'", tier.tier_key)))
}

fn fill_result(
    result: &mut PricingResult,
    tables: &PricingTables,
    request: &PricingRequest,
    metal: Option<MetalKey>,
    tier: &TierResolution,
) -> Result<(), QuoteRejection> {
    let product = classify_product(request.product.as_deref())?;
    result.product = Some(product.key().to_string());

    let metal = metal.ok_or_else(|| ValidationError::required("metal"))?;
    let footprint = validate_footprint(request)?;

    match &product {
        ProductKind::Shroud { .. } => {
            let multiplier = tier_multiplier(tier)?;
            result.tier_multiplier = multiplier;
            let size = tables
                .shrouds
                .sizing
                .get(metal.as_str())
                .and_then(|sizing| resolve_shroud_size(&metal, footprint.length, footprint.width, sizing));
            price_from_table(result, tables, request, &metal, &product, size, multiplier)
        }
        ProductKind::ChaseCover => {
            let skirt = validate_measurement("skirt", request.skirt)?;
            let (tier_key, specs) = tables
                .chase_covers
                .sizes
                .get(metal.as_str())
                .and_then(|tiers| select_tier_entry(request.tier.as_deref(), tiers))
                .map(|(key, specs)| (Some(key), specs.as_slice()))
                .unwrap_or_default();
            if let Some(key) = tier_key {
                result.tier = Some(key.to_string());
            }
            let label = resolve_chase_cover_size(
                footprint.length,
                footprint.width,
                skirt,
                specs,
                tables.chase_covers.skirt_precision,
            )
            .ok_or_else(|| QuoteRejection::NoValidSize {
                metal: metal.to_string(),
                length: footprint.length,
                width: footprint.width,
                skirt,
            })?;
            let size = Some(SizeCategory::Labeled(label.to_string()));
            // chase prices are set per tier; the multiplier stays at 1
            price_from_table(result, tables, request, &metal, &product, size, Decimal::ONE)
        }
        ProductKind::MultiFlue { subtype } => {
            let multiplier = tier_multiplier(tier)?;
            result.tier_multiplier = multiplier;
            price_from_factor(result, tables, request, &metal, &product, subtype, footprint, multiplier)
        }
    }
}

/// Shroud / chase-cover path: table price × multiplier, then surcharges.
fn price_from_table(
    result: &mut PricingResult,
    tables: &PricingTables,
    request: &PricingRequest,
    metal: &MetalKey,
    product: &ProductKind,
    size: Option<SizeCategory>,
    tier_multiplier: Decimal,
) -> Result<(), QuoteRejection> {
    let base = match lookup(tables, metal, product, request.tier.as_deref(), size.as_ref()) {
        LookupOutcome::Price(price) => price,
        LookupOutcome::Factor(_) | LookupOutcome::MissingFactor => Price::NeedsManualPricing,
    };
    if let Some(size) = &size {
        result.size_category = size.to_string();
    }
    result.base_price = Some(base);

    let tiered = compose_table_price(base, tier_multiplier).ok_or(QuoteRejection::Overflow)?;
    let SurchargeOutcome { price, breakdown } = apply_surcharges(
        tiered,
        metal.class().surcharge_class(),
        request.unsquare,
        request.holes,
        &tables.surcharges,
    )
    .ok_or(QuoteRejection::Overflow)?;
    if price.amount().is_some_and(|amount| amount.is_negative()) {
        return Err(QuoteRejection::NegativePrice);
    }

    result.price = Some(price);
    result.surcharges = breakdown;
    match price {
        Price::Priced(amount) => {
            result.final_price = Some(amount.to_decimal());
            result.message = MESSAGE_PRICED.to_string();
        }
        Price::NeedsManualPricing => {
            result.message = MESSAGE_OFFICE_TO_PRICE.to_string();
        }
    }

    debug!(
        %metal,
        product = product.key(),
        size = %result.size_category,
        base = ?base,
        %tier_multiplier,
        price = ?price,
        "Table-priced quote"
    );
    Ok(())
}

/// Multi-flue path: factor + adjustments through the rounding cascade.
#[allow(clippy::too_many_arguments)]
fn price_from_factor(
    result: &mut PricingResult,
    tables: &PricingTables,
    request: &PricingRequest,
    metal: &MetalKey,
    product: &ProductKind,
    subtype: &str,
    footprint: Footprint,
    tier_multiplier: Decimal,
) -> Result<(), QuoteRejection> {
    let secondary = validate_secondary(request)?;

    let LookupOutcome::Factor(row) = lookup(tables, metal, product, None, None) else {
        return Err(QuoteRejection::MissingFactor {
            metal: metal.to_string(),
            product: subtype.to_string(),
        });
    };
    let base_factor = decimal_from_f64(row.base_factor).ok_or_else(|| {
        QuoteRejection::InvalidTableValue(format!("base factor for {metal}/{subtype}"))
    })?;

    let perimeter = footprint
        .length
        .checked_add(footprint.width)
        .ok_or(QuoteRejection::Overflow)?;
    let breakdown = compute_adjustment(
        &AdjustmentInput {
            product: subtype,
            screen: secondary.screen,
            overhang: secondary.overhang,
            inset: secondary.inset,
            skirt: secondary.skirt,
            pitch: secondary.pitch,
        },
        &row.rules,
    )
    .ok_or(QuoteRejection::Overflow)?;

    let composed = compose_factor_price(base_factor, breakdown.total, tier_multiplier, perimeter)
        .ok_or(QuoteRejection::Overflow)?;

    result.base_factor = Some(base_factor);
    result.perimeter = Some(perimeter);
    result.adjusted_factor = Some(composed.adjusted_factor);
    result.tiered_factor = Some(composed.tiered_factor);
    result.debug = Some(breakdown);

    if composed.final_price.is_negative() {
        return Err(QuoteRejection::NegativePrice);
    }

    let SurchargeOutcome { price, breakdown } = apply_surcharges(
        Price::Priced(composed.final_price),
        metal.class().surcharge_class(),
        request.unsquare,
        request.holes,
        &tables.surcharges,
    )
    .ok_or(QuoteRejection::Overflow)?;
    if price.amount().is_some_and(|amount| amount.is_negative()) {
        return Err(QuoteRejection::NegativePrice);
    }
    result.surcharges = breakdown;
    result.final_price = price.amount().map(|amount| amount.to_decimal());
    result.message = MESSAGE_PRICED.to_string();

    debug!(
        %metal,
        product = subtype,
        %perimeter,
        adjusted_factor = %composed.adjusted_factor,
        tiered_factor = %composed.tiered_factor,
        price = ?price,
        "Factor-priced quote"
    );
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::money::Money;
    use crate::tables::{FactorRow, StaticTables};
    use rust_decimal_macros::dec;

    struct Unavailable;

    impl TableSource for Unavailable {
        fn snapshot(&self) -> CoreResult<PricingTables> {
            Err(CoreError::SnapshotUnavailable("gone".to_string()))
        }
    }

    #[test]
    fn test_snapshot_failure_propagates() {
        let engine = PricingEngine::new(Unavailable);
        let err = engine
            .quote(&PricingRequest::new("dynasty", "ss", "elite").with_size(20.0, 18.0))
            .unwrap_err();
        assert!(matches!(err, CoreError::SnapshotUnavailable(_)));
    }

    #[test]
    fn test_missing_metal_is_reported_in_result() {
        let mut req = PricingRequest::new("dynasty", "", "elite").with_size(20.0, 18.0);
        req.metal = None;
        let result = price_request(&PricingTables::default(), &req);
        assert_eq!(result.error.as_deref(), Some("metal is required"));
        assert_eq!(result.message, MESSAGE_REJECTED);
        assert!(result.final_price.is_none());
    }

    #[test]
    fn test_unknown_product_is_reported_in_result() {
        let req = PricingRequest::new("gutter", "ss", "elite").with_size(20.0, 18.0);
        let result = price_request(&PricingTables::default(), &req);
        assert_eq!(result.error.as_deref(), Some("Unrecognized product: 'gutter'"));
    }

    #[test]
    fn test_multi_flue_records_intermediates() {
        let mut tables = PricingTables::default();
        tables.tiers.insert("elite", 1.0);
        tables.multi_flue.entry("stainless".to_string()).or_default().insert(
            "flat_top_outside_mount".to_string(),
            FactorRow {
                base_factor: 1.0,
                rules: Default::default(),
            },
        );
        let engine = PricingEngine::new(StaticTables::new(tables));
        let req = PricingRequest::new("flat_top_outside_mount", "ss", "elite").with_size(30.0, 20.0);
        let result = engine.quote(&req).unwrap();

        assert_eq!(result.perimeter, Some(dec!(50)));
        assert_eq!(result.adjusted_factor, Some(dec!(1)));
        assert_eq!(result.tiered_factor, Some(dec!(1)));
        assert_eq!(result.final_money(), Some(Money::from_cents(5000)));
        assert_eq!(result.size_category, "N/A");
        assert_eq!(result.debug.unwrap().total, Decimal::ZERO);
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        let mut tables = PricingTables::default();
        tables.tiers.insert("elite", -1.0);
        let req = PricingRequest::new("dynasty", "ss", "elite").with_size(20.0, 18.0);
        let result = price_request(&tables, &req);
        assert!(result.error.unwrap().contains("tier multiplier"));
    }
}
