//! # Size-Category Resolver
//!
//! Picks the size a quote is priced at. Three independent paths:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shroud, non-copper   total = L + W + 1                                 │
//! │                       scan small → medium → large → small_tall →        │
//! │                       large_tall; skip restricted / undefined;          │
//! │                       first cutoff > total wins                         │
//! │                                                                         │
//! │  Shroud, copper       perimeter = (L + W) × 2 + 2                       │
//! │                       scan perimeter rules in listed order;             │
//! │                       first max > perimeter wins                        │
//! │                                                                         │
//! │  Chase cover          scan sizes in listed order; first size with an    │
//! │                       entry whose skirt matches exactly and whose       │
//! │                       max length/width admit the request wins           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no best-fit search anywhere: order decides.

use rust_decimal::Decimal;
use tracing::debug;

use crate::money::{decimal_from_f64, round_half_up};
use crate::tables::{ChaseSizeSpec, PerimeterRule, ShroudSizing};
use crate::types::{MetalKey, SizeBucket, SizeCategory};

/// `length + width + 1`, the measure non-copper cutoffs are written against.
///
/// `None` when the sum leaves `Decimal` range.
pub fn cutoff_total(length: Decimal, width: Decimal) -> Option<Decimal> {
    length.checked_add(width)?.checked_add(Decimal::ONE)
}

/// `(length + width) × 2 + 2`, the measure copper rules are written against.
///
/// `None` when the result leaves `Decimal` range.
pub fn copper_perimeter(length: Decimal, width: Decimal) -> Option<Decimal> {
    length
        .checked_add(width)?
        .checked_mul(Decimal::TWO)?
        .checked_add(Decimal::TWO)
}

/// First non-restricted bucket whose cutoff is strictly greater than `total`.
pub fn resolve_bucket(total: Decimal, sizing: &ShroudSizing) -> Option<SizeBucket> {
    SizeBucket::SCAN_ORDER.into_iter().find(|bucket| {
        if sizing.restricted.contains(bucket) {
            return false;
        }
        sizing
            .cutoffs
            .get(bucket)
            .and_then(|cutoff| decimal_from_f64(*cutoff))
            .is_some_and(|cutoff| cutoff > total)
    })
}

/// First rule whose `max` is strictly greater than `perimeter`.
pub fn resolve_perimeter_rule(perimeter: Decimal, rules: &[PerimeterRule]) -> Option<&str> {
    rules
        .iter()
        .find(|rule| decimal_from_f64(rule.max).is_some_and(|max| max > perimeter))
        .map(|rule| rule.label.as_str())
}

/// Resolves a shroud size for a metal, choosing the copper or cutoff path.
///
/// A footprint too large to measure fits no size.
pub fn resolve_shroud_size(
    metal: &MetalKey,
    length: Decimal,
    width: Decimal,
    sizing: &ShroudSizing,
) -> Option<SizeCategory> {
    if metal.class().uses_perimeter_sizing() {
        let perimeter = copper_perimeter(length, width)?;
        let label = resolve_perimeter_rule(perimeter, &sizing.perimeter_rules);
        debug!(%metal, %perimeter, size = ?label, "Copper perimeter sizing");
        label.map(|l| SizeCategory::Labeled(l.to_string()))
    } else {
        let total = cutoff_total(length, width)?;
        let bucket = resolve_bucket(total, sizing);
        debug!(%metal, %total, size = ?bucket, "Cutoff sizing");
        bucket.map(SizeCategory::Bucket)
    }
}

/// First chase-cover size admitting the request.
///
/// The skirt must equal an entry's skirt once both are rounded to
/// `precision` decimals; length and width may be anything up to the
/// entry's maxima.
pub fn resolve_chase_cover_size<'a>(
    length: Decimal,
    width: Decimal,
    skirt: Decimal,
    specs: &'a [ChaseSizeSpec],
    precision: u32,
) -> Option<&'a str> {
    let wanted = round_half_up(skirt, precision);
    specs
        .iter()
        .find(|spec| {
            spec.entries().iter().any(|entry| {
                round_half_up(entry.skirt, precision) == wanted
                    && length <= entry.max_length
                    && width <= entry.max_width
            })
        })
        .map(|spec| spec.size.as_str())
}

// =============================================================================
// Unit Tests
// =============================================================================
