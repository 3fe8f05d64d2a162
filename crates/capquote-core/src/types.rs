//! # Domain Types
//!
//! Request, classification, and result types used throughout capquote.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ PricingRequest  │   │  ProductKind    │   │  PricingResult  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product        │   │  ChaseCover     │   │  sizeCategory   │       │
//! │  │  metal / tier   │──►│  MultiFlue      │──►│  factors        │       │
//! │  │  dimensions     │   │  Shroud(model)  │   │  finalPrice     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   MetalKey      │   │  SizeCategory   │   │     Price       │       │
//! │  │  canonical key  │   │  Bucket(..)     │   │  Priced(Money)  │       │
//! │  │  → MetalClass   │   │  Labeled(..)    │   │  NeedsManual…   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::adjustment::AdjustmentBreakdown;
use crate::money::{decimal_from_f64, Money};
use crate::surcharge::SurchargeBreakdown;
use crate::{DESIGN_SENTINEL, NOT_APPLICABLE};

// =============================================================================
// Pricing Request
// =============================================================================

/// One quote request as supplied by the calling layer.
///
/// All measurements are inches. Fields are optional on the wire so that a
/// missing value becomes a validation message rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingRequest {
    /// Product identifier, e.g. `chase_cover`, `flat_top_outside_mount`, `dynasty`.
    pub product: Option<String>,

    /// Raw metal identifier.
    pub metal: Option<String>,

    /// Alternate raw metal identifier used by older forms.
    pub metal_type: Option<String>,

    /// Raw tier identifier.
    pub tier: Option<String>,

    pub length: Option<f64>,
    pub width: Option<f64>,
    pub skirt: Option<f64>,
    pub screen: Option<f64>,
    pub overhang: Option<f64>,
    pub inset: Option<f64>,
    pub pitch: Option<f64>,

    /// Mounting holes requested; the first one is included in the price.
    #[serde(default)]
    pub holes: u32,

    /// Chimney top is out of square.
    #[serde(default)]
    pub unsquare: bool,
}

impl PricingRequest {
    /// Starts a request for a product, metal, and tier.
    pub fn new(product: &str, metal: &str, tier: &str) -> Self {
        PricingRequest {
            product: Some(product.to_string()),
            metal: Some(metal.to_string()),
            tier: Some(tier.to_string()),
            ..Default::default()
        }
    }

    /// Sets length and width.
    pub fn with_size(mut self, length: f64, width: f64) -> Self {
        self.length = Some(length);
        self.width = Some(width);
        self
    }

    /// Returns `metal`, falling back to `metalType` when `metal` is blank.
    pub fn raw_metal(&self) -> Option<&str> {
        [self.metal.as_deref(), self.metal_type.as_deref()]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

// =============================================================================
// Product Classification
// =============================================================================

/// Shroud model names recognized in product identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShroudModel {
    Dynasty,
    Majesty,
    Princess,
    Prairie,
    Regal,
    Imperial,
    Monarch,
    Empire,
    Centurion,
    Temptress,
}

impl ShroudModel {
    /// Every model, in the order classification scans them.
    pub const ALL: [ShroudModel; 10] = [
        ShroudModel::Dynasty,
        ShroudModel::Majesty,
        ShroudModel::Princess,
        ShroudModel::Prairie,
        ShroudModel::Regal,
        ShroudModel::Imperial,
        ShroudModel::Monarch,
        ShroudModel::Empire,
        ShroudModel::Centurion,
        ShroudModel::Temptress,
    ];

    /// Table key for this model.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ShroudModel::Dynasty => "dynasty",
            ShroudModel::Majesty => "majesty",
            ShroudModel::Princess => "princess",
            ShroudModel::Prairie => "prairie",
            ShroudModel::Regal => "regal",
            ShroudModel::Imperial => "imperial",
            ShroudModel::Monarch => "monarch",
            ShroudModel::Empire => "empire",
            ShroudModel::Centurion => "centurion",
            ShroudModel::Temptress => "temptress",
        }
    }
}

impl fmt::Display for ShroudModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The product family; decides which algorithm and tables apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductKind {
    /// Table-priced chase cover sized by explicit skirt/length/width entries.
    ChaseCover,
    /// Formula-priced multi-flue cap; `subtype` is the normalized product id.
    MultiFlue { subtype: String },
    /// Table-priced chimney shroud.
    Shroud { model: ShroudModel },
}

impl ProductKind {
    /// Table key used for lookups and echoed in results.
    pub fn key(&self) -> &str {
        match self {
            ProductKind::ChaseCover => "chase_cover",
            ProductKind::MultiFlue { subtype } => subtype,
            ProductKind::Shroud { model } => model.as_str(),
        }
    }
}

// =============================================================================
// Metal
// =============================================================================

/// Canonical metal key after alias resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetalKey(String);

impl MetalKey {
    /// Wraps an already-canonical key.
    pub fn new(key: impl Into<String>) -> Self {
        MetalKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Family the key belongs to.
    pub fn class(&self) -> MetalClass {
        match self.0.as_str() {
            "black_galvanized" => MetalClass::BlackGalvanized,
            "kynar" => MetalClass::Kynar,
            "stainless" => MetalClass::Stainless,
            "copper" => MetalClass::Copper,
            _ => MetalClass::Other,
        }
    }
}

impl fmt::Display for MetalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metal family, used to gate sizing paths and surcharge amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetalClass {
    BlackGalvanized,
    Kynar,
    Stainless,
    Copper,
    Other,
}

impl MetalClass {
    /// Copper shrouds are sized by perimeter rules instead of cutoffs.
    pub const fn uses_perimeter_sizing(&self) -> bool {
        matches!(self, MetalClass::Copper)
    }

    /// Which surcharge amounts apply.
    pub const fn surcharge_class(&self) -> SurchargeClass {
        match self {
            MetalClass::BlackGalvanized | MetalClass::Kynar => SurchargeClass::Coated,
            _ => SurchargeClass::Standard,
        }
    }
}

/// Two-level surcharge pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurchargeClass {
    /// Black galvanized and kynar.
    Coated,
    /// Stainless, copper, and everything else.
    Standard,
}

// =============================================================================
// Size Category
// =============================================================================

/// Cutoff-based size buckets, declared in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeBucket {
    Small,
    Medium,
    Large,
    SmallTall,
    LargeTall,
}

impl SizeBucket {
    /// The fixed order buckets are tried in.
    pub const SCAN_ORDER: [SizeBucket; 5] = [
        SizeBucket::Small,
        SizeBucket::Medium,
        SizeBucket::Large,
        SizeBucket::SmallTall,
        SizeBucket::LargeTall,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SizeBucket::Small => "small",
            SizeBucket::Medium => "medium",
            SizeBucket::Large => "large",
            SizeBucket::SmallTall => "small_tall",
            SizeBucket::LargeTall => "large_tall",
        }
    }
}

/// A resolved size category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeCategory {
    /// One of the fixed cutoff buckets.
    Bucket(SizeBucket),
    /// A configured label (copper perimeter rules, chase-cover sizes).
    Labeled(String),
}

impl SizeCategory {
    pub fn as_str(&self) -> &str {
        match self {
            SizeCategory::Bucket(b) => b.as_str(),
            SizeCategory::Labeled(label) => label,
        }
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Price
// =============================================================================

/// A table price: either an amount or "needs manual office pricing".
///
/// On the wire this is a JSON number (dollars) or the string `"DESIGN"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PriceRepr", into = "PriceRepr")]
pub enum Price {
    Priced(Money),
    NeedsManualPricing,
}

impl Price {
    /// Returns the amount, if priced.
    pub fn amount(&self) -> Option<Money> {
        match self {
            Price::Priced(m) => Some(*m),
            Price::NeedsManualPricing => None,
        }
    }

    pub fn is_priced(&self) -> bool {
        matches!(self, Price::Priced(_))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Amount(f64),
    Sentinel(String),
}

impl TryFrom<PriceRepr> for Price {
    type Error = String;

    fn try_from(repr: PriceRepr) -> Result<Self, Self::Error> {
        match repr {
            PriceRepr::Amount(dollars) => decimal_from_f64(dollars)
                .and_then(Money::from_decimal)
                .filter(|m| !m.is_negative())
                .map(Price::Priced)
                .ok_or_else(|| format!("invalid price amount: {dollars}")),
            PriceRepr::Sentinel(s) if s.eq_ignore_ascii_case(DESIGN_SENTINEL) => {
                Ok(Price::NeedsManualPricing)
            }
            PriceRepr::Sentinel(s) => Err(format!(
                "price must be a number or \"{DESIGN_SENTINEL}\", got \"{s}\""
            )),
        }
    }
}

impl From<Price> for PriceRepr {
    fn from(price: Price) -> Self {
        match price {
            Price::Priced(m) => PriceRepr::Amount(m.cents() as f64 / 100.0),
            Price::NeedsManualPricing => PriceRepr::Sentinel(DESIGN_SENTINEL.to_string()),
        }
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// Outcome of one quote. Always freshly computed, never persisted here.
///
/// Exactly one of these holds:
/// - `error` is set (validation failure, missing factor row, no chase size)
/// - `finalPrice` is set (priced)
/// - `price` is `"DESIGN"` (office to price)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingResult {
    pub metal: Option<String>,
    pub product: Option<String>,
    pub tier: Option<String>,

    /// Size label, or `"N/A"` when no category applies.
    pub size_category: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | \"DESIGN\" | null")]
    pub base_price: Option<Price>,

    #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub base_factor: Option<Decimal>,

    /// Multi-flue pricing length (length + width).
    #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub perimeter: Option<Decimal>,

    #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub adjusted_factor: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub tier_multiplier: Decimal,

    #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub tiered_factor: Option<Decimal>,

    /// Final amount in dollars, exactly two decimals. Absent when unpriced.
    #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub final_price: Option<Decimal>,

    /// Table-path price (`"DESIGN"` when the office must price it).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | \"DESIGN\" | null")]
    pub price: Option<Price>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub surcharges: Option<SurchargeBreakdown>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Per-rule adjustment contributions (multi-flue only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<AdjustmentBreakdown>,
}

impl PricingResult {
    /// An empty result echoing the request identifiers.
    pub(crate) fn blank(metal: Option<String>, product: Option<String>, tier: Option<String>) -> Self {
        PricingResult {
            metal,
            product,
            tier,
            size_category: NOT_APPLICABLE.to_string(),
            base_price: None,
            base_factor: None,
            perimeter: None,
            adjusted_factor: None,
            tier_multiplier: Decimal::ONE,
            tiered_factor: None,
            final_price: None,
            price: None,
            surcharges: None,
            message: String::new(),
            error: None,
            debug: None,
        }
    }

    /// Final price as cents, if priced.
    pub fn final_money(&self) -> Option<Money> {
        self.final_price.and_then(Money::from_decimal)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// True when the quote was routed to the office.
    pub fn needs_manual_pricing(&self) -> bool {
        matches!(self.price, Some(Price::NeedsManualPricing))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_deserializes_number_and_sentinel() {
        let p: Price = serde_json::from_str("419.99").unwrap();
        assert_eq!(p, Price::Priced(Money::from_cents(41999)));

        let p: Price = serde_json::from_str("\"DESIGN\"").unwrap();
        assert_eq!(p, Price::NeedsManualPricing);

        assert!(serde_json::from_str::<Price>("\"TBD\"").is_err());
        assert!(serde_json::from_str::<Price>("-5").is_err());
    }

    #[test]
    fn test_price_serializes_as_number_or_sentinel() {
        assert_eq!(
            serde_json::to_string(&Price::Priced(Money::from_cents(37500))).unwrap(),
            "375.0"
        );
        assert_eq!(
            serde_json::to_string(&Price::NeedsManualPricing).unwrap(),
            "\"DESIGN\""
        );
    }

    #[test]
    fn test_raw_metal_falls_back_to_metal_type() {
        let mut req = PricingRequest::new("dynasty", "", "elite");
        req.metal_type = Some("Copper".to_string());
        assert_eq!(req.raw_metal(), Some("Copper"));

        req.metal = Some("ss".to_string());
        assert_eq!(req.raw_metal(), Some("ss"));
    }

    #[test]
    fn test_request_parses_camel_case() {
        let req: PricingRequest = serde_json::from_str(
            r#"{"product":"chase_cover","metalType":"kynar","tier":"vg",
                "length":30,"width":20,"skirt":3,"holes":2,"unsquare":true}"#,
        )
        .unwrap();
        assert_eq!(req.raw_metal(), Some("kynar"));
        assert_eq!(req.length, Some(30.0));
        assert_eq!(req.holes, 2);
        assert!(req.unsquare);
        assert_eq!(req.pitch, None);
    }

    #[test]
    fn test_metal_class_gates() {
        assert!(MetalKey::new("copper").class().uses_perimeter_sizing());
        assert!(!MetalKey::new("stainless").class().uses_perimeter_sizing());
        assert_eq!(
            MetalKey::new("kynar").class().surcharge_class(),
            SurchargeClass::Coated
        );
        assert_eq!(
            MetalKey::new("galvalume").class().surcharge_class(),
            SurchargeClass::Standard
        );
    }

    #[test]
    fn test_size_bucket_keys() {
        let json = serde_json::to_string(&SizeBucket::SmallTall).unwrap();
        assert_eq!(json, "\"small_tall\"");
        assert_eq!(SizeBucket::LargeTall.as_str(), "large_tall");
    }
}
