//! # Configuration Tables
//!
//! The table snapshot the engine prices against, and the `TableSource`
//! seam through which it arrives.
//!
//! ## Snapshot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Snapshot Per Quote                               │
//! │                                                                         │
//! │  quote(request)                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  source.snapshot() ──► PricingTables (owned, immutable for this call)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sizing → lookup → adjustment → tier → rounding → surcharges            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  snapshot dropped (admin edits are visible to the next quote)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The file-backed source lives in capquote-store. [`StaticTables`] serves
//! callers that already hold a parsed snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CoreResult;
use crate::money::{decimal_from_f64, Money};
use crate::types::{Price, SizeBucket};

/// Skirt increment between generated chase-cover entries (inches).
pub const CHASE_SKIRT_STEP: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Length/width reduction per chase-cover step (inches).
pub const CHASE_SHRINK_STEP: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

// =============================================================================
// Snapshot Provider
// =============================================================================

/// Supplies the current table state.
///
/// Implementations must hand out a complete snapshot: a concurrent admin
/// write is either fully visible or not visible at all.
pub trait TableSource {
    fn snapshot(&self) -> CoreResult<PricingTables>;
}

impl<T: TableSource + ?Sized> TableSource for &T {
    fn snapshot(&self) -> CoreResult<PricingTables> {
        (**self).snapshot()
    }
}

/// An in-memory snapshot handed out as-is.
#[derive(Debug, Clone, Default)]
pub struct StaticTables {
    tables: PricingTables,
}

impl StaticTables {
    pub fn new(tables: PricingTables) -> Self {
        StaticTables { tables }
    }

    /// Mutable access, for callers that stage edits between quotes.
    pub fn tables_mut(&mut self) -> &mut PricingTables {
        &mut self.tables
    }
}

impl TableSource for StaticTables {
    fn snapshot(&self) -> CoreResult<PricingTables> {
        Ok(self.tables.clone())
    }
}

// =============================================================================
// Full Snapshot
// =============================================================================

/// Every table the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingTables {
    #[serde(default)]
    pub tiers: TierTable,

    #[serde(default)]
    pub shrouds: ShroudTables,

    #[serde(default)]
    pub chase_covers: ChaseCoverTables,

    /// metal → product → factor row.
    #[serde(default)]
    pub multi_flue: BTreeMap<String, BTreeMap<String, FactorRow>>,

    #[serde(default)]
    pub surcharges: SurchargeSchedule,
}

// =============================================================================
// Tier Table
// =============================================================================

/// Tier key → price multiplier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTable(BTreeMap<String, f64>);

impl TierTable {
    pub fn new() -> Self {
        TierTable::default()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn insert(&mut self, key: impl Into<String>, multiplier: f64) -> Option<f64> {
        self.0.insert(key.into(), multiplier)
    }

    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for TierTable {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        TierTable(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// =============================================================================
// Shroud Tables
// =============================================================================

/// Shroud sizing and prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShroudTables {
    /// metal → sizing configuration.
    #[serde(default)]
    pub sizing: BTreeMap<String, ShroudSizing>,

    /// metal → model → size → price.
    #[serde(default)]
    pub prices: BTreeMap<String, BTreeMap<String, BTreeMap<String, Price>>>,
}

/// Per-metal sizing configuration.
///
/// Non-copper metals use `cutoffs`/`restricted`; copper uses `perimeter_rules`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShroudSizing {
    /// Upper bound (exclusive) of `length + width + 1` per bucket.
    #[serde(default)]
    pub cutoffs: BTreeMap<SizeBucket, f64>,

    /// Buckets this metal is never built in.
    #[serde(default)]
    pub restricted: Vec<SizeBucket>,

    /// Copper perimeter rules, scanned in listed order.
    #[serde(default)]
    pub perimeter_rules: Vec<PerimeterRule>,
}

/// Copper size label keyed by an exclusive maximum perimeter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerimeterRule {
    pub max: f64,
    pub label: String,
}

// =============================================================================
// Chase Cover Tables
// =============================================================================

fn default_skirt_precision() -> u32 {
    2
}

/// Chase-cover sizes and prices, set per metal and tier.
///
/// Chase prices are already tier-specific, so no tier multiplier is applied
/// on top of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaseCoverTables {
    /// Decimal places a requested skirt must match an entry to.
    #[serde(default = "default_skirt_precision")]
    pub skirt_precision: u32,

    /// metal → tier → size specs, scanned in listed order.
    #[serde(default)]
    pub sizes: BTreeMap<String, BTreeMap<String, Vec<ChaseSizeSpec>>>,

    /// metal → tier → size → price.
    #[serde(default)]
    pub prices: BTreeMap<String, BTreeMap<String, BTreeMap<String, Price>>>,
}

impl Default for ChaseCoverTables {
    fn default() -> Self {
        ChaseCoverTables {
            skirt_precision: default_skirt_precision(),
            sizes: BTreeMap::new(),
            prices: BTreeMap::new(),
        }
    }
}

/// Seed for one chase-cover size.
///
/// Expands into `steps + 1` entries: each step adds 0.25" of skirt and takes
/// 0.5" off both maximum length and maximum width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaseSizeSpec {
    pub size: String,
    pub base_skirt: f64,
    pub max_length: f64,
    pub max_width: f64,
    #[serde(default)]
    pub steps: u32,
}

/// One admissible `(skirt, maxLength, maxWidth)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChaseEntry {
    pub skirt: Decimal,
    pub max_length: Decimal,
    pub max_width: Decimal,
}

impl ChaseSizeSpec {
    /// Generates the stepped entries. Empty if any seed value is not finite.
    pub fn entries(&self) -> Vec<ChaseEntry> {
        let (Some(skirt), Some(length), Some(width)) = (
            decimal_from_f64(self.base_skirt),
            decimal_from_f64(self.max_length),
            decimal_from_f64(self.max_width),
        ) else {
            return Vec::new();
        };

        (0..=self.steps)
            .map_while(|step| {
                let k = Decimal::from(step);
                let shrink = CHASE_SHRINK_STEP.checked_mul(k)?;
                Some(ChaseEntry {
                    skirt: skirt.checked_add(CHASE_SKIRT_STEP.checked_mul(k)?)?,
                    max_length: length.checked_sub(shrink)?,
                    max_width: width.checked_sub(shrink)?,
                })
            })
            .collect()
    }
}

// =============================================================================
// Multi-Flue Factor Rows
// =============================================================================

/// Base factor plus adjustment rules for one metal/product pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorRow {
    pub base_factor: f64,
    #[serde(default)]
    pub rules: AdjustmentRules,
}

/// Step rules per secondary measurement. A missing rule contributes nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRules {
    #[serde(default)]
    pub screen: Option<StepRule>,
    #[serde(default)]
    pub overhang: Option<StepRule>,
    #[serde(default)]
    pub inset: Option<StepRule>,
    #[serde(default)]
    pub skirt: Option<StepRule>,
    #[serde(default)]
    pub pitch: Option<PitchRule>,
}

/// "Every `interval` inches past `standard` costs `rate`."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRule {
    #[serde(default)]
    pub standard: Option<f64>,
    #[serde(default)]
    pub interval: Option<f64>,
    pub rate: f64,
}

impl StepRule {
    pub fn new(standard: f64, interval: f64, rate: f64) -> Self {
        StepRule {
            standard: Some(standard),
            interval: Some(interval),
            rate,
        }
    }
}

/// Roof pitch adjustment constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchRule {
    /// Added once for pitch ≤ 5.
    pub below: f64,
    /// Added per whole pitch unit above 9.
    pub above: f64,
}

// =============================================================================
// Surcharges
// =============================================================================

/// Coated/standard amount pair. Neither amount may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SurchargeAmountsRepr")]
pub struct SurchargeAmounts {
    pub coated: Money,
    pub standard: Money,
}

impl SurchargeAmounts {
    /// True when both amounts are zero or more.
    pub fn is_non_negative(&self) -> bool {
        !self.coated.is_negative() && !self.standard.is_negative()
    }
}

#[derive(Deserialize)]
struct SurchargeAmountsRepr {
    coated: Money,
    standard: Money,
}

impl TryFrom<SurchargeAmountsRepr> for SurchargeAmounts {
    type Error = String;

    fn try_from(repr: SurchargeAmountsRepr) -> Result<Self, Self::Error> {
        let amounts = SurchargeAmounts {
            coated: repr.coated,
            standard: repr.standard,
        };
        if amounts.is_non_negative() {
            Ok(amounts)
        } else {
            Err(format!(
                "surcharge amounts must not be negative (coated {}, standard {})",
                amounts.coated, amounts.standard
            ))
        }
    }
}

/// Flat and per-unit addons. Amounts are stored in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeSchedule {
    pub unsquare: SurchargeAmounts,
    pub per_extra_hole: SurchargeAmounts,
}

impl SurchargeSchedule {
    /// True when every amount is zero or more.
    pub fn is_non_negative(&self) -> bool {
        self.unsquare.is_non_negative() && self.per_extra_hole.is_non_negative()
    }
}

impl Default for SurchargeSchedule {
    fn default() -> Self {
        SurchargeSchedule {
            unsquare: SurchargeAmounts {
                coated: Money::from_dollars(60),
                standard: Money::from_dollars(85),
            },
            per_extra_hole: SurchargeAmounts {
                coated: Money::from_dollars(25),
                standard: Money::from_dollars(45),
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
