//! # Tier Multiplier Resolver
//!
//! Maps a raw tier string to a multiplier from the current tier table.
//!
//! ## Fallback Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw "Value-Gold"                                                       │
//! │       │ lower-case + alias                                              │
//! │       ▼                                                                 │
//! │  1. table["vg"]          found? ──► (vg, m)                             │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  2. table["value-gold"]  found? ──► (value-gold, m)                     │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  3. table["elite"]       found? ──► (elite, m)                          │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  4. (elite, 1.0)                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A partially populated tier table never fails a quote.
//!
//! Chase-cover tables are keyed by tier directly; [`select_tier_entry`]
//! walks steps 1-3 of the same chain over such a map.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::normalize::{alias_tier, lower_tier};
use crate::tables::TierTable;
use crate::ELITE_TIER;

/// Multiplier used when even the elite tier is missing.
pub const DEFAULT_MULTIPLIER: f64 = 1.0;

/// Which step of the chain produced the multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierSource {
    Aliased,
    Raw,
    EliteFallback,
    HardDefault,
}

/// Resolved tier key and multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct TierResolution {
    pub tier_key: String,
    pub multiplier: f64,
    pub source: TierSource,
}

/// Resolves a raw tier against the current table.
pub fn resolve_tier(raw: Option<&str>, table: &TierTable) -> TierResolution {
    if let Some(lowered) = lower_tier(raw) {
        let aliased = alias_tier(&lowered);
        if let Some(multiplier) = table.get(aliased) {
            return TierResolution {
                tier_key: aliased.to_string(),
                multiplier,
                source: TierSource::Aliased,
            };
        }
        if let Some(multiplier) = table.get(&lowered) {
            debug!(tier = %lowered, "Tier matched on unaliased key");
            return TierResolution {
                tier_key: lowered,
                multiplier,
                source: TierSource::Raw,
            };
        }
        debug!(tier = %lowered, "Tier not in table, falling back to elite");
    }

    match table.get(ELITE_TIER) {
        Some(multiplier) => TierResolution {
            tier_key: ELITE_TIER.to_string(),
            multiplier,
            source: TierSource::EliteFallback,
        },
        None => {
            warn!("Tier table has no elite entry, using multiplier 1.0");
            TierResolution {
                tier_key: ELITE_TIER.to_string(),
                multiplier: DEFAULT_MULTIPLIER,
                source: TierSource::HardDefault,
            }
        }
    }
}

/// Picks the entry for a raw tier out of a tier-keyed map.
///
/// Tries the aliased key, then the lower-cased raw key, then `elite`.
/// Returns the key that matched alongside its entry.
///
/// ```rust
/// use std::collections::BTreeMap;
/// use capquote_core::tier::select_tier_entry;
///
/// let mut prices = BTreeMap::new();
/// prices.insert("elite".to_string(), 300);
/// prices.insert("vg".to_string(), 270);
///
/// assert_eq!(select_tier_entry(Some("Value-Gold"), &prices), Some(("vg", &270)));
/// assert_eq!(select_tier_entry(Some("platinum"), &prices), Some(("elite", &300)));
/// ```
pub fn select_tier_entry<'a, V>(raw: Option<&str>, entries: &'a BTreeMap<String, V>) -> Option<(&'a str, &'a V)> {
    let lowered = lower_tier(raw);
    let aliased = lowered.as_deref().map(alias_tier);
    let found = [aliased, lowered.as_deref(), Some(ELITE_TIER)]
        .into_iter()
        .flatten()
        .find_map(|key| entries.get_key_value(key))
        .map(|(key, entry)| (key.as_str(), entry));
    found
}

// =============================================================================
// Unit Tests
// =============================================================================
