//! # File Table Store
//!
//! One JSON file per table, re-read in full on every snapshot.
//!
//! ## Directory Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  <table dir>/                                                           │
//! │  ├── tiers.json          tier key → multiplier                          │
//! │  ├── shrouds.json        sizing + metal/model/size prices               │
//! │  ├── chase_covers.json   metal/tier size specs + metal/tier/size prices │
//! │  ├── multi_flue.json     metal → product → factor row                   │
//! │  └── surcharges.json     optional; defaults when absent                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Path
//! Every admin edit is read → modify → atomic replace of one file. There is
//! no locking: two concurrent edits of the same file race and the last
//! rename wins. A snapshot never observes a half-written file.
//!
//! Edit keys are normalized the way quotes look them up: metals through the
//! metal aliases (`"SS304"` → `stainless`), tiers to their short codes
//! (`"Wholesale"` → `ws`), products through the product-id normalizer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use capquote_core::normalize::{alias_tier, lower_tier, normalize_metal, normalize_product_id};
use capquote_core::tables::{ChaseCoverTables, FactorRow, ShroudTables, SurchargeSchedule, TierTable};
use capquote_core::{CoreResult, Price, PricingTables, TableSource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::atomic::atomic_write;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

pub const TIERS_FILE: &str = "tiers.json";
pub const SHROUDS_FILE: &str = "shrouds.json";
pub const CHASE_COVERS_FILE: &str = "chase_covers.json";
pub const MULTI_FLUE_FILE: &str = "multi_flue.json";
pub const SURCHARGES_FILE: &str = "surcharges.json";

type MultiFlueTable = BTreeMap<String, BTreeMap<String, FactorRow>>;

/// Table files under one directory.
#[derive(Debug, Clone)]
pub struct FileTableStore {
    dir: PathBuf,
    pretty: bool,
}

impl FileTableStore {
    pub fn new(config: &StoreConfig) -> Self {
        FileTableStore {
            dir: config.tables.dir.clone(),
            pretty: config.tables.pretty,
        }
    }

    /// Store rooted at `dir` with pretty-printed output.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(&StoreConfig::with_table_dir(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // =========================================================================
    // Read Side
    // =========================================================================

    /// Reads every table file into a fresh snapshot.
    pub fn load(&self) -> StoreResult<PricingTables> {
        let tables = PricingTables {
            tiers: self.read_table(TIERS_FILE)?,
            shrouds: self.read_table(SHROUDS_FILE)?,
            chase_covers: self.read_table(CHASE_COVERS_FILE)?,
            multi_flue: self.read_table(MULTI_FLUE_FILE)?,
            surcharges: self.read_optional_table(SURCHARGES_FILE)?,
        };
        debug!(dir = ?self.dir, tiers = tables.tiers.len(), "Loaded pricing tables");
        Ok(tables)
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn read_table<T: DeserializeOwned>(&self, file: &str) -> StoreResult<T> {
        let bytes = std::fs::read(self.path(file))?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            table: file.to_string(),
            source,
        })
    }

    fn read_optional_table<T: DeserializeOwned + Default>(&self, file: &str) -> StoreResult<T> {
        match std::fs::read(self.path(file)) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                table: file.to_string(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(file, "Optional table missing, using defaults");
                Ok(T::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Write Side
    // =========================================================================

    fn write_table<T: Serialize>(&self, file: &str, table: &T) -> StoreResult<()> {
        let serialized = if self.pretty {
            serde_json::to_vec_pretty(table)
        } else {
            serde_json::to_vec(table)
        };
        let bytes = serialized.map_err(|source| StoreError::Serialize {
            table: file.to_string(),
            source,
        })?;
        atomic_write(&self.path(file), &bytes)?;
        Ok(())
    }

    /// Replaces every table file with `tables`.
    pub fn write_snapshot(&self, tables: &PricingTables) -> StoreResult<()> {
        self.write_table(TIERS_FILE, &tables.tiers)?;
        self.write_table(SHROUDS_FILE, &tables.shrouds)?;
        self.write_table(CHASE_COVERS_FILE, &tables.chase_covers)?;
        self.write_table(MULTI_FLUE_FILE, &tables.multi_flue)?;
        self.write_table(SURCHARGES_FILE, &tables.surcharges)?;
        info!(dir = ?self.dir, "Wrote full table snapshot");
        Ok(())
    }

    /// Sets (or adds) one tier multiplier.
    pub fn set_tier_multiplier(&self, tier: &str, multiplier: f64) -> StoreResult<()> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(StoreError::InvalidValue {
                field: format!("tier '{tier}'"),
                value: multiplier.to_string(),
            });
        }
        let key = tier_key(tier)?;
        let mut tiers: TierTable = self.read_table(TIERS_FILE)?;
        let previous = tiers.insert(key.clone(), multiplier);
        self.write_table(TIERS_FILE, &tiers)?;
        info!(tier = %key, ?previous, multiplier, "Tier multiplier updated");
        Ok(())
    }

    /// Removes a tier; quotes for it fall back to elite afterwards.
    pub fn remove_tier(&self, tier: &str) -> StoreResult<()> {
        let key = tier_key(tier)?;
        let mut tiers: TierTable = self.read_table(TIERS_FILE)?;
        tiers.remove(&key).ok_or_else(|| StoreError::NotFound {
            table: TIERS_FILE.to_string(),
            key: key.clone(),
        })?;
        self.write_table(TIERS_FILE, &tiers)?;
        info!(tier = %key, "Tier removed");
        Ok(())
    }

    pub fn set_shroud_price(&self, metal: &str, model: &str, size: &str, price: Price) -> StoreResult<()> {
        let metal = metal_key(metal)?;
        let mut shrouds: ShroudTables = self.read_table(SHROUDS_FILE)?;
        shrouds
            .prices
            .entry(metal.clone())
            .or_default()
            .entry(normalize_key(model))
            .or_default()
            .insert(normalize_key(size), price);
        self.write_table(SHROUDS_FILE, &shrouds)?;
        info!(%metal, model, size, ?price, "Shroud price updated");
        Ok(())
    }

    /// Sets the price of one chase-cover size for a metal and tier.
    pub fn set_chase_cover_price(&self, metal: &str, tier: &str, size: &str, price: Price) -> StoreResult<()> {
        let metal = metal_key(metal)?;
        let tier = tier_key(tier)?;
        let mut chase: ChaseCoverTables = self.read_table(CHASE_COVERS_FILE)?;
        chase
            .prices
            .entry(metal.clone())
            .or_default()
            .entry(tier.clone())
            .or_default()
            .insert(normalize_key(size), price);
        self.write_table(CHASE_COVERS_FILE, &chase)?;
        info!(%metal, %tier, size, ?price, "Chase cover price updated");
        Ok(())
    }

    /// Sets the base factor and rules for one metal/product pair.
    pub fn set_factor_row(&self, metal: &str, product: &str, row: FactorRow) -> StoreResult<()> {
        if !row.base_factor.is_finite() {
            return Err(StoreError::InvalidValue {
                field: format!("base factor for {metal}/{product}"),
                value: row.base_factor.to_string(),
            });
        }
        let metal = metal_key(metal)?;
        let product = normalize_product_id(product);
        let mut multi_flue: MultiFlueTable = self.read_table(MULTI_FLUE_FILE)?;
        multi_flue
            .entry(metal.clone())
            .or_default()
            .insert(product.clone(), row);
        self.write_table(MULTI_FLUE_FILE, &multi_flue)?;
        info!(%metal, %product, "Factor row updated");
        Ok(())
    }

    /// Replaces the surcharge schedule. Negative amounts are rejected.
    pub fn set_surcharges(&self, schedule: &SurchargeSchedule) -> StoreResult<()> {
        if !schedule.is_non_negative() {
            return Err(StoreError::InvalidValue {
                field: "surcharges".to_string(),
                value: format!("{schedule:?}"),
            });
        }
        self.write_table(SURCHARGES_FILE, schedule)?;
        info!("Surcharge schedule updated");
        Ok(())
    }
}

impl TableSource for FileTableStore {
    fn snapshot(&self) -> CoreResult<PricingTables> {
        Ok(self.load()?)
    }
}

/// Model and size keys are stored lower-case and trimmed.
fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Canonical metal key, as quotes look it up.
fn metal_key(raw: &str) -> StoreResult<String> {
    normalize_metal(Some(raw))
        .map(|metal| metal.as_str().to_string())
        .ok_or_else(|| StoreError::InvalidValue {
            field: "metal".to_string(),
            value: raw.to_string(),
        })
}

/// Short tier code, as quotes look it up first.
fn tier_key(raw: &str) -> StoreResult<String> {
    lower_tier(Some(raw))
        .map(|lowered| alias_tier(&lowered).to_string())
        .ok_or_else(|| StoreError::InvalidValue {
            field: "tier".to_string(),
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_empty_tables() -> (TempDir, FileTableStore) {
        let dir = TempDir::new().unwrap();
        let store = FileTableStore::open(dir.path());
        store.write_snapshot(&PricingTables::default()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_surcharges_file_uses_defaults() {
        let (dir, store) = store_with_empty_tables();
        std::fs::remove_file(dir.path().join(SURCHARGES_FILE)).unwrap();
        assert_eq!(store.load().unwrap().surcharges, SurchargeSchedule::default());
    }

    #[test]
    fn test_missing_required_file_is_an_error() {
        let (dir, store) = store_with_empty_tables();
        std::fs::remove_file(dir.path().join(TIERS_FILE)).unwrap();
        assert!(matches!(store.load(), Err(StoreError::Io(_))));
    }

    #[test]
    fn test_corrupt_file_names_the_table() {
        let (dir, store) = store_with_empty_tables();
        std::fs::write(dir.path().join(SHROUDS_FILE), "{ not json").unwrap();
        match store.load() {
            Err(StoreError::Parse { table, .. }) => assert_eq!(table, SHROUDS_FILE),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_tier_edits() {
        let (_dir, store) = store_with_empty_tables();
        store.set_tier_multiplier(" VG ", 0.9).unwrap();
        assert_eq!(store.load().unwrap().tiers.get("vg"), Some(0.9));

        store.remove_tier("vg").unwrap();
        assert!(store.load().unwrap().tiers.is_empty());
        assert!(matches!(store.remove_tier("vg"), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_invalid_multiplier_rejected() {
        let (_dir, store) = store_with_empty_tables();
        assert!(matches!(
            store.set_tier_multiplier("vg", f64::NAN),
            Err(StoreError::InvalidValue { .. })
        ));
        assert!(store.set_tier_multiplier("vg", -0.5).is_err());
    }

    #[test]
    fn test_edit_keys_match_quote_lookups() {
        let (_dir, store) = store_with_empty_tables();
        store.set_tier_multiplier("Wholesale", 0.8).unwrap();
        store
            .set_chase_cover_price("G90", "Value-Gold", "Small", Price::NeedsManualPricing)
            .unwrap();
        store
            .set_factor_row(
                "SS304",
                "Flat Top-Outside Mount",
                FactorRow {
                    base_factor: 1.0,
                    rules: Default::default(),
                },
            )
            .unwrap();

        let tables = store.load().unwrap();
        assert_eq!(tables.tiers.get("ws"), Some(0.8));
        assert_eq!(
            tables.chase_covers.prices["black_galvanized"]["vg"]["small"],
            Price::NeedsManualPricing
        );
        assert!(tables.multi_flue["stainless"].contains_key("flat_top_outside_mount"));
    }

    #[test]
    fn test_blank_metal_or_tier_rejected() {
        let (_dir, store) = store_with_empty_tables();
        assert!(matches!(
            store.set_shroud_price("  ", "dynasty", "small", Price::NeedsManualPricing),
            Err(StoreError::InvalidValue { .. })
        ));
        assert!(matches!(
            store.set_tier_multiplier("", 1.0),
            Err(StoreError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_negative_surcharges_rejected() {
        let (_dir, store) = store_with_empty_tables();
        let mut schedule = SurchargeSchedule::default();
        schedule.per_extra_hole.coated = capquote_core::Money::from_cents(-1);
        assert!(matches!(
            store.set_surcharges(&schedule),
            Err(StoreError::InvalidValue { .. })
        ));
        assert_eq!(store.load().unwrap().surcharges, SurchargeSchedule::default());
    }

    #[test]
    fn test_compact_output_when_not_pretty() {
        let dir = TempDir::new().unwrap();
        let mut config = StoreConfig::with_table_dir(dir.path());
        config.tables.pretty = false;
        let store = FileTableStore::new(&config);
        store.write_snapshot(&PricingTables::default()).unwrap();
        store.set_tier_multiplier("elite", 1.0).unwrap();
        let raw = std::fs::read_to_string(dir.path().join(TIERS_FILE)).unwrap();
        assert_eq!(raw, "{\"elite\":1.0}");
    }
}
