//! # capquote-core: Pricing Engine for Roof Accessories
//!
//! Quotes chase covers, multi-flue caps, and chimney shrouds from raw
//! measurements, a metal, and a negotiated pricing tier.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        capquote Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Calling layer (HTTP, order forms)                 │   │
//! │  │        builds PricingRequest ──► renders PricingResult          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ capquote-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ normalize │  │  sizing   │  │adjustment │  │ rounding  │  │   │
//! │  │   │   tier    │  │  lookup   │  │ surcharge │  │  money    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CACHED TABLES • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ TableSource                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              capquote-store (JSON table files)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - `PricingEngine` and the end-to-end quote pipeline
//! - [`normalize`] - Metal/tier aliases and product classification
//! - [`tier`] - Tier multiplier resolution with fallbacks
//! - [`sizing`] - Size-category resolution (cutoffs, copper perimeter, chase covers)
//! - [`lookup`] - Price and factor table reads
//! - [`adjustment`] - Multi-flue step rules
//! - [`rounding`] - The 4dp → 2dp → cents cascade
//! - [`surcharge`] - Unsquare and extra-hole addons
//! - [`money`] - Integer-cents `Money`
//! - [`tables`] - Table snapshot types and the `TableSource` trait
//! - [`types`] - Request, result, and classification types
//! - [`error`] - Domain error types
//! - [`validation`] - Measurement checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same request + same snapshot = same result
//! 2. **Fresh Tables**: one snapshot per quote, nothing kept afterwards
//! 3. **Integer Money**: final amounts are whole cents
//! 4. **Results, Not Panics**: business failures land in `PricingResult::error`
//!
//! ## Example Usage
//!
//! ```rust
//! use capquote_core::tables::{FactorRow, PricingTables, StaticTables};
//! use capquote_core::{PricingEngine, PricingRequest};
//!
//! let mut tables = PricingTables::default();
//! tables.tiers.insert("elite", 1.0);
//! tables
//!     .multi_flue
//!     .entry("stainless".to_string())
//!     .or_default()
//!     .insert(
//!         "flat_top_outside_mount".to_string(),
//!         FactorRow { base_factor: 1.0, rules: Default::default() },
//!     );
//!
//! let engine = PricingEngine::new(StaticTables::new(tables));
//! let request = PricingRequest::new("flat_top_outside_mount", "ss304", "elite").with_size(30.0, 20.0);
//! let result = engine.quote(&request).unwrap();
//!
//! // perimeter 50 × factor 1.00
//! assert_eq!(result.final_money().unwrap().cents(), 5000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod adjustment;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod money;
pub mod normalize;
pub mod rounding;
pub mod sizing;
pub mod surcharge;
pub mod tables;
pub mod tier;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::{price_request, PricingEngine};
pub use error::{CoreError, CoreResult, QuoteRejection, ValidationError};
pub use money::Money;
pub use tables::{PricingTables, StaticTables, TableSource};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stored price meaning "not yet priced, the office quotes it by hand".
pub const DESIGN_SENTINEL: &str = "DESIGN";

/// Size category reported when none applies.
pub const NOT_APPLICABLE: &str = "N/A";

/// Tier used when neither the aliased nor the raw key is in the table.
pub const ELITE_TIER: &str = "elite";

pub const MESSAGE_PRICED: &str = "Price calculated";

pub const MESSAGE_OFFICE_TO_PRICE: &str = "Office to Price";

/// Message paired with a populated `error` field.
pub const MESSAGE_REJECTED: &str = "Unable to calculate price";
