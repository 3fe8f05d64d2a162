//! # capquote-store: Pricing Table Storage
//!
//! File-backed implementation of the `TableSource` seam, plus the admin
//! write side.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Table Storage                                    │
//! │                                                                         │
//! │  PricingEngine::quote ──► FileTableStore::snapshot ──► read all files   │
//! │                                                                         │
//! │  admin edit ──► read one file ──► modify ──► atomic_write               │
//! │                                                                         │
//! │  Readers always re-read; writers always replace whole files.           │
//! │  No locks, no versions: concurrent edits are last-writer-wins.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`store`] - `FileTableStore` (snapshot + admin edits)
//! - [`atomic`] - Temp-file + rename replacement
//! - [`config`] - Table directory and output format
//! - [`seed`] - Starter table set
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use capquote_core::{PricingEngine, PricingRequest};
//! use capquote_store::{FileTableStore, StoreConfig};
//!
//! let config = StoreConfig::load_or_default(None);
//! let engine = PricingEngine::new(FileTableStore::new(&config));
//!
//! let result = engine.quote(&PricingRequest::new("dynasty", "ss", "vg").with_size(20.0, 18.0))?;
//! println!("{}: {:?}", result.message, result.final_price);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod atomic;
pub mod config;
pub mod error;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{StoreConfig, TableSettings};
pub use error::{StoreError, StoreResult};
pub use seed::default_tables;
pub use store::FileTableStore;
