//! # Key Normalizer
//!
//! Turns free-form metal, tier, and product strings into table keys.
//!
//! ```text
//! "SS304"            ──► MetalKey("stainless")
//! "G90"              ──► MetalKey("black_galvanized")
//! "Value-Gold"       ──► "vg"
//! "Flat Top-Outside" ──► "flat_top_outside" ──► MultiFlue
//! ```
//!
//! Unknown metals and tiers pass through lower-cased; the tables decide
//! whether they exist.

use crate::error::ValidationError;
use crate::types::{MetalKey, ProductKind, ShroudModel};

/// Raw metal spellings → canonical key.
const METAL_ALIASES: &[(&str, &str)] = &[
    ("black galvanized", "black_galvanized"),
    ("black_galvanized", "black_galvanized"),
    ("black-galvanized", "black_galvanized"),
    ("blackgalvanized", "black_galvanized"),
    ("g90", "black_galvanized"),
    ("kynar", "kynar"),
    ("kynar painted", "kynar"),
    ("painted", "kynar"),
    ("stainless", "stainless"),
    ("stainless steel", "stainless"),
    ("stainless_steel", "stainless"),
    ("ss", "stainless"),
    ("ss304", "stainless"),
    ("304", "stainless"),
    ("ss316", "stainless"),
    ("316", "stainless"),
    ("ss430", "stainless"),
    ("430", "stainless"),
    ("copper", "copper"),
    ("cu", "copper"),
    ("16oz copper", "copper"),
];

/// Long tier names → short tier codes.
const TIER_ALIASES: &[(&str, &str)] = &[
    ("value-gold", "vg"),
    ("value gold", "vg"),
    ("value-silver", "vs"),
    ("value silver", "vs"),
    ("value-bronze", "vb"),
    ("value bronze", "vb"),
    ("preferred", "pref"),
    ("wholesale", "ws"),
];

/// Tokens that mark a multi-flue cap geometry.
const MULTI_FLUE_TOKENS: &[&str] = &[
    "flat_top",
    "hip_and_ridge",
    "hip_ridge",
    "peak",
    "corbel",
    "outside_mount",
    "inside_mount",
];

// =============================================================================
// Metal
// =============================================================================

/// Canonicalizes a raw metal string.
///
/// Returns `None` for absent or blank input; callers treat that as a
/// validation failure.
///
/// ```rust
/// use capquote_core::normalize::normalize_metal;
///
/// assert_eq!(normalize_metal(Some(" G90 ")).unwrap().as_str(), "black_galvanized");
/// assert_eq!(normalize_metal(Some("Galvalume")).unwrap().as_str(), "galvalume");
/// assert!(normalize_metal(Some("  ")).is_none());
/// ```
pub fn normalize_metal(raw: Option<&str>) -> Option<MetalKey> {
    let lowered = raw?.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    let canonical = METAL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, key)| (*key).to_string())
        .unwrap_or(lowered);
    Some(MetalKey::new(canonical))
}

// =============================================================================
// Tier
// =============================================================================

/// Lower-cases and trims a raw tier string. Empty input yields `None`.
pub fn lower_tier(raw: Option<&str>) -> Option<String> {
    let lowered = raw?.trim().to_lowercase();
    (!lowered.is_empty()).then_some(lowered)
}

/// Maps a lower-cased tier name to its short code; unknown names pass through.
pub fn alias_tier(lowered: &str) -> &str {
    TIER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, code)| *code)
        .unwrap_or(lowered)
}

// =============================================================================
// Product
// =============================================================================

/// Lower-cases, trims, and turns spaces and hyphens into underscores.
pub fn normalize_product_id(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

type Classifier = fn(&str) -> Option<ProductKind>;

/// Classification predicates in priority order; the first match wins.
///
/// Multi-flue geometry outranks shroud model names, so an id such as
/// `regal_corbel` is a corbel multi-flue cap rather than a Regal shroud.
const CLASSIFIERS: &[Classifier] = &[classify_chase_cover, classify_multi_flue, classify_shroud];

fn classify_chase_cover(id: &str) -> Option<ProductKind> {
    id.contains("chase_cover").then_some(ProductKind::ChaseCover)
}

fn classify_multi_flue(id: &str) -> Option<ProductKind> {
    MULTI_FLUE_TOKENS
        .iter()
        .any(|token| id.contains(token))
        .then(|| ProductKind::MultiFlue {
            subtype: id.to_string(),
        })
}

fn classify_shroud(id: &str) -> Option<ProductKind> {
    ShroudModel::ALL
        .into_iter()
        .find(|model| id.contains(model.as_str()))
        .map(|model| ProductKind::Shroud { model })
}

/// Classifies a raw product identifier into its family.
///
/// ```rust
/// use capquote_core::normalize::classify_product;
/// use capquote_core::types::{ProductKind, ShroudModel};
///
/// assert_eq!(classify_product(Some("Chase Cover")).unwrap(), ProductKind::ChaseCover);
/// assert_eq!(
///     classify_product(Some("dynasty")).unwrap(),
///     ProductKind::Shroud { model: ShroudModel::Dynasty }
/// );
/// ```
pub fn classify_product(raw: Option<&str>) -> Result<ProductKind, ValidationError> {
    let raw = raw.unwrap_or_default();
    let id = normalize_product_id(raw);
    if id.is_empty() {
        return Err(ValidationError::required("product"));
    }
    CLASSIFIERS
        .iter()
        .find_map(|classify| classify(&id))
        .ok_or_else(|| ValidationError::UnknownProduct {
            product: raw.trim().to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
