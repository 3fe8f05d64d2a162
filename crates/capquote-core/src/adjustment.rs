//! # Adjustment Engine
//!
//! Factor deltas for multi-flue caps, computed from the secondary
//! measurements. Each rule is applied independently; the total is the sum.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rule        Steps                                   Extra              │
//! │  ─────────   ─────────────────────────────────────   ────────────────   │
//! │  screen      ceil (max(0, v − std) / interval)       −0.19 if v ≤ 8     │
//! │  overhang    ceil (max(0, v − std) / interval)       std 5, interval 1  │
//! │  inset       floor(max(0, v − std) / interval)                          │
//! │  skirt       floor(max(0, v − std) / interval)                          │
//! │  pitch       v ≤ 5 → below; 6..=9 → 0; v ≥ 10 → floor(v − 9) × above    │
//! │  corbel      "corbel" product and inset + overhang + skirt > 9 → +0.15  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Step rules contribute `steps × rate`. A measurement absent from the
//! request skips its rule, screen correction included. Every step is
//! checked: a contribution or total outside `Decimal` range yields `None`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::money::decimal_from_f64;
use crate::tables::{AdjustmentRules, PitchRule, StepRule};

/// Subtracted from the factor when a screen of 8" or less is ordered.
pub const SHORT_SCREEN_CORRECTION: Decimal = Decimal::from_parts(19, 0, 0, true, 2);

/// Screens at or under this height get the correction.
pub const SHORT_SCREEN_MAX: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Added for deep corbel caps.
pub const CORBEL_BONUS: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Combined inset + overhang + skirt above which the corbel bonus applies.
pub const CORBEL_DEPTH_THRESHOLD: Decimal = Decimal::from_parts(9, 0, 0, false, 0);

const OVERHANG_DEFAULT_STANDARD: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
const PITCH_FLAT_MAX: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
const PITCH_STEEP_MIN: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
const PITCH_STEEP_BASE: Decimal = Decimal::from_parts(9, 0, 0, false, 0);

/// Secondary measurements, already validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjustmentInput<'a> {
    /// Normalized product id (checked for "corbel").
    pub product: &'a str,
    pub screen: Option<Decimal>,
    pub overhang: Option<Decimal>,
    pub inset: Option<Decimal>,
    pub skirt: Option<Decimal>,
    pub pitch: Option<Decimal>,
}

/// Every rule's contribution and the grand total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdjustmentBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub screen: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub screen_correction: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub overhang: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub inset: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub skirt: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub pitch: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub corbel: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepMode {
    Ceil,
    Floor,
}

/// Applies every configured rule to the input.
///
/// Returns `None` if any contribution or the total overflows.
pub fn compute_adjustment(input: &AdjustmentInput<'_>, rules: &AdjustmentRules) -> Option<AdjustmentBreakdown> {
    let mut breakdown = AdjustmentBreakdown::default();

    if let Some(screen) = input.screen {
        if let Some(rule) = &rules.screen {
            breakdown.screen = step_contribution("screen", screen, rule, StepMode::Ceil, Decimal::ZERO)?;
        }
        if screen <= SHORT_SCREEN_MAX {
            breakdown.screen_correction = SHORT_SCREEN_CORRECTION;
        }
    }

    if let (Some(overhang), Some(rule)) = (input.overhang, &rules.overhang) {
        breakdown.overhang =
            step_contribution("overhang", overhang, rule, StepMode::Ceil, OVERHANG_DEFAULT_STANDARD)?;
    }

    if let (Some(inset), Some(rule)) = (input.inset, &rules.inset) {
        breakdown.inset = step_contribution("inset", inset, rule, StepMode::Floor, Decimal::ZERO)?;
    }

    if let (Some(skirt), Some(rule)) = (input.skirt, &rules.skirt) {
        breakdown.skirt = step_contribution("skirt", skirt, rule, StepMode::Floor, Decimal::ZERO)?;
    }

    if let (Some(pitch), Some(rule)) = (input.pitch, &rules.pitch) {
        breakdown.pitch = pitch_contribution(pitch, rule)?;
    }

    breakdown.corbel = corbel_bonus(input);

    breakdown.total = [
        breakdown.screen_correction,
        breakdown.overhang,
        breakdown.inset,
        breakdown.skirt,
        breakdown.pitch,
        breakdown.corbel,
    ]
    .into_iter()
    .try_fold(breakdown.screen, |sum, part| sum.checked_add(part))?;

    debug!(
        product = input.product,
        screen = %breakdown.screen,
        screen_correction = %breakdown.screen_correction,
        overhang = %breakdown.overhang,
        inset = %breakdown.inset,
        skirt = %breakdown.skirt,
        pitch = %breakdown.pitch,
        corbel = %breakdown.corbel,
        total = %breakdown.total,
        "Multi-flue adjustments"
    );

    Some(breakdown)
}

/// `steps × rate`, never negative. `None` on overflow.
fn step_contribution(
    name: &str,
    value: Decimal,
    rule: &StepRule,
    mode: StepMode,
    default_standard: Decimal,
) -> Option<Decimal> {
    let standard = rule
        .standard
        .and_then(decimal_from_f64)
        .unwrap_or(default_standard);
    let interval = rule.interval.and_then(decimal_from_f64).unwrap_or(Decimal::ONE);
    let Some(rate) = decimal_from_f64(rule.rate) else {
        warn!(rule = name, "Adjustment rate is not a finite number, ignoring rule");
        return Some(Decimal::ZERO);
    };

    if interval <= Decimal::ZERO {
        warn!(rule = name, %interval, "Adjustment interval must be positive, ignoring rule");
        return Some(Decimal::ZERO);
    }

    let excess = value.checked_sub(standard)?.max(Decimal::ZERO);
    let ratio = excess.checked_div(interval)?;
    let steps = match mode {
        StepMode::Ceil => ratio.ceil(),
        StepMode::Floor => ratio.floor(),
    };
    steps.checked_mul(rate)
}

fn pitch_contribution(pitch: Decimal, rule: &PitchRule) -> Option<Decimal> {
    if pitch <= PITCH_FLAT_MAX {
        Some(decimal_from_f64(rule.below).unwrap_or_default())
    } else if pitch >= PITCH_STEEP_MIN {
        let steps = pitch.checked_sub(PITCH_STEEP_BASE)?.floor();
        steps.checked_mul(decimal_from_f64(rule.above).unwrap_or_default())
    } else {
        Some(Decimal::ZERO)
    }
}

fn corbel_bonus(input: &AdjustmentInput<'_>) -> Decimal {
    if !input.product.contains("corbel") {
        return Decimal::ZERO;
    }
    // a depth too large to sum is certainly past the threshold
    let depth = [input.inset, input.overhang, input.skirt]
        .into_iter()
        .flatten()
        .try_fold(Decimal::ZERO, |sum, part| sum.checked_add(part));
    if depth.map_or(true, |depth| depth > CORBEL_DEPTH_THRESHOLD) {
        CORBEL_BONUS
    } else {
        Decimal::ZERO
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input() -> AdjustmentInput<'static> {
        AdjustmentInput {
            product: "flat_top_outside_mount",
            ..Default::default()
        }
    }

    #[test]
    fn test_screen_steps_plus_short_screen_correction() {
        let rules = AdjustmentRules {
            screen: Some(StepRule::new(6.0, 1.0, 0.1)),
            ..Default::default()
        };
        let b = compute_adjustment(
            &AdjustmentInput {
                screen: Some(dec!(8)),
                ..input()
            },
            &rules,
        )
        .unwrap();
        assert_eq!(b.screen, dec!(0.2));
        assert_eq!(b.screen_correction, dec!(-0.19));
        assert_eq!(b.total, dec!(0.01));
    }

    #[test]
    fn test_screen_rounds_partial_steps_up() {
        let rules = AdjustmentRules {
            screen: Some(StepRule::new(6.0, 2.0, 0.1)),
            ..Default::default()
        };
        let b = compute_adjustment(
            &AdjustmentInput {
                screen: Some(dec!(9)),
                ..input()
            },
            &rules,
        )
        .unwrap();
        // ceil(3 / 2) = 2 steps, no correction above 8"
        assert_eq!(b.screen, dec!(0.2));
        assert_eq!(b.screen_correction, Decimal::ZERO);
    }

    #[test]
    fn test_short_screen_correction_without_rule() {
        let b = compute_adjustment(
            &AdjustmentInput {
                screen: Some(dec!(5)),
                ..input()
            },
            &AdjustmentRules::default(),
        )
        .unwrap();
        assert_eq!(b.total, dec!(-0.19));
    }

    #[test]
    fn test_overhang_defaults_and_no_discount() {
        let rules = AdjustmentRules {
            overhang: Some(StepRule {
                standard: None,
                interval: None,
                rate: 0.05,
            }),
            ..Default::default()
        };
        let b = compute_adjustment(
            &AdjustmentInput {
                overhang: Some(dec!(6.5)),
                ..input()
            },
            &rules,
        )
        .unwrap();
        // ceil(1.5 / 1) = 2
        assert_eq!(b.overhang, dec!(0.10));

        let b = compute_adjustment(
            &AdjustmentInput {
                overhang: Some(dec!(3)),
                ..input()
            },
            &rules,
        )
        .unwrap();
        assert_eq!(b.overhang, Decimal::ZERO);
    }

    #[test]
    fn test_inset_and_skirt_floor() {
        let rules = AdjustmentRules {
            inset: Some(StepRule::new(2.0, 1.0, 0.04)),
            skirt: Some(StepRule::new(4.0, 1.0, 0.17)),
            ..Default::default()
        };
        let b = compute_adjustment(
            &AdjustmentInput {
                inset: Some(dec!(3.9)),
                skirt: Some(dec!(6.5)),
                ..input()
            },
            &rules,
        )
        .unwrap();
        assert_eq!(b.inset, dec!(0.04));
        assert_eq!(b.skirt, dec!(0.34));
        assert_eq!(b.total, dec!(0.38));
    }

    #[test]
    fn test_pitch_bands() {
        let rules = AdjustmentRules {
            pitch: Some(PitchRule {
                below: 0.3,
                above: 0.2,
            }),
            ..Default::default()
        };
        let pitch = |p| {
            compute_adjustment(
                &AdjustmentInput {
                    pitch: Some(p),
                    ..input()
                },
                &rules,
            )
            .unwrap()
            .pitch
        };
        assert_eq!(pitch(dec!(12)), dec!(0.6));
        assert_eq!(pitch(dec!(7)), Decimal::ZERO);
        assert_eq!(pitch(dec!(4)), dec!(0.3));
        assert_eq!(pitch(dec!(5.5)), Decimal::ZERO);
        assert_eq!(pitch(dec!(9.5)), Decimal::ZERO);
        assert_eq!(pitch(dec!(10.5)), dec!(0.2));
    }

    #[test]
    fn test_corbel_bonus_needs_depth_over_nine() {
        let deep = AdjustmentInput {
            product: "corbel_outside_mount",
            inset: Some(dec!(3)),
            overhang: Some(dec!(4)),
            skirt: Some(dec!(2.5)),
            ..Default::default()
        };
        let b = compute_adjustment(&deep, &AdjustmentRules::default()).unwrap();
        assert_eq!(b.corbel, dec!(0.15));

        let shallow = AdjustmentInput {
            skirt: Some(dec!(2)),
            ..deep.clone()
        };
        assert_eq!(compute_adjustment(&shallow, &AdjustmentRules::default()).unwrap().corbel, Decimal::ZERO);

        let not_corbel = AdjustmentInput {
            product: "flat_top_outside_mount",
            ..deep
        };
        assert_eq!(compute_adjustment(&not_corbel, &AdjustmentRules::default()).unwrap().corbel, Decimal::ZERO);
    }

    #[test]
    fn test_zero_interval_is_ignored() {
        let rules = AdjustmentRules {
            inset: Some(StepRule::new(0.0, 0.0, 1.0)),
            ..Default::default()
        };
        let b = compute_adjustment(
            &AdjustmentInput {
                inset: Some(dec!(5)),
                ..input()
            },
            &rules,
        )
        .unwrap();
        assert_eq!(b.inset, Decimal::ZERO);
    }

    #[test]
    fn test_breakdown_serializes_as_numbers() {
        let b = AdjustmentBreakdown {
            screen: dec!(0.2),
            screen_correction: dec!(-0.19),
            total: dec!(0.01),
            ..Default::default()
        };
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["screenCorrection"], serde_json::json!(-0.19));
        assert_eq!(json["total"], serde_json::json!(0.01));
    }

    #[test]
    fn test_overflowing_step_is_reported() {
        let rules = AdjustmentRules {
            screen: Some(StepRule::new(6.0, 1.0, 2.0)),
            ..Default::default()
        };
        let huge = AdjustmentInput {
            screen: Some(Decimal::MAX),
            ..input()
        };
        assert!(compute_adjustment(&huge, &rules).is_none());

        let tiny_interval = AdjustmentRules {
            inset: Some(StepRule::new(0.0, 1e-20, 1.0)),
            ..Default::default()
        };
        let deep = AdjustmentInput {
            inset: Some(dec!(100000000000)),
            ..input()
        };
        assert!(compute_adjustment(&deep, &tiny_interval).is_none());
    }

    #[test]
    fn test_unsummable_corbel_depth_still_gets_bonus() {
        let b = compute_adjustment(
            &AdjustmentInput {
                product: "corbel_outside_mount",
                inset: Some(Decimal::MAX),
                overhang: Some(Decimal::MAX),
                ..Default::default()
            },
            &AdjustmentRules::default(),
        )
        .unwrap();
        assert_eq!(b.corbel, dec!(0.15));
    }
}
