//! Starter table set written by the `seed` binary.
//!
//! Every number here is business data an admin is expected to edit; the
//! seed exists so a fresh install can quote something on day one.

use std::collections::BTreeMap;

use capquote_core::tables::{
    AdjustmentRules, ChaseCoverTables, ChaseSizeSpec, FactorRow, PerimeterRule, PitchRule, ShroudSizing,
    ShroudTables, StepRule, SurchargeSchedule, TierTable,
};
use capquote_core::{Money, Price, PricingTables, ShroudModel, SizeBucket};

const TABLE_METALS: [&str; 3] = ["black_galvanized", "kynar", "stainless"];

const MULTI_FLUE_PRODUCTS: [(&str, f64); 6] = [
    ("flat_top_outside_mount", 1.65),
    ("flat_top_inside_mount", 1.55),
    ("hip_and_ridge_outside_mount", 1.85),
    ("peak_outside_mount", 1.95),
    ("corbel_outside_mount", 2.10),
    ("corbel_inside_mount", 2.00),
];

/// Tiers, shroud/chase prices, factor rows, and default surcharges.
pub fn default_tables() -> PricingTables {
    PricingTables {
        tiers: default_tiers(),
        shrouds: default_shrouds(),
        chase_covers: default_chase_covers(),
        multi_flue: default_multi_flue(),
        surcharges: SurchargeSchedule::default(),
    }
}

/// Tier code and percentage of the elite price.
const TIER_PERCENTAGES: [(&str, i64); 6] = [
    ("elite", 100),
    ("vg", 95),
    ("vs", 97),
    ("vb", 99),
    ("pref", 92),
    ("ws", 85),
];

fn default_tiers() -> TierTable {
    TIER_PERCENTAGES
        .into_iter()
        .map(|(tier, percent)| (tier, percent as f64 / 100.0))
        .collect()
}

fn cutoff_sizing(restricted: Vec<SizeBucket>) -> ShroudSizing {
    ShroudSizing {
        cutoffs: [
            (SizeBucket::Small, 40.0),
            (SizeBucket::Medium, 56.0),
            (SizeBucket::Large, 72.0),
            (SizeBucket::SmallTall, 48.0),
            (SizeBucket::LargeTall, 84.0),
        ]
        .into_iter()
        .collect(),
        restricted,
        perimeter_rules: Vec::new(),
    }
}

fn default_shrouds() -> ShroudTables {
    let mut sizing = BTreeMap::new();
    sizing.insert("black_galvanized".to_string(), cutoff_sizing(vec![SizeBucket::LargeTall]));
    sizing.insert("kynar".to_string(), cutoff_sizing(vec![SizeBucket::SmallTall, SizeBucket::LargeTall]));
    sizing.insert("stainless".to_string(), cutoff_sizing(Vec::new()));
    sizing.insert(
        "copper".to_string(),
        ShroudSizing {
            perimeter_rules: vec![
                PerimeterRule { max: 80.0, label: "small".to_string() },
                PerimeterRule { max: 112.0, label: "medium".to_string() },
                PerimeterRule { max: 144.0, label: "large".to_string() },
            ],
            ..ShroudSizing::default()
        },
    );

    // base dollars for a small stainless shroud; other sizes and metals scale
    let base = |model: ShroudModel| -> i64 {
        match model {
            ShroudModel::Dynasty | ShroudModel::Majesty => 510,
            ShroudModel::Princess | ShroudModel::Prairie => 460,
            ShroudModel::Regal | ShroudModel::Imperial => 540,
            ShroudModel::Monarch | ShroudModel::Empire => 590,
            ShroudModel::Centurion | ShroudModel::Temptress => 640,
        }
    };
    let size_steps: [(&str, i64); 5] = [
        ("small", 0),
        ("medium", 110),
        ("large", 230),
        ("small_tall", 160),
        ("large_tall", 320),
    ];

    let mut prices: BTreeMap<String, BTreeMap<String, BTreeMap<String, Price>>> = BTreeMap::new();
    for (metal, metal_offset) in [("black_galvanized", -140), ("kynar", -90), ("stainless", 0)] {
        let models = prices.entry(metal.to_string()).or_default();
        for model in ShroudModel::ALL {
            let sizes = size_steps
                .iter()
                .map(|(size, step)| {
                    let price = if metal == "kynar" && size.ends_with("_tall") {
                        Price::NeedsManualPricing
                    } else {
                        Price::Priced(Money::from_dollars(base(model) + step + metal_offset))
                    };
                    (size.to_string(), price)
                })
                .collect();
            models.insert(model.as_str().to_string(), sizes);
        }
    }
    let copper = prices.entry("copper".to_string()).or_default();
    for model in ShroudModel::ALL {
        let sizes = [("small", 900), ("medium", 1150), ("large", 1400)]
            .into_iter()
            .map(|(size, dollars)| (size.to_string(), Price::Priced(Money::from_dollars(dollars + base(model)))))
            .collect();
        copper.insert(model.as_str().to_string(), sizes);
    }

    ShroudTables { sizing, prices }
}

fn default_chase_covers() -> ChaseCoverTables {
    let specs = || {
        vec![
            ChaseSizeSpec {
                size: "small".to_string(),
                base_skirt: 3.0,
                max_length: 36.0,
                max_width: 24.0,
                steps: 8,
            },
            ChaseSizeSpec {
                size: "medium".to_string(),
                base_skirt: 3.0,
                max_length: 48.0,
                max_width: 30.0,
                steps: 8,
            },
            ChaseSizeSpec {
                size: "large".to_string(),
                base_skirt: 3.0,
                max_length: 60.0,
                max_width: 36.0,
                steps: 8,
            },
        ]
    };

    // one size set per metal, shared by every tier through the elite fallback;
    // prices are set per tier as a whole-cent share of the elite price
    let mut sizes = BTreeMap::new();
    let mut prices = BTreeMap::new();
    for (metal, small, medium, large) in [
        ("black_galvanized", 210, 265, 330),
        ("kynar", 245, 305, 380),
        ("stainless", 320, 395, 485),
    ] {
        sizes.insert(metal.to_string(), BTreeMap::from([("elite".to_string(), specs())]));
        let by_tier: BTreeMap<String, BTreeMap<String, Price>> = TIER_PERCENTAGES
            .into_iter()
            .map(|(tier, percent)| {
                let sizes = [("small", small), ("medium", medium), ("large", large)]
                    .into_iter()
                    .map(|(size, dollars)| (size.to_string(), Price::Priced(Money::from_cents(dollars * percent))))
                    .collect();
                (tier.to_string(), sizes)
            })
            .collect();
        prices.insert(metal.to_string(), by_tier);
    }

    ChaseCoverTables {
        sizes,
        prices,
        ..ChaseCoverTables::default()
    }
}

fn default_rules() -> AdjustmentRules {
    AdjustmentRules {
        screen: Some(StepRule::new(6.0, 1.0, 0.1)),
        overhang: Some(StepRule {
            standard: None,
            interval: None,
            rate: 0.05,
        }),
        inset: Some(StepRule::new(2.0, 1.0, 0.04)),
        skirt: Some(StepRule::new(4.0, 1.0, 0.05)),
        pitch: Some(PitchRule {
            below: 0.1,
            above: 0.05,
        }),
    }
}

fn default_multi_flue() -> BTreeMap<String, BTreeMap<String, FactorRow>> {
    TABLE_METALS
        .iter()
        .chain(std::iter::once(&"copper"))
        .enumerate()
        .map(|(i, metal)| {
            // each metal step up costs a little more per inch
            let metal_step = 0.2 * i as f64;
            let rows = MULTI_FLUE_PRODUCTS
                .iter()
                .map(|(product, factor)| {
                    (
                        product.to_string(),
                        FactorRow {
                            base_factor: factor + metal_step,
                            rules: default_rules(),
                        },
                    )
                })
                .collect();
            (metal.to_string(), rows)
        })
        .collect()
}
