//! Weighted desirability score of a single tile.
//!
//! [`score_tile`] is pure: it reads a [`Tile`], a [`WeightConfig`] and a
//! [`ResourceTable`] and returns a non-negative number. The percentile pass
//! in [`crate::tiering`] calls it once per tile.

use bevy::platform::collections::HashMap;
use bevy::prelude::Reflect;
use serde::{Deserialize, Serialize};

use crate::tile::{ResourceClass, Tile};

/// Per-yield coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldWeights {
    /// Weight of one food.
    pub food: f64,
    /// Weight of one production.
    pub production: f64,
    /// Weight of one gold.
    pub gold: f64,
}

impl Default for YieldWeights {
    fn default() -> Self {
        Self {
            food: 1.0,
            production: 1.0,
            gold: 0.5,
        }
    }
}

/// Coefficients of the additive bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusWeights {
    /// Multiplies `min(food, production)` when both are positive.
    pub balance: f64,
    /// Multiplies the table value of strategic resources.
    pub strategic_resource: f64,
    /// Multiplies the table value of luxury resources.
    pub luxury_resource: f64,
    /// Multiplies the table value of bonus resources.
    pub bonus_resource: f64,
    /// Flat bonus for river adjacency.
    pub fresh_water: f64,
    /// Multiplies appeal when appeal is positive.
    pub positive_appeal: f64,
    /// Flat bonus for a goody hut.
    pub goody_hut: f64,
}

impl Default for BonusWeights {
    fn default() -> Self {
        Self {
            balance: 0.5,
            strategic_resource: 1.0,
            luxury_resource: 1.0,
            bonus_resource: 1.0,
            fresh_water: 10.0,
            positive_appeal: 0.5,
            goody_hut: 15.0,
        }
    }
}

/// Full set of scoring coefficients.
///
/// Every leaf is `#[serde(default)]`, so a partial JSON document resolves
/// missing keys to the defaults when it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Yield coefficients.
    pub yields: YieldWeights,
    /// Bonus coefficients.
    pub bonuses: BonusWeights,
}

impl WeightConfig {
    /// Parses a (possibly partial) weight document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Coefficient applied to a resource of the given class.
    pub fn resource_weight(&self, class: ResourceClass) -> f64 {
        match class {
            ResourceClass::Luxury => self.bonuses.luxury_resource,
            ResourceClass::Strategic => self.bonuses.strategic_resource,
            ResourceClass::Bonus => self.bonuses.bonus_resource,
        }
    }
}

/// Tabulated worth of a named resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceValue {
    /// Class the resource belongs to.
    pub class: ResourceClass,
    /// Base value before weighting.
    pub value: f64,
}

/// Resource name → class and base value.
#[derive(Debug, Clone)]
pub struct ResourceTable {
    entries: HashMap<String, ResourceValue>,
}

const LUXURY_RESOURCES: [&str; 15] = [
    "RESOURCE_WINE",
    "RESOURCE_FURS",
    "RESOURCE_SILK",
    "RESOURCE_SILVER",
    "RESOURCE_SUGAR",
    "RESOURCE_PEARLS",
    "RESOURCE_WHALES",
    "RESOURCE_TRUFFLES",
    "RESOURCE_IVORY",
    "RESOURCE_COCOA",
    "RESOURCE_COFFEE",
    "RESOURCE_TEA",
    "RESOURCE_TOBACCO",
    "RESOURCE_CITRUS",
    "RESOURCE_SALT",
];

const BONUS_RESOURCES: [&str; 11] = [
    "RESOURCE_BANANAS",
    "RESOURCE_CATTLE",
    "RESOURCE_COPPER",
    "RESOURCE_CRABS",
    "RESOURCE_DEER",
    "RESOURCE_FISH",
    "RESOURCE_MAIZE",
    "RESOURCE_RICE",
    "RESOURCE_SHEEP",
    "RESOURCE_STONE",
    "RESOURCE_WHEAT",
];

const STRATEGIC_RESOURCES: [(&str, f64); 7] = [
    ("RESOURCE_HORSES", 1.0),
    ("RESOURCE_IRON", 1.0),
    ("RESOURCE_NITER", 0.5),
    ("RESOURCE_COAL", 0.5),
    ("RESOURCE_OIL", 0.5),
    ("RESOURCE_ALUMINUM", 0.5),
    ("RESOURCE_URANIUM", 0.5),
];

impl Default for ResourceTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for name in LUXURY_RESOURCES {
            table.insert(name, ResourceClass::Luxury, 3.0);
        }
        for name in BONUS_RESOURCES {
            table.insert(name, ResourceClass::Bonus, 1.5);
        }
        for (name, value) in STRATEGIC_RESOURCES {
            table.insert(name, ResourceClass::Strategic, value);
        }
        table
    }
}

impl ResourceTable {
    /// A table with no resources.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces a resource.
    pub fn insert(&mut self, name: impl Into<String>, class: ResourceClass, value: f64) {
        self.entries
            .insert(name.into(), ResourceValue { class, value });
    }

    /// Looks up a resource by name.
    pub fn get(&self, name: &str) -> Option<ResourceValue> {
        self.entries.get(name).copied()
    }

    /// All resource names, sorted, for procedural placement.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Individual score components of a tile, before the final floor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    /// `food·w + production·w + gold·w`.
    pub yields: f64,
    /// Reward for having both food and production.
    pub balance: f64,
    /// Weighted resource value.
    pub resource: f64,
    /// River adjacency.
    pub fresh_water: f64,
    /// Positive appeal only; negative appeal is not penalised.
    pub appeal: f64,
    /// Goody hut.
    pub goody_hut: f64,
}

impl ScoreBreakdown {
    /// Sum of components, floored at zero. NaN and infinite sums score 0.
    pub fn total(&self) -> f64 {
        let sum = self.yields
            + self.balance
            + self.resource
            + self.fresh_water
            + self.appeal
            + self.goody_hut;
        if sum.is_finite() { sum.max(0.0) } else { 0.0 }
    }
}

/// Component-wise score of a tile. All zero for non-workable tiles.
pub fn score_breakdown(
    tile: &Tile,
    weights: &WeightConfig,
    resources: &ResourceTable,
) -> ScoreBreakdown {
    if !tile.is_workable() {
        return ScoreBreakdown::default();
    }

    let y = &tile.yields;
    let w = &weights.yields;
    let b = &weights.bonuses;

    let balance = if y.food > 0.0 && y.production > 0.0 {
        y.food.min(y.production) * b.balance
    } else {
        0.0
    };

    let resource = tile
        .resource
        .as_deref()
        .and_then(|name| resources.get(name))
        .map(|entry| {
            let class = tile.resource_class.unwrap_or(entry.class);
            entry.value * weights.resource_weight(class)
        })
        .unwrap_or(0.0);

    let appeal = match tile.appeal {
        Some(a) if a > 0 => f64::from(a) * b.positive_appeal,
        _ => 0.0,
    };

    ScoreBreakdown {
        yields: y.food * w.food + y.production * w.production + y.gold * w.gold,
        balance,
        resource,
        fresh_water: if tile.river_adjacent { b.fresh_water } else { 0.0 },
        appeal,
        goody_hut: if tile.goody_hut { b.goody_hut } else { 0.0 },
    }
}

/// Weighted score of one tile; `0` for open ocean and ice, never negative.
pub fn score_tile(tile: &Tile, weights: &WeightConfig, resources: &ResourceTable) -> f64 {
    score_breakdown(tile, weights, resources).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::OffsetCoord;
    use crate::tile::{ICE_FEATURE, OCEAN_TERRAIN};

    fn plains() -> Tile {
        Tile::new(OffsetCoord::new(0, 0), "TERRAIN_PLAINS")
    }

    fn score(tile: &Tile) -> f64 {
        score_tile(tile, &WeightConfig::default(), &ResourceTable::default())
    }

    // ── workability ─────────────────────────────────────────────────

    #[test]
    fn ocean_scores_zero_even_with_bonuses() {
        let ocean = Tile::new(OffsetCoord::new(0, 0), OCEAN_TERRAIN)
            .with_yields(5.0, 5.0, 5.0)
            .with_goody_hut()
            .with_river();
        assert_eq!(score(&ocean), 0.0);
    }

    #[test]
    fn ice_scores_zero() {
        let ice = Tile::new(OffsetCoord::new(0, 0), "TERRAIN_SNOW")
            .with_feature(ICE_FEATURE)
            .with_yields(3.0, 3.0, 0.0);
        assert_eq!(score(&ice), 0.0);
    }

    // ── components ──────────────────────────────────────────────────

    #[test]
    fn yields_and_balance_with_defaults() {
        // 1·1 + 1·1 + 0·0.5 = 2, balance min(1,1)·0.5 = 0.5
        assert!((score(&plains()) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn balance_needs_both_food_and_production() {
        let lopsided = plains().with_yields(4.0, 0.0, 0.0);
        let b = score_breakdown(&lopsided, &WeightConfig::default(), &ResourceTable::default());
        assert_eq!(b.balance, 0.0);
        assert_eq!(b.yields, 4.0);
    }

    #[test]
    fn resource_bonus_uses_class_weight() {
        let mut weights = WeightConfig::default();
        weights.bonuses.luxury_resource = 2.0;
        let wine = plains().with_yields(0.0, 0.0, 0.0).with_resource("RESOURCE_WINE");
        let b = score_breakdown(&wine, &weights, &ResourceTable::default());
        assert!((b.resource - 6.0).abs() < 1e-9);
    }

    #[test]
    fn declared_class_overrides_table_class() {
        let mut weights = WeightConfig::default();
        weights.bonuses.strategic_resource = 0.0;
        let mut tile = plains().with_resource("RESOURCE_WINE");
        tile.resource_class = Some(ResourceClass::Strategic);
        let b = score_breakdown(&tile, &weights, &ResourceTable::default());
        assert_eq!(b.resource, 0.0);
    }

    #[test]
    fn unknown_resource_adds_nothing() {
        let tile = plains().with_resource("RESOURCE_UNOBTAINIUM");
        assert!((score(&tile) - score(&plains())).abs() < 1e-9);
    }

    #[test]
    fn river_and_goody_hut_are_flat_bonuses() {
        let base = score(&plains());
        assert!((score(&plains().with_river()) - base - 10.0).abs() < 1e-9);
        assert!((score(&plains().with_goody_hut()) - base - 15.0).abs() < 1e-9);
    }

    #[test]
    fn only_positive_appeal_counts() {
        let base = score(&plains());
        assert!((score(&plains().with_appeal(4)) - base - 2.0).abs() < 1e-9);
        assert!((score(&plains().with_appeal(-4)) - base).abs() < 1e-9);
        assert!((score(&plains().with_appeal(0)) - base).abs() < 1e-9);
    }

    // ── floor ───────────────────────────────────────────────────────

    #[test]
    fn never_negative_even_with_negative_weights() {
        let mut weights = WeightConfig::default();
        weights.yields.food = -10.0;
        weights.yields.production = -10.0;
        let tile = plains().with_yields(3.0, 3.0, 0.0).with_appeal(-5);
        assert_eq!(score_tile(&tile, &weights, &ResourceTable::default()), 0.0);
    }

    #[test]
    fn all_zero_tile_scores_zero() {
        let desert = Tile::new(OffsetCoord::new(0, 0), "TERRAIN_DESERT");
        assert_eq!(score(&desert), 0.0);
    }

    #[test]
    fn nan_yields_floor_to_zero() {
        let tile = plains().with_yields(f64::NAN, 1.0, 0.0);
        assert_eq!(score(&tile), 0.0);
    }

    #[test]
    fn infinite_weight_scores_zero() {
        let mut weights = WeightConfig::default();
        weights.yields.gold = f64::INFINITY;
        let tile = plains().with_yields(2.0, 1.0, 3.0);
        assert_eq!(score_tile(&tile, &weights, &ResourceTable::default()), 0.0);
    }

    // ── config ──────────────────────────────────────────────────────

    #[test]
    fn partial_weight_document_keeps_defaults() {
        let weights = WeightConfig::from_json(r#"{ "yields": { "gold": 2.0 } }"#).unwrap();
        assert_eq!(weights.yields.gold, 2.0);
        assert_eq!(weights.yields.food, 1.0);
        assert_eq!(weights.bonuses, BonusWeights::default());
    }

    #[test]
    fn empty_weight_document_is_default() {
        assert_eq!(WeightConfig::from_json("{}").unwrap(), WeightConfig::default());
    }

    #[test]
    fn default_table_classes() {
        let table = ResourceTable::default();
        assert_eq!(table.get("RESOURCE_SILK").unwrap().class, ResourceClass::Luxury);
        assert_eq!(table.get("RESOURCE_FISH").unwrap().value, 1.5);
        assert_eq!(table.get("RESOURCE_OIL").unwrap().value, 0.5);
        assert_eq!(table.names().len(), 33);
    }
}
