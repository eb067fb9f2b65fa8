//! The map tile: static attributes from the source dataset plus the derived
//! scoring fields that every recalculation overwrites.

mod tables;

pub use tables::{base_yields, feature_yields, terrain_yields};

use serde::{Deserialize, Serialize};

use crate::grid::OffsetCoord;
use crate::tiering::Tier;

/// Terrain name of open ocean, which can never be worked.
pub const OCEAN_TERRAIN: &str = "TERRAIN_OCEAN";
/// Feature name of polar ice, which can never be worked.
pub const ICE_FEATURE: &str = "FEATURE_ICE";

/// Food / production / gold output of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Yields {
    /// Food yield.
    pub food: f64,
    /// Production yield.
    pub production: f64,
    /// Gold yield.
    pub gold: f64,
}

impl Yields {
    /// Creates a yield triple.
    pub const fn new(food: f64, production: f64, gold: f64) -> Self {
        Self {
            food,
            production,
            gold,
        }
    }
}

impl std::ops::Add for Yields {
    type Output = Yields;

    fn add(self, rhs: Yields) -> Yields {
        Yields::new(
            self.food + rhs.food,
            self.production + rhs.production,
            self.gold + rhs.gold,
        )
    }
}

/// Resource class; each class has its own weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceClass {
    /// Luxury resources (amenities).
    Luxury,
    /// Strategic resources (units, buildings).
    Strategic,
    /// Bonus resources (raw yields).
    Bonus,
}

impl ResourceClass {
    /// Lenient parse: accepts `Luxury`, `RESOURCECLASS_LUXURY`, `luxury`, ...
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.trim().to_ascii_lowercase();
        if lower.contains("luxury") {
            Some(Self::Luxury)
        } else if lower.contains("strategic") {
            Some(Self::Strategic)
        } else if lower.contains("bonus") {
            Some(Self::Bonus)
        } else {
            None
        }
    }

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Luxury => "Luxury",
            Self::Strategic => "Strategic",
            Self::Bonus => "Bonus",
        }
    }
}

/// Fields recomputed by the tiering pass.
///
/// Non-workable tiles always carry `weighted_score = 0`,
/// `normalized_score = 0` and no tier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TileScores {
    /// Weighted desirability, never negative.
    pub weighted_score: f64,
    /// Score relative to the workable mean, 100 = average.
    pub normalized_score: f64,
    /// Percentile tier, `None` for non-workable tiles.
    pub tier: Option<Tier>,
    /// False for open ocean and ice.
    pub is_workable: bool,
}

/// One map cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Unique position on the map.
    pub coord: OffsetCoord,
    /// Terrain name, e.g. `TERRAIN_GRASS_HILLS`.
    pub terrain: String,
    /// Optional feature, e.g. `FEATURE_FOREST`.
    pub feature: Option<String>,
    /// Optional resource, e.g. `RESOURCE_WINE`.
    pub resource: Option<String>,
    /// Declared class of `resource`; overrides the resource table when set.
    pub resource_class: Option<ResourceClass>,
    /// Base yields.
    pub yields: Yields,
    /// Appeal, absent on some exports.
    pub appeal: Option<i32>,
    /// Adjacent to a river.
    pub river_adjacent: bool,
    /// Carries a goody hut.
    pub goody_hut: bool,
    /// Continent name or id.
    pub continent: Option<String>,
    /// Derived scoring state.
    pub scores: TileScores,
}

impl Tile {
    /// A tile with yields taken from the terrain table and nothing else set.
    pub fn new(coord: OffsetCoord, terrain: impl Into<String>) -> Self {
        let terrain = terrain.into();
        Self {
            coord,
            yields: base_yields(&terrain, None),
            terrain,
            feature: None,
            resource: None,
            resource_class: None,
            appeal: None,
            river_adjacent: false,
            goody_hut: false,
            continent: None,
            scores: TileScores::default(),
        }
    }

    /// Sets the feature and re-derives yields from the tables.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self.yields = base_yields(&self.terrain, self.feature.as_deref());
        self
    }

    /// Overrides the yields.
    pub fn with_yields(mut self, food: f64, production: f64, gold: f64) -> Self {
        self.yields = Yields::new(food, production, gold);
        self
    }

    /// Sets the resource name, leaving the class to the resource table.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Sets appeal.
    pub fn with_appeal(mut self, appeal: i32) -> Self {
        self.appeal = Some(appeal);
        self
    }

    /// Marks the tile as river-adjacent.
    pub fn with_river(mut self) -> Self {
        self.river_adjacent = true;
        self
    }

    /// Marks the tile as holding a goody hut.
    pub fn with_goody_hut(mut self) -> Self {
        self.goody_hut = true;
        self
    }

    /// A tile can be worked unless it is open ocean or covered in ice.
    pub fn is_workable(&self) -> bool {
        self.terrain != OCEAN_TERRAIN && self.feature.as_deref() != Some(ICE_FEATURE)
    }

    /// Terrain name without the `TERRAIN_` prefix, for labels.
    pub fn terrain_label(&self) -> &str {
        self.terrain
            .strip_prefix("TERRAIN_")
            .unwrap_or(&self.terrain)
    }
}
