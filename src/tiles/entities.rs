use std::time::Duration;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use hexx::{HexLayout, HexOrientation};

use super::TilesConfig;
use crate::diagnostics::Diagnostics;
use crate::grid::{GridIndex, OffsetCoord};
use crate::interaction::InteractionController;
use crate::map_data::{MapBounds, MapData};
use crate::recalc::{CoalescingTrigger, RecalcSummary, ScoringContext};
use crate::scoring::WeightConfig;
use crate::tile::Tile;
use crate::tiering::Tier;

/// Map and weights handed over before the first frame.
///
/// `map: None` makes the loader generate the demo map.
#[derive(Resource, Default)]
pub struct PendingMap {
    /// Parsed map file, if one was given.
    pub map: Option<MapData>,
    /// Initial scoring weights.
    pub weights: WeightConfig,
}

/// Scored tiles in spawn order. [`TileCell::index`] points into `tiles`.
#[derive(Resource)]
pub struct MapTiles {
    /// Tiles with their derived scores.
    pub tiles: Vec<Tile>,
    /// Coordinate bounding box.
    pub bounds: MapBounds,
    /// Problems found while loading the map.
    pub load_diagnostics: Diagnostics,
}

/// Coordinate → tile entity.
#[derive(Resource, Deref)]
pub struct TileIndex(pub GridIndex<Entity>);

/// Pointy-top layout centred on the map.
#[derive(Resource, Deref)]
pub struct MapLayout(pub HexLayout);

impl MapLayout {
    /// Layout with the middle of `bounds` at the world origin.
    pub fn centred(hex_size: f32, bounds: &MapBounds) -> Self {
        let mut layout = HexLayout {
            orientation: HexOrientation::Pointy,
            scale: Vec2::splat(hex_size),
            ..default()
        };
        let middle = OffsetCoord::new(
            (bounds.min_x + bounds.max_x).div_euclid(2),
            (bounds.min_y + bounds.max_y).div_euclid(2),
        );
        layout.origin = -layout.hex_to_world_pos(middle.to_hex());
        Self(layout)
    }

    /// Ground-plane position of a tile centre (`x`, `z`).
    pub fn world_pos(&self, coord: OffsetCoord) -> Vec2 {
        self.0.hex_to_world_pos(coord.to_hex())
    }

    /// Tile coordinate under a ground-plane point.
    pub fn coord_at(&self, ground: Vec2) -> OffsetCoord {
        OffsetCoord::from_hex(self.0.world_pos_to_hex(ground))
    }
}

/// Scoring inputs, the last published summary and the pending-rescore trigger.
#[derive(Resource)]
pub struct Scoring {
    /// Weights, resource table and tier table.
    pub context: ScoringContext,
    /// Output of the last recalculation.
    pub summary: RecalcSummary,
    /// Coalesces weight edits into one trailing recalculation.
    pub trigger: CoalescingTrigger,
}

impl Scoring {
    /// Context and summary with a trigger using `quiet` as its window.
    pub fn new(context: ScoringContext, summary: RecalcSummary, quiet: Duration) -> Self {
        Self {
            context,
            summary,
            trigger: CoalescingTrigger::new(quiet),
        }
    }
}

/// Hover and focus state over tile entities.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct TileInteraction(pub InteractionController<Entity>);

/// Face colouring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum ColorMode {
    /// Fixed colour per tier.
    #[default]
    Tier,
    /// Gradient over the normalized score range.
    Heatmap,
}

/// Viewer-side display choices, edited from the side panel.
#[derive(Resource, Clone, Debug, PartialEq, Reflect)]
pub struct DisplayOptions {
    /// Face colouring.
    pub color_mode: ColorMode,
    /// Visibility per tier while browsing, indexed by [`Tier::rank`].
    pub visible_tiers: [bool; 7],
    /// Show water and ice while browsing.
    pub show_non_workable: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Tier,
            visible_tiers: [true; 7],
            show_non_workable: true,
        }
    }
}

impl DisplayOptions {
    /// Browsing visibility of a tile with the given tier.
    ///
    /// Workable tiles without a tier (tiering skipped) are always shown.
    pub fn shows(&self, tier: Option<Tier>, workable: bool) -> bool {
        match (tier, workable) {
            (Some(tier), _) => self.visible_tiers[tier.rank()],
            (None, true) => true,
            (None, false) => self.show_non_workable,
        }
    }
}

/// Hex face entity of one tile.
#[derive(Component, Reflect)]
pub struct TileCell {
    /// Position in [`MapTiles::tiles`].
    pub index: usize,
    /// Map coordinate.
    pub coord: OffsetCoord,
}

/// Parent of every [`TileCell`].
#[derive(Component, Reflect)]
pub struct TileMap;

/// Glowing ring placed over the focus centre.
#[derive(Component, Reflect)]
pub struct FocusMarker;

/// Everything a face restyle reads.
#[derive(SystemParam)]
pub struct TileVisuals<'w> {
    /// Scored tiles.
    pub tiles: Res<'w, MapTiles>,
    /// Published score range.
    pub scoring: Res<'w, Scoring>,
    /// Colour mode and tier filter.
    pub display: Res<'w, DisplayOptions>,
    /// Hover and focus sets.
    pub interaction: Res<'w, TileInteraction>,
    /// Tile configuration.
    pub cfg: Res<'w, TilesConfig>,
}

impl TileVisuals<'_> {
    /// True when anything a face depends on changed since the last run.
    pub fn is_stale(&self) -> bool {
        self.tiles.is_changed()
            || self.scoring.is_changed()
            || self.display.is_changed()
            || self.interaction.is_changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── DisplayOptions ──────────────────────────────────────────────

    #[test]
    fn hidden_tier_is_not_shown() {
        let mut display = DisplayOptions::default();
        display.visible_tiers[Tier::C.rank()] = false;
        assert!(!display.shows(Some(Tier::C), true));
        assert!(display.shows(Some(Tier::B), true));
    }

    #[test]
    fn non_workable_follows_its_own_flag() {
        let mut display = DisplayOptions::default();
        assert!(display.shows(None, false));
        display.show_non_workable = false;
        assert!(!display.shows(None, false));
        assert!(display.shows(None, true), "untiered land stays visible");
    }

    // ── MapLayout ───────────────────────────────────────────────────

    fn bounds(max_x: i32, max_y: i32) -> MapBounds {
        MapBounds {
            min_x: 0,
            max_x,
            min_y: 0,
            max_y,
        }
    }

    #[test]
    fn middle_tile_sits_at_the_origin() {
        let layout = MapLayout::centred(1.0, &bounds(10, 8));
        assert!(layout.world_pos(OffsetCoord::new(5, 4)).length() < 1e-4);
    }

    #[test]
    fn tile_centres_map_back_to_their_coordinate() {
        let layout = MapLayout::centred(1.5, &bounds(12, 9));
        for coord in [
            OffsetCoord::new(0, 0),
            OffsetCoord::new(3, 1),
            OffsetCoord::new(7, 4),
            OffsetCoord::new(12, 9),
        ] {
            assert_eq!(layout.coord_at(layout.world_pos(coord)), coord);
        }
    }

    #[test]
    fn odd_rows_are_shifted_half_a_hex() {
        let layout = MapLayout::centred(1.0, &bounds(4, 4));
        let even = layout.world_pos(OffsetCoord::new(2, 2));
        let odd = layout.world_pos(OffsetCoord::new(2, 3));
        let step = layout.world_pos(OffsetCoord::new(3, 2)).x - even.x;
        assert!(((odd.x - even.x).abs() - step.abs() / 2.0).abs() < 1e-4);
    }
}
