//! Tile map: hex face spawning, coalesced recalculation, per-tile visuals.
//!
//! Owns the scored tiles ([`MapTiles`]), the coordinate index over the
//! spawned faces ([`TileIndex`]) and the interaction controller
//! ([`TileInteraction`]) that the inspect plugin drives.

mod entities;
mod startup_systems;
mod systems;

pub use entities::{
    ColorMode, DisplayOptions, FocusMarker, MapLayout, MapTiles, PendingMap, Scoring, TileCell,
    TileIndex, TileInteraction, TileMap,
};
pub use systems::{TileStyle, tile_style};

use bevy::prelude::*;

use crate::GameState;
use crate::map_data::DemoSettings;

/// Nested configuration for the tile map.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct TilesConfig {
    /// Hex layout and face geometry.
    pub layout: LayoutSettings,
    /// Opacity and highlight settings.
    pub style: StyleSettings,
    /// Quiet window after the last weight change before rescoring, in seconds.
    pub recalc_quiet_secs: f32,
    /// Procedural map used when no map file is given.
    pub demo: DemoSettings,
    /// Background clear color.
    pub clear_color: Color,
}

/// Hex layout and face geometry.
#[derive(Clone, Debug, Reflect)]
pub struct LayoutSettings {
    /// Distance from hex centre to corner, in world units.
    pub hex_size: f32,
    /// Face size relative to its cell; below 1 leaves a gap between faces.
    pub face_scale: f32,
    /// Height added per tier rank.
    pub tier_step: f32,
    /// Height of the focus marker above the centre face.
    pub marker_lift: f32,
}

/// Opacity and highlight settings.
#[derive(Clone, Debug, Reflect)]
pub struct StyleSettings {
    /// Opacity of every face while browsing.
    pub tile_alpha: f32,
    /// Opacity of the focus outer ring.
    pub outer_ring_alpha: f32,
    /// How far hovered faces move towards white, `0..=1`.
    pub hover_brighten: f32,
    /// Emissive strength of the focus marker.
    pub marker_glow: f32,
}

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            layout: LayoutSettings {
                hex_size: 1.0,
                face_scale: 0.94,
                tier_step: 0.12,
                marker_lift: 0.6,
            },
            style: StyleSettings {
                tile_alpha: 0.85,
                outer_ring_alpha: 0.35,
                hover_brighten: 0.45,
                marker_glow: 12.0,
            },
            recalc_quiet_secs: 0.15,
            demo: DemoSettings::default(),
            clear_color: Color::srgb(0.02, 0.02, 0.03),
        }
    }
}

/// Tile map plugin: spawns the map while [`GameState::Loading`], then keeps
/// scores and visuals current.
pub struct TilesPlugin(pub TilesConfig);

impl Plugin for TilesPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TilesConfig>()
            .register_type::<TileCell>()
            .register_type::<TileMap>()
            .register_type::<FocusMarker>()
            .register_type::<DisplayOptions>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .init_resource::<PendingMap>()
            .init_resource::<DisplayOptions>()
            .init_resource::<TileInteraction>()
            .add_systems(OnEnter(GameState::Loading), startup_systems::spawn_map)
            .add_systems(
                Update,
                (
                    systems::run_recalculation,
                    systems::refresh_tile_visuals,
                    systems::move_focus_marker,
                )
                    .chain()
                    .run_if(not(in_state(GameState::Loading))),
            );
    }
}
