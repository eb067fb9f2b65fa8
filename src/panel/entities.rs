use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::PanelConfig;
use crate::inspect::UiFocus;
use crate::tiles::{DisplayOptions, MapTiles, Scoring, TileCell, TileIndex, TileInteraction};

/// Everything the side panel reads or edits.
#[derive(SystemParam)]
pub struct PanelState<'w, 's> {
    /// Clock for the recalculation trigger.
    pub time: Res<'w, Time>,
    /// Weights, last summary and trigger.
    pub scoring: ResMut<'w, Scoring>,
    /// Scored tiles.
    pub tiles: Res<'w, MapTiles>,
    /// Coordinate index over tile entities.
    pub index: Res<'w, TileIndex>,
    /// Hover and focus state.
    pub interaction: ResMut<'w, TileInteraction>,
    /// Colour mode and tier filter.
    pub display: ResMut<'w, DisplayOptions>,
    /// Pointer ownership, written back every frame.
    pub ui_focus: ResMut<'w, UiFocus>,
    /// Tile entity → tile index.
    pub cell_q: Query<'w, 's, &'static TileCell>,
    /// Panel configuration.
    pub cfg: Res<'w, PanelConfig>,
}
