//! Pointer input over the map: hover, click-to-focus and `Escape`.
//!
//! Translates the cursor into a tile entity through the ground plane, the
//! hex layout and the [`TileIndex`](crate::tiles::TileIndex), then drives the
//! [`TileInteraction`] controller. Rendering the result is the tiles plugin's
//! job.

mod entities;
mod systems;

pub use entities::{CursorGround, UiFocus};

use bevy::prelude::*;

use crate::GameState;
use crate::interaction::{InteractionController, WORKABLE_RADIUS};
use crate::tiles::TileInteraction;

/// Initial interaction settings; the panel can change the first two live.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct InspectConfig {
    /// Rings highlighted around the hovered tile.
    pub hover_radius: u32,
    /// Whether a left click enters focus mode.
    pub focus_armed: bool,
    /// Radius of the workable area in focus mode.
    pub workable_radius: u32,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            hover_radius: 1,
            focus_armed: true,
            workable_radius: WORKABLE_RADIUS,
        }
    }
}

/// Inspect plugin: hover and focus while [`GameState::Browsing`].
pub struct InspectPlugin(pub InspectConfig);

impl Plugin for InspectPlugin {
    fn build(&self, app: &mut App) {
        let cfg = &self.0;
        app.register_type::<InspectConfig>()
            .register_type::<UiFocus>()
            .insert_resource(cfg.clone())
            .insert_resource(TileInteraction(
                InteractionController::new(cfg.hover_radius, cfg.focus_armed)
                    .with_workable_radius(cfg.workable_radius),
            ))
            .init_resource::<UiFocus>()
            .add_systems(
                Update,
                (systems::hover_tile, systems::click_tile, systems::cancel_focus)
                    .chain()
                    .run_if(in_state(GameState::Browsing)),
            )
            .add_systems(OnExit(GameState::Browsing), systems::clear_hover);
    }
}
