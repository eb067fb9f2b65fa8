//! Tilted top-down camera over the tile map: bloom, WASD / arrow pan and
//! scroll zoom.

mod entities;
mod systems;

pub use entities::MapCamera;

use bevy::prelude::*;

use crate::GameState;

/// Camera placement and input sensitivity.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct ViewConfig {
    /// Height above the ground plane at startup.
    pub start_height: f32,
    /// Closest zoom.
    pub min_height: f32,
    /// Farthest zoom.
    pub max_height: f32,
    /// Backwards offset of the eye per unit of height; 0 looks straight down.
    pub tilt: f32,
    /// Pan speed in world units per second, per 10 units of height.
    pub pan_speed: f32,
    /// Fraction of the height removed per scroll line.
    pub zoom_step: f32,
    /// Bloom strength (drives the focus marker glow).
    pub bloom_intensity: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            start_height: 38.0,
            min_height: 4.0,
            max_height: 120.0,
            tilt: 0.55,
            pan_speed: 14.0,
            zoom_step: 0.1,
            bloom_intensity: 0.15,
        }
    }
}

/// Camera plugin: spawns the [`MapCamera`] at startup, pans and zooms while
/// browsing.
pub struct CameraPlugin(pub ViewConfig);

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ViewConfig>()
            .register_type::<MapCamera>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, systems::spawn_camera)
            .add_systems(
                Update,
                systems::pan_and_zoom.run_if(in_state(GameState::Browsing)),
            );
    }
}
