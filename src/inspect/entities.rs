use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::camera::MapCamera;
use crate::math;

/// Whether the side panel currently owns the pointer. Written by the panel
/// every frame; map input ignores the pointer while it is set.
#[derive(Resource, Default, Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub struct UiFocus {
    /// Pointer is over an egui area.
    pub pointer_over_panel: bool,
}

/// Cursor → ground-plane projection.
#[derive(SystemParam)]
pub struct CursorGround<'w, 's> {
    /// Primary window, for the cursor position.
    pub window_q: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    /// The map camera.
    pub camera_q: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<MapCamera>>,
    /// Panel pointer ownership.
    pub ui: Res<'w, UiFocus>,
}

impl CursorGround<'_, '_> {
    /// Ground point (`x`, `z`) under the cursor; `None` when the cursor is
    /// outside the window, over the panel, or looking at the sky.
    pub fn ground_point(&self) -> Option<Vec2> {
        if self.ui.pointer_over_panel {
            return None;
        }
        let window = self.window_q.single().ok()?;
        let cursor = window.cursor_position()?;
        let (camera, cam_tf) = self.camera_q.single().ok()?;
        let ray = camera.viewport_to_world(cam_tf, cursor).ok()?;
        math::ray_ground_hit(ray.origin, *ray.direction)
    }
}
