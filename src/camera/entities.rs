use bevy::ecs::system::SystemParam;
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;

use super::ViewConfig;
use crate::inspect::UiFocus;

/// The map camera. Its transform is derived from `focus` and `height`.
#[derive(Component, Reflect)]
pub struct MapCamera {
    /// Ground point under the screen centre (`x`, `z`).
    pub focus: Vec2,
    /// Eye height above the ground plane.
    pub height: f32,
}

/// Keyboard, wheel and timing input for [`super::systems::pan_and_zoom`].
#[derive(SystemParam)]
pub struct CameraInput<'w, 's> {
    /// Held keys.
    pub keys: Res<'w, ButtonInput<KeyCode>>,
    /// Wheel events since last frame.
    pub scroll: MessageReader<'w, 's, MouseWheel>,
    /// Frame time.
    pub time: Res<'w, Time>,
    /// Camera configuration.
    pub cfg: Res<'w, ViewConfig>,
    /// Whether the side panel owns the pointer.
    pub ui: Res<'w, UiFocus>,
}
