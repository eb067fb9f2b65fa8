//! egui side panel: weight sliders, interaction and display options, tier
//! legend, hovered-tile inspector and diagnostics.

mod entities;
mod sections;
mod systems;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::GameState;

/// Panel layout and slider limits.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct PanelConfig {
    /// Initial panel width in logical pixels.
    pub width: f32,
    /// Upper bound of every weight slider.
    pub max_weight: f64,
    /// Largest hover radius offered.
    pub max_hover_radius: u32,
    /// Diagnostics listed before the rest are summarised.
    pub max_diagnostics: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            max_weight: 30.0,
            max_hover_radius: 6,
            max_diagnostics: 40,
        }
    }
}

/// Panel plugin: draws the side panel once the map is loaded.
pub struct PanelPlugin(pub PanelConfig);

impl Plugin for PanelPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PanelConfig>()
            .insert_resource(self.0.clone())
            .add_systems(
                EguiPrimaryContextPass,
                systems::draw_panel.run_if(not(in_state(GameState::Loading))),
            );
    }
}
