use bevy::prelude::*;

use super::entities::{CursorGround, UiFocus};
use crate::interaction::FocusVisual;
use crate::tiles::{MapLayout, TileIndex, TileInteraction};

/// Resolves the tile under the cursor and reports changes to the controller.
pub fn hover_tile(
    cursor: CursorGround,
    layout: Res<MapLayout>,
    index: Res<TileIndex>,
    mut interaction: ResMut<TileInteraction>,
) {
    let target = cursor
        .ground_point()
        .and_then(|ground| index.get(layout.coord_at(ground)))
        .filter(|entity| interaction.focus_visual(*entity) != Some(FocusVisual::Hidden));
    if target == interaction.hovered() {
        return;
    }
    match target {
        Some(entity) => {
            interaction.pointer_over(&index.0, entity);
        }
        None => interaction.pointer_left(),
    }
}

/// Left click on the hovered tile enters focus mode (when armed).
pub fn click_tile(
    mouse: Res<ButtonInput<MouseButton>>,
    ui: Res<UiFocus>,
    index: Res<TileIndex>,
    mut interaction: ResMut<TileInteraction>,
) {
    if !mouse.just_pressed(MouseButton::Left) || ui.pointer_over_panel {
        return;
    }
    let Some(entity) = interaction.hovered() else {
        return;
    };
    if interaction.bypass_change_detection().click(&index.0, entity) {
        interaction.set_changed();
    }
}

/// `Escape` leaves focus mode.
pub fn cancel_focus(keys: Res<ButtonInput<KeyCode>>, mut interaction: ResMut<TileInteraction>) {
    if keys.just_pressed(KeyCode::Escape) && interaction.bypass_change_detection().exit_focus() {
        interaction.set_changed();
    }
}

/// Drops the hover highlight when leaving browsing (e.g. for the inspector).
pub fn clear_hover(mut interaction: ResMut<TileInteraction>) {
    if interaction.hovered().is_some() {
        interaction.pointer_left();
    }
}
