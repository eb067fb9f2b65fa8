use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::entities::PanelState;
use super::sections;
use crate::inspect::UiFocus;

/// Draws the left side panel and records whether it owns the pointer.
///
/// Edits go through `bypass_change_detection` so the tiles plugin only
/// restyles when something actually changed.
pub fn draw_panel(mut contexts: EguiContexts, mut state: PanelState) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::SidePanel::left("tier_panel")
        .default_width(state.cfg.width)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                let now = state.time.elapsed();
                let scoring = state.scoring.bypass_change_detection();
                if sections::draw_weights(ui, &mut scoring.context.weights, state.cfg.max_weight) {
                    scoring.trigger.request(now);
                }
                if scoring.trigger.is_pending() {
                    ui.weak("rescoring...");
                }
                ui.separator();

                let interaction = state.interaction.bypass_change_detection();
                if sections::draw_interaction(
                    ui,
                    interaction,
                    &state.index.0,
                    state.cfg.max_hover_radius,
                ) {
                    state.interaction.set_changed();
                }
                ui.separator();

                if sections::draw_display(ui, state.display.bypass_change_detection()) {
                    state.display.set_changed();
                }
                ui.separator();

                sections::draw_legend(ui, &state.scoring.summary);
                ui.separator();

                let hovered = state
                    .interaction
                    .hovered()
                    .and_then(|entity| state.cell_q.get(entity).ok())
                    .and_then(|cell| state.tiles.tiles.get(cell.index));
                sections::draw_tile(ui, hovered, &state.scoring.context);
                ui.separator();

                sections::draw_diagnostics(
                    ui,
                    &state.tiles.load_diagnostics,
                    &state.scoring.summary.diagnostics,
                    state.cfg.max_diagnostics,
                );
            });
        });

    state.ui_focus.set_if_neq(UiFocus {
        pointer_over_panel: ctx.is_pointer_over_area() || ctx.wants_pointer_input(),
    });
    Ok(())
}
