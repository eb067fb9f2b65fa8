use bevy::color::{ColorToPacked, Srgba};
use bevy::prelude::*;
use bevy_egui::egui;

use crate::diagnostics::Diagnostics;
use crate::grid::GridIndex;
use crate::math;
use crate::recalc::{RecalcSummary, ScoringContext};
use crate::scoring::{WeightConfig, score_breakdown};
use crate::tile::Tile;
use crate::tiering::Tier;
use crate::tiles::{ColorMode, DisplayOptions, TileInteraction};

fn color32(color: Srgba) -> egui::Color32 {
    let [r, g, b, _] = color.to_u8_array();
    egui::Color32::from_rgb(r, g, b)
}

fn swatch(ui: &mut egui::Ui, color: Srgba) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
    ui.painter().rect_filled(rect, 2.0, color32(color));
}

fn row(ui: &mut egui::Ui, label: &str, value: impl Into<egui::WidgetText>) {
    ui.label(label);
    ui.label(value);
    ui.end_row();
}

// ── Weights ─────────────────────────────────────────────────────────

/// One slider per weight leaf. Returns `true` if any value changed.
pub fn draw_weights(ui: &mut egui::Ui, weights: &mut WeightConfig, max: f64) -> bool {
    let mut changed = false;
    egui::CollapsingHeader::new("Weights")
        .default_open(true)
        .show(ui, |ui| {
            let mut slider = |ui: &mut egui::Ui, value: &mut f64, label: &str| {
                changed |= ui
                    .add(egui::Slider::new(value, 0.0..=max).text(label))
                    .changed();
            };
            let y = &mut weights.yields;
            slider(ui, &mut y.food, "Food");
            slider(ui, &mut y.production, "Production");
            slider(ui, &mut y.gold, "Gold");
            let b = &mut weights.bonuses;
            slider(ui, &mut b.balance, "Food/production balance");
            slider(ui, &mut b.luxury_resource, "Luxury resource");
            slider(ui, &mut b.strategic_resource, "Strategic resource");
            slider(ui, &mut b.bonus_resource, "Bonus resource");
            slider(ui, &mut b.fresh_water, "Fresh water");
            slider(ui, &mut b.positive_appeal, "Positive appeal");
            slider(ui, &mut b.goody_hut, "Goody hut");
            if ui.button("Reset to defaults").clicked() {
                *weights = WeightConfig::default();
                changed = true;
            }
        });
    changed
}

// ── Interaction ─────────────────────────────────────────────────────

/// Hover radius, focus arming and the active focus. Returns `true` if the
/// controller changed.
pub fn draw_interaction(
    ui: &mut egui::Ui,
    interaction: &mut TileInteraction,
    index: &GridIndex<Entity>,
    max_radius: u32,
) -> bool {
    let mut changed = false;
    egui::CollapsingHeader::new("Interaction")
        .default_open(true)
        .show(ui, |ui| {
            let mut radius = interaction.hover_radius();
            if ui
                .add(egui::Slider::new(&mut radius, 0..=max_radius).text("Hover radius"))
                .changed()
            {
                interaction.set_hover_radius(radius);
                if let Some(hovered) = interaction.hovered() {
                    interaction.pointer_over(index, hovered);
                }
                changed = true;
            }

            let mut armed = interaction.focus_armed();
            if ui.checkbox(&mut armed, "Click to focus").changed() {
                interaction.arm_focus(armed);
                changed = true;
            }

            let focus = interaction
                .focus()
                .map(|region| (region.center, region.workable.len()));
            match focus {
                Some((center, workable)) => {
                    let coord = index
                        .coord_of(center)
                        .map_or_else(|| "?".to_string(), |c| c.to_string());
                    ui.label(format!("Focused on {coord}, {workable} workable tiles"));
                    if ui.button("Exit focus (Esc)").clicked() {
                        interaction.exit_focus();
                        changed = true;
                    }
                }
                None => {
                    ui.weak("Browsing");
                }
            }
        });
    changed
}

// ── Display ─────────────────────────────────────────────────────────

/// Colour mode and tier filter. Returns `true` if anything changed.
pub fn draw_display(ui: &mut egui::Ui, display: &mut DisplayOptions) -> bool {
    let mut changed = false;
    egui::CollapsingHeader::new("Display")
        .default_open(true)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                changed |= ui
                    .radio_value(&mut display.color_mode, ColorMode::Tier, "Tiers")
                    .changed();
                changed |= ui
                    .radio_value(&mut display.color_mode, ColorMode::Heatmap, "Score heatmap")
                    .changed();
            });
            ui.horizontal_wrapped(|ui| {
                for tier in Tier::ALL.iter().rev() {
                    changed |= ui
                        .checkbox(&mut display.visible_tiers[tier.rank()], tier.label())
                        .changed();
                }
            });
            changed |= ui
                .checkbox(&mut display.show_non_workable, "Show water and ice")
                .changed();
        });
    changed
}

// ── Legend ──────────────────────────────────────────────────────────

/// Tier colours with their score thresholds, the heatmap scale and totals.
pub fn draw_legend(ui: &mut egui::Ui, summary: &RecalcSummary) {
    egui::CollapsingHeader::new("Legend")
        .default_open(true)
        .show(ui, |ui| {
            if summary.workable == 0 {
                ui.colored_label(egui::Color32::LIGHT_RED, "No workable tiles found");
            }
            egui::Grid::new("tier_legend")
                .num_columns(3)
                .striped(true)
                .show(ui, |ui| {
                    for tier in Tier::ALL.iter().rev() {
                        swatch(ui, math::tier_color(Some(*tier)));
                        ui.label(tier.label());
                        let text = match summary.thresholds.iter().find(|t| t.tier == *tier) {
                            Some(t) => format!("up to {:.0}", t.score),
                            None => "-".to_string(),
                        };
                        ui.label(text);
                        ui.end_row();
                    }
                });

            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                for i in 0..=10 {
                    swatch(ui, math::heat_color(f64::from(i) / 10.0));
                }
            });
            ui.label(format!(
                "Scores {:.0} .. {:.0}",
                summary.range.min, summary.range.max
            ));
            ui.label(format!(
                "{} workable tiles, mean weighted score {:.2}",
                summary.workable, summary.mean_score
            ));
        });
}

// ── Hovered tile ────────────────────────────────────────────────────

/// Attributes, scores and the score breakdown of the hovered tile.
pub fn draw_tile(ui: &mut egui::Ui, tile: Option<&Tile>, ctx: &ScoringContext) {
    egui::CollapsingHeader::new("Hovered tile")
        .default_open(true)
        .show(ui, |ui| {
            let Some(tile) = tile else {
                ui.weak("Hover a tile");
                return;
            };
            egui::Grid::new("tile_info").num_columns(2).show(ui, |ui| {
                row(ui, "Coordinate", tile.coord.to_string());
                row(ui, "Terrain", tile.terrain_label());
                row(ui, "Feature", tile.feature.as_deref().unwrap_or("-"));
                let resource = match (&tile.resource, tile.resource_class) {
                    (Some(name), Some(class)) => format!("{name} ({})", class.label()),
                    (Some(name), None) => name.clone(),
                    (None, _) => "-".to_string(),
                };
                row(ui, "Resource", resource);
                let y = &tile.yields;
                row(
                    ui,
                    "Yields",
                    format!("{} food, {} production, {} gold", y.food, y.production, y.gold),
                );
                row(ui, "River", if tile.river_adjacent { "yes" } else { "no" });
                row(
                    ui,
                    "Appeal",
                    tile.appeal.map_or_else(|| "-".to_string(), |a| a.to_string()),
                );
                row(ui, "Goody hut", if tile.goody_hut { "yes" } else { "no" });
                row(ui, "Tier", tile.scores.tier.map_or("-", Tier::label));
                row(
                    ui,
                    "Weighted score",
                    format!("{:.2}", tile.scores.weighted_score),
                );
                row(
                    ui,
                    "Normalized score",
                    format!("{:.0}", tile.scores.normalized_score),
                );
            });

            if !tile.scores.is_workable {
                ui.weak("Not workable");
                return;
            }
            let b = score_breakdown(tile, &ctx.weights, &ctx.resources);
            ui.add_space(4.0);
            egui::Grid::new("tile_breakdown")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    row(ui, "Yields", format!("{:.2}", b.yields));
                    row(ui, "Balance", format!("{:.2}", b.balance));
                    row(ui, "Resource", format!("{:.2}", b.resource));
                    row(ui, "Fresh water", format!("{:.2}", b.fresh_water));
                    row(ui, "Appeal", format!("{:.2}", b.appeal));
                    row(ui, "Goody hut", format!("{:.2}", b.goody_hut));
                    row(ui, "Total", format!("{:.2}", b.total()));
                });
        });
}

// ── Diagnostics ─────────────────────────────────────────────────────

/// Load and recalculation diagnostics, capped at `max` lines.
pub fn draw_diagnostics(ui: &mut egui::Ui, load: &Diagnostics, recalc: &Diagnostics, max: usize) {
    let total = load.len() + recalc.len();
    egui::CollapsingHeader::new(format!("Diagnostics ({total})"))
        .id_salt("diagnostics")
        .show(ui, |ui| {
            if total == 0 {
                ui.weak("None");
            }
            for diagnostic in load.iter().chain(recalc.iter()).take(max) {
                ui.label(diagnostic.to_string());
            }
            if total > max {
                ui.weak(format!("and {} more", total - max));
            }
        });
}
