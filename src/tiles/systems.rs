use bevy::color::{Alpha, Srgba};
use bevy::prelude::*;

use super::TilesConfig;
use super::entities::{
    ColorMode, DisplayOptions, FocusMarker, MapTiles, Scoring, TileCell, TileInteraction,
    TileVisuals,
};
use crate::interaction::FocusVisual;
use crate::math;
use crate::recalc::{ScoreRange, recalculate_all};
use crate::tile::Tile;

// ── Update: recalculation ───────────────────────────────────────────

/// Rescores the map once the quiet window after the last weight change has
/// passed. Slider drags request on every frame; only the trailing request runs.
pub fn run_recalculation(
    time: Res<Time>,
    mut scoring: ResMut<Scoring>,
    mut tiles: ResMut<MapTiles>,
) {
    if !scoring
        .bypass_change_detection()
        .trigger
        .poll(time.elapsed())
    {
        return;
    }
    let Scoring {
        context, summary, ..
    } = &mut *scoring;
    *summary = recalculate_all(&mut tiles.tiles, context);
    info!(
        "rescored {} tiles: {} workable, scores {:.0}..{:.0}",
        tiles.tiles.len(),
        summary.workable,
        summary.range.min,
        summary.range.max
    );
}

// ── Update: visuals ─────────────────────────────────────────────────

/// Resolved look of one hex face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileStyle {
    /// Whether the face is drawn at all.
    pub visible: bool,
    /// Base colour including opacity.
    pub color: Srgba,
    /// Face height above the ground plane.
    pub elevation: f32,
}

/// Colour, opacity, visibility and height of a face.
///
/// `focus` is the tile's focus-mode role (`None` while browsing); in focus
/// mode the tier filter is ignored and the region decides visibility.
pub fn tile_style(
    tile: &Tile,
    focus: Option<FocusVisual>,
    hovered: bool,
    display: &DisplayOptions,
    range: &ScoreRange,
    cfg: &TilesConfig,
) -> TileStyle {
    let scores = &tile.scores;
    let base = match display.color_mode {
        ColorMode::Tier => math::tier_color(scores.tier),
        ColorMode::Heatmap if scores.is_workable => {
            math::heat_color(range.fraction(scores.normalized_score))
        }
        ColorMode::Heatmap => math::UNTIERED_COLOR,
    };
    let (visible, alpha) = match focus {
        Some(FocusVisual::Hidden) => (false, 0.0),
        Some(FocusVisual::OuterRing) => (true, cfg.style.outer_ring_alpha),
        Some(FocusVisual::Workable | FocusVisual::Center) => (true, 1.0),
        None => (
            display.shows(scores.tier, scores.is_workable),
            cfg.style.tile_alpha,
        ),
    };
    let color = base.with_alpha(alpha);
    TileStyle {
        visible,
        color: if hovered {
            math::brighten(color, cfg.style.hover_brighten)
        } else {
            color
        },
        elevation: math::tier_elevation(scores.tier, cfg.layout.tier_step),
    }
}

/// Restyles every face after a recalculation, a display option change or
/// an interaction event.
pub fn refresh_tile_visuals(
    view: TileVisuals,
    mut cell_q: Query<(
        Entity,
        &TileCell,
        &MeshMaterial3d<StandardMaterial>,
        &mut Transform,
        &mut Visibility,
    )>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !view.is_stale() {
        return;
    }
    let affected = view.interaction.affected();
    for (entity, cell, mat_handle, mut transform, mut visibility) in &mut cell_q {
        let Some(tile) = view.tiles.tiles.get(cell.index) else {
            continue;
        };
        let style = tile_style(
            tile,
            view.interaction.focus_visual(entity),
            affected.contains(&entity),
            &view.display,
            &view.scoring.summary.range,
            &view.cfg,
        );

        visibility.set_if_neq(if style.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
        if transform.translation.y != style.elevation {
            transform.translation.y = style.elevation;
        }
        if let Some(mat) = materials.get_mut(&mat_handle.0) {
            mat.base_color = style.color.into();
        }
    }
}

/// Parks the marker over the focus centre, hides it while browsing.
pub fn move_focus_marker(
    interaction: Res<TileInteraction>,
    cfg: Res<TilesConfig>,
    cell_q: Query<&Transform, (With<TileCell>, Without<FocusMarker>)>,
    mut marker_q: Query<(&mut Transform, &mut Visibility), With<FocusMarker>>,
) {
    let Ok((mut marker_tf, mut visibility)) = marker_q.single_mut() else {
        return;
    };
    let center = interaction
        .focus()
        .and_then(|region| cell_q.get(region.center).ok());
    match center {
        Some(cell_tf) => {
            let target = cell_tf.translation + Vec3::Y * cfg.layout.marker_lift;
            if marker_tf.translation != target {
                marker_tf.translation = target;
            }
            visibility.set_if_neq(Visibility::Inherited);
        }
        None => {
            visibility.set_if_neq(Visibility::Hidden);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::OffsetCoord;
    use crate::tile::TileScores;
    use crate::tiering::Tier;

    fn tiered(tier: Tier, normalized: f64) -> Tile {
        let mut tile = Tile::new(OffsetCoord::new(0, 0), "TERRAIN_GRASS");
        tile.scores = TileScores {
            weighted_score: normalized / 10.0,
            normalized_score: normalized,
            tier: Some(tier),
            is_workable: true,
        };
        tile
    }

    fn range() -> ScoreRange {
        ScoreRange {
            min: 50.0,
            max: 150.0,
        }
    }

    // ── browsing ────────────────────────────────────────────────────

    #[test]
    fn browsing_uses_tier_colour_at_tile_alpha() {
        let cfg = TilesConfig::default();
        let style = tile_style(
            &tiered(Tier::A, 120.0),
            None,
            false,
            &DisplayOptions::default(),
            &range(),
            &cfg,
        );
        assert!(style.visible);
        assert_eq!(
            style.color,
            math::tier_color(Some(Tier::A)).with_alpha(cfg.style.tile_alpha)
        );
        assert_eq!(
            style.elevation,
            math::tier_elevation(Some(Tier::A), cfg.layout.tier_step)
        );
    }

    #[test]
    fn tier_filter_hides_while_browsing_only() {
        let cfg = TilesConfig::default();
        let mut display = DisplayOptions::default();
        display.visible_tiers[Tier::D.rank()] = false;
        let tile = tiered(Tier::D, 80.0);
        assert!(!tile_style(&tile, None, false, &display, &range(), &cfg).visible);
        let focused = tile_style(
            &tile,
            Some(FocusVisual::Workable),
            false,
            &display,
            &range(),
            &cfg,
        );
        assert!(focused.visible);
    }

    #[test]
    fn heatmap_spans_the_score_range() {
        let cfg = TilesConfig::default();
        let display = DisplayOptions {
            color_mode: ColorMode::Heatmap,
            ..Default::default()
        };
        let low = tile_style(&tiered(Tier::F, 50.0), None, false, &display, &range(), &cfg);
        let high = tile_style(&tiered(Tier::S, 150.0), None, false, &display, &range(), &cfg);
        assert_eq!(
            low.color,
            math::heat_color(0.0).with_alpha(cfg.style.tile_alpha)
        );
        assert_eq!(
            high.color,
            math::heat_color(1.0).with_alpha(cfg.style.tile_alpha)
        );
    }

    #[test]
    fn hover_brightens() {
        let cfg = TilesConfig::default();
        let tile = tiered(Tier::C, 100.0);
        let plain = tile_style(&tile, None, false, &DisplayOptions::default(), &range(), &cfg);
        let lit = tile_style(&tile, None, true, &DisplayOptions::default(), &range(), &cfg);
        assert!(lit.color.red > plain.color.red);
        assert_eq!(lit.color.alpha, plain.color.alpha);
    }

    // ── focus ───────────────────────────────────────────────────────

    #[test]
    fn focus_roles_set_opacity() {
        let cfg = TilesConfig::default();
        let tile = tiered(Tier::B, 110.0);
        let display = DisplayOptions::default();
        let style = |v| tile_style(&tile, Some(v), false, &display, &range(), &cfg);
        assert!(!style(FocusVisual::Hidden).visible);
        assert_eq!(
            style(FocusVisual::OuterRing).color.alpha,
            cfg.style.outer_ring_alpha
        );
        assert_eq!(style(FocusVisual::Workable).color.alpha, 1.0);
        assert_eq!(style(FocusVisual::Center).color.alpha, 1.0);
    }

    #[test]
    fn water_is_flat_and_untiered() {
        let cfg = TilesConfig::default();
        let water = Tile::new(OffsetCoord::new(1, 1), crate::tile::OCEAN_TERRAIN);
        let style = tile_style(&water, None, false, &DisplayOptions::default(), &range(), &cfg);
        assert_eq!(style.elevation, 0.0);
        assert_eq!(
            style.color,
            math::UNTIERED_COLOR.with_alpha(cfg.style.tile_alpha)
        );
    }
}
