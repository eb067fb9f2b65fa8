use std::time::Duration;

use bevy::asset::RenderAssetUsages;
use bevy::color::Alpha;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use hexx::{HexLayout, HexOrientation, PlaneMeshBuilder};

use super::TilesConfig;
use super::entities::{
    FocusMarker, MapLayout, MapTiles, PendingMap, Scoring, TileCell, TileIndex, TileMap,
};
use crate::GameState;
use crate::grid::GridIndex;
use crate::map_data::{MapData, generate_demo};
use crate::math;
use crate::recalc::{ScoringContext, recalculate_all};

// ── Startup ─────────────────────────────────────────────────────────

/// Turns the [`PendingMap`] into one hex face per tile, runs the first
/// recalculation and moves on to [`GameState::Browsing`].
pub fn spawn_map(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut pending: ResMut<PendingMap>,
    cfg: Res<TilesConfig>,
    mut next: ResMut<NextState<GameState>>,
) {
    let context = ScoringContext {
        weights: pending.weights,
        ..default()
    };
    let map = pending.map.take().unwrap_or_else(|| {
        info!(
            "no map file given, generating {}x{} demo map",
            cfg.demo.width, cfg.demo.height
        );
        generate_demo(&cfg.demo, &context.resources)
    });
    commands.remove_resource::<PendingMap>();

    let MapData {
        bounds,
        mut tiles,
        diagnostics,
    } = map;
    let summary = recalculate_all(&mut tiles, &context);
    let layout = MapLayout::centred(cfg.layout.hex_size, &bounds);

    // Hex face mesh, shared by every tile
    let face_layout = HexLayout {
        orientation: HexOrientation::Pointy,
        scale: Vec2::splat(cfg.layout.hex_size * cfg.layout.face_scale),
        ..default()
    };
    let face_info = PlaneMeshBuilder::new(&face_layout).build();
    let face_mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, face_info.vertices)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, face_info.normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, face_info.uvs)
    .with_inserted_indices(Indices::U16(face_info.indices));
    let face_handle = meshes.add(face_mesh);

    let map_entity = commands
        .spawn((
            Name::new("TileMap"),
            TileMap,
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    let mut entries = Vec::with_capacity(tiles.len());
    for (index, tile) in tiles.iter().enumerate() {
        let pos = layout.world_pos(tile.coord);
        let tier = tile.scores.tier;
        let material = materials.add(StandardMaterial {
            base_color: math::tier_color(tier)
                .with_alpha(cfg.style.tile_alpha)
                .into(),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        let entity = commands
            .spawn((
                TileCell {
                    index,
                    coord: tile.coord,
                },
                Name::new(format!("Tile{}", tile.coord)),
                Mesh3d(face_handle.clone()),
                MeshMaterial3d(material),
                Transform::from_xyz(
                    pos.x,
                    math::tier_elevation(tier, cfg.layout.tier_step),
                    pos.y,
                ),
                Visibility::default(),
            ))
            .id();
        commands.entity(map_entity).add_child(entity);
        entries.push((tile.coord, entity));
    }

    // Focus marker, hidden until a tile is focused
    let marker_size = cfg.layout.hex_size * cfg.layout.face_scale;
    let glow = cfg.style.marker_glow;
    commands.spawn((
        Name::new("FocusMarker"),
        FocusMarker,
        Mesh3d(meshes.add(Torus::new(marker_size * 0.45, marker_size * 0.6))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.85, 0.3),
            emissive: LinearRgba::rgb(glow, glow * 0.7, glow * 0.1),
            unlit: true,
            ..default()
        })),
        Transform::default(),
        Visibility::Hidden,
    ));

    info!(
        "spawned {} tiles ({} workable), bounds x {}..={}, y {}..={}",
        tiles.len(),
        summary.workable,
        bounds.min_x,
        bounds.max_x,
        bounds.min_y,
        bounds.max_y
    );

    commands.insert_resource(TileIndex(GridIndex::from_entries(entries)));
    commands.insert_resource(layout);
    commands.insert_resource(Scoring::new(
        context,
        summary,
        Duration::from_secs_f32(cfg.recalc_quiet_secs),
    ));
    commands.insert_resource(MapTiles {
        tiles,
        bounds,
        load_diagnostics: diagnostics,
    });
    next.set(GameState::Browsing);
}
