use bevy::prelude::Reflect;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::MapData;
use crate::diagnostics::Diagnostics;
use crate::grid::OffsetCoord;
use crate::scoring::ResourceTable;
use crate::tile::{ICE_FEATURE, OCEAN_TERRAIN, Tile};

/// Procedural map parameters.
#[derive(Clone, Debug, Reflect)]
pub struct DemoSettings {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// Base seed; each noise layer offsets it.
    pub seed: u32,
    /// Octaves of the elevation and moisture layers.
    pub octaves: usize,
    /// Spatial scale divisor for noise sampling.
    pub scale: f64,
    /// Elevation below which tiles are water.
    pub sea_level: f64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            width: 60,
            height: 40,
            seed: 42,
            octaves: 4,
            scale: 14.0,
            sea_level: -0.15,
        }
    }
}

impl DemoSettings {
    /// Number of tiles the map will have.
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Noise layers sampled per tile.
struct Layers {
    elevation: Fbm<Perlin>,
    moisture: Fbm<Perlin>,
    rivers: Perlin,
    sprinkle: Perlin,
}

impl Layers {
    fn new(s: &DemoSettings) -> Self {
        Self {
            elevation: Fbm::<Perlin>::new(s.seed).set_octaves(s.octaves),
            moisture: Fbm::<Perlin>::new(s.seed.wrapping_add(1)).set_octaves(s.octaves),
            rivers: Perlin::new(s.seed.wrapping_add(2)),
            sprinkle: Perlin::new(s.seed.wrapping_add(3)),
        }
    }
}

/// Generates a bounded odd-r map from layered noise.
///
/// The same settings always produce the same map.
pub fn generate_demo(settings: &DemoSettings, resources: &ResourceTable) -> MapData {
    let layers = Layers::new(settings);
    let names = resources.names();
    let mut tiles = Vec::with_capacity(settings.tile_count());

    for y in 0..settings.height as i32 {
        // 0 at the equator, 1 at the poles.
        let latitude = if settings.height > 1 {
            ((f64::from(y) / f64::from(settings.height - 1)) * 2.0 - 1.0).abs()
        } else {
            0.0
        };
        for x in 0..settings.width as i32 {
            let coord = OffsetCoord::new(x, y);
            // Sample at hex centres so odd rows are shifted like the grid.
            let px = (f64::from(x) + if coord.is_odd_row() { 0.5 } else { 0.0 }) / settings.scale;
            let py = f64::from(y) * 0.866 / settings.scale;

            let sample = Sample {
                latitude,
                elevation: layers.elevation.get([px, py]) - settings.sea_level,
                moisture: layers.moisture.get([px, py]),
                river: layers.rivers.get([px * 2.0, py * 2.0]),
                sprinkle: layers.sprinkle.get([px * 7.3 + 0.5, py * 7.9 + 0.5]),
            };
            tiles.push(sample.tile(coord, &names));
        }
    }
    MapData::from_tiles(tiles, Diagnostics::default())
}

/// Noise values at one tile. `elevation` is relative to sea level.
#[derive(Clone, Copy)]
struct Sample {
    latitude: f64,
    elevation: f64,
    moisture: f64,
    river: f64,
    sprinkle: f64,
}

impl Sample {
    fn tile(&self, coord: OffsetCoord, resources: &[&str]) -> Tile {
        let Sample {
            latitude,
            elevation,
            moisture,
            river,
            sprinkle,
        } = *self;

        if elevation < 0.0 {
            let terrain = if elevation < -0.15 {
                OCEAN_TERRAIN
            } else {
                "TERRAIN_COAST"
            };
            let tile = Tile::new(coord, terrain);
            return if latitude > 0.9 {
                tile.with_feature(ICE_FEATURE)
            } else if terrain == "TERRAIN_COAST" && sprinkle > 0.6 {
                tile.with_feature("FEATURE_REEF")
            } else {
                tile
            };
        }

        let base = if latitude > 0.85 {
            "SNOW"
        } else if latitude > 0.7 {
            "TUNDRA"
        } else if moisture > 0.15 {
            "GRASS"
        } else if moisture > -0.2 {
            "PLAINS"
        } else {
            "DESERT"
        };
        let hills = elevation > 0.45;
        let terrain = if hills {
            format!("TERRAIN_{base}_HILLS")
        } else {
            format!("TERRAIN_{base}")
        };

        let mut tile = Tile::new(coord, terrain);
        let river_adjacent = river.abs() < 0.06;
        let feature = match base {
            "GRASS" if moisture > 0.4 && latitude < 0.3 => Some("FEATURE_JUNGLE"),
            "GRASS" | "PLAINS" | "TUNDRA" if moisture > 0.3 => Some("FEATURE_FOREST"),
            "GRASS" if !hills && elevation < 0.05 => Some("FEATURE_MARSH"),
            "DESERT" if river_adjacent && !hills => Some("FEATURE_FLOODPLAINS"),
            "DESERT" if sprinkle > 0.7 => Some("FEATURE_OASIS"),
            _ => None,
        };
        if let Some(feature) = feature {
            tile = tile.with_feature(feature);
        }
        if river_adjacent {
            tile = tile.with_river();
        }
        if sprinkle > 0.45 && !resources.is_empty() {
            let pick = ((sprinkle * 1_000.0) as usize) % resources.len();
            tile = tile.with_resource(resources[pick]);
        } else if sprinkle < -0.75 {
            tile = tile.with_goody_hut();
        }
        tile.with_appeal(((moisture - elevation) * 5.0).round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> DemoSettings {
        DemoSettings {
            width: 24,
            height: 16,
            ..Default::default()
        }
    }

    #[test]
    fn demo_fills_the_rectangle() {
        let map = generate_demo(&small(), &ResourceTable::default());
        assert_eq!(map.tiles.len(), 24 * 16);
        assert_eq!(map.bounds.width(), 24);
        assert_eq!(map.bounds.height(), 16);
        assert!(map.diagnostics.is_empty());
    }

    #[test]
    fn tile_count_does_not_wrap() {
        let huge = DemoSettings {
            width: u32::MAX,
            height: 4,
            ..Default::default()
        };
        assert_eq!(huge.tile_count(), u32::MAX as usize * 4);
        assert_eq!(small().tile_count(), 24 * 16);
    }

    #[test]
    fn demo_is_deterministic() {
        let a = generate_demo(&small(), &ResourceTable::default());
        let b = generate_demo(&small(), &ResourceTable::default());
        assert_eq!(a.tiles, b.tiles);
    }

    #[test]
    fn demo_has_land_and_water() {
        let map = generate_demo(&DemoSettings::default(), &ResourceTable::default());
        let workable = map.tiles.iter().filter(|t| t.is_workable()).count();
        assert!(workable > 0, "no land generated");
        assert!(workable < map.tiles.len(), "no water generated");
    }

    #[test]
    fn polar_rows_are_cold() {
        let map = generate_demo(&small(), &ResourceTable::default());
        for tile in map.tiles.iter().filter(|t| t.coord.y == 0) {
            assert!(
                tile.terrain.contains("SNOW")
                    || !tile.is_workable()
                    || tile.terrain == "TERRAIN_COAST",
                "{} at the pole",
                tile.terrain
            );
        }
    }
}
