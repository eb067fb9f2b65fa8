use super::Yields;

/// Yields of a bare terrain. Unknown terrains yield nothing.
pub fn terrain_yields(terrain: &str) -> Yields {
    match terrain {
        "TERRAIN_GRASS" => Yields::new(2.0, 0.0, 0.0),
        "TERRAIN_GRASS_HILLS" => Yields::new(2.0, 1.0, 0.0),
        "TERRAIN_PLAINS" => Yields::new(1.0, 1.0, 0.0),
        "TERRAIN_PLAINS_HILLS" => Yields::new(1.0, 2.0, 0.0),
        "TERRAIN_DESERT" => Yields::new(0.0, 0.0, 0.0),
        "TERRAIN_DESERT_HILLS" => Yields::new(0.0, 1.0, 0.0),
        "TERRAIN_TUNDRA" => Yields::new(1.0, 0.0, 0.0),
        "TERRAIN_TUNDRA_HILLS" => Yields::new(1.0, 1.0, 0.0),
        "TERRAIN_COAST" => Yields::new(1.0, 0.0, 1.0),
        "TERRAIN_OCEAN" => Yields::new(1.0, 0.0, 0.0),
        "TERRAIN_SNOW" => Yields::new(0.0, 0.0, 0.0),
        "TERRAIN_SNOW_HILLS" => Yields::new(0.0, 1.0, 0.0),
        _ => Yields::default(),
    }
}

/// Additive yields of a feature. Unknown features yield nothing.
pub fn feature_yields(feature: &str) -> Yields {
    match feature {
        "FEATURE_FOREST" => Yields::new(0.0, 1.0, 0.0),
        "FEATURE_JUNGLE" => Yields::new(1.0, 0.0, 0.0),
        "FEATURE_MARSH" => Yields::new(1.0, 0.0, 0.0),
        "FEATURE_FLOODPLAINS" => Yields::new(3.0, 0.0, 0.0),
        "FEATURE_OASIS" => Yields::new(3.0, 0.0, 1.0),
        "FEATURE_REEF" => Yields::new(1.0, 1.0, 0.0),
        _ => Yields::default(),
    }
}

/// Terrain yields plus feature yields.
pub fn base_yields(terrain: &str, feature: Option<&str>) -> Yields {
    terrain_yields(terrain) + feature.map(feature_yields).unwrap_or_default()
}
