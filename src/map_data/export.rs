use std::path::Path;

use bevy::log::info;
use serde::Serialize;

use super::{MapBounds, MapLoadError};
use crate::recalc::RecalcSummary;
use crate::tile::{ResourceClass, Tile};
use crate::tiering::Tier;

/// Scored map as written by `--export`.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    /// Bounds, thresholds and score range.
    pub metadata: ExportMetadata,
    /// Tiles, best first.
    pub tiles: Vec<ExportTile<'a>>,
}

/// Map-wide export fields.
#[derive(Debug, Serialize)]
pub struct ExportMetadata {
    /// Smallest column.
    pub min_x: i32,
    /// Largest column.
    pub max_x: i32,
    /// Smallest row.
    pub min_y: i32,
    /// Largest row.
    pub max_y: i32,
    /// Highest normalized score per tier, ascending.
    pub tier_thresholds: Vec<ExportThreshold>,
    /// Lowest workable normalized score.
    pub min_score: f64,
    /// Highest workable normalized score (widened when flat).
    pub max_score: f64,
}

/// One tier threshold.
#[derive(Debug, Serialize)]
pub struct ExportThreshold {
    /// Tier.
    pub tier: Tier,
    /// Highest normalized score in the tier.
    pub score: f64,
}

/// One exported tile. Field names match the ingestion format.
#[derive(Debug, Serialize)]
pub struct ExportTile<'a> {
    x: i32,
    y: i32,
    terrain: &'a str,
    feature: Option<&'a str>,
    resource: Option<&'a str>,
    resourcetype: Option<&'static str>,
    continent: Option<&'a str>,
    rivers: bool,
    appeal: Option<i32>,
    goodyhut: bool,
    food: f64,
    production: f64,
    gold: f64,
    weighted_score: f64,
    normalized_score: f64,
    tier: Option<Tier>,
}

impl<'a> From<&'a Tile> for ExportTile<'a> {
    fn from(tile: &'a Tile) -> Self {
        Self {
            x: tile.coord.x,
            y: tile.coord.y,
            terrain: &tile.terrain,
            feature: tile.feature.as_deref(),
            resource: tile.resource.as_deref(),
            resourcetype: tile.resource_class.map(ResourceClass::label),
            continent: tile.continent.as_deref(),
            rivers: tile.river_adjacent,
            appeal: tile.appeal,
            goodyhut: tile.goody_hut,
            food: tile.yields.food,
            production: tile.yields.production,
            gold: tile.yields.gold,
            weighted_score: tile.scores.weighted_score,
            normalized_score: tile.scores.normalized_score,
            tier: tile.scores.tier,
        }
    }
}

/// Builds the export document; tiles are ordered by descending normalized
/// score, ties kept in map order.
pub fn export_document<'a>(
    tiles: &'a [Tile],
    bounds: &MapBounds,
    summary: &RecalcSummary,
) -> ExportDocument<'a> {
    let mut ordered: Vec<&Tile> = tiles.iter().collect();
    ordered.sort_by(|a, b| {
        b.scores
            .normalized_score
            .total_cmp(&a.scores.normalized_score)
    });
    ExportDocument {
        metadata: ExportMetadata {
            min_x: bounds.min_x,
            max_x: bounds.max_x,
            min_y: bounds.min_y,
            max_y: bounds.max_y,
            tier_thresholds: summary
                .thresholds
                .iter()
                .map(|t| ExportThreshold {
                    tier: t.tier,
                    score: t.score,
                })
                .collect(),
            min_score: summary.range.min,
            max_score: summary.range.max,
        },
        tiles: ordered.into_iter().map(ExportTile::from).collect(),
    }
}

/// Writes the document as pretty-printed JSON.
pub fn write_export(path: &Path, document: &ExportDocument<'_>) -> Result<(), MapLoadError> {
    let text = serde_json::to_string_pretty(document)?;
    std::fs::write(path, text).map_err(|source| MapLoadError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "exported {} tiles to {}",
        document.tiles.len(),
        path.display()
    );
    Ok(())
}
