//! Map ingestion: JSON and CSV exports of a strategy map, plus a procedural
//! demo map. Malformed records are skipped with a diagnostic; only problems
//! that make the whole source unusable are returned as [`MapLoadError`].

mod csv;
mod demo;
mod export;
mod json;

pub use csv::parse_csv;
pub use demo::{DemoSettings, generate_demo};
pub use export::{ExportDocument, export_document, write_export};
pub use json::parse_json;

use std::path::{Path, PathBuf};

use bevy::log::info;
use bevy::platform::collections::HashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::tile::Tile;

/// Appeal given to descriptive labels such as `Breathtaking`.
const DESCRIPTIVE_APPEAL: i32 = 4;

/// Fatal ingestion failures.
#[derive(Error, Debug)]
pub enum MapLoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The export could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The document is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON document has no tile list.
    #[error("map JSON has no `tiles` array")]
    MissingTiles,
    /// The CSV source has no header row.
    #[error("CSV has no header row")]
    EmptyCsv,
    /// A required CSV column is missing.
    #[error("CSV is missing required column `{0}`")]
    MissingColumn(&'static str),
    /// The file extension is not recognised.
    #[error("unsupported map format `{0}` (expected .json or .csv)")]
    UnsupportedFormat(String),
}

/// Inclusive coordinate bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapBounds {
    /// Smallest column.
    pub min_x: i32,
    /// Largest column.
    pub max_x: i32,
    /// Smallest row.
    pub min_y: i32,
    /// Largest row.
    pub max_y: i32,
}

impl MapBounds {
    /// Bounds of the given tiles; all zero when there are none.
    pub fn of(tiles: &[Tile]) -> Self {
        let mut coords = tiles.iter().map(|t| t.coord);
        let Some(first) = coords.next() else {
            return Self::default();
        };
        coords.fold(
            Self {
                min_x: first.x,
                max_x: first.x,
                min_y: first.y,
                max_y: first.y,
            },
            |b, c| Self {
                min_x: b.min_x.min(c.x),
                max_x: b.max_x.max(c.x),
                min_y: b.min_y.min(c.y),
                max_y: b.max_y.max(c.y),
            },
        )
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }
}

/// A loaded map.
#[derive(Debug, Clone, Default)]
pub struct MapData {
    /// Bounding box of the accepted tiles.
    pub bounds: MapBounds,
    /// Accepted tiles, unique by coordinate, in source order.
    pub tiles: Vec<Tile>,
    /// Records skipped while loading.
    pub diagnostics: Diagnostics,
}

impl MapData {
    /// Drops duplicate coordinates (first wins) and computes bounds.
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>, mut diagnostics: Diagnostics) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for tile in tiles {
            if seen.insert(tile.coord) {
                kept.push(tile);
            } else {
                diagnostics.push(Diagnostic::DuplicateCoordinate(tile.coord));
            }
        }
        let bounds = MapBounds::of(&kept);
        info!(
            "map: {} tiles, x {}..={}, y {}..={}, {} skipped",
            kept.len(),
            bounds.min_x,
            bounds.max_x,
            bounds.min_y,
            bounds.max_y,
            diagnostics.len()
        );
        Self {
            bounds,
            tiles: kept,
            diagnostics,
        }
    }

    /// Loads a `.json` or `.csv` map file.
    pub fn load(path: &Path) -> Result<Self, MapLoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let parse: fn(&str) -> Result<Self, MapLoadError> = match extension.as_str() {
            "json" => parse_json,
            "csv" | "txt" => parse_csv,
            _ => return Err(MapLoadError::UnsupportedFormat(extension)),
        };
        let text = std::fs::read_to_string(path).map_err(|source| MapLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("loading {}", path.display());
        parse(&text)
    }
}

/// `true`, `1` and `yes` in any case.
fn is_truthy(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

/// Trimmed text, `None` when blank.
fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Numeric appeal, or a descriptive label such as `Breathtaking`.
fn parse_appeal(text: &str) -> Option<i32> {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return value.is_finite().then(|| value.round() as i32);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "good" | "high" | "positive" | "breathtaking" => Some(DESCRIPTIVE_APPEAL),
        _ => None,
    }
}
