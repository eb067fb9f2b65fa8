use serde::Deserialize;
use serde_json::Value;

use super::{MapData, MapLoadError, is_truthy, non_blank, parse_appeal};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::grid::OffsetCoord;
use crate::tile::{ResourceClass, Tile, Yields};

/// One entry of the `tiles` array. Unknown keys (e.g. scores from a
/// previous export) are ignored.
#[derive(Deserialize)]
struct TileRecord {
    x: i32,
    y: i32,
    terrain: String,
    #[serde(default)]
    feature: Option<String>,
    #[serde(default)]
    resource: Option<String>,
    #[serde(default, alias = "resource_type")]
    resourcetype: Option<String>,
    #[serde(default)]
    continent: Option<Value>,
    #[serde(default)]
    rivers: Option<Value>,
    #[serde(default)]
    appeal: Option<Value>,
    #[serde(default, alias = "goody_hut")]
    goodyhut: Option<Value>,
    #[serde(default)]
    food: Option<f64>,
    #[serde(default)]
    production: Option<f64>,
    #[serde(default)]
    gold: Option<f64>,
}

impl TileRecord {
    fn into_tile(self) -> Tile {
        let mut tile = Tile::new(OffsetCoord::new(self.x, self.y), self.terrain);
        if let Some(feature) = self.feature.as_deref().and_then(non_blank) {
            tile = tile.with_feature(feature);
        }
        if let (Some(food), Some(production), Some(gold)) =
            (self.food, self.production, self.gold)
        {
            tile.yields = Yields::new(food, production, gold);
        }
        tile.resource = self.resource.as_deref().and_then(non_blank);
        tile.resource_class = self.resourcetype.as_deref().and_then(ResourceClass::parse);
        tile.continent = self.continent.and_then(|v| match v {
            Value::Null => None,
            Value::String(s) => non_blank(&s),
            other => Some(other.to_string()),
        });
        tile.river_adjacent = self.rivers.is_some_and(|v| match v {
            Value::Null | Value::Bool(false) => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(a) => !a.is_empty(),
            _ => true,
        });
        tile.appeal = self.appeal.and_then(|v| match v {
            Value::Number(n) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.round() as i32),
            Value::String(s) => parse_appeal(&s),
            _ => None,
        });
        tile.goody_hut = self.goodyhut.is_some_and(|v| match v {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64() == Some(1.0),
            Value::String(s) => is_truthy(&s),
            _ => false,
        });
        tile
    }
}

/// Parses a `{ "metadata": {..}, "tiles": [..] }` document, or a bare tile array.
///
/// Metadata bounds are ignored; they are recomputed from the accepted tiles.
pub fn parse_json(text: &str) -> Result<MapData, MapLoadError> {
    let document: Value = serde_json::from_str(text)?;
    let records = match document {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("tiles") {
            Some(Value::Array(records)) => records,
            _ => return Err(MapLoadError::MissingTiles),
        },
        _ => return Err(MapLoadError::MissingTiles),
    };

    let mut diagnostics = Diagnostics::default();
    let mut tiles = Vec::with_capacity(records.len());
    for (i, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<TileRecord>(record) {
            Ok(record) => tiles.push(record.into_tile()),
            Err(err) => diagnostics.push(Diagnostic::SkippedRecord {
                record: i + 1,
                reason: err.to_string(),
            }),
        }
    }
    Ok(MapData::from_tiles(tiles, diagnostics))
}
