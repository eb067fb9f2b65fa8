use bevy::log::{debug, info};

use super::{MapData, MapLoadError, is_truthy, non_blank, parse_appeal};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::grid::OffsetCoord;
use crate::tile::{ResourceClass, Tile, Yields};

/// Column positions resolved from the header row.
struct Columns {
    x: usize,
    y: usize,
    terrain: usize,
    feature: Option<usize>,
    resource: Option<usize>,
    resource_type: Option<usize>,
    continent: Option<usize>,
    rivers: Option<usize>,
    appeal: Option<usize>,
    goody_hut: Option<usize>,
    yields: Option<[usize; 3]>,
}

impl Columns {
    fn resolve(header: &[String]) -> Result<Self, MapLoadError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h == name)
                .or_else(|| header.iter().position(|h| h.eq_ignore_ascii_case(name)))
        };
        // Fall back to the first header mentioning the axis letter.
        let axis = |name: &'static str| {
            find(name)
                .or_else(|| {
                    let letter = name.to_ascii_lowercase();
                    let found = header
                        .iter()
                        .position(|h| h.to_ascii_lowercase().contains(&letter));
                    if let Some(i) = found {
                        info!("using column `{}` as {name}", header[i]);
                    }
                    found
                })
                .ok_or(MapLoadError::MissingColumn(name))
        };

        let yields = match (find("Food"), find("Production"), find("Gold")) {
            (Some(f), Some(p), Some(g)) => Some([f, p, g]),
            _ => None,
        };
        Ok(Self {
            x: axis("X")?,
            y: axis("Y")?,
            terrain: find("Terrain").ok_or(MapLoadError::MissingColumn("Terrain"))?,
            feature: find("Feature"),
            resource: find("Resource"),
            resource_type: find("ResourceType"),
            continent: find("Continent"),
            rivers: find("Rivers"),
            appeal: find("Appeal"),
            goody_hut: find("GoodyHut"),
            yields,
        })
    }

    fn tile(&self, fields: &[String]) -> Result<Tile, String> {
        let cell = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");
        let opt = |i: Option<usize>| i.map(cell).unwrap_or("");

        let x = parse_coord(cell(self.x)).ok_or_else(|| format!("bad X `{}`", cell(self.x)))?;
        let y = parse_coord(cell(self.y)).ok_or_else(|| format!("bad Y `{}`", cell(self.y)))?;
        let terrain = non_blank(cell(self.terrain)).ok_or("missing terrain")?;

        let mut tile = Tile::new(OffsetCoord::new(x, y), terrain);
        if let Some(feature) = non_blank(opt(self.feature)) {
            tile = tile.with_feature(feature);
        }
        if let Some([f, p, g]) = self.yields {
            let parsed = [f, p, g].map(|i| cell(i).trim().parse::<f64>().ok());
            if let [Some(food), Some(production), Some(gold)] = parsed {
                tile.yields = Yields::new(food, production, gold);
            }
        }
        tile.resource = non_blank(opt(self.resource));
        tile.resource_class = ResourceClass::parse(opt(self.resource_type));
        tile.continent = non_blank(opt(self.continent));
        tile.river_adjacent = non_blank(opt(self.rivers)).is_some();
        tile.appeal = parse_appeal(opt(self.appeal));
        tile.goody_hut = is_truthy(opt(self.goody_hut));
        Ok(tile)
    }
}

/// Integer coordinate, also accepting integral floats such as `12.0`.
fn parse_coord(text: &str) -> Option<i32> {
    let text = text.trim();
    text.parse::<i32>().ok().or_else(|| {
        let f = text.parse::<f64>().ok()?;
        (f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX)).then_some(f as i32)
    })
}

/// Splits one record, honouring double quotes and `""` escapes.
fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Parses a headed CSV export. `;` is used when the header has more
/// semicolons than commas.
pub fn parse_csv(text: &str) -> Result<MapData, MapLoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());
    let (_, header_line) = lines.next().ok_or(MapLoadError::EmptyCsv)?;
    let header_line = header_line.trim_start_matches('\u{feff}');
    let delimiter = if header_line.matches(';').count() > header_line.matches(',').count() {
        ';'
    } else {
        ','
    };
    let header: Vec<String> = split_record(header_line, delimiter)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();
    debug!("CSV header ({delimiter:?}): {}", header.join(", "));
    let columns = Columns::resolve(&header)?;

    let mut diagnostics = Diagnostics::default();
    let mut tiles = Vec::new();
    for (line_no, line) in lines {
        match columns.tile(&split_record(line, delimiter)) {
            Ok(tile) => tiles.push(tile),
            Err(reason) => diagnostics.push(Diagnostic::SkippedRecord {
                record: line_no + 1,
                reason,
            }),
        }
    }
    Ok(MapData::from_tiles(tiles, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
X,Y,Terrain,Feature,Resource,ResourceType,Continent,Rivers,Appeal,GoodyHut,StartingPlot
0,0,TERRAIN_GRASS,FEATURE_FOREST,RESOURCE_DEER,Bonus,CONTINENT_AFRICA,\"N,E\",2,false,false
1,0,TERRAIN_OCEAN,,,,,,,,
2,0,TERRAIN_PLAINS_HILLS,,RESOURCE_IRON,RESOURCECLASS_STRATEGIC,CONTINENT_AFRICA,,-1,TRUE,
";

    #[test]
    fn parses_sample_rows() {
        let map = parse_csv(SAMPLE).unwrap();
        assert_eq!(map.tiles.len(), 3);
        let grass = &map.tiles[0];
        assert_eq!(grass.yields, Yields::new(2.0, 1.0, 0.0));
        assert_eq!(grass.resource_class, Some(ResourceClass::Bonus));
        assert!(grass.river_adjacent);
        assert_eq!(grass.appeal, Some(2));
        assert!(!grass.goody_hut);
        assert_eq!(map.tiles[1].feature, None);
        assert_eq!(map.tiles[1].appeal, None);
        let hills = &map.tiles[2];
        assert!(hills.goody_hut);
        assert_eq!(hills.appeal, Some(-1));
        assert_eq!(hills.resource_class, Some(ResourceClass::Strategic));
        assert_eq!(map.bounds.max_x, 2);
    }

    #[test]
    fn non_numeric_coordinates_skip_the_row() {
        let text = "X,Y,Terrain\n0,0,TERRAIN_GRASS\nabc,1,TERRAIN_GRASS\n2,,TERRAIN_GRASS\n";
        let map = parse_csv(text).unwrap();
        assert_eq!(map.tiles.len(), 1);
        assert_eq!(map.diagnostics.len(), 2);
        assert!(
            map.diagnostics
                .any(|d| matches!(d, Diagnostic::SkippedRecord { record: 3, .. }))
        );
    }

    #[test]
    fn semicolon_delimiter_is_detected() {
        let map = parse_csv("X;Y;Terrain\n4;5;TERRAIN_TUNDRA\n").unwrap();
        assert_eq!(map.tiles[0].coord, OffsetCoord::new(4, 5));
    }

    #[test]
    fn coordinate_columns_fall_back_to_letter_match() {
        let map = parse_csv("PlotX,PlotY,Terrain\n7,8,TERRAIN_SNOW\n").unwrap();
        assert_eq!(map.tiles[0].coord, OffsetCoord::new(7, 8));
    }

    #[test]
    fn missing_terrain_column_is_fatal() {
        assert!(matches!(
            parse_csv("X,Y,Feature\n0,0,FEATURE_FOREST\n"),
            Err(MapLoadError::MissingColumn("Terrain"))
        ));
        assert!(matches!(parse_csv("\n\n"), Err(MapLoadError::EmptyCsv)));
    }

    #[test]
    fn integral_float_coordinates_are_accepted() {
        assert_eq!(parse_coord("12.0"), Some(12));
        assert_eq!(parse_coord(" -3 "), Some(-3));
        assert_eq!(parse_coord("1.5"), None);
        assert_eq!(parse_coord(""), None);
    }

    #[test]
    fn quoted_fields_keep_delimiters() {
        assert_eq!(
            split_record("a,\"b,c\",\"say \"\"hi\"\"\"", ','),
            vec!["a", "b,c", "say \"hi\""]
        );
    }
}
