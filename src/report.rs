//! Plain-text tier distribution report for `--report`.

use std::fmt;

use crate::grid::OffsetCoord;
use crate::recalc::RecalcSummary;
use crate::tile::Tile;
use crate::tiering::Tier;

/// One line of the distribution table.
#[derive(Debug, Clone, PartialEq)]
pub struct TierRow {
    /// Tier.
    pub tier: Tier,
    /// Tiles in the tier.
    pub count: usize,
    /// Share of workable tiles, in percent.
    pub percent: f64,
    /// Lowest and highest normalized score in the tier.
    pub score_range: Option<(f64, f64)>,
}

/// A tile in the top-N list.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTile {
    /// Position.
    pub coord: OffsetCoord,
    /// Terrain label without prefix.
    pub terrain: String,
    /// Normalized score.
    pub normalized_score: f64,
    /// Tier.
    pub tier: Option<Tier>,
}

/// Summary of one scored map.
#[derive(Debug, Clone, PartialEq)]
pub struct TierReport {
    /// All tiles on the map.
    pub total: usize,
    /// Workable tiles.
    pub workable: usize,
    /// Mean weighted score of workable tiles.
    pub mean_score: f64,
    /// Median weighted score of workable tiles.
    pub median_score: f64,
    /// Distribution, best tier first.
    pub rows: Vec<TierRow>,
    /// Best tiles, best first.
    pub top: Vec<RankedTile>,
}

impl TierReport {
    /// Builds the report from tiles already passed through a recalculation.
    pub fn new(tiles: &[Tile], summary: &RecalcSummary, top_n: usize) -> Self {
        let workable: Vec<&Tile> = tiles.iter().filter(|t| t.scores.is_workable).collect();

        let rows = Tier::ALL
            .iter()
            .rev()
            .map(|&tier| {
                let scores: Vec<f64> = workable
                    .iter()
                    .filter(|t| t.scores.tier == Some(tier))
                    .map(|t| t.scores.normalized_score)
                    .collect();
                let score_range = scores.first().map(|&first| {
                    scores
                        .iter()
                        .fold((first, first), |(lo, hi), &s| (lo.min(s), hi.max(s)))
                });
                TierRow {
                    tier,
                    count: scores.len(),
                    percent: if workable.is_empty() {
                        0.0
                    } else {
                        scores.len() as f64 / workable.len() as f64 * 100.0
                    },
                    score_range,
                }
            })
            .collect();

        let mut weighted: Vec<f64> = workable.iter().map(|t| t.scores.weighted_score).collect();
        weighted.sort_by(f64::total_cmp);

        let mut ranked = workable.clone();
        ranked.sort_by(|a, b| {
            b.scores
                .normalized_score
                .total_cmp(&a.scores.normalized_score)
        });
        let top = ranked
            .into_iter()
            .take(top_n)
            .map(|t| RankedTile {
                coord: t.coord,
                terrain: t.terrain_label().to_string(),
                normalized_score: t.scores.normalized_score,
                tier: t.scores.tier,
            })
            .collect();

        Self {
            total: tiles.len(),
            workable: workable.len(),
            mean_score: summary.mean_score,
            median_score: median(&weighted),
            rows,
            top,
        }
    }
}

/// Median of sorted values; mean of the middle pair for even lengths.
fn median(sorted: &[f64]) -> f64 {
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 1 => sorted[n / 2],
        n => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

impl fmt::Display for TierReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} tiles, {} workable", self.total, self.workable)?;
        writeln!(f, "Average score of workable tiles: {:.2}", self.mean_score)?;
        writeln!(
            f,
            "Median score of workable tiles: {:.2}",
            self.median_score
        )?;
        writeln!(f)?;
        writeln!(f, "Tier distribution:")?;
        for row in &self.rows {
            let range = match row.score_range {
                Some((lo, hi)) => format!("{lo:.0}-{hi:.0}"),
                None => "-".to_string(),
            };
            writeln!(
                f,
                "  Tier {}: {:>5} tiles ({:>5.1}%), score range: {}",
                row.tier, row.count, row.percent, range
            )?;
        }
        if !self.top.is_empty() {
            writeln!(f)?;
            writeln!(f, "Top {} tiles:", self.top.len())?;
            for (i, t) in self.top.iter().enumerate() {
                let tier = t.tier.map_or("-", Tier::label);
                let coord = t.coord.to_string();
                writeln!(
                    f,
                    "  {:>3}. {:<10} {:<16} {:>5.0}  {}",
                    i + 1,
                    coord,
                    t.terrain,
                    t.normalized_score,
                    tier
                )?;
            }
        }
        Ok(())
    }
}
