//! Population-relative normalization and percentile tiers.
//!
//! [`recalculate`] rewrites the derived fields of every tile in place:
//!
//! 1. score each tile and mark it workable or not,
//! 2. normalize workable scores against their mean (100 = average),
//! 3. sort by normalized score and hand out tiers by cumulative percentile.
//!
//! The sort dominates, so a pass is `O(n log n)`.

use bevy::log::debug;
use bevy::prelude::Reflect;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::scoring::{ResourceTable, WeightConfig, score_tile};
use crate::tile::{Tile, TileScores};

/// Absorbs float noise in `n × percentile` (e.g. `20 × 0.15 = 3.0000000000000004`).
const PERCENTILE_EPSILON: f64 = 1e-9;

/// Tier labels, worst to best.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize,
)]
pub enum Tier {
    /// Bottom of the map.
    F,
    /// Poor.
    E,
    /// Below average.
    D,
    /// Average.
    C,
    /// Above average.
    B,
    /// Strong.
    A,
    /// Best of the map.
    S,
}

impl Tier {
    /// All tiers, worst first.
    pub const ALL: [Tier; 7] = [Tier::F, Tier::E, Tier::D, Tier::C, Tier::B, Tier::A, Tier::S];

    /// Position in [`Tier::ALL`].
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Single-letter label.
    pub fn label(self) -> &'static str {
        match self {
            Tier::F => "F",
            Tier::E => "E",
            Tier::D => "D",
            Tier::C => "C",
            Tier::B => "B",
            Tier::A => "A",
            Tier::S => "S",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Upper cumulative percentile of one tier, in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TierBound {
    /// Tier receiving the slice.
    pub tier: Tier,
    /// Cumulative fraction of workable tiles at or below this tier.
    pub percentile: f64,
}

/// Ordered tier → cumulative percentile table.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct TierTable {
    /// Bounds, expected in strictly increasing percentile order ending at 1.
    pub bounds: Vec<TierBound>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self::new([
            (Tier::F, 0.05),
            (Tier::E, 0.15),
            (Tier::D, 0.35),
            (Tier::C, 0.65),
            (Tier::B, 0.85),
            (Tier::A, 0.95),
            (Tier::S, 1.00),
        ])
    }
}

impl TierTable {
    /// Builds a table from `(tier, percentile)` pairs.
    pub fn new(bounds: impl IntoIterator<Item = (Tier, f64)>) -> Self {
        Self {
            bounds: bounds
                .into_iter()
                .map(|(tier, percentile)| TierBound { tier, percentile })
                .collect(),
        }
    }

    /// Entries usable for the percentile walk, in ascending percentile
    /// order, plus a note per irregularity.
    ///
    /// Percentiles above 1 are clamped to 1. Non-finite and non-positive
    /// entries are dropped. `Err` means nothing usable is left.
    fn usable_bounds(&self) -> Result<(Vec<TierBound>, Vec<String>), Diagnostic> {
        if self.bounds.is_empty() {
            return Err(Diagnostic::EmptyTierTable);
        }
        let mut notes = Vec::new();
        let mut bounds = Vec::with_capacity(self.bounds.len());
        for bound in &self.bounds {
            let p = bound.percentile;
            if !p.is_finite() || p <= 0.0 {
                notes.push(format!(
                    "tier {} has percentile {p} outside (0, 1], skipped",
                    bound.tier
                ));
            } else if p > 1.0 {
                notes.push(format!("tier {} percentile {p} clamped to 1", bound.tier));
                bounds.push(TierBound {
                    percentile: 1.0,
                    ..*bound
                });
            } else {
                bounds.push(*bound);
            }
        }
        if bounds.is_empty() {
            return Err(Diagnostic::UnusableTierTable("no percentile in (0, 1]".into()));
        }
        if bounds.windows(2).any(|w| w[1].percentile <= w[0].percentile) {
            notes.push("percentiles are not strictly increasing".into());
        }
        bounds.sort_by(|a, b| a.percentile.total_cmp(&b.percentile));
        let last = bounds[bounds.len() - 1].percentile;
        if last < 1.0 {
            notes.push(format!("last percentile is {last}, not 1"));
        }
        Ok((bounds, notes))
    }
}

/// Normalized score of the last tile inside a tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThreshold {
    /// Tier.
    pub tier: Tier,
    /// Highest normalized score assigned this tier.
    pub score: f64,
}

/// Result of one [`recalculate`] pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TieringOutcome {
    /// Per-tier upper score, in ascending tier order. Empty when tiering was skipped.
    pub thresholds: Vec<TierThreshold>,
    /// Number of workable tiles.
    pub workable: usize,
    /// Mean weighted score of workable tiles (0 when there are none).
    pub mean_score: f64,
    /// What went wrong along the way.
    pub diagnostics: Diagnostics,
}

/// Rescores, renormalizes and retiers every tile in place.
pub fn recalculate(
    tiles: &mut [Tile],
    weights: &WeightConfig,
    resources: &ResourceTable,
    table: &TierTable,
) -> TieringOutcome {
    let mut outcome = TieringOutcome::default();

    let mut workable = Vec::with_capacity(tiles.len());
    for (i, tile) in tiles.iter_mut().enumerate() {
        let is_workable = tile.is_workable();
        tile.scores = TileScores {
            weighted_score: score_tile(tile, weights, resources),
            normalized_score: 0.0,
            tier: None,
            is_workable,
        };
        if is_workable {
            workable.push(i);
        }
    }
    outcome.workable = workable.len();

    if workable.is_empty() {
        outcome.diagnostics.push(Diagnostic::NoWorkableTiles);
        return outcome;
    }

    let total: f64 = workable.iter().map(|&i| tiles[i].scores.weighted_score).sum();
    let mean = total / workable.len() as f64;
    if !mean.is_finite() {
        outcome.diagnostics.push(Diagnostic::NonFiniteMeanScore {
            workable: workable.len(),
        });
        return outcome;
    }
    if mean == 0.0 {
        outcome.diagnostics.push(Diagnostic::ZeroMeanScore {
            workable: workable.len(),
        });
        return outcome;
    }
    outcome.mean_score = mean;

    for &i in &workable {
        let tile = &mut tiles[i];
        let normalized = (tile.scores.weighted_score / mean * 100.0).round_ties_even();
        if normalized.is_finite() {
            tile.scores.normalized_score = normalized;
        } else {
            outcome
                .diagnostics
                .push(Diagnostic::NonFiniteScore(tile.coord));
        }
    }

    let bounds = match table.usable_bounds() {
        Ok((bounds, notes)) => {
            for why in notes {
                outcome.diagnostics.push(Diagnostic::IrregularTierTable(why));
            }
            bounds
        }
        Err(diagnostic) => {
            outcome.diagnostics.push(diagnostic);
            return outcome;
        }
    };

    // Stable sort: equal scores keep input order, so reruns agree.
    workable.sort_by(|&a, &b| {
        tiles[a]
            .scores
            .normalized_score
            .total_cmp(&tiles[b].scores.normalized_score)
    });

    let n = workable.len() as i64;
    let mut prev_end: i64 = -1;
    for bound in &bounds {
        let raw_end = (n as f64 * bound.percentile - PERCENTILE_EPSILON).ceil() as i64 - 1;
        let end = raw_end.clamp(0, n - 1);
        if end <= prev_end {
            debug!("tier {} gets no tiles", bound.tier);
            continue;
        }
        for &i in &workable[(prev_end + 1) as usize..=end as usize] {
            tiles[i].scores.tier = Some(bound.tier);
        }
        outcome.thresholds.push(TierThreshold {
            tier: bound.tier,
            score: tiles[workable[end as usize]].scores.normalized_score,
        });
        prev_end = end;
    }

    if prev_end < n - 1 {
        let lowest = bounds[0].tier;
        let leftover = &workable[(prev_end + 1) as usize..];
        for &i in leftover {
            tiles[i].scores.tier = Some(lowest);
        }
        outcome.diagnostics.push(Diagnostic::FallbackTier {
            tier: lowest,
            count: leftover.len(),
        });
    }

    outcome
}
