//! Single entry point after any weight change, plus the coalescing trigger
//! that callers use to collapse slider bursts into one pass.

use std::time::Duration;

use crate::diagnostics::Diagnostics;
use crate::scoring::{ResourceTable, WeightConfig};
use crate::tile::Tile;
use crate::tiering::{self, TierTable, TierThreshold};

/// Added to `max` when every workable score is equal.
pub const SCORE_RANGE_MARGIN: f64 = 1.0;

/// Everything a recalculation reads besides the tiles.
#[derive(Debug, Clone, Default)]
pub struct ScoringContext {
    /// Scoring coefficients.
    pub weights: WeightConfig,
    /// Resource classes and values.
    pub resources: ResourceTable,
    /// Tier percentile table.
    pub tiers: TierTable,
}

/// Span of workable normalized scores, always with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    /// Lowest normalized score.
    pub min: f64,
    /// Highest normalized score, widened when equal to `min`.
    pub max: f64,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: SCORE_RANGE_MARGIN,
        }
    }
}

impl ScoreRange {
    /// Range over workable tiles; `(0, margin)` when there are none.
    pub fn of(tiles: &[Tile]) -> Self {
        let mut scores = tiles
            .iter()
            .filter(|t| t.scores.is_workable)
            .map(|t| t.scores.normalized_score);
        let Some(first) = scores.next() else {
            return Self::default();
        };
        let (min, max) = scores.fold((first, first), |(lo, hi), s| (lo.min(s), hi.max(s)));
        if min == max {
            Self {
                min,
                max: max + SCORE_RANGE_MARGIN,
            }
        } else {
            Self { min, max }
        }
    }

    /// Position of `score` in the range, clamped to `[0, 1]`.
    pub fn fraction(&self, score: f64) -> f64 {
        ((score - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

/// What a recalculation publishes besides the per-tile fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecalcSummary {
    /// Per-tier score thresholds, ascending.
    pub thresholds: Vec<TierThreshold>,
    /// Global normalized score range for heatmaps.
    pub range: ScoreRange,
    /// Number of workable tiles.
    pub workable: usize,
    /// Mean weighted score of workable tiles.
    pub mean_score: f64,
    /// Problems found during the pass.
    pub diagnostics: Diagnostics,
}

/// Rescores, retiers and republishes the score range. Safe to call repeatedly.
pub fn recalculate_all(tiles: &mut [Tile], ctx: &ScoringContext) -> RecalcSummary {
    let outcome = tiering::recalculate(tiles, &ctx.weights, &ctx.resources, &ctx.tiers);
    RecalcSummary {
        thresholds: outcome.thresholds,
        range: ScoreRange::of(tiles),
        workable: outcome.workable,
        mean_score: outcome.mean_score,
        diagnostics: outcome.diagnostics,
    }
}

/// Collapses bursts of requests into one trailing firing.
///
/// Every [`request`](Self::request) restarts the quiet window; [`poll`](Self::poll)
/// returns `true` once, after the window has elapsed with no new request.
/// Time is passed in by the caller, so any clock works.
#[derive(Debug, Clone, PartialEq)]
pub struct CoalescingTrigger {
    quiet: Duration,
    last_request: Option<Duration>,
}

impl CoalescingTrigger {
    /// Trigger with the given quiet window.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_request: None,
        }
    }

    /// Records a request at time `now`.
    pub fn request(&mut self, now: Duration) {
        self.last_request = Some(now);
    }

    /// True while a request is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.last_request.is_some()
    }

    /// Fires at most once per burst.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.last_request {
            Some(at) if now.saturating_sub(at) >= self.quiet => {
                self.last_request = None;
                true
            }
            _ => false,
        }
    }
}
