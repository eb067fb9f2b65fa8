//! Non-fatal irregularities found while loading or scoring.
//!
//! The core never fails on bad data; it degrades and records what happened.
//! Every pushed diagnostic is logged once and kept for the UI.

use bevy::log::warn;
use thiserror::Error;

use crate::grid::OffsetCoord;
use crate::tiering::Tier;

/// A single recoverable problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    /// A source record was dropped.
    #[error("record {record} skipped: {reason}")]
    SkippedRecord {
        /// 1-based record number in the source.
        record: usize,
        /// Why it was dropped.
        reason: String,
    },
    /// Two records share a coordinate; the later one was dropped.
    #[error("duplicate tile at {0} skipped")]
    DuplicateCoordinate(OffsetCoord),
    /// The map has no workable tiles.
    #[error("no workable tiles found")]
    NoWorkableTiles,
    /// Workable tiles exist but their mean score is zero.
    #[error("mean score of {workable} workable tiles is zero, tiering skipped")]
    ZeroMeanScore {
        /// Number of workable tiles.
        workable: usize,
    },
    /// The workable scores sum past the float range.
    #[error("mean score of {workable} workable tiles is not finite, tiering skipped")]
    NonFiniteMeanScore {
        /// Number of workable tiles.
        workable: usize,
    },
    /// A normalized score was NaN or infinite and was forced to zero.
    #[error("non-finite normalized score at {0}, set to 0")]
    NonFiniteScore(OffsetCoord),
    /// The tier table has no entries.
    #[error("tier table is empty, tiering skipped")]
    EmptyTierTable,
    /// The tier table cannot be used at all.
    #[error("tier table unusable ({0}), tiering skipped")]
    UnusableTierTable(String),
    /// The tier table can be walked but has out-of-order, out-of-range or
    /// short entries.
    #[error("tier table irregular: {0}")]
    IrregularTierTable(String),
    /// Tiles left over after the percentile walk got the lowest tier.
    #[error("{count} tiles left unlabeled, assigned tier {tier}")]
    FallbackTier {
        /// Tier that was assigned.
        tier: Tier,
        /// Number of tiles affected.
        count: usize,
    },
}

/// Ordered list of diagnostics from one load or one recalculation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Logs and records a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.0.push(diagnostic);
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// True if any recorded diagnostic matches `pred`.
    pub fn any(&self, pred: impl Fn(&Diagnostic) -> bool) -> bool {
        self.0.iter().any(pred)
    }
}
