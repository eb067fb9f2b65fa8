#![warn(missing_docs)]
//! Hex strategy-map tile tiering.
//!
//! Scores every tile of an odd-r hex map from its yields and bonuses,
//! normalizes the scores against the workable mean and buckets them into
//! percentile tiers `F`..`S`. The viewer renders the tiers as raised hex
//! faces with hover highlighting and a workable-radius focus mode; the same
//! pipeline backs a headless report and a scored-map export.
//!
//! The ECS-free core (`grid`, `scoring`, `tiering`, `recalc`, `interaction`,
//! `map_data`, `report`) is usable without a window. The remaining modules
//! are Bevy plugins.

pub mod camera;
pub mod diagnostics;
pub mod grid;
pub mod inspect;
pub mod interaction;
pub mod map_data;
pub mod math;
pub mod panel;
pub mod recalc;
pub mod report;
pub mod scoring;
pub mod tile;
pub mod tiering;
pub mod tiles;

use bevy::prelude::*;

/// Application-wide state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum GameState {
    /// Map not spawned yet.
    #[default]
    Loading,
    /// Normal use: hover, focus, panel.
    Browsing,
    /// World inspector open (Tab to toggle).
    Inspecting,
}
