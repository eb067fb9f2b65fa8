//! Hover highlighting and the focus ("territory") mode.
//!
//! The controller owns no tiles; it resolves pointer events against a
//! [`GridIndex`] and publishes sets of handles for the renderer to react to.

use std::hash::Hash;

use bevy::log::{debug, info};
use bevy::platform::collections::HashSet;

use crate::grid::GridIndex;

/// Radius of the workable area around a focus center.
pub const WORKABLE_RADIUS: u32 = 3;

/// Tiles shown around a focus center.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusRegion<H: Eq + Hash> {
    /// Clicked tile.
    pub center: H,
    /// Tiles within [`WORKABLE_RADIUS`] of the center, center included.
    pub workable: HashSet<H>,
    /// Tiles within one more ring.
    pub full: HashSet<H>,
    /// `full \ workable`.
    pub outer_ring: HashSet<H>,
}

impl<H: Copy + Eq + Hash> FocusRegion<H> {
    fn around(index: &GridIndex<H>, center: H, workable_radius: u32) -> Self {
        let workable = index.neighbors_within_radius(center, workable_radius);
        let full = index.neighbors_within_radius(center, workable_radius + 1);
        let outer_ring = full.difference(&workable).copied().collect();
        Self {
            center,
            workable,
            full,
            outer_ring,
        }
    }
}

/// Browsing or focused on one tile.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionMode<H: Eq + Hash> {
    /// No focus.
    Browsing,
    /// Focused on a region.
    Focus(FocusRegion<H>),
}

/// How a tile should be drawn while focus mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusVisual {
    /// Outside the focus region.
    Hidden,
    /// Visible but faded.
    OuterRing,
    /// Fully opaque.
    Workable,
    /// Fully opaque with an emphasis marker.
    Center,
}

/// Pointer-driven interaction state.
#[derive(Debug, Clone)]
pub struct InteractionController<H: Eq + Hash> {
    hover_radius: u32,
    focus_armed: bool,
    workable_radius: u32,
    hovered: Option<H>,
    affected: HashSet<H>,
    mode: InteractionMode<H>,
}

impl<H: Eq + Hash> Default for InteractionController<H> {
    fn default() -> Self {
        Self {
            hover_radius: 0,
            focus_armed: false,
            workable_radius: WORKABLE_RADIUS,
            hovered: None,
            affected: HashSet::default(),
            mode: InteractionMode::Browsing,
        }
    }
}

impl<H: Copy + Eq + Hash + std::fmt::Debug> InteractionController<H> {
    /// Controller with the given hover radius and focus arming.
    pub fn new(hover_radius: u32, focus_armed: bool) -> Self {
        Self {
            hover_radius,
            focus_armed,
            ..Default::default()
        }
    }

    /// Overrides the workable radius used by focus mode.
    pub fn with_workable_radius(mut self, radius: u32) -> Self {
        self.workable_radius = radius;
        self
    }

    /// Pointer moved onto `handle`. Returns the new affected set.
    ///
    /// In focus mode, tiles outside the region are hidden and never count
    /// as hovered.
    pub fn pointer_over(&mut self, index: &GridIndex<H>, handle: H) -> &HashSet<H> {
        let (hovered, affected) = match &self.mode {
            InteractionMode::Browsing => (
                Some(handle),
                index.neighbors_within_radius(handle, self.hover_radius),
            ),
            InteractionMode::Focus(region) if region.full.contains(&handle) => {
                (Some(handle), [handle].into_iter().collect())
            }
            InteractionMode::Focus(_) => (None, HashSet::default()),
        };
        self.hovered = hovered;
        self.affected = affected;
        &self.affected
    }

    /// Pointer left every tile.
    pub fn pointer_left(&mut self) {
        self.hovered = None;
        self.affected.clear();
    }

    /// Click on `handle`. Enters focus mode if armed and browsing.
    ///
    /// Returns `true` if focus mode was entered.
    pub fn click(&mut self, index: &GridIndex<H>, handle: H) -> bool {
        if !self.focus_armed {
            return false;
        }
        if let InteractionMode::Focus(region) = &self.mode {
            debug!("already focused on {:?}, click ignored", region.center);
            return false;
        }
        if index.coord_of(handle).is_none() {
            return false;
        }
        let region = FocusRegion::around(index, handle, self.workable_radius);
        info!(
            "focus on {:?}: {} workable, {} in outer ring",
            handle,
            region.workable.len(),
            region.outer_ring.len()
        );
        self.mode = InteractionMode::Focus(region);
        self.affected.retain(|h| *h == handle);
        true
    }

    /// Leaves focus mode. Returns `true` if focus mode was active.
    pub fn exit_focus(&mut self) -> bool {
        let was_focused = matches!(self.mode, InteractionMode::Focus(_));
        if was_focused {
            info!("focus cleared");
        }
        self.mode = InteractionMode::Browsing;
        was_focused
    }

    /// Sets the browsing hover radius; takes effect on the next pointer move.
    pub fn set_hover_radius(&mut self, radius: u32) {
        self.hover_radius = radius;
    }

    /// Arms or disarms focus mode. Does not leave an active focus.
    pub fn arm_focus(&mut self, armed: bool) {
        self.focus_armed = armed;
    }

    /// Browsing hover radius.
    pub fn hover_radius(&self) -> u32 {
        self.hover_radius
    }

    /// Whether a click enters focus mode.
    pub fn focus_armed(&self) -> bool {
        self.focus_armed
    }

    /// Tile under the pointer.
    pub fn hovered(&self) -> Option<H> {
        self.hovered
    }

    /// Tiles reacting to the pointer.
    pub fn affected(&self) -> &HashSet<H> {
        &self.affected
    }

    /// Current mode.
    pub fn mode(&self) -> &InteractionMode<H> {
        &self.mode
    }

    /// Active focus region, if any.
    pub fn focus(&self) -> Option<&FocusRegion<H>> {
        match &self.mode {
            InteractionMode::Focus(region) => Some(region),
            InteractionMode::Browsing => None,
        }
    }

    /// Focus-mode visual of `handle`; `None` while browsing.
    pub fn focus_visual(&self, handle: H) -> Option<FocusVisual> {
        let region = self.focus()?;
        Some(if handle == region.center {
            FocusVisual::Center
        } else if region.workable.contains(&handle) {
            FocusVisual::Workable
        } else if region.outer_ring.contains(&handle) {
            FocusVisual::OuterRing
        } else {
            FocusVisual::Hidden
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::OffsetCoord;

    /// Handles are `y * w + x` over a full `w × h` rectangle.
    fn rect(w: i32, h: i32) -> GridIndex<u32> {
        GridIndex::from_entries((0..h).flat_map(|y| {
            (0..w).map(move |x| (OffsetCoord::new(x, y), (y * w + x) as u32))
        }))
    }

    fn handle(index: &GridIndex<u32>, x: i32, y: i32) -> u32 {
        index.get(OffsetCoord::new(x, y)).unwrap()
    }

    fn set(handles: &[u32]) -> HashSet<u32> {
        handles.iter().copied().collect()
    }

    // ── hover ───────────────────────────────────────────────────────

    #[test]
    fn hover_radius_one_on_even_and_odd_rows() {
        let index = rect(10, 10);
        let mut ctl = InteractionController::new(1, false);
        let even = handle(&index, 4, 4);
        assert_eq!(ctl.pointer_over(&index, even).len(), 7);
        let odd = handle(&index, 4, 5);
        let affected = ctl.pointer_over(&index, odd).clone();
        assert_eq!(affected.len(), 7);
        // Odd rows reach right on the diagonals.
        assert!(affected.contains(&handle(&index, 5, 4)));
        assert!(!affected.contains(&handle(&index, 3, 4)));
    }

    #[test]
    fn hover_radius_zero_affects_only_the_hovered_tile() {
        let index = rect(5, 5);
        let mut ctl = InteractionController::new(0, false);
        let h = handle(&index, 2, 2);
        assert_eq!(ctl.pointer_over(&index, h), &set(&[h]));
    }

    #[test]
    fn pointer_left_clears_affected() {
        let index = rect(5, 5);
        let mut ctl = InteractionController::new(2, false);
        ctl.pointer_over(&index, handle(&index, 2, 2));
        ctl.pointer_left();
        assert!(ctl.affected().is_empty());
        assert_eq!(ctl.hovered(), None);
    }

    #[test]
    fn hover_before_index_is_built_is_empty() {
        let index = GridIndex::<u32>::default();
        let mut ctl = InteractionController::new(3, true);
        assert!(ctl.pointer_over(&index, 7).is_empty());
        assert!(!ctl.click(&index, 7));
    }

    #[test]
    fn hover_radius_change_applies_on_next_move() {
        let index = rect(10, 10);
        let mut ctl = InteractionController::new(0, false);
        let h = handle(&index, 5, 5);
        assert_eq!(ctl.pointer_over(&index, h).len(), 1);
        ctl.set_hover_radius(2);
        assert_eq!(ctl.affected().len(), 1);
        assert_eq!(ctl.pointer_over(&index, h).len(), 19);
    }

    // ── focus ───────────────────────────────────────────────────────

    #[test]
    fn unarmed_click_does_nothing() {
        let index = rect(10, 10);
        let mut ctl = InteractionController::new(1, false);
        assert!(!ctl.click(&index, handle(&index, 5, 5)));
        assert_eq!(ctl.mode(), &InteractionMode::Browsing);
    }

    #[test]
    fn focus_region_partitions_full_set() {
        let index = rect(20, 20);
        let mut ctl = InteractionController::new(1, true);
        let c = handle(&index, 10, 10);
        assert!(ctl.click(&index, c));
        let region = ctl.focus().unwrap();
        assert_eq!(region.center, c);
        assert!(region.workable.contains(&c));
        assert!(region.workable.is_disjoint(&region.outer_ring));
        assert_eq!(region.workable.len(), 37);
        assert_eq!(region.full.len(), 61);
        assert_eq!(region.outer_ring.len(), 24);
        let union: HashSet<u32> = region.workable.union(&region.outer_ring).copied().collect();
        assert_eq!(union, region.full);
    }

    #[test]
    fn second_click_keeps_first_focus() {
        let index = rect(20, 20);
        let mut ctl = InteractionController::new(1, true);
        let first = handle(&index, 10, 10);
        ctl.click(&index, first);
        let before = ctl.focus().cloned();
        assert!(!ctl.click(&index, handle(&index, 11, 10)));
        assert_eq!(ctl.focus().cloned(), before);
    }

    #[test]
    fn focus_suppresses_hover_expansion() {
        let index = rect(20, 20);
        let mut ctl = InteractionController::new(2, true);
        ctl.click(&index, handle(&index, 10, 10));
        let inside = handle(&index, 11, 10);
        assert_eq!(ctl.pointer_over(&index, inside), &set(&[inside]));
        let outside = handle(&index, 0, 0);
        assert!(ctl.pointer_over(&index, outside).is_empty());
    }

    #[test]
    fn hidden_tiles_are_not_hovered() {
        let index = rect(20, 20);
        let mut ctl = InteractionController::new(1, true);
        ctl.click(&index, handle(&index, 10, 10));
        let inside = handle(&index, 12, 10);
        ctl.pointer_over(&index, inside);
        assert_eq!(ctl.hovered(), Some(inside));
        let outside = handle(&index, 2, 2);
        ctl.pointer_over(&index, outside);
        assert_eq!(ctl.hovered(), None);
        assert!(ctl.affected().is_empty());
    }

    #[test]
    fn focus_visuals() {
        let index = rect(20, 20);
        let mut ctl = InteractionController::new(0, true);
        let c = handle(&index, 10, 10);
        assert_eq!(ctl.focus_visual(c), None);
        ctl.click(&index, c);
        assert_eq!(ctl.focus_visual(c), Some(FocusVisual::Center));
        assert_eq!(
            ctl.focus_visual(handle(&index, 13, 10)),
            Some(FocusVisual::Workable)
        );
        assert_eq!(
            ctl.focus_visual(handle(&index, 14, 10)),
            Some(FocusVisual::OuterRing)
        );
        assert_eq!(
            ctl.focus_visual(handle(&index, 15, 10)),
            Some(FocusVisual::Hidden)
        );
    }

    #[test]
    fn exit_returns_to_browsing() {
        let index = rect(20, 20);
        let mut ctl = InteractionController::new(1, true);
        assert!(!ctl.exit_focus());
        ctl.click(&index, handle(&index, 10, 10));
        assert!(ctl.exit_focus());
        assert!(ctl.focus().is_none());
        assert!(ctl.click(&index, handle(&index, 3, 3)));
    }

    #[test]
    fn focus_near_edge_is_clipped() {
        let index = rect(20, 20);
        let mut ctl = InteractionController::new(0, true).with_workable_radius(1);
        ctl.click(&index, handle(&index, 0, 0));
        let region = ctl.focus().unwrap();
        assert_eq!(region.workable.len(), 3);
        assert!(region.full.len() < 19);
    }
}
