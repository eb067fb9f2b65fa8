//! Offset hex coordinates and the coordinate → handle index.
//!
//! Map tiles are addressed by `(x, y)` in "odd-r" offset form: every odd row
//! is shoved half a hex to the right. Adjacency therefore depends on row
//! parity, and [`OffsetCoord::neighbors`] is the single place that knows the
//! two offset tables. Everything that walks the map (hover, focus mode, the
//! report) goes through it.

use std::collections::VecDeque;
use std::hash::Hash;

use bevy::log::warn;
use bevy::platform::collections::{HashMap, HashSet};
use bevy::prelude::Reflect;
use hexx::Hex;
use serde::{Deserialize, Serialize};

/// Neighbor offsets for tiles on even rows.
pub const EVEN_ROW_NEIGHBORS: [[i32; 2]; 6] = [[1, 0], [0, -1], [-1, -1], [-1, 0], [-1, 1], [0, 1]];

/// Neighbor offsets for tiles on odd rows (mirror of [`EVEN_ROW_NEIGHBORS`]).
pub const ODD_ROW_NEIGHBORS: [[i32; 2]; 6] = [[1, 0], [1, -1], [0, -1], [-1, 0], [0, 1], [1, 1]];

/// Discrete tile coordinate: column `x`, row `y`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Reflect,
    Serialize,
    Deserialize,
)]
pub struct OffsetCoord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl OffsetCoord {
    /// Creates a coordinate from column and row.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True for rows that are shifted half a hex to the right.
    pub fn is_odd_row(self) -> bool {
        self.y.rem_euclid(2) == 1
    }

    /// The six direct neighbors, picked from the parity table of this row.
    pub fn neighbors(self) -> [OffsetCoord; 6] {
        let table = if self.is_odd_row() {
            &ODD_ROW_NEIGHBORS
        } else {
            &EVEN_ROW_NEIGHBORS
        };
        table.map(|[dx, dy]| OffsetCoord::new(self.x + dx, self.y + dy))
    }

    /// Axial hex for world-space layout and picking.
    pub fn to_hex(self) -> Hex {
        let q = self.x - (self.y - self.y.rem_euclid(2)) / 2;
        Hex::new(q, self.y)
    }

    /// Inverse of [`OffsetCoord::to_hex`].
    pub fn from_hex(hex: Hex) -> Self {
        let x = hex.x + (hex.y - hex.y.rem_euclid(2)) / 2;
        Self::new(x, hex.y)
    }
}

impl std::fmt::Display for OffsetCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// O(1) lookup from tile coordinate to an opaque handle, plus radius queries.
///
/// `H` is whatever the caller uses to name a tile: an `Entity` in the viewer,
/// a plain index in the report and in tests. Coordinates outside the map are
/// simply absent; there is no wraparound.
#[derive(Debug, Clone)]
pub struct GridIndex<H> {
    by_coord: HashMap<OffsetCoord, H>,
    by_handle: HashMap<H, OffsetCoord>,
}

impl<H> Default for GridIndex<H> {
    fn default() -> Self {
        Self {
            by_coord: HashMap::new(),
            by_handle: HashMap::new(),
        }
    }
}

impl<H: Copy + Eq + Hash> GridIndex<H> {
    /// Builds a fresh index from `(coord, handle)` pairs.
    pub fn from_entries(entries: impl IntoIterator<Item = (OffsetCoord, H)>) -> Self {
        let mut index = Self::default();
        index.build(entries);
        index
    }

    /// Clears and repopulates the index. Returns the number of duplicate
    /// coordinates that were ignored (the first handle wins).
    pub fn build(&mut self, entries: impl IntoIterator<Item = (OffsetCoord, H)>) -> usize {
        self.by_coord.clear();
        self.by_handle.clear();
        let mut duplicates = 0;
        for (coord, handle) in entries {
            if self.by_coord.contains_key(&coord) {
                warn!("grid index: duplicate tile at {coord}, keeping the first");
                duplicates += 1;
                continue;
            }
            self.by_coord.insert(coord, handle);
            self.by_handle.insert(handle, coord);
        }
        duplicates
    }

    /// Number of indexed tiles.
    pub fn len(&self) -> usize {
        self.by_coord.len()
    }

    /// True before [`GridIndex::build`] or after building from nothing.
    pub fn is_empty(&self) -> bool {
        self.by_coord.is_empty()
    }

    /// Handle of the tile at `coord`.
    pub fn get(&self, coord: OffsetCoord) -> Option<H> {
        self.by_coord.get(&coord).copied()
    }

    /// Coordinate of a handle.
    pub fn coord_of(&self, handle: H) -> Option<OffsetCoord> {
        self.by_handle.get(&handle).copied()
    }

    /// Coordinates reachable from `center` in at most `radius` hops,
    /// including `center`. Hops only pass through indexed tiles.
    pub fn coords_within_radius(&self, center: OffsetCoord, radius: u32) -> HashSet<OffsetCoord> {
        let mut visited: HashSet<OffsetCoord> = HashSet::default();
        if !self.by_coord.contains_key(&center) {
            return visited;
        }
        visited.insert(center);
        let mut frontier = VecDeque::from([(center, 0u32)]);
        while let Some((coord, depth)) = frontier.pop_front() {
            if depth == radius {
                continue;
            }
            for next in coord.neighbors() {
                if !self.by_coord.contains_key(&next) || !visited.insert(next) {
                    continue;
                }
                frontier.push_back((next, depth + 1));
            }
        }
        visited
    }

    /// Handles within `radius` hops of `center`, including `center` itself.
    /// Unknown centers yield an empty set.
    pub fn neighbors_within_radius(&self, center: H, radius: u32) -> HashSet<H> {
        let Some(origin) = self.coord_of(center) else {
            return HashSet::default();
        };
        self.coords_within_radius(origin, radius)
            .into_iter()
            .filter_map(|coord| self.get(coord))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(width: i32, height: i32) -> GridIndex<usize> {
        GridIndex::from_entries(
            (0..height)
                .flat_map(|y| (0..width).map(move |x| OffsetCoord::new(x, y)))
                .enumerate()
                .map(|(i, c)| (c, i)),
        )
    }

    // ── adjacency ───────────────────────────────────────────────────

    #[test]
    fn even_row_neighbors_lean_left() {
        let n = OffsetCoord::new(5, 4).neighbors();
        assert!(n.contains(&OffsetCoord::new(4, 3)));
        assert!(n.contains(&OffsetCoord::new(4, 5)));
        assert!(!n.contains(&OffsetCoord::new(6, 3)));
    }

    #[test]
    fn odd_row_neighbors_lean_right() {
        let n = OffsetCoord::new(5, 3).neighbors();
        assert!(n.contains(&OffsetCoord::new(6, 2)));
        assert!(n.contains(&OffsetCoord::new(6, 4)));
        assert!(!n.contains(&OffsetCoord::new(4, 2)));
    }

    #[test]
    fn parity_holds_for_negative_rows() {
        assert!(OffsetCoord::new(0, -1).is_odd_row());
        assert!(!OffsetCoord::new(0, -2).is_odd_row());
    }

    #[test]
    fn adjacency_is_symmetric() {
        for y in -3..4 {
            for x in -3..4 {
                let c = OffsetCoord::new(x, y);
                for n in c.neighbors() {
                    assert!(n.neighbors().contains(&c), "{n} should list {c} back");
                }
            }
        }
    }

    #[test]
    fn tables_agree_with_axial_neighbors() {
        for y in -4..5 {
            for x in -4..5 {
                let c = OffsetCoord::new(x, y);
                let mut from_table = c.neighbors().to_vec();
                let mut from_axial: Vec<_> = c
                    .to_hex()
                    .all_neighbors()
                    .into_iter()
                    .map(OffsetCoord::from_hex)
                    .collect();
                from_table.sort();
                from_axial.sort();
                assert_eq!(from_table, from_axial, "mismatch at {c}");
            }
        }
    }

    #[test]
    fn hex_conversion_roundtrip() {
        for y in -5..6 {
            for x in -5..6 {
                let c = OffsetCoord::new(x, y);
                assert_eq!(OffsetCoord::from_hex(c.to_hex()), c);
            }
        }
    }

    // ── index ───────────────────────────────────────────────────────

    #[test]
    fn get_resolves_coordinates() {
        let index = filled(4, 3);
        assert_eq!(index.len(), 12);
        assert_eq!(index.get(OffsetCoord::new(0, 0)), Some(0));
        assert_eq!(index.get(OffsetCoord::new(3, 2)), Some(11));
        assert_eq!(index.get(OffsetCoord::new(4, 0)), None);
        assert_eq!(index.coord_of(5), Some(OffsetCoord::new(1, 1)));
    }

    #[test]
    fn build_replaces_previous_contents() {
        let mut index = filled(4, 4);
        index.build([(OffsetCoord::new(9, 9), 0)]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(OffsetCoord::new(0, 0)), None);
        assert_eq!(index.coord_of(0), Some(OffsetCoord::new(9, 9)));
    }

    #[test]
    fn duplicate_coordinates_keep_first_handle() {
        let mut index = GridIndex::default();
        let dupes = index.build([(OffsetCoord::new(1, 1), 10), (OffsetCoord::new(1, 1), 11)]);
        assert_eq!(dupes, 1);
        assert_eq!(index.get(OffsetCoord::new(1, 1)), Some(10));
    }

    #[test]
    fn radius_zero_is_just_the_center() {
        let index = filled(5, 5);
        let set = index.neighbors_within_radius(12, 0);
        assert_eq!(set.len(), 1);
        assert!(set.contains(&12));
    }

    #[test]
    fn radius_one_on_even_and_odd_rows_has_seven_tiles() {
        let index = filled(7, 7);
        let even = index.get(OffsetCoord::new(3, 2)).unwrap();
        let odd = index.get(OffsetCoord::new(3, 3)).unwrap();
        assert_eq!(index.neighbors_within_radius(even, 1).len(), 7);
        assert_eq!(index.neighbors_within_radius(odd, 1).len(), 7);
    }

    #[test]
    fn full_interior_rings_follow_hex_numbers() {
        let index = filled(15, 15);
        let center = index.get(OffsetCoord::new(7, 7)).unwrap();
        for r in 0..=4u32 {
            let expected = 1 + 3 * r * (r + 1);
            assert_eq!(
                index.neighbors_within_radius(center, r).len() as u32,
                expected,
                "radius {r}"
            );
        }
    }

    #[test]
    fn radius_sets_grow_strictly() {
        let index = filled(9, 9);
        let center = index.get(OffsetCoord::new(4, 4)).unwrap();
        for r in 1..=4u32 {
            let inner = index.neighbors_within_radius(center, r - 1);
            let outer = index.neighbors_within_radius(center, r);
            assert!(inner.iter().all(|h| outer.contains(h)));
            assert!(outer.len() > inner.len(), "radius {r} should add tiles");
        }
    }

    #[test]
    fn corner_queries_drop_missing_neighbors() {
        let index = filled(5, 5);
        let corner = index.get(OffsetCoord::new(0, 0)).unwrap();
        let set = index.neighbors_within_radius(corner, 1);
        // (0,0) on an even row: (1,0), (0,1) and the center survive.
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn no_wraparound_across_map_edges() {
        let index = filled(6, 6);
        let left = index.get(OffsetCoord::new(0, 2)).unwrap();
        let set = index.coords_within_radius(OffsetCoord::new(0, 2), 1);
        assert!(!set.iter().any(|c| c.x == 5));
        assert!(index.neighbors_within_radius(left, 1).len() < 7);
    }

    #[test]
    fn unknown_center_and_empty_index_yield_nothing() {
        let index = filled(3, 3);
        assert!(index.neighbors_within_radius(99, 2).is_empty());
        let empty: GridIndex<usize> = GridIndex::default();
        assert!(empty.is_empty());
        assert!(empty.neighbors_within_radius(0, 3).is_empty());
        assert!(empty.coords_within_radius(OffsetCoord::new(0, 0), 3).is_empty());
    }

    #[test]
    fn holes_block_expansion() {
        // A single row with a gap at x = 2.
        let index = GridIndex::from_entries(
            [0, 1, 3, 4]
                .into_iter()
                .map(|x| (OffsetCoord::new(x, 0), x as usize)),
        );
        let set = index.neighbors_within_radius(0, 4);
        assert!(set.contains(&1));
        assert!(!set.contains(&3));
    }
}
