//! Property-based tests over random cells and positions.

#![allow(missing_docs, clippy::tests_outside_test_module)]

use proptest::prelude::*;
use s2dggrs::{
    CellId, MAX_LEVEL,
    curve::{self, MAX_ORDER},
    grid_system::{CubeSphere, DiscreteGlobalGrid},
    projection::{LatLon, MAX_SIZE},
};

/// Any valid cell, built from a random leaf truncated to a random level.
fn any_cell() -> impl Strategy<Value = CellId> {
    (0u8..6, 0..MAX_SIZE, 0..MAX_SIZE, 0..=MAX_LEVEL).prop_filter_map(
        "leaf on the cube",
        |(face, i, j, level)| CellId::from_face_ij(face, i, j).ok()?.parent_at(level),
    )
}

/// Whether the cell touches no edge of its face.
fn is_interior(id: CellId) -> bool {
    let (_, i, j) = id.to_face_ij();
    let size = CellId::size_ij(id.level());
    i > 0 && j > 0 && i + size < MAX_SIZE && j + size < MAX_SIZE
}

proptest! {
    #[test]
    fn token_round_trip(id in any_cell()) {
        let token = id.to_token();
        prop_assert!(token.len() <= 16);
        prop_assert_eq!(CellId::from_token(&token), Ok(id));
        prop_assert_eq!(CellId::from_token(&token.to_uppercase()), Ok(id));
        prop_assert_eq!(token.parse::<CellId>(), Ok(id));
    }

    #[test]
    fn parent_child_consistency(id in any_cell()) {
        if let Some(children) = id.children() {
            for (k, child) in (0u8..).zip(children) {
                prop_assert_eq!(child.parent(), Some(id));
                prop_assert_eq!(id.child(k), Some(child));
                prop_assert!(id.contains(child));
                prop_assert_eq!(child.level(), id.level() + 1);
            }
        } else {
            prop_assert!(id.is_leaf());
        }
        match id.parent() {
            Some(parent) => {
                let siblings = parent.children();
                prop_assert!(siblings.is_some_and(|s| s.contains(&id)));
            }
            None => prop_assert!(id.is_face()),
        }
    }

    #[test]
    fn interior_neighbours_are_mutual(id in any_cell()) {
        prop_assume!(is_interior(id));
        let neighbours = id.edge_neighbors();
        for n in neighbours {
            prop_assert_eq!(n.level(), id.level());
            prop_assert_eq!(n.face(), id.face());
            prop_assert!(n.edge_neighbors().contains(&id));
        }
    }

    #[test]
    fn neighbours_are_mutual_everywhere(id in any_cell()) {
        for n in id.edge_neighbors() {
            prop_assert_ne!(n, id);
            prop_assert!(n.edge_neighbors().contains(&id), "{:?} -> {:?}", id, n);
        }
    }

    #[test]
    fn hilbert_bijection(x in 0..MAX_SIZE, y in 0..MAX_SIZE) {
        let index = curve::hilbert_index(MAX_ORDER, x, y);
        prop_assert_eq!(curve::hilbert_point(MAX_ORDER, index), (x, y));
    }

    #[test]
    fn levels_out_of_order_are_refused(id in any_cell(), delta in 1u8..=5) {
        prop_assert_eq!(id.parent_at(id.level() + delta), None);
        if let Some(coarser) = id.level().checked_sub(delta) {
            prop_assert!(id.children_at(coarser).is_none());
            prop_assert_eq!(id.parent_at(coarser).map(|p| p.level()), Some(coarser));
        }
        if let Some(finer) = id.level().checked_add(delta).filter(|&l| l <= MAX_LEVEL) {
            let range = id.children_at(finer);
            prop_assert_eq!(range.map(|r| r.len()), Some(1usize << (2 * u32::from(delta))));
        }
    }

    #[test]
    fn point_lookup_nests(lat in -90.0..=90.0f64, lon in -180.0..180.0f64, level in 0..=MAX_LEVEL) {
        let point = LatLon::new(lat, lon);
        let leaf = CubeSphere.cell_at(point, MAX_LEVEL);
        let cell = CubeSphere.cell_at(point, level);
        prop_assert_eq!(cell.level(), level);
        prop_assert!(cell.contains(leaf));
        prop_assert!(CubeSphere.cell_bound(cell).contains_point(point));
    }
}
