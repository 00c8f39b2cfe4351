//! Implicit gear adjacency graph
//!
//! Nothing is cached: every query scans the live pieces it is handed, so
//! additions and removals between queries are always seen. Pairwise scans
//! are fine at the tens of gears a level holds.

use std::collections::HashSet;

use super::piece::{Piece, PieceId};

/// Live pieces touching `piece` (excluding itself)
pub fn neighbors<'a>(
    pieces: &'a [Piece],
    piece: &'a Piece,
    tolerance: f32,
) -> impl Iterator<Item = &'a Piece> + 'a {
    pieces.iter().filter(move |other| piece.touches(other, tolerance))
}

/// True if `piece` touches at least one other live piece
pub fn has_neighbor(pieces: &[Piece], piece: &Piece, tolerance: f32) -> bool {
    neighbors(pieces, piece, tolerance).next().is_some()
}

/// Depth-first search for a chain of touching live pieces from `start` to `target`
pub fn is_reachable(pieces: &[Piece], start: PieceId, target: PieceId, tolerance: f32) -> bool {
    let live = |id: PieceId| pieces.iter().find(|p| p.id() == id && p.is_live());

    let Some(start_piece) = live(start) else {
        return false;
    };
    if start == target {
        return true;
    }
    if live(target).is_none() {
        return false;
    }

    let mut visited: HashSet<PieceId> = HashSet::new();
    let mut stack = vec![start_piece];

    while let Some(piece) = stack.pop() {
        if !visited.insert(piece.id()) {
            continue;
        }
        if piece.id() == target {
            return true;
        }
        stack.extend(neighbors(pieces, piece, tolerance).filter(|n| !visited.contains(&n.id())));
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::CircleWorld;
    use glam::Vec2;
    use proptest::prelude::*;

    const TOL: f32 = 5.0;

    fn anchors_300_apart() -> Vec<Piece> {
        vec![
            Piece::new(PieceId(1), Vec2::new(250.0, 300.0), 40.0, true),
            Piece::new(PieceId(2), Vec2::new(550.0, 300.0), 40.0, true),
        ]
    }

    #[test]
    fn test_anchors_alone_not_connected() {
        let pieces = anchors_300_apart();
        assert!(!is_reachable(&pieces, PieceId(1), PieceId(2), TOL));
    }

    #[test]
    fn test_midpoint_gear_bridges_anchors() {
        // 170 apart: the midpoint gear sits exactly 80 + 5 from each anchor
        let pieces = vec![
            Piece::new(PieceId(1), Vec2::new(315.0, 300.0), 40.0, true),
            Piece::new(PieceId(2), Vec2::new(485.0, 300.0), 40.0, true),
            Piece::new(PieceId(3), Vec2::new(400.0, 300.0), 40.0, false),
        ];
        assert!(is_reachable(&pieces, PieceId(1), PieceId(2), TOL));
        assert!(is_reachable(&pieces, PieceId(2), PieceId(1), TOL));
    }

    #[test]
    fn test_wide_gap_needs_a_longer_chain() {
        let mut pieces = anchors_300_apart();
        pieces.push(Piece::new(PieceId(3), Vec2::new(400.0, 300.0), 40.0, false));
        assert!(!is_reachable(&pieces, PieceId(1), PieceId(2), TOL));

        pieces.push(Piece::new(PieceId(4), Vec2::new(325.0, 300.0), 40.0, false));
        pieces.push(Piece::new(PieceId(5), Vec2::new(475.0, 300.0), 40.0, false));
        assert!(is_reachable(&pieces, PieceId(1), PieceId(2), TOL));
    }

    #[test]
    fn test_just_outside_tolerance_not_adjacent() {
        let a = Piece::new(PieceId(1), Vec2::new(0.0, 0.0), 30.0, true);
        let b = Piece::new(PieceId(2), Vec2::new(30.0 + 40.0 + 6.0, 0.0), 40.0, false);
        assert!(!a.touches(&b, TOL));
        let pieces = vec![a, b];
        assert!(!is_reachable(&pieces, PieceId(1), PieceId(2), TOL));
    }

    #[test]
    fn test_within_tolerance_is_adjacent() {
        let pieces = vec![
            Piece::new(PieceId(1), Vec2::new(0.0, 0.0), 30.0, true),
            Piece::new(PieceId(2), Vec2::new(30.0 + 40.0 + 5.0, 0.0), 40.0, false),
        ];
        assert!(is_reachable(&pieces, PieceId(1), PieceId(2), TOL));
    }

    #[test]
    fn test_removed_piece_breaks_chain() {
        let mut world = CircleWorld::without_gravity();
        let mut pieces = vec![
            Piece::new(PieceId(1), Vec2::new(0.0, 0.0), 20.0, true),
            Piece::new(PieceId(2), Vec2::new(40.0, 0.0), 20.0, false),
            Piece::new(PieceId(3), Vec2::new(80.0, 0.0), 20.0, true),
        ];
        assert!(is_reachable(&pieces, PieceId(1), PieceId(3), TOL));
        pieces[1].mark_removed(&mut world);
        assert!(!is_reachable(&pieces, PieceId(1), PieceId(3), TOL));
        assert!(!has_neighbor(&pieces, &pieces[0], TOL));
    }

    #[test]
    fn test_cycle_terminates() {
        // Four gears in a ring, target unreachable
        let mut pieces = vec![
            Piece::new(PieceId(1), Vec2::new(0.0, 0.0), 20.0, true),
            Piece::new(PieceId(2), Vec2::new(40.0, 0.0), 20.0, false),
            Piece::new(PieceId(3), Vec2::new(40.0, 40.0), 20.0, false),
            Piece::new(PieceId(4), Vec2::new(0.0, 40.0), 20.0, false),
        ];
        pieces.push(Piece::new(PieceId(5), Vec2::new(500.0, 500.0), 20.0, true));
        assert!(!is_reachable(&pieces, PieceId(1), PieceId(5), TOL));
        assert!(is_reachable(&pieces, PieceId(1), PieceId(3), TOL));
    }

    #[test]
    fn test_unknown_ids_not_reachable() {
        let pieces = anchors_300_apart();
        assert!(!is_reachable(&pieces, PieceId(1), PieceId(99), TOL));
        assert!(!is_reachable(&pieces, PieceId(99), PieceId(99), TOL));
    }

    fn piece_strategy() -> impl Strategy<Value = (f32, f32, f32)> {
        (0.0f32..400.0, 0.0f32..400.0, 10.0f32..50.0)
    }

    fn build(specs: &[(f32, f32, f32)]) -> Vec<Piece> {
        specs
            .iter()
            .enumerate()
            .map(|(i, &(x, y, r))| Piece::new(PieceId(i as u32 + 1), Vec2::new(x, y), r, i % 2 == 0))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_adjacency_is_symmetric(specs in prop::collection::vec(piece_strategy(), 2..12)) {
            let pieces = build(&specs);
            for a in &pieces {
                for b in &pieces {
                    prop_assert_eq!(a.touches(b, TOL), b.touches(a, TOL));
                }
            }
        }

        #[test]
        fn prop_reachability_is_reflexive(specs in prop::collection::vec(piece_strategy(), 1..12)) {
            let pieces = build(&specs);
            for p in &pieces {
                prop_assert!(is_reachable(&pieces, p.id(), p.id(), TOL));
            }
        }

        #[test]
        fn prop_reachability_is_symmetric(specs in prop::collection::vec(piece_strategy(), 2..10)) {
            let pieces = build(&specs);
            let first = pieces[0].id();
            let last = pieces[pieces.len() - 1].id();
            prop_assert_eq!(
                is_reachable(&pieces, first, last, TOL),
                is_reachable(&pieces, last, first, TOL)
            );
        }
    }
}
