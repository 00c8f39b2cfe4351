//! Landing-height preview for the next gear
//!
//! A first-contact-from-above approximation: the gear drops straight down at
//! `x` and can only be caught by pieces within horizontal reach. The real
//! resting spot is still up to the physics simulation.

use super::piece::Piece;

/// Vertical coordinate where a gear of radius `r` dropped at `x` would rest.
///
/// For each live piece within horizontal reach the contact angle is
/// `acos(|dx| / (p.r + r))` and the candidate is `p.y - sin(angle) * (p.r + r)`.
/// Returns the largest candidate, or `0.0` when no piece is in reach.
pub fn landing_height<'a>(pieces: impl IntoIterator<Item = &'a Piece>, x: f32, r: f32) -> f32 {
    pieces
        .into_iter()
        .filter(|p| p.is_live())
        .filter_map(|p| {
            let reach = p.radius() + r;
            let dx = (p.pos().x - x).abs();
            if dx > reach {
                return None;
            }
            let theta = (dx / reach).acos();
            Some(p.pos().y - theta.sin() * reach)
        })
        .fold(None, |best: Option<f32>, y| Some(best.map_or(y, |b| b.max(y))))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::piece::PieceId;
    use crate::sim::world::CircleWorld;
    use glam::Vec2;

    #[test]
    fn test_empty_board_is_top() {
        let pieces: Vec<Piece> = Vec::new();
        assert_eq!(landing_height(&pieces, 400.0, 20.0), 0.0);
    }

    #[test]
    fn test_out_of_reach_is_top() {
        let pieces = vec![Piece::new(PieceId(1), Vec2::new(100.0, 300.0), 40.0, true)];
        assert_eq!(landing_height(&pieces, 400.0, 20.0), 0.0);
    }

    #[test]
    fn test_directly_above_rests_on_top() {
        let pieces = vec![Piece::new(PieceId(1), Vec2::new(400.0, 300.0), 40.0, true)];
        let y = landing_height(&pieces, 400.0, 20.0);
        assert!((y - 240.0).abs() < 1e-3);
    }

    #[test]
    fn test_grazing_contact_at_edge_of_reach() {
        let pieces = vec![Piece::new(PieceId(1), Vec2::new(400.0, 300.0), 40.0, true)];
        // dx == reach: contact angle 0, candidate sits level with the piece
        let y = landing_height(&pieces, 460.0, 20.0);
        assert!((y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_offset_contact_uses_angle() {
        let pieces = vec![Piece::new(PieceId(1), Vec2::new(400.0, 300.0), 30.0, true)];
        // reach 50, dx 30 -> sin = 0.8 -> 300 - 40
        let y = landing_height(&pieces, 430.0, 20.0);
        assert!((y - 260.0).abs() < 1e-3);
    }

    #[test]
    fn test_takes_maximum_candidate() {
        let pieces = vec![
            Piece::new(PieceId(1), Vec2::new(400.0, 300.0), 40.0, true),
            Piece::new(PieceId(2), Vec2::new(410.0, 500.0), 40.0, true),
        ];
        let y = landing_height(&pieces, 400.0, 20.0);
        assert!(y > 400.0);
    }

    #[test]
    fn test_removed_pieces_ignored() {
        let mut world = CircleWorld::without_gravity();
        let mut piece = Piece::new(PieceId(1), Vec2::new(400.0, 300.0), 40.0, true);
        piece.mark_removed(&mut world);
        assert_eq!(landing_height([&piece], 400.0, 20.0), 0.0);
    }
}
