//! A placed gear and the board capability it reports back through

use glam::Vec2;

use super::physics::{BodyDesc, BodyHandle, PhysicsService};
use crate::tuning::Tuning;
use crate::{Bounds, circles_touch};

/// Stable gear identity, unique per board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

/// What a piece may ask of the board that owns it
pub trait BoardContext {
    fn board_bounds(&self) -> Bounds;
    fn remove_entity(&mut self, id: PieceId);
}

/// A gear on the board.
///
/// Position mirrors the physics body while free and is frozen once fixed.
/// `fixed` and `removed` only ever go from false to true.
#[derive(Debug, Clone)]
pub struct Piece {
    id: PieceId,
    pos: Vec2,
    rotation: f32,
    radius: f32,
    fixed: bool,
    removed: bool,
    body: Option<BodyHandle>,
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Piece {}

impl Piece {
    /// A piece with no physics body (geometry only)
    pub fn new(id: PieceId, pos: Vec2, radius: f32, fixed: bool) -> Self {
        debug_assert!(radius > 0.0, "piece radius must be positive");
        Self {
            id,
            pos,
            rotation: 0.0,
            radius,
            fixed,
            removed: false,
            body: None,
        }
    }

    /// A piece backed by a new circular body in `physics`
    pub fn spawn<P: PhysicsService + ?Sized>(
        id: PieceId,
        pos: Vec2,
        radius: f32,
        fixed: bool,
        physics: &mut P,
        tuning: &Tuning,
    ) -> Self {
        let mut piece = Self::new(id, pos, radius, fixed);
        piece.body = Some(physics.create_circle(BodyDesc::gear(pos, radius, fixed, tuning)));
        piece
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Still on the board
    pub fn is_live(&self) -> bool {
        !self.removed
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Adjacency test: both live, distinct, and within `tolerance` of touching
    pub fn touches(&self, other: &Piece, tolerance: f32) -> bool {
        self.id != other.id
            && self.is_live()
            && other.is_live()
            && circles_touch(self.pos, self.radius, other.pos, other.radius, tolerance)
    }

    /// Make the piece permanently fixed and its body immovable
    pub fn freeze<P: PhysicsService + ?Sized>(&mut self, physics: &mut P) {
        if self.removed {
            debug_assert!(false, "freeze on removed piece {:?}", self.id);
            return;
        }
        if self.fixed {
            return;
        }
        self.fixed = true;
        if let Some(body) = self.body {
            physics.set_static(body, true);
        }
        log::debug!("Gear {:?} frozen at ({:.1}, {:.1})", self.id, self.pos.x, self.pos.y);
    }

    /// Release the body and tombstone the piece
    pub fn mark_removed<P: PhysicsService + ?Sized>(&mut self, physics: &mut P) {
        if self.removed {
            return;
        }
        self.removed = true;
        if let Some(body) = self.body.take() {
            physics.remove_body(body);
        }
    }

    /// Toggle the body's static flag for a drag without touching `fixed`
    pub fn hold<P: PhysicsService + ?Sized>(&mut self, physics: &mut P, held: bool) {
        if self.removed || self.fixed {
            return;
        }
        if let Some(body) = self.body {
            physics.set_static(body, held);
        }
    }

    /// Force the piece (and its body) to `pos`
    pub fn move_to<P: PhysicsService + ?Sized>(&mut self, physics: &mut P, pos: Vec2) {
        if self.removed {
            debug_assert!(false, "move on removed piece {:?}", self.id);
            return;
        }
        if self.fixed {
            return;
        }
        self.pos = pos;
        if let Some(body) = self.body {
            physics.set_position(body, pos);
            physics.set_velocity(body, Vec2::ZERO);
        }
    }

    /// Per-tick update: copy the body's pose while free, and drop the piece
    /// if it has drifted across a board edge.
    pub fn sync<P: PhysicsService + ?Sized>(&mut self, physics: &mut P, ctx: &mut impl BoardContext) {
        if self.fixed || self.removed {
            return;
        }
        let Some(state) = self.body.and_then(|b| physics.body_state(b)) else {
            return;
        };
        self.pos = state.position;
        self.rotation = state.angle;

        if ctx.board_bounds().circle_crosses_edge(self.pos, self.radius) {
            log::debug!("Gear {:?} left the board", self.id);
            self.fixed = true;
            self.mark_removed(physics);
            ctx.remove_entity(self.id);
        }
    }
}
