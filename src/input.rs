//! Input routing
//!
//! Turns drag and pointer events into board operations. Pointer devices
//! drop a gear on press; touch devices drop on release so the finger can
//! aim with the preview first.

use glam::Vec2;

use crate::settings::{InputModality, Settings};
use crate::sim::{Board, BoardPhase, DropOutcome, PhysicsService, PieceId, landing_height};

/// Raw input delivered by the platform layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    DragStart { piece: PieceId, pos: Vec2 },
    Drag { piece: PieceId, pos: Vec2 },
    DragEnd { piece: PieceId, pos: Vec2 },
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp(Vec2),
}

/// Ghost gear at its predicted landing spot, plus the drop guide line
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DropPreview {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Ghost gear should be drawn
    pub visible: bool,
    /// Vertical guide at `x` should be drawn
    pub guide: bool,
}

/// Result of routing one event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputResponse {
    None,
    Placed(PieceId),
    Dropped(DropOutcome),
}

/// Stateful input router for one board
#[derive(Debug, Clone)]
pub struct InputRouter {
    modality: InputModality,
    show_preview: bool,
    show_guide: bool,
    preview: DropPreview,
    pointer: Option<Vec2>,
}

impl InputRouter {
    pub fn new(settings: &Settings) -> Self {
        Self {
            modality: settings.modality,
            show_preview: settings.show_preview,
            show_guide: settings.show_guide,
            preview: DropPreview::default(),
            pointer: None,
        }
    }

    pub fn preview(&self) -> DropPreview {
        self.preview
    }

    /// Apply one event to `board`
    pub fn handle<P: PhysicsService>(&mut self, board: &mut Board<P>, event: InputEvent) -> InputResponse {
        let response = match event {
            InputEvent::DragStart { piece, .. } => {
                board.drag_start(piece);
                InputResponse::None
            }
            InputEvent::Drag { piece, pos } => {
                board.drag_update(piece, pos);
                InputResponse::None
            }
            InputEvent::DragEnd { piece, .. } => InputResponse::Dropped(board.drag_end(piece)),
            InputEvent::PointerDown(pos) => {
                self.pointer = Some(pos);
                match self.modality {
                    InputModality::Pointer => self.place(board, pos),
                    InputModality::Touch => InputResponse::None,
                }
            }
            InputEvent::PointerMove(pos) => {
                self.pointer = Some(pos);
                InputResponse::None
            }
            InputEvent::PointerUp(pos) => {
                self.pointer = Some(pos);
                match self.modality {
                    InputModality::Touch => self.place(board, pos),
                    InputModality::Pointer => InputResponse::None,
                }
            }
        };

        self.refresh_preview(board);
        response
    }

    fn place<P: PhysicsService>(&mut self, board: &mut Board<P>, pos: Vec2) -> InputResponse {
        match board.place_at(pos) {
            Some(id) => InputResponse::Placed(id),
            None => InputResponse::None,
        }
    }

    /// Recompute the preview for the last pointer position
    pub fn refresh_preview<P: PhysicsService>(&mut self, board: &Board<P>) {
        self.preview = match (self.pointer, board.inventory().peek_next()) {
            (Some(pos), Some(next))
                if board.phase() == BoardPhase::Playing
                    && board.selected().is_none()
                    && board.bounds().contains(pos) =>
            {
                DropPreview {
                    x: pos.x,
                    y: landing_height(board.pieces(), pos.x, next.radius),
                    radius: next.radius,
                    visible: self.show_preview,
                    guide: self.show_guide,
                }
            }
            _ => DropPreview::default(),
        };
    }
}

/// Topmost free piece under `pos`, for platforms that only report raw
/// pointer coordinates
pub fn pick_piece<P: PhysicsService>(board: &Board<P>, pos: Vec2) -> Option<PieceId> {
    board
        .pieces()
        .iter()
        .rev()
        .find(|p| p.is_live() && !p.is_fixed() && p.pos().distance(pos) <= p.radius())
        .map(|p| p.id())
}
