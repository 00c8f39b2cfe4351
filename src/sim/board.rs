//! Board controller: owns the live gears and runs the level's rules
//!
//! Two cadences drive the board. [`Board::tick`] runs once per simulation
//! step (physics, pose sync, culling, freeze-on-contact) and
//! [`Board::advance_timers`] runs the slower win check. Both are called
//! from the same loop, so nothing here needs locking.

use glam::Vec2;

use super::connectivity::{has_neighbor, is_reachable};
use super::inventory::InventoryQueue;
use super::physics::PhysicsService;
use super::piece::{BoardContext, Piece, PieceId};
use super::timer::IntervalTimer;
use crate::Bounds;
use crate::error::ConfigError;
use crate::level::LevelConfig;
use crate::store::GameStateStore;
use crate::tuning::Tuning;

/// Overall state of the level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    Playing,
    /// Anchors linked; waits for the session to advance
    LevelComplete,
    /// Out of gears; waits for the session to retry
    GameOver,
}

/// Signals for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    LevelComplete,
    GameOver,
}

/// What happened when a drag ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Touching at least one other gear; stays on the board
    Connected,
    /// Touching nothing; destroyed
    Discarded,
    /// No matching drag in progress
    Ignored,
}

/// Removals requested by pieces during a sync pass
struct PendingRemovals {
    bounds: Bounds,
    ids: Vec<PieceId>,
}

impl BoardContext for PendingRemovals {
    fn board_bounds(&self) -> Bounds {
        self.bounds
    }

    fn remove_entity(&mut self, id: PieceId) {
        self.ids.push(id);
    }
}

/// One level in progress
pub struct Board<P: PhysicsService> {
    physics: P,
    tuning: Tuning,
    bounds: Bounds,
    /// Live pieces in creation order
    pieces: Vec<Piece>,
    inventory: InventoryQueue,
    start: PieceId,
    end: PieceId,
    /// Piece currently being dragged
    selected: Option<PieceId>,
    phase: BoardPhase,
    win_timer: IntervalTimer,
    events: Vec<BoardEvent>,
    next_id: u32,
}

impl<P: PhysicsService> std::fmt::Debug for Board<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("phase", &self.phase)
            .field("pieces", &self.pieces.len())
            .field("inventory", &self.inventory.remaining_count())
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl<P: PhysicsService> Board<P> {
    /// Build a board for `level`. Fails if the level is not playable.
    pub fn new(
        level: &LevelConfig,
        physics: P,
        tuning: Tuning,
        bounds: Bounds,
    ) -> Result<Self, ConfigError> {
        level.validate(bounds)?;

        let mut board = Self {
            physics,
            win_timer: IntervalTimer::new(tuning.win_check_interval),
            tuning,
            bounds,
            pieces: Vec::with_capacity(level.anchors.len() + level.inventory.len()),
            inventory: InventoryQueue::new(level.inventory.iter().copied()),
            start: PieceId(0),
            end: PieceId(0),
            selected: None,
            phase: BoardPhase::Playing,
            events: Vec::new(),
            next_id: 1,
        };

        for anchor in &level.anchors {
            board.spawn(anchor.position(), anchor.radius, true);
        }
        board.start = board.pieces[0].id();
        board.end = board.pieces[1].id();

        log::info!(
            "Board ready: {} anchors, {} gears queued",
            level.anchors.len(),
            board.inventory.remaining_count()
        );

        Ok(board)
    }

    fn next_piece_id(&mut self) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn(&mut self, pos: Vec2, radius: f32, fixed: bool) -> PieceId {
        let id = self.next_piece_id();
        let piece = Piece::spawn(id, pos, radius, fixed, &mut self.physics, &self.tuning);
        self.pieces.push(piece);
        id
    }

    fn index_of(&self, id: PieceId) -> Option<usize> {
        self.pieces.iter().position(|p| p.id() == id && p.is_live())
    }

    /// Tombstone and drop a piece from the live set
    fn dispose(&mut self, id: PieceId) {
        if let Some(piece) = self.pieces.iter_mut().find(|p| p.id() == id) {
            piece.mark_removed(&mut self.physics);
        }
        self.pieces.retain(|p| p.id() != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    fn signal(&mut self, event: BoardEvent) {
        self.events.push(event);
    }

    // === Accessors ===

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Live pieces
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.index_of(id).map(|i| &self.pieces[i])
    }

    pub fn live_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_live()).count()
    }

    pub fn inventory(&self) -> &InventoryQueue {
        &self.inventory
    }

    /// Gears left to drop, for the HUD
    pub fn gears_remaining(&self) -> usize {
        self.inventory.remaining_count()
    }

    /// The chain endpoints (start, end)
    pub fn anchors(&self) -> (PieceId, PieceId) {
        (self.start, self.end)
    }

    pub fn selected(&self) -> Option<PieceId> {
        self.selected
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    /// Take the signals raised since the last call
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    // === Input ===

    /// Begin dragging a free piece. Only one drag at a time: a second
    /// drag-start while one is active is ignored.
    pub fn drag_start(&mut self, id: PieceId) -> bool {
        if self.phase != BoardPhase::Playing {
            return false;
        }
        if let Some(current) = self.selected {
            log::debug!("Ignoring drag of {:?} while {:?} is held", id, current);
            return false;
        }
        let Some(i) = self.index_of(id) else {
            return false;
        };
        if self.pieces[i].is_fixed() {
            return false;
        }

        self.pieces[i].hold(&mut self.physics, true);
        self.selected = Some(id);
        true
    }

    /// Move the dragged piece to the pointer. Pointer positions outside the
    /// board are ignored and the piece keeps its last position.
    pub fn drag_update(&mut self, id: PieceId, pointer: Vec2) -> bool {
        if self.selected != Some(id) || !self.bounds.contains(pointer) {
            return false;
        }
        let Some(i) = self.index_of(id) else {
            return false;
        };
        if self.pieces[i].is_fixed() {
            return false;
        }
        self.pieces[i].move_to(&mut self.physics, pointer);
        true
    }

    /// Release the dragged piece. A piece that touches nothing is destroyed;
    /// if that leaves only the anchors and an empty inventory, the game is over.
    pub fn drag_end(&mut self, id: PieceId) -> DropOutcome {
        if self.selected != Some(id) {
            return DropOutcome::Ignored;
        }
        self.selected = None;

        let Some(i) = self.index_of(id) else {
            return DropOutcome::Ignored;
        };
        // Froze on contact mid-drag: already locked in place
        if self.pieces[i].is_fixed() {
            return DropOutcome::Ignored;
        }

        self.pieces[i].hold(&mut self.physics, false);

        if has_neighbor(&self.pieces, &self.pieces[i], self.tuning.connect_tolerance) {
            return DropOutcome::Connected;
        }

        log::debug!("Gear {:?} dropped touching nothing, discarded", id);
        self.dispose(id);

        if self.phase == BoardPhase::Playing && self.inventory.is_empty() && self.live_count() <= 2 {
            self.game_over();
        }

        DropOutcome::Discarded
    }

    /// Drop the next queued gear above `point`. Ignored when the queue is
    /// empty or `point` is not strictly inside the board.
    pub fn place_at(&mut self, point: Vec2) -> Option<PieceId> {
        if self.phase != BoardPhase::Playing || !self.bounds.contains(point) {
            return None;
        }
        let spec = self.inventory.consume_next()?;

        let pos = Vec2::new(point.x, point.y - (spec.radius + self.tuning.spawn_margin));
        let id = self.spawn(pos, spec.radius, false);
        log::debug!(
            "Placed gear {:?} (r={}) at ({:.1}, {:.1}), {} left",
            id,
            spec.radius,
            pos.x,
            pos.y,
            self.inventory.remaining_count()
        );
        Some(id)
    }

    // === Simulation ===

    /// One simulation step: physics, pose sync with culling, then
    /// freeze-on-contact.
    pub fn tick(&mut self, dt: f32) {
        self.physics.step(dt);

        let mut pending = PendingRemovals {
            bounds: self.bounds,
            ids: Vec::new(),
        };
        for piece in &mut self.pieces {
            piece.sync(&mut self.physics, &mut pending);
        }
        for id in pending.ids {
            self.dispose(id);
        }

        self.freeze_on_contact();
    }

    /// Free pieces touching a fixed piece become fixed
    fn freeze_on_contact(&mut self) {
        let tolerance = self.tuning.connect_tolerance;
        let landed: Vec<usize> = self
            .pieces
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_live() && !p.is_fixed())
            .filter(|(_, p)| {
                self.pieces
                    .iter()
                    .any(|other| other.is_fixed() && p.touches(other, tolerance))
            })
            .map(|(i, _)| i)
            .collect();

        for i in landed {
            self.pieces[i].freeze(&mut self.physics);
        }
    }

    /// Advance the win-check clock by `dt` seconds, checking when it fires
    pub fn advance_timers(&mut self, dt: f32, store: &mut GameStateStore) {
        if self.win_timer.advance(dt) > 0 {
            self.check_win(store);
        }
    }

    /// Test whether the anchors are linked. On success the recurring check
    /// stops for good, progress is updated, and `LevelComplete` is raised.
    pub fn check_win(&mut self, store: &mut GameStateStore) -> bool {
        if self.phase != BoardPhase::Playing || !self.win_timer.is_active() {
            return false;
        }
        if !is_reachable(&self.pieces, self.start, self.end, self.tuning.connect_tolerance) {
            return false;
        }

        self.win_timer.stop();
        self.phase = BoardPhase::LevelComplete;
        store.increment_level();
        store.add_score(self.tuning.win_bonus);
        log::info!("Level complete! Now level {}, score {}", store.level(), store.score());
        self.signal(BoardEvent::LevelComplete);
        true
    }

    fn game_over(&mut self) {
        self.win_timer.stop();
        self.phase = BoardPhase::GameOver;
        log::info!("Game over: out of gears");
        self.signal(BoardEvent::GameOver);
    }
}
