//! Session flow across levels
//!
//! A session owns the current board, the progress store and the input
//! router. The platform calls [`GameSession::frame`] once per display frame
//! and forwards input through [`GameSession::handle_input`].

use crate::Bounds;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::ConfigError;
use crate::input::{DropPreview, InputEvent, InputResponse, InputRouter};
use crate::level::LevelConfig;
use crate::settings::Settings;
use crate::sim::{Board, BoardEvent, BoardPhase, CircleWorld, PhysicsService};
use crate::store::GameStateStore;
use crate::tuning::Tuning;

/// Builds a fresh physics world for each level
pub type WorldFactory<P> = Box<dyn Fn(Bounds, &Tuning) -> P>;

/// Values the HUD displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub level: u32,
    pub score: u64,
    pub gears_remaining: usize,
    pub phase: BoardPhase,
}

pub struct GameSession<P: PhysicsService> {
    board: Board<P>,
    store: GameStateStore,
    router: InputRouter,
    tuning: Tuning,
    bounds: Bounds,
    seed: u64,
    accumulator: f32,
    new_world: WorldFactory<P>,
}

impl GameSession<CircleWorld> {
    /// Session backed by the built-in [`CircleWorld`]
    pub fn with_circle_world(
        store: GameStateStore,
        settings: Settings,
        tuning: Tuning,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            store,
            settings,
            tuning,
            Bounds::default(),
            seed,
            Box::new(|bounds: Bounds, tuning: &Tuning| CircleWorld::new(bounds, tuning)),
        )
    }
}

impl<P: PhysicsService> GameSession<P> {
    /// Start a session at the stored level
    pub fn new(
        store: GameStateStore,
        settings: Settings,
        tuning: Tuning,
        bounds: Bounds,
        seed: u64,
        new_world: WorldFactory<P>,
    ) -> Result<Self, ConfigError> {
        let level = LevelConfig::generate(store.level(), seed, bounds, tuning.connect_tolerance);
        let board = Board::new(&level, new_world(bounds, &tuning), tuning.clone(), bounds)?;
        log::info!("Session starting at level {}", store.level());

        Ok(Self {
            board,
            store,
            router: InputRouter::new(&settings),
            tuning,
            bounds,
            seed,
            accumulator: 0.0,
            new_world,
        })
    }

    /// Replace the board with a specific level (progress is untouched)
    pub fn load_level(&mut self, level: &LevelConfig) -> Result<(), ConfigError> {
        let world = (self.new_world)(self.bounds, &self.tuning);
        self.board = Board::new(level, world, self.tuning.clone(), self.bounds)?;
        self.accumulator = 0.0;
        self.router.refresh_preview(&self.board);
        Ok(())
    }

    fn rebuild(&mut self) -> Result<(), ConfigError> {
        let level = LevelConfig::generate(
            self.store.level(),
            self.seed,
            self.bounds,
            self.tuning.connect_tolerance,
        );
        self.load_level(&level)
    }

    /// Run fixed simulation steps for `dt` seconds of frame time, then the
    /// win-check clock. Returns the signals raised this frame.
    pub fn frame(&mut self, dt: f32) -> Vec<BoardEvent> {
        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.board.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop backlog the substep cap could not absorb
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        self.board.advance_timers(dt, &mut self.store);
        self.router.refresh_preview(&self.board);
        self.board.drain_events()
    }

    pub fn handle_input(&mut self, event: InputEvent) -> InputResponse {
        self.router.handle(&mut self.board, event)
    }

    /// Move on after a completed level. No-op in any other phase.
    pub fn advance(&mut self) -> Result<bool, ConfigError> {
        if self.board.phase() != BoardPhase::LevelComplete {
            return Ok(false);
        }
        self.rebuild()?;
        log::info!("Advanced to level {}", self.store.level());
        Ok(true)
    }

    /// Start over from level 1 after a game over. No-op in any other phase.
    pub fn retry(&mut self) -> Result<bool, ConfigError> {
        if self.board.phase() != BoardPhase::GameOver {
            return Ok(false);
        }
        self.store.reset();
        self.rebuild()?;
        log::info!("Retrying from level 1");
        Ok(true)
    }

    pub fn hud(&self) -> Hud {
        Hud {
            level: self.store.level(),
            score: self.store.score(),
            gears_remaining: self.board.gears_remaining(),
            phase: self.board.phase(),
        }
    }

    pub fn preview(&self) -> DropPreview {
        self.router.preview()
    }

    pub fn board(&self) -> &Board<P> {
        &self.board
    }

    pub fn store(&self) -> &GameStateStore {
        &self.store
    }
}
