//! Gear Chain entry point
//!
//! Native builds run a headless autoplayer over the real game session.
//! The browser entry point lives in `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;

    use gear_chain::input::{InputEvent, InputResponse};
    use gear_chain::sim::{BoardEvent, CircleWorld, DropOutcome, PieceId};
    use gear_chain::store::{FileStorage, MemoryStorage};
    use gear_chain::{GameSession, GameStateStore, Settings, Tuning};

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Frames to let a dropped gear settle before aiming the next one
    const SETTLE_FRAMES: u32 = 6;
    /// Frames to wait for a signal once the inventory is empty
    const FINISH_FRAMES: u32 = 120;

    /// Headless Gear Chain: plays levels with a simple straight-line strategy.
    #[derive(Debug, Parser)]
    #[command(name = "gear-chain", version)]
    pub struct Args {
        /// Number of levels to play before exiting
        #[arg(short, long, default_value = "3", value_name = "N")]
        pub levels: u32,

        /// Seed for procedural levels
        #[arg(short, long, default_value = "0", value_name = "SEED")]
        pub seed: u64,

        /// Keep progress in memory instead of the config directory
        #[arg(long)]
        pub fresh: bool,

        /// JSON file overriding gameplay tuning
        #[arg(short, long, value_name = "FILE")]
        pub tuning: Option<PathBuf>,
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();

        let tuning = match &args.tuning {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading tuning file {}", path.display()))?;
                Tuning::from_json(&json)?
            }
            None => Tuning::default(),
        };

        let (store, settings) = if args.fresh {
            (GameStateStore::load(MemoryStorage::new()), Settings::default())
        } else {
            let storage = FileStorage::in_config_dir();
            (GameStateStore::load(storage.clone()), Settings::load(&storage))
        };

        let mut session = GameSession::with_circle_world(store, settings, tuning, args.seed)?;

        for _ in 0..args.levels {
            let hud = session.hud();
            log::info!(
                "Level {} | score {} | {} gears",
                hud.level,
                hud.score,
                hud.gears_remaining
            );

            match play_level(&mut session) {
                Some(BoardEvent::LevelComplete) => {
                    log::info!("Level complete, score now {}", session.hud().score);
                    session.advance()?;
                }
                Some(BoardEvent::GameOver) => {
                    log::info!("Game over, starting again");
                    session.retry()?;
                }
                None => {
                    log::warn!("Level {} stalled with no signal", session.hud().level);
                    break;
                }
            }
        }

        let hud = session.hud();
        println!("Finished on level {} with score {}", hud.level, hud.score);
        Ok(())
    }

    fn run_frames(session: &mut GameSession<CircleWorld>, frames: u32) -> Option<BoardEvent> {
        for _ in 0..frames {
            if let Some(event) = session.frame(FRAME_DT).into_iter().next() {
                return Some(event);
            }
        }
        None
    }

    /// Drop every queued gear along the line from the chain tail toward the
    /// end anchor, then wait for the board to signal
    fn play_level(session: &mut GameSession<CircleWorld>) -> Option<BoardEvent> {
        let board = session.board();
        let tolerance = board.tuning().connect_tolerance;
        let (start, end) = board.anchors();
        let (mut tail_pos, mut tail_r) = board.piece(start).map(|p| (p.pos(), p.radius()))?;
        let (end_pos, end_r) = board.piece(end).map(|p| (p.pos(), p.radius()))?;

        loop {
            if let Some(event) = run_frames(session, SETTLE_FRAMES) {
                return Some(event);
            }

            let Some(next) = session.board().inventory().peek_next().copied() else {
                return run_frames(session, FINISH_FRAMES);
            };

            let target = aim(tail_pos, tail_r, end_pos, end_r, next.radius, tolerance);
            let Some(id) = drop_at(session, target) else {
                log::warn!("Could not place gear at ({:.0}, {:.0})", target.x, target.y);
                return run_frames(session, FINISH_FRAMES);
            };

            if let Some(event) = run_frames(session, SETTLE_FRAMES) {
                return Some(event);
            }
            match session.board().piece(id) {
                Some(p) if p.is_live() && p.is_fixed() => {
                    tail_pos = p.pos();
                    tail_r = p.radius();
                }
                _ => log::debug!("Gear {} did not join the chain", id.0),
            }
        }
    }

    /// Place the next gear and drag it to `target`
    fn drop_at(session: &mut GameSession<CircleWorld>, target: Vec2) -> Option<PieceId> {
        // Pointer modality places on press, touch on release
        let piece = match session.handle_input(InputEvent::PointerDown(target)) {
            InputResponse::Placed(piece) => piece,
            _ => match session.handle_input(InputEvent::PointerUp(target)) {
                InputResponse::Placed(piece) => piece,
                _ => return None,
            },
        };
        session.handle_input(InputEvent::DragStart { piece, pos: target });
        session.handle_input(InputEvent::Drag { piece, pos: target });
        let outcome = session.handle_input(InputEvent::DragEnd { piece, pos: target });
        if outcome == InputResponse::Dropped(DropOutcome::Discarded) {
            log::debug!("Gear {} discarded", piece.0);
        }
        Some(piece)
    }

    /// Center for a gear of `radius` touching the tail on the way to the end
    /// anchor. Near the end it splits the remaining gap evenly on both sides.
    fn aim(tail: Vec2, tail_r: f32, end: Vec2, end_r: f32, radius: f32, tolerance: f32) -> Vec2 {
        let to_end = end - tail;
        let dir = to_end.try_normalize().unwrap_or(Vec2::X);
        let remaining = to_end.length() - tail_r - end_r;
        let slack = tolerance * 0.99;

        let gap = if remaining <= 2.0 * (radius + slack) {
            ((remaining - 2.0 * radius) / 2.0).max(-radius)
        } else {
            slack
        };
        tail + dir * (tail_r + radius + gap)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_aim_keeps_within_tolerance() {
            let target = aim(Vec2::new(100.0, 300.0), 40.0, Vec2::new(700.0, 300.0), 40.0, 50.0, 5.0);
            assert!((target.y - 300.0).abs() < 1e-4);
            let gap = target.x - 100.0 - 40.0 - 50.0;
            assert!(gap > 0.0 && gap < 5.0);
        }

        #[test]
        fn test_aim_centers_last_gear() {
            // 100 units of gap, one 46 gear: 4 on each side
            let target = aim(Vec2::new(0.0, 0.0), 50.0, Vec2::new(200.0, 0.0), 50.0, 46.0, 5.0);
            assert!((target.x - 100.0).abs() < 1e-4);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Gear Chain (native) starting...");
    autoplay::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point is `platform::web::start`
}
