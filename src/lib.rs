//! Gear Chain - a gravity puzzle about linking two anchor gears
//!
//! Core modules:
//! - `sim`: Board simulation (pieces, placement, connectivity, physics boundary)
//! - `level`: Level configuration loading and generation
//! - `store`: Persisted level/score progress
//! - `input`: Drag/pointer routing and drop preview
//! - `game`: Session flow across levels
//! - `platform`: Browser bindings

pub mod error;
pub mod game;
pub mod input;
pub mod level;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod store;
pub mod tuning;

pub use error::{ConfigError, StorageError};
pub use game::GameSession;
pub use level::{GearSpec, LevelConfig};
pub use settings::Settings;
pub use store::{GameStateStore, SavedProgress};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Board dimensions (y grows downward, gravity pulls toward +y)
    pub const BOARD_WIDTH: f32 = 800.0;
    pub const BOARD_HEIGHT: f32 = 600.0;

    /// Gear radii available to levels
    pub const GEAR_SIZES: [f32; 4] = [20.0, 30.0, 40.0, 50.0];

    /// Slack added to the sum of radii when deciding two gears touch
    pub const CONNECT_TOLERANCE: f32 = 5.0;
    /// Seconds between win-condition checks
    pub const WIN_CHECK_INTERVAL: f32 = 0.5;
    /// Points awarded for completing a level
    pub const WIN_BONUS: u64 = 100;
    /// Gap between the tap point and the bottom of a freshly spawned gear
    pub const SPAWN_MARGIN: f32 = 10.0;
}

/// Board extent in world units (origin at top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Point strictly inside the board
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > 0.0 && p.x < self.width && p.y > 0.0 && p.y < self.height
    }

    /// True if a circle at `center` pokes past any edge
    #[inline]
    pub fn circle_crosses_edge(&self, center: Vec2, radius: f32) -> bool {
        center.x - radius < 0.0
            || center.x + radius > self.width
            || center.y - radius < 0.0
            || center.y + radius > self.height
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(consts::BOARD_WIDTH, consts::BOARD_HEIGHT)
    }
}

/// Two circles count as touching when their centers are no further apart
/// than the sum of radii plus `tolerance`.
#[inline]
pub fn circles_touch(a: Vec2, ra: f32, b: Vec2, rb: f32, tolerance: f32) -> bool {
    a.distance(b) <= ra + rb + tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_contains_is_strict() {
        let b = Bounds::new(800.0, 600.0);
        assert!(b.contains(Vec2::new(400.0, 300.0)));
        assert!(!b.contains(Vec2::new(0.0, 300.0)));
        assert!(!b.contains(Vec2::new(800.0, 300.0)));
        assert!(!b.contains(Vec2::new(400.0, 600.0)));
        assert!(!b.contains(Vec2::new(-5.0, 10.0)));
    }

    #[test]
    fn test_circle_crosses_edge() {
        let b = Bounds::new(800.0, 600.0);
        assert!(!b.circle_crosses_edge(Vec2::new(100.0, 100.0), 40.0));
        assert!(b.circle_crosses_edge(Vec2::new(30.0, 100.0), 40.0));
        assert!(b.circle_crosses_edge(Vec2::new(400.0, 580.0), 40.0));
    }

    #[test]
    fn test_circles_touch_tolerance() {
        let a = Vec2::new(0.0, 0.0);
        // Exactly sum of radii + tolerance: touching
        assert!(circles_touch(a, 40.0, Vec2::new(85.0, 0.0), 40.0, 5.0));
        // One unit past the tolerance: not touching
        assert!(!circles_touch(a, 40.0, Vec2::new(86.0, 0.0), 40.0, 5.0));
    }
}
