//! Rigid-body service boundary
//!
//! The board never integrates motion itself. It creates circular bodies,
//! pokes their position/velocity/static flag, and reads back where the
//! simulator put them each frame.

use glam::Vec2;

use crate::tuning::Tuning;

/// Opaque handle to a body owned by a [`PhysicsService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

/// Parameters for a new circular body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub position: Vec2,
    pub radius: f32,
    pub is_static: bool,
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
}

impl BodyDesc {
    /// Body for a gear, with material values from `tuning`
    pub fn gear(position: Vec2, radius: f32, is_static: bool, tuning: &Tuning) -> Self {
        Self {
            position,
            radius,
            is_static,
            friction: tuning.friction,
            restitution: tuning.restitution,
            density: if is_static {
                tuning.density_fixed
            } else {
                tuning.density_free
            },
        }
    }
}

/// Snapshot of a body reported by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyState {
    pub position: Vec2,
    /// Rotation in radians
    pub angle: f32,
    pub velocity: Vec2,
}

/// What the board needs from a rigid-body simulator
pub trait PhysicsService {
    fn create_circle(&mut self, desc: BodyDesc) -> BodyHandle;
    fn set_position(&mut self, body: BodyHandle, position: Vec2);
    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);
    /// Static bodies are immovable and ignore gravity
    fn set_static(&mut self, body: BodyHandle, is_static: bool);
    fn remove_body(&mut self, body: BodyHandle);
    /// Current state, or `None` for an unknown/removed handle
    fn body_state(&self, body: BodyHandle) -> Option<BodyState>;
    /// Advance the simulation by `dt` seconds
    fn step(&mut self, dt: f32);
}
