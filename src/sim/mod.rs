//! Board simulation module
//!
//! All gameplay rules live here, with no rendering or platform dependencies:
//! - Fixed timestep only
//! - Stable iteration order (creation order / body handle)
//! - Rigid-body motion delegated to a [`PhysicsService`]

pub mod board;
pub mod connectivity;
pub mod inventory;
pub mod physics;
pub mod piece;
pub mod placement;
pub mod timer;
pub mod world;

pub use board::{Board, BoardEvent, BoardPhase, DropOutcome};
pub use connectivity::{has_neighbor, is_reachable, neighbors};
pub use inventory::InventoryQueue;
pub use physics::{BodyDesc, BodyHandle, BodyState, PhysicsService};
pub use piece::{BoardContext, Piece, PieceId};
pub use placement::landing_height;
pub use timer::IntervalTimer;
pub use world::CircleWorld;
