//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod backdrop;
pub mod body;
pub mod collision;
pub mod spawner;
pub mod state;
pub mod tick;

pub use backdrop::Backdrop;
pub use body::{Body, Category, Shape};
pub use collision::{ContactEvent, detect_contacts, overlaps};
pub use spawner::{ObstaclePair, ObstacleSpawner};
pub use state::{
    AvatarPose, EntityIds, GameEvent, GamePhase, GameState, ObstaclePose, RectPose, Snapshot,
};
pub use tick::{TickInput, flap, handle_tap, restart, tick};
