//! Pipe Dash - a side-scrolling gap runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, contacts, spawning, game state)
//! - `game`: Simulation owner that wires in the RNG, audio cues and frame driver
//! - `audio`: Audio cue collaborator boundary
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod sim;
pub mod tuning;

pub use audio::{AudioCue, Cue, CueError, LogCues, SilentCues};
pub use game::GameSimulation;
pub use tuning::{ConfigError, Frame, SimConfig};

/// Driver configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz reference rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will accept before clamping
    pub const MAX_FRAME_DT: f32 = 0.1;
}
