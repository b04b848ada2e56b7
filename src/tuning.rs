//! Data-driven game balance
//!
//! Every constant the simulation uses lives in [`SimConfig`]. Defaults match the
//! reference tuning; any field can be overridden from a JSON file, missing
//! fields fall back to their defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Errors raised while loading or validating a [`SimConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Size of the playfield (origin bottom-left, y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn mid_x(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn mid_y(&self) -> f32 {
        self.height / 2.0
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(400.0, 600.0)
    }
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Playfield size
    pub frame: Frame,
    /// Vertical gravity in metres/s² (negative is down)
    pub gravity: f32,
    /// Frame units per metre; converts `gravity` into units/s²
    pub physics_scale: f32,
    /// Upward velocity added by a tap (units/s)
    pub jump_impulse: f32,
    /// Avatar sprite size; collision radius is half the height
    pub avatar_size: Vec2,
    /// Pipe sprite size
    pub pipe_size: Vec2,
    /// Pipe collision boxes are shrunk by this much per axis
    pub collision_inset: f32,
    /// Gap height as a multiple of avatar height
    pub gap_factor: f32,
    /// Seconds between obstacle spawns
    pub spawn_interval: f32,
    /// Distance a pair travels over one crossing, in frame widths
    pub scroll_distance: f32,
    /// Crossing duration is `frame.width / crossing_rate` seconds
    pub crossing_rate: f32,
    /// Background tile width
    pub backdrop_tile_width: f32,
    /// Seconds for the background to scroll one tile
    pub backdrop_cycle_secs: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frame: Frame::default(),
            gravity: -7.0,
            physics_scale: 150.0,
            jump_impulse: 300.0,
            avatar_size: Vec2::new(48.0, 36.0),
            pipe_size: Vec2::new(104.0, 640.0),
            collision_inset: 20.0,
            gap_factor: 3.0,
            spawn_interval: 2.5,
            scroll_distance: 2.0,
            crossing_rate: 100.0,
            backdrop_tile_width: 1000.0,
            backdrop_cycle_secs: 7.0,
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        }

        positive("frame.width", self.frame.width)?;
        positive("frame.height", self.frame.height)?;
        positive("avatar_size.x", self.avatar_size.x)?;
        positive("avatar_size.y", self.avatar_size.y)?;
        positive("pipe_size.x", self.pipe_size.x)?;
        positive("pipe_size.y", self.pipe_size.y)?;
        positive("physics_scale", self.physics_scale)?;
        positive("gap_factor", self.gap_factor)?;
        positive("spawn_interval", self.spawn_interval)?;
        positive("scroll_distance", self.scroll_distance)?;
        positive("crossing_rate", self.crossing_rate)?;
        positive("backdrop_tile_width", self.backdrop_tile_width)?;
        positive("backdrop_cycle_secs", self.backdrop_cycle_secs)?;

        if !self.gravity.is_finite() || !self.jump_impulse.is_finite() {
            return Err(ConfigError::Invalid {
                field: "gravity",
                reason: "gravity and jump_impulse must be finite".to_string(),
            });
        }

        let inset = self.collision_inset;
        if !(0.0..self.pipe_size.x.min(self.pipe_size.y)).contains(&inset) {
            return Err(ConfigError::Invalid {
                field: "collision_inset",
                reason: format!("must be in [0, {}), got {inset}", self.pipe_size.min_element()),
            });
        }

        Ok(())
    }

    /// Gravity in frame units/s²
    #[inline]
    pub fn gravity_vec(&self) -> Vec2 {
        Vec2::new(0.0, self.gravity * self.physics_scale)
    }

    /// Highest the avatar's center may go before it is held at the top edge
    #[inline]
    pub fn ceiling_y(&self) -> f32 {
        self.frame.height - self.avatar_radius()
    }

    /// Vertical opening between the two pipes of a pair
    #[inline]
    pub fn gap_height(&self) -> f32 {
        self.avatar_size.y * self.gap_factor
    }

    /// Avatar collision circle radius
    #[inline]
    pub fn avatar_radius(&self) -> f32 {
        self.avatar_size.y / 2.0
    }

    /// Where the avatar starts each run
    #[inline]
    pub fn spawn_pose(&self) -> Vec2 {
        Vec2::new(self.frame.mid_x(), self.frame.mid_y())
    }

    /// Seconds a pair needs to travel `scroll_distance` frame widths
    #[inline]
    pub fn crossing_duration(&self) -> f32 {
        self.frame.width / self.crossing_rate
    }

    /// Horizontal obstacle velocity (negative, leftward)
    #[inline]
    pub fn obstacle_speed(&self) -> f32 {
        -self.scroll_distance * self.frame.width / self.crossing_duration()
    }

    /// X coordinate where new pairs appear
    #[inline]
    pub fn spawn_x(&self) -> f32 {
        self.frame.mid_x() + self.frame.width
    }

    /// Pairs left of this X coordinate are removed
    #[inline]
    pub fn despawn_x(&self) -> f32 {
        -self.frame.width
    }

    /// Half-width of the vertical offset range; offsets lie in `[-q, q)`
    #[inline]
    pub fn offset_range(&self) -> f32 {
        self.frame.height / 4.0
    }

    /// Pipe collision box size (sprite shrunk by the inset)
    #[inline]
    pub fn pipe_collision_size(&self) -> Vec2 {
        self.pipe_size - Vec2::splat(self.collision_inset)
    }
}
