//! Obstacle pair generation
//!
//! A pair is two pipes with a gap between them plus a sensor filling the gap.
//! Spawning is a time gate checked every tick, never a scheduled callback.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, Category, Shape};
use super::state::{EntityIds, GamePhase};
use crate::tuning::SimConfig;

/// Slack for f32 clock drift so a spawn is not pushed back by a whole tick
const TIMER_SLACK: f64 = 1e-4;

/// Two pipes and the scoring sensor between them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub id: u32,
    pub top: Body,
    pub bottom: Body,
    pub sensor: Body,
    pub spawn_x: f32,
    pub vertical_offset: f32,
    pub gap_height: f32,
    /// Sprite size of each pipe (the collision boxes are smaller)
    pub pipe_size: Vec2,
    /// Set once the sensor has awarded its point
    pub consumed: bool,
}

impl ObstaclePair {
    /// Build a pair at `x` with its gap centered at `gap_center_y`
    pub fn new(
        id: u32,
        body_ids: [u32; 3],
        x: f32,
        gap_center_y: f32,
        vertical_offset: f32,
        config: &SimConfig,
    ) -> Self {
        let gap_height = config.gap_height();
        let pipe_size = config.pipe_size;
        let half_pipe = pipe_size.y / 2.0;
        let gap_top = gap_center_y + gap_height / 2.0;
        let gap_bottom = gap_center_y - gap_height / 2.0;
        let pipe_shape = Shape::rect(config.pipe_collision_size());
        let velocity = Vec2::new(config.obstacle_speed(), 0.0);

        let mut top = Body::new_static(
            body_ids[0],
            Vec2::new(x, gap_top + half_pipe),
            pipe_shape,
            Category::Obstacle,
        );
        let mut bottom = Body::new_static(
            body_ids[1],
            Vec2::new(x, gap_bottom - half_pipe),
            pipe_shape,
            Category::Obstacle,
        );
        let mut sensor = Body::new_static(
            body_ids[2],
            Vec2::new(x, gap_center_y),
            Shape::rect(Vec2::new(pipe_size.x, gap_height)),
            Category::GapSensor,
        );
        top.vel = velocity;
        bottom.vel = velocity;
        sensor.vel = velocity;

        Self {
            id,
            top,
            bottom,
            sensor,
            spawn_x: x,
            vertical_offset,
            gap_height,
            pipe_size,
            consumed: false,
        }
    }

    /// Current horizontal position shared by all three bodies
    #[inline]
    pub fn x(&self) -> f32 {
        self.sensor.pos.x
    }

    /// Lower edge of the top pipe sprite
    #[inline]
    pub fn top_pipe_bottom(&self) -> f32 {
        self.top.pos.y - self.pipe_size.y / 2.0
    }

    /// Upper edge of the bottom pipe sprite
    #[inline]
    pub fn bottom_pipe_top(&self) -> f32 {
        self.bottom.pos.y + self.pipe_size.y / 2.0
    }

    /// Vertical center of the gap
    #[inline]
    pub fn gap_center(&self) -> f32 {
        self.sensor.pos.y
    }

    pub fn bodies(&self) -> [&Body; 3] {
        [&self.top, &self.bottom, &self.sensor]
    }

    pub fn contains_body(&self, id: u32) -> bool {
        self.top.id == id || self.bottom.id == id || self.sensor.id == id
    }

    /// Scroll all three bodies together
    pub fn advance(&mut self, dt: f32) {
        self.top.advance_kinematic(dt);
        self.bottom.advance_kinematic(dt);
        self.sensor.advance_kinematic(dt);
    }

    /// Mark the sensor as scored. Returns true only the first time.
    pub fn consume_sensor(&mut self) -> bool {
        !std::mem::replace(&mut self.consumed, true)
    }

    #[inline]
    pub fn is_offscreen(&self, despawn_x: f32) -> bool {
        self.x() < despawn_x
    }
}

/// Time-gated pair generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSpawner {
    /// Seconds between spawns
    pub interval: f32,
    /// Clock value of the last spawn (or of the last reset)
    pub last_spawn: f64,
}

impl ObstacleSpawner {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            last_spawn: 0.0,
        }
    }

    /// Restart the interval from `now`
    pub fn reset(&mut self, now: f64) {
        self.last_spawn = now;
    }

    /// True when the gate would fire at `now`
    pub fn is_due(&self, now: f64) -> bool {
        now - self.last_spawn + TIMER_SLACK >= self.interval as f64
    }

    /// Spawn a pair if playing and the interval has elapsed
    pub fn try_spawn<R: Rng>(
        &mut self,
        now: f64,
        phase: GamePhase,
        config: &SimConfig,
        ids: &mut EntityIds,
        rng: &mut R,
    ) -> Option<ObstaclePair> {
        if phase != GamePhase::Playing || !self.is_due(now) {
            return None;
        }
        self.last_spawn = now;

        let q = config.offset_range();
        let vertical_offset = rng.random_range(-q..q);
        let pair_id = ids.allocate();
        let body_ids = [ids.allocate(), ids.allocate(), ids.allocate()];
        let pair = ObstaclePair::new(
            pair_id,
            body_ids,
            config.spawn_x(),
            config.frame.mid_y() + vertical_offset,
            vertical_offset,
            config,
        );

        log::debug!(
            "Spawned pair {} at t={:.3}s, offset {:.1}",
            pair.id,
            now,
            vertical_offset
        );
        Some(pair)
    }
}
