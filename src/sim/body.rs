//! Minimal rigid bodies
//!
//! Unit-mass bodies with a circle or axis-aligned rectangle shape. Dynamic
//! bodies fall under gravity; static bodies ignore gravity but may carry a
//! scripted velocity (scrolling obstacles).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What a body is, for contact filtering and resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// The player-controlled body
    Avatar,
    /// Solid pipe; touching it ends the run
    Obstacle,
    /// Non-solid zone between two pipes; entering it scores
    GapSensor,
    /// Floor slab below the bottom edge of the frame
    Ground,
}

impl Category {
    #[inline]
    pub const fn bit(self) -> u32 {
        match self {
            Category::Avatar => 1 << 0,
            Category::Obstacle => 1 << 1,
            Category::GapSensor => 1 << 2,
            Category::Ground => 1 << 3,
        }
    }

    /// Categories this one wants contact events with
    #[inline]
    pub const fn contact_mask(self) -> u32 {
        match self {
            Category::Avatar => {
                Category::Obstacle.bit() | Category::GapSensor.bit() | Category::Ground.bit()
            }
            Category::Obstacle | Category::GapSensor | Category::Ground => Category::Avatar.bit(),
        }
    }

    /// True if a contact between the two categories should be reported
    #[inline]
    pub const fn tests_against(self, other: Category) -> bool {
        self.contact_mask() & other.bit() != 0 && other.contact_mask() & self.bit() != 0
    }

    /// Contact with this category ends the run
    #[inline]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Category::Obstacle | Category::Ground)
    }
}

/// Collision shape, centered on the body position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

impl Shape {
    pub fn rect(size: Vec2) -> Self {
        Shape::Rect {
            half_extents: size / 2.0,
        }
    }

    /// Half size of the axis-aligned bounding box
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Rect { half_extents } => half_extents,
        }
    }
}

/// A body in the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
    pub category: Category,
    /// Static bodies are not integrated under gravity
    pub is_static: bool,
}

impl Body {
    pub fn new_dynamic(id: u32, pos: Vec2, shape: Shape, category: Category) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            shape,
            category,
            is_static: false,
        }
    }

    pub fn new_static(id: u32, pos: Vec2, shape: Shape, category: Category) -> Self {
        Self {
            is_static: true,
            ..Self::new_dynamic(id, pos, shape, category)
        }
    }

    /// Semi-implicit Euler step: velocity first, then position
    pub fn integrate(&mut self, gravity: Vec2, dt: f32) {
        if self.is_static {
            return;
        }
        self.vel += gravity * dt;
        self.pos += self.vel * dt;
    }

    /// Instantaneous velocity change (unit mass)
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse;
    }

    /// Move a static body along its scripted velocity
    pub fn advance_kinematic(&mut self, dt: f32) {
        if self.is_static {
            self.pos += self.vel * dt;
        }
    }

    /// Stop all motion and take the body out of the dynamics step
    pub fn freeze(&mut self) {
        self.is_static = true;
        self.vel = Vec2::ZERO;
    }

    /// Put a frozen body back under gravity
    pub fn unfreeze(&mut self) {
        self.is_static = false;
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos - self.shape.half_extents()
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.shape.half_extents()
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.max().y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min().y
    }
}
