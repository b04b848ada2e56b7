//! Contact detection between tagged bodies
//!
//! Brute-force pair testing over the live body set. The set stays small (one
//! avatar, a ground slab and a handful of obstacle pairs), so no broad phase
//! is used. Contacts come back as a plain sorted list for the caller to
//! resolve; nothing here mutates bodies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Shape};

/// Two bodies overlapping during one tick. `a < b` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContactEvent {
    pub a: u32,
    pub b: u32,
}

impl ContactEvent {
    pub fn new(x: u32, y: u32) -> Self {
        Self {
            a: x.min(y),
            b: x.max(y),
        }
    }

    /// The id paired with `id` in this contact, if `id` is part of it
    pub fn other(&self, id: u32) -> Option<u32> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Circle vs axis-aligned rectangle
///
/// Clamps the circle center onto the rectangle to find the closest point.
/// Touching exactly at the edge is not an overlap.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_center: Vec2, half: Vec2) -> bool {
    let closest = center.clamp(rect_center - half, rect_center + half);
    center.distance_squared(closest) < radius * radius
}

/// Axis-aligned rectangle vs rectangle
pub fn rect_rect_overlap(a_center: Vec2, a_half: Vec2, b_center: Vec2, b_half: Vec2) -> bool {
    let d = (a_center - b_center).abs();
    let reach = a_half + b_half;
    d.x < reach.x && d.y < reach.y
}

/// Circle vs circle
pub fn circle_circle_overlap(a_center: Vec2, a_radius: f32, b_center: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_center.distance_squared(b_center) < reach * reach
}

/// Narrow phase: do the two body shapes intersect?
pub fn overlaps(a: &Body, b: &Body) -> bool {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle_overlap(a.pos, ra, b.pos, rb)
        }
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            circle_rect_overlap(a.pos, radius, b.pos, half_extents)
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            circle_rect_overlap(b.pos, radius, a.pos, half_extents)
        }
        (Shape::Rect { half_extents: ha }, Shape::Rect { half_extents: hb }) => {
            rect_rect_overlap(a.pos, ha, b.pos, hb)
        }
    }
}

/// Whether a pair is eligible for testing at all
#[inline]
fn should_test(a: &Body, b: &Body) -> bool {
    !(a.is_static && b.is_static) && a.category.tests_against(b.category)
}

/// Report every overlapping, mask-accepted pair once
///
/// Overlaps that persist across ticks are reported again on every call.
/// The result is sorted by `(a, b)` so resolution order is deterministic.
pub fn detect_contacts<'a>(bodies: impl IntoIterator<Item = &'a Body>) -> Vec<ContactEvent> {
    let bodies: Vec<&Body> = bodies.into_iter().collect();
    let mut contacts = Vec::new();

    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            if should_test(a, b) && overlaps(a, b) {
                contacts.push(ContactEvent::new(a.id, b.id));
            }
        }
    }

    contacts.sort_unstable();
    contacts.dedup();
    contacts
}
