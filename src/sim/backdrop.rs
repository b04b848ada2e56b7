//! Scrolling background
//!
//! Purely cosmetic: a strip of identical tiles that slides left one tile
//! width per cycle and wraps. Nothing in gameplay reads it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backdrop {
    /// Horizontal shift of the first tile, in `(-tile_width, 0]`
    pub offset: f32,
    pub tile_width: f32,
    pub cycle_secs: f32,
}

impl Backdrop {
    pub fn new(tile_width: f32, cycle_secs: f32) -> Self {
        Self {
            offset: 0.0,
            tile_width,
            cycle_secs,
        }
    }

    pub fn scroll(&mut self, dt: f32) {
        let speed = self.tile_width / self.cycle_secs;
        self.offset -= speed * dt;
        // rem_euclid keeps large dt values wrapped too
        self.offset = -((-self.offset).rem_euclid(self.tile_width));
    }

    /// Left edge of each of the first `count` tiles
    pub fn tile_positions(&self, count: usize) -> Vec<f32> {
        (0..count)
            .map(|i| self.offset + self.tile_width * i as f32)
            .collect()
    }
}
