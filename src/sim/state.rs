//! Game state and core simulation types
//!
//! Everything a run needs to advance deterministically lives here. Renderers
//! read it through [`Snapshot`]; they never touch the bodies directly.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::backdrop::Backdrop;
use super::body::{Body, Category, Shape};
use super::spawner::{ObstaclePair, ObstacleSpawner};
use crate::tuning::SimConfig;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Built but not started
    Ready,
    /// Active gameplay
    Playing,
    /// Avatar hit something; waiting for a tap to restart
    Ended,
}

/// Things that happened during a tick, drained by the driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Flapped,
    Scored { score: u32 },
    Hit { by: Category },
    ObstacleSpawned { pair_id: u32, vertical_offset: f32 },
    ObstacleDespawned { pair_id: u32 },
}

/// Monotonic entity id source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: SimConfig,
    pub phase: GamePhase,
    pub score: u32,
    /// The one and only avatar
    pub avatar: Body,
    /// Floor slab whose top face is the bottom edge of the frame
    pub ground: Body,
    /// Live obstacle pairs (sorted by id)
    pub pairs: Vec<ObstaclePair>,
    pub spawner: ObstacleSpawner,
    /// Cosmetic, keeps scrolling in every phase
    pub backdrop: Backdrop,
    /// Seconds since the run started
    pub elapsed: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events produced since the driver last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    ids: EntityIds,
}

impl GameState {
    /// Build a fresh state in the `Ready` phase
    pub fn new(config: SimConfig) -> Self {
        let mut ids = EntityIds::default();
        let frame = config.frame;

        let avatar = Body::new_dynamic(
            ids.allocate(),
            config.spawn_pose(),
            Shape::Circle {
                radius: config.avatar_radius(),
            },
            Category::Avatar,
        );
        // Top face on y = 0, one frame deep
        let ground = Body::new_static(
            ids.allocate(),
            Vec2::new(frame.mid_x(), -frame.mid_y()),
            Shape::rect(Vec2::new(frame.width, frame.height)),
            Category::Ground,
        );

        Self {
            phase: GamePhase::Ready,
            score: 0,
            avatar,
            ground,
            pairs: Vec::new(),
            spawner: ObstacleSpawner::new(config.spawn_interval),
            backdrop: Backdrop::new(config.backdrop_tile_width, config.backdrop_cycle_secs),
            elapsed: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            ids,
            config,
        }
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.allocate()
    }

    /// Put the run into its initial playing conditions
    ///
    /// Safe to call from any phase; the result is the same each time.
    pub fn start(&mut self) {
        self.score = 0;
        self.avatar.pos = self.config.spawn_pose();
        self.avatar.vel = Vec2::ZERO;
        self.avatar.unfreeze();
        self.pairs.clear();
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.spawner.reset(self.elapsed);
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Started);
        log::info!("Run started");
    }

    /// Playing -> Ended after a fatal contact
    pub fn end(&mut self, by: Category) {
        debug_assert_eq!(self.phase, GamePhase::Playing);
        self.phase = GamePhase::Ended;
        self.avatar.freeze();
        self.events.push(GameEvent::Hit { by });
        log::info!(
            "Run ended by {:?} contact after {:.2}s, score {}",
            by,
            self.elapsed,
            self.score
        );
    }

    /// Keep the avatar inside the top edge of the frame
    pub fn hold_below_ceiling(&mut self) {
        let ceiling = self.config.ceiling_y();
        if self.avatar.pos.y > ceiling {
            self.avatar.pos.y = ceiling;
            self.avatar.vel.y = self.avatar.vel.y.min(0.0);
        }
    }

    /// Run the spawn gate; registers and returns the new pair's id if it fired
    pub fn try_spawn<R: Rng>(&mut self, rng: &mut R) -> Option<u32> {
        let pair = self.spawner.try_spawn(
            self.elapsed,
            self.phase,
            &self.config,
            &mut self.ids,
            rng,
        )?;
        let pair_id = pair.id;
        self.events.push(GameEvent::ObstacleSpawned {
            pair_id,
            vertical_offset: pair.vertical_offset,
        });
        self.pairs.push(pair);
        Some(pair_id)
    }

    /// All live bodies: avatar, ground, then pair bodies
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        std::iter::once(&self.avatar)
            .chain(std::iter::once(&self.ground))
            .chain(self.pairs.iter().flat_map(|p| p.bodies()))
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.bodies().find(|b| b.id == id)
    }

    /// Index of the pair owning body `id`
    pub fn pair_index_of(&self, id: u32) -> Option<usize> {
        self.pairs.iter().position(|p| p.contains_body(id))
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            avatar: AvatarPose {
                pos: self.avatar.pos,
                vel: self.avatar.vel,
                radius: self.config.avatar_radius(),
                frozen: self.avatar.is_static,
            },
            obstacles: self
                .pairs
                .iter()
                .map(|p| ObstaclePose {
                    pair_id: p.id,
                    top: RectPose {
                        center: p.top.pos,
                        size: p.pipe_size,
                    },
                    bottom: RectPose {
                        center: p.bottom.pos,
                        size: p.pipe_size,
                    },
                    gap_center: Vec2::new(p.x(), p.gap_center()),
                    scored: p.consumed,
                })
                .collect(),
            backdrop_offset: self.backdrop.offset,
        }
    }
}

/// Sprite placement for a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPose {
    pub center: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvatarPose {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Frozen after a hit (renderers swap in the crashed sprite)
    pub frozen: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePose {
    pub pair_id: u32,
    pub top: RectPose,
    pub bottom: RectPose,
    pub gap_center: Vec2,
    pub scored: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub avatar: AvatarPose,
    pub obstacles: Vec<ObstaclePose>,
    pub backdrop_offset: f32,
}

impl Snapshot {
    /// Pretty-printed JSON for tools and headless runs
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
