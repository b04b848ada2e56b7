//! Simulation tick
//!
//! Core game loop that advances the simulation deterministically.
//! Order within a playing tick: input, integrate, contacts, resolve, spawn,
//! collect.

use glam::Vec2;
use rand::Rng;

use super::autopilot;
use super::body::Category;
use super::collision::{ContactEvent, detect_contacts};
use super::state::{GameEvent, GamePhase, GameState};

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap (flap while playing, restart after a crash)
    pub tap: bool,
    /// Idle/demo mode - the autopilot taps for the player
    pub autopilot: bool,
}

/// Advance the game state by one step of `dt` seconds
pub fn tick<R: Rng>(state: &mut GameState, input: &TickInput, dt: f32, rng: &mut R) {
    debug_assert!(dt.is_finite() && dt >= 0.0, "bad tick dt {dt}");

    let tap = input.tap
        || (input.autopilot
            && state.phase == GamePhase::Playing
            && autopilot::wants_tap(state));
    if tap {
        handle_tap(state);
    }

    state.backdrop.scroll(dt);

    match state.phase {
        GamePhase::Ready => {}

        GamePhase::Playing => {
            state.time_ticks += 1;
            state.elapsed += dt as f64;

            let gravity = state.config.gravity_vec();
            state.avatar.integrate(gravity, dt);
            state.hold_below_ceiling();
            for pair in &mut state.pairs {
                pair.advance(dt);
            }

            let contacts = detect_contacts(state.bodies());
            resolve_contacts(state, &contacts);

            state.try_spawn(rng);
            collect_offscreen(state);
        }

        GamePhase::Ended => {
            // Pipes already on screen finish scrolling away
            for pair in &mut state.pairs {
                pair.advance(dt);
            }
            collect_offscreen(state);
        }
    }

    debug_assert!(
        state.pairs.is_sorted_by_key(|p| p.id),
        "pairs out of spawn order"
    );
}

/// Apply one tap according to the current phase
pub fn handle_tap(state: &mut GameState) {
    match state.phase {
        GamePhase::Ready => state.start(),
        GamePhase::Playing => flap(state),
        GamePhase::Ended => restart(state),
    }
}

/// Reset the avatar's velocity, then kick it upward
///
/// Resetting first keeps repeated taps from stacking into runaway speed.
pub fn flap(state: &mut GameState) {
    let impulse = Vec2::new(0.0, state.config.jump_impulse);
    state.avatar.vel = Vec2::ZERO;
    state.avatar.apply_impulse(impulse);
    state.events.push(GameEvent::Flapped);
}

/// Throw the run away and start a new one from the same config
pub fn restart(state: &mut GameState) {
    let config = state.config.clone();
    log::info!("Restarting after scoring {}", state.score);
    *state = GameState::new(config);
    state.start();
}

/// Turn contact events into score and end-of-run transitions
fn resolve_contacts(state: &mut GameState, contacts: &[ContactEvent]) {
    let avatar_id = state.avatar.id;

    for contact in contacts {
        // Anything after the fatal contact no longer counts
        if state.phase != GamePhase::Playing {
            break;
        }
        let Some(other) = contact.other(avatar_id) else {
            continue;
        };
        let Some(category) = state.body(other).map(|b| b.category) else {
            continue;
        };

        match category {
            Category::GapSensor => {
                let Some(index) = state.pair_index_of(other) else {
                    continue;
                };
                if state.pairs[index].consume_sensor() {
                    state.score += 1;
                    state.events.push(GameEvent::Scored { score: state.score });
                    log::debug!("Cleared pair {}, score {}", state.pairs[index].id, state.score);
                }
            }
            fatal if fatal.is_fatal() => state.end(fatal),
            _ => {}
        }
    }
}

/// Remove pairs that have scrolled past the left boundary
fn collect_offscreen(state: &mut GameState) {
    let despawn_x = state.config.despawn_x();
    let events = &mut state.events;
    state.pairs.retain(|pair| {
        if pair.is_offscreen(despawn_x) {
            log::debug!("Despawned pair {}", pair.id);
            events.push(GameEvent::ObstacleDespawned { pair_id: pair.id });
            false
        } else {
            true
        }
    });
}
