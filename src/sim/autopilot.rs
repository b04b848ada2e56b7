//! Idle/demo mode player
//!
//! Aims for the center of the next gap ahead of the avatar and taps whenever
//! the avatar is falling below that line.

use super::state::GameState;

/// How far below the target line the avatar may sink before tapping
const TAP_MARGIN: f32 = 10.0;

/// Height the autopilot is steering toward
pub fn target_height(state: &GameState) -> f32 {
    let avatar = &state.avatar;
    let reach = state.config.pipe_size.x / 2.0 + state.config.avatar_radius();

    state
        .pairs
        .iter()
        .filter(|p| p.x() + reach >= avatar.pos.x)
        .min_by(|a, b| a.x().total_cmp(&b.x()))
        .map(|p| p.gap_center())
        .unwrap_or(state.config.frame.mid_y())
}

/// Whether the autopilot would tap this tick
pub fn wants_tap(state: &GameState) -> bool {
    let avatar = &state.avatar;
    avatar.vel.y <= 0.0 && avatar.pos.y < target_height(state) - TAP_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawner::ObstaclePair;
    use crate::tuning::SimConfig;

    fn state_with_pair(x: f32, gap_y: f32) -> GameState {
        let mut state = GameState::new(SimConfig::default());
        state.start();
        let id = state.next_entity_id();
        let ids = [
            state.next_entity_id(),
            state.next_entity_id(),
            state.next_entity_id(),
        ];
        let offset = gap_y - state.config.frame.mid_y();
        let pair = ObstaclePair::new(id, ids, x, gap_y, offset, &state.config);
        state.pairs.push(pair);
        state
    }

    #[test]
    fn test_targets_mid_screen_without_pairs() {
        let mut state = GameState::new(SimConfig::default());
        state.start();
        assert_eq!(target_height(&state), state.config.frame.mid_y());
    }

    #[test]
    fn test_targets_next_gap_ahead() {
        let state = state_with_pair(350.0, 420.0);
        assert_eq!(target_height(&state), 420.0);
    }

    #[test]
    fn test_ignores_pairs_behind() {
        let state = state_with_pair(-100.0, 420.0);
        assert_eq!(target_height(&state), state.config.frame.mid_y());
    }

    #[test]
    fn test_taps_only_when_low_and_falling() {
        let mut state = state_with_pair(350.0, 420.0);
        state.avatar.vel.y = -10.0;
        assert!(wants_tap(&state));

        state.avatar.vel.y = 50.0;
        assert!(!wants_tap(&state));

        state.avatar.vel.y = -10.0;
        state.avatar.pos.y = 430.0;
        assert!(!wants_tap(&state));
    }
}
