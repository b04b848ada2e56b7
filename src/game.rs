//! Simulation owner
//!
//! [`GameSimulation`] holds one run's state together with everything the pure
//! tick function needs from the outside: the seeded RNG, the latched tap, the
//! audio collaborator and the fixed-step accumulator. Platform code talks to
//! this type only.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{self, AudioCue, Cue, SilentCues};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{self, GameEvent, GamePhase, GameState, Snapshot, TickInput};
use crate::tuning::SimConfig;

pub struct GameSimulation {
    state: GameState,
    rng: Pcg32,
    seed: u64,
    audio: Box<dyn AudioCue>,
    /// One-shot input for the next tick
    input: TickInput,
    accumulator: f32,
}

impl GameSimulation {
    /// Create a simulation and start the first run
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let mut game = Self {
            state: GameState::new(config),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            audio: Box::new(SilentCues),
            input: TickInput::default(),
            accumulator: 0.0,
        };
        game.start();
        game
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioCue>) -> Self {
        self.set_audio(audio);
        self
    }

    /// Swap the audio collaborator, stopping the old one first
    ///
    /// The new collaborator starts its music here; restarts leave it running.
    pub fn set_audio(&mut self, audio: Box<dyn AudioCue>) {
        let mut old = std::mem::replace(&mut self.audio, audio);
        old.stop();
        audio::play(self.audio.as_mut(), Cue::Music);
    }

    /// Let the autopilot tap on every tick
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Reset to the initial playing conditions
    pub fn start(&mut self) {
        self.state.start();
        self.accumulator = 0.0;
        self.drain();
    }

    /// Rebuild the run from scratch
    pub fn restart(&mut self) {
        sim::restart(&mut self.state);
        self.accumulator = 0.0;
        self.drain();
    }

    /// Latch a tap for the next tick; extra taps before it are merged
    pub fn on_tap(&mut self) {
        if self.input.tap {
            log::trace!("Tap already pending, ignoring");
        }
        self.input.tap = true;
    }

    /// Advance one step of `dt` seconds and return the events it produced
    pub fn tick(&mut self, dt: f32) -> Vec<GameEvent> {
        sim::tick(&mut self.state, &self.input, dt, &mut self.rng);
        self.input.tap = false;
        self.drain()
    }

    /// Feed a variable frame delta through fixed `SIM_DT` steps
    ///
    /// Returns the number of steps taken.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    fn drain(&mut self) -> Vec<GameEvent> {
        let events = self.state.drain_events();
        audio::play_events(self.audio.as_mut(), &events);
        events
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for tools and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

impl Drop for GameSimulation {
    fn drop(&mut self) {
        self.audio.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CueError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorded {
        flaps: u32,
        scores: u32,
        hits: u32,
        music_starts: u32,
        stopped: bool,
    }

    /// Records cues through a shared handle; can be told to fail every call
    struct Recorder {
        log: Rc<RefCell<Recorded>>,
        fail: bool,
    }

    impl Recorder {
        fn new(fail: bool) -> (Self, Rc<RefCell<Recorded>>) {
            let log = Rc::new(RefCell::new(Recorded::default()));
            (
                Self {
                    log: log.clone(),
                    fail,
                },
                log,
            )
        }

        fn result(&self) -> Result<(), CueError> {
            if self.fail {
                Err(CueError::Unavailable)
            } else {
                Ok(())
            }
        }
    }

    impl AudioCue for Recorder {
        fn on_flap(&mut self) -> Result<(), CueError> {
            self.log.borrow_mut().flaps += 1;
            self.result()
        }

        fn on_score(&mut self) -> Result<(), CueError> {
            self.log.borrow_mut().scores += 1;
            self.result()
        }

        fn on_hit(&mut self) -> Result<(), CueError> {
            self.log.borrow_mut().hits += 1;
            self.result()
        }

        fn start_music(&mut self) -> Result<(), CueError> {
            self.log.borrow_mut().music_starts += 1;
            self.result()
        }

        fn stop(&mut self) {
            self.log.borrow_mut().stopped = true;
        }
    }

    const DT: f32 = 1.0 / 64.0;

    #[test]
    fn test_new_starts_playing() {
        let game = GameSimulation::new(SimConfig::default(), 1);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.score(), 0);
        assert!(game.snapshot().obstacles.is_empty());
    }

    #[test]
    fn test_taps_merge_into_one_per_tick() {
        let (recorder, log) = Recorder::new(false);
        let mut game =
            GameSimulation::new(SimConfig::default(), 1).with_audio(Box::new(recorder));

        game.on_tap();
        game.on_tap();
        game.on_tap();
        let events = game.tick(DT);
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::Flapped).count(),
            1
        );
        assert_eq!(log.borrow().flaps, 1);

        // Latch cleared after the tick
        let events = game.tick(DT);
        assert!(!events.contains(&GameEvent::Flapped));
    }

    #[test]
    fn test_failing_audio_never_affects_state() {
        let config = SimConfig::default();
        let (quiet, _) = Recorder::new(false);
        let (broken, broken_log) = Recorder::new(true);
        let mut good = GameSimulation::new(config.clone(), 77).with_audio(Box::new(quiet));
        let mut bad = GameSimulation::new(config, 77).with_audio(Box::new(broken));

        for i in 0..400 {
            if i % 40 == 0 {
                good.on_tap();
                bad.on_tap();
            }
            good.tick(DT);
            bad.tick(DT);
        }

        assert!(broken_log.borrow().flaps > 0);
        assert_eq!(broken_log.borrow().music_starts, 1);
        assert_eq!(good.snapshot(), bad.snapshot());
    }

    #[test]
    fn test_hit_cue_and_restart() {
        let (recorder, log) = Recorder::new(false);
        let mut game = GameSimulation::new(SimConfig::default(), 3).with_audio(Box::new(recorder));

        for _ in 0..(3.0 / DT) as u32 {
            game.tick(DT);
        }
        assert_eq!(game.phase(), GamePhase::Ended);
        assert_eq!(log.borrow().hits, 1);
        assert!(game.snapshot().avatar.frozen);

        game.on_tap();
        let events = game.tick(DT);
        assert_eq!(events.first(), Some(&GameEvent::Started));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.score(), 0);
        // Restart is not a flap
        assert_eq!(log.borrow().flaps, 0);
    }

    #[test]
    fn test_set_audio_stops_previous() {
        let (first, first_log) = Recorder::new(false);
        let (second, second_log) = Recorder::new(false);
        let mut game = GameSimulation::new(SimConfig::default(), 1).with_audio(Box::new(first));
        game.set_audio(Box::new(second));
        assert!(first_log.borrow().stopped);
        assert!(!second_log.borrow().stopped);

        assert_eq!(first_log.borrow().music_starts, 1);
        assert_eq!(second_log.borrow().music_starts, 1);

        drop(game);
        assert!(second_log.borrow().stopped);
    }

    #[test]
    fn test_music_survives_restarts() {
        let (recorder, log) = Recorder::new(false);
        let mut game =
            GameSimulation::new(SimConfig::default(), 8).with_audio(Box::new(recorder));
        assert_eq!(log.borrow().music_starts, 1);

        // Crash on the ground, then tap to restart, twice
        for _ in 0..2 {
            while game.phase() == GamePhase::Playing {
                game.tick(DT);
            }
            game.on_tap();
            game.tick(DT);
            assert_eq!(game.phase(), GamePhase::Playing);
        }
        game.restart();
        game.start();

        assert_eq!(log.borrow().hits, 2);
        assert_eq!(log.borrow().music_starts, 1);
        assert!(!log.borrow().stopped);
    }

    #[test]
    fn test_advance_uses_fixed_steps() {
        let mut game = GameSimulation::new(SimConfig::default(), 1);
        assert_eq!(game.advance(SIM_DT * 0.5), 0);
        assert_eq!(game.advance(SIM_DT * 0.6), 1);
        // Huge frame deltas are clamped and capped
        let steps = game.advance(5.0);
        assert!(steps <= MAX_SUBSTEPS);
        assert_eq!(game.state().time_ticks, 1 + steps as u64);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = GameSimulation::new(SimConfig::default(), 2024);
        let mut b = GameSimulation::new(SimConfig::default(), 2024);
        a.set_autopilot(true);
        b.set_autopilot(true);
        for _ in 0..900 {
            a.advance(1.0 / 60.0);
            b.advance(1.0 / 60.0);
        }
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.seed(), 2024);
    }

    #[test]
    fn test_start_from_any_phase() {
        let mut game = GameSimulation::new(SimConfig::default(), 5);
        let fresh = game.snapshot();
        for _ in 0..(3.0 / DT) as u32 {
            game.tick(DT);
        }
        assert_eq!(game.phase(), GamePhase::Ended);

        game.start();
        let again = game.snapshot();
        assert_eq!(again.phase, fresh.phase);
        assert_eq!(again.score, fresh.score);
        assert_eq!(again.avatar, fresh.avatar);
        assert_eq!(again.obstacles, fresh.obstacles);
    }
}
