//! Audio cue boundary
//!
//! The simulation never plays sound itself. It reports flaps, scores and hits,
//! and the driver forwards them to whatever [`AudioCue`] the platform layer
//! installed. Background music is started once when a collaborator is
//! installed and keeps looping across restarts until `stop`. Cue failures are
//! logged and dropped here; they never reach simulation state.

use crate::sim::GameEvent;

/// Sound cue kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Avatar flapped
    Flap,
    /// Gap cleared
    Score,
    /// Avatar crashed
    Hit,
    /// Looping background track
    Music,
}

impl Cue {
    /// The cue a simulation event should trigger, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Flapped => Some(Cue::Flap),
            GameEvent::Scored { .. } => Some(Cue::Score),
            GameEvent::Hit { .. } => Some(Cue::Hit),
            _ => None,
        }
    }

    /// Playback volume for this cue
    pub fn volume(self) -> f32 {
        match self {
            Cue::Flap | Cue::Score | Cue::Hit => 0.99,
            Cue::Music => 0.33,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CueError {
    #[error("audio output unavailable")]
    Unavailable,

    #[error("failed to play {cue:?}: {reason}")]
    Playback { cue: Cue, reason: String },
}

/// Fire-and-forget sound notifications from the simulation
pub trait AudioCue {
    fn on_flap(&mut self) -> Result<(), CueError>;

    /// Optional; many platforms stay silent on score
    fn on_score(&mut self) -> Result<(), CueError> {
        Ok(())
    }

    fn on_hit(&mut self) -> Result<(), CueError>;

    /// Start the looping music track; calls while it is playing do nothing
    fn start_music(&mut self) -> Result<(), CueError> {
        Ok(())
    }

    /// Release players before the collaborator is replaced or dropped
    fn stop(&mut self) {}
}

/// Dispatch one cue, swallowing any failure
pub fn play(cues: &mut dyn AudioCue, cue: Cue) {
    let result = match cue {
        Cue::Flap => cues.on_flap(),
        Cue::Score => cues.on_score(),
        Cue::Hit => cues.on_hit(),
        Cue::Music => cues.start_music(),
    };
    if let Err(e) = result {
        log::warn!("Audio cue dropped: {e}");
    }
}

/// Forward every cue-worthy event
pub fn play_events(cues: &mut dyn AudioCue, events: &[GameEvent]) {
    for cue in events.iter().filter_map(Cue::for_event) {
        play(cues, cue);
    }
}

/// Collaborator that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCues;

impl AudioCue for SilentCues {
    fn on_flap(&mut self) -> Result<(), CueError> {
        Ok(())
    }

    fn on_hit(&mut self) -> Result<(), CueError> {
        Ok(())
    }
}

/// Collaborator that logs cues instead of playing them (headless runs)
#[derive(Debug, Default)]
pub struct LogCues {
    muted: bool,
    music_playing: bool,
    played: u32,
}

impl LogCues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Effect cues emitted so far (muted cues are not counted)
    pub fn played(&self) -> u32 {
        self.played
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    fn emit(&mut self, cue: Cue) -> Result<(), CueError> {
        if self.muted {
            return Ok(());
        }
        self.played += 1;
        log::info!("cue {:?} @ {:.2}", cue, cue.volume());
        Ok(())
    }
}

impl AudioCue for LogCues {
    fn on_flap(&mut self) -> Result<(), CueError> {
        self.emit(Cue::Flap)
    }

    fn on_score(&mut self) -> Result<(), CueError> {
        self.emit(Cue::Score)
    }

    fn on_hit(&mut self) -> Result<(), CueError> {
        self.emit(Cue::Hit)
    }

    fn start_music(&mut self) -> Result<(), CueError> {
        if !self.music_playing {
            self.music_playing = true;
            log::info!("music loop @ {:.2}", Cue::Music.volume());
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.music_playing = false;
        log::debug!("Log cues stopped after {} cues", self.played);
    }
}
