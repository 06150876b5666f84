//! Audio collaborator interface
//!
//! The core triggers cues by name and never touches a sound device. Sinks
//! are fire-and-forget: a cue that fails to play is cosmetic, never fatal.

use crate::sim::{AlienTier, GameEvent};

/// Sound cues the simulation can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Player weapon fired
    Fire,
    /// Alien beam fired
    BeamFire,
    /// Alien death, by tier
    AlienDeath(AlienTier),
    /// Bonus enemy appears
    UfoArrive,
    /// Bonus enemy destroyed
    UfoDeath,
    /// Bunker block crumbles
    BlockBreak,
    /// Ship destroyed
    ShipDeath,
    /// New high score reached
    HighScore,
    /// Level cleared
    LevelEnd,
    /// Session over
    GameEnd,
}

/// Fire-and-forget audio sink implemented by the frontend
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
    /// Start the ambient loop
    fn music_start(&mut self) {}
    /// Stop the ambient loop
    fn music_stop(&mut self) {}
}

/// Sink that discards every cue
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Sink that logs cues at debug level; useful headless and in tests
#[derive(Debug, Default)]
pub struct LoggingAudio;

impl AudioSink for LoggingAudio {
    fn play(&mut self, cue: SoundCue) {
        log::debug!("audio cue: {cue:?}");
    }

    fn music_start(&mut self) {
        log::debug!("ambient music start");
    }

    fn music_stop(&mut self) {
        log::debug!("ambient music stop");
    }
}

/// Map a lifecycle event to its cue, if it has one
pub fn cue_for_event(event: &GameEvent) -> Option<SoundCue> {
    match event {
        GameEvent::BulletFired => Some(SoundCue::Fire),
        GameEvent::BeamFired => Some(SoundCue::BeamFire),
        GameEvent::AlienKilled { tier, .. } => Some(SoundCue::AlienDeath(*tier)),
        GameEvent::UfoSpawned => Some(SoundCue::UfoArrive),
        GameEvent::UfoKilled { .. } => Some(SoundCue::UfoDeath),
        GameEvent::BlockDestroyed => Some(SoundCue::BlockBreak),
        GameEvent::NewHighScore { .. } => Some(SoundCue::HighScore),
        GameEvent::ShipHit => Some(SoundCue::ShipDeath),
        GameEvent::LevelCleared { .. } => Some(SoundCue::LevelEnd),
        GameEvent::GameOver { .. } => Some(SoundCue::GameEnd),
        GameEvent::ShipRespawned => None,
    }
}
