//! Star Siege - a fixed-fleet arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, fleet, collisions, game state)
//! - `settings`: Data-driven game balance and dynamic difficulty
//! - `stats`: Session scoring and progression state
//! - `highscores`: Persistent leaderboard
//! - `audio` / `platform`: Collaborator interfaces the frontend implements

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod stats;

pub use highscores::HighScores;
pub use settings::Settings;
pub use stats::GameStats;

/// Game timing constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Ship death animation length in ticks (~1.5 s)
    pub const SHIP_DEATH_TICKS: u32 = 90;
    /// Alien death animation length in ticks
    pub const ALIEN_DEATH_TICKS: u32 = 18;
    /// UFO death animation length in ticks
    pub const UFO_DEATH_TICKS: u32 = 30;
}
