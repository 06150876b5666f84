//! Game state and lifecycle events
//!
//! Everything the tick orchestrator mutates lives here: the entity groups,
//! the progression stats, the seeded RNG and the outbound event queue the
//! frontend drains for audio and presentation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Alien, AlienTier, Beam, Bullet, BunkerBlock, Ship, Star, Ufo};
use super::fleet;
use super::rect::Rect;
use crate::consts::SIM_DT;
use crate::settings::Settings;
use crate::stats::GameStats;

/// Coarse phase of the session tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Normal gameplay ticking
    Playing,
    /// Ship death animation; ordinary gameplay is suspended
    ShipDying,
    /// Session ended, no lives left
    GameOver,
}

/// Outbound lifecycle events, drained by the frontend once per tick.
///
/// The sim stays pure: audio cues, the level-intro modal and score
/// persistence are all reactions to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BulletFired,
    BeamFired,
    AlienKilled { tier: AlienTier, points: u32 },
    UfoSpawned,
    UfoKilled { points: u32 },
    BlockDestroyed,
    NewHighScore { score: u32 },
    ShipHit,
    ShipRespawned,
    /// Fleet cleared; `level` is the level about to begin
    LevelCleared { level: u32 },
    GameOver { score: u32 },
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub stats: GameStats,
    pub phase: GamePhase,
    pub ship: Ship,
    pub aliens: Vec<Alien>,
    pub bullets: Vec<Bullet>,
    pub beams: Vec<Beam>,
    pub ufo: Option<Ufo>,
    pub bunkers: Vec<BunkerBlock>,
    pub stars: Vec<Star>,
    /// Simulation tick counter; all cooldown timestamps are tick counts
    pub time_ticks: u64,
    pub(crate) last_beam_tick: Option<u64>,
    /// Last UFO spawn attempt. Recorded even when the roll misses; that is
    /// the pacing behavior, not an oversight.
    pub(crate) last_ufo_attempt: Option<u64>,
    /// Session seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session in the pre-game state (menu showing, nothing active)
    pub fn new(seed: u64, settings: Settings, high_score: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = build_stars(&settings, &mut rng);
        let ship = Ship::new(&settings);

        Self {
            stats: GameStats::new(high_score),
            phase: GamePhase::GameOver,
            ship,
            aliens: Vec::new(),
            bullets: Vec::new(),
            beams: Vec::new(),
            ufo: None,
            bunkers: build_bunkers(&settings),
            stars,
            time_ticks: 0,
            last_beam_tick: None,
            last_ufo_attempt: None,
            seed,
            rng,
            events: Vec::new(),
            settings,
        }
    }

    /// Reset everything for a fresh game (play button pressed)
    pub fn start_game(&mut self) {
        self.settings.initialize_dynamic();
        self.stats.reset(self.settings.ship_limit);

        self.aliens.clear();
        self.bullets.clear();
        self.beams.clear();
        self.ufo = None;
        self.bunkers = build_bunkers(&self.settings);
        self.last_beam_tick = None;
        self.last_ufo_attempt = None;

        self.rebuild_fleet();
        self.ship.revive(&self.settings);
        self.phase = GamePhase::Playing;

        log::info!("new game started (seed {})", self.seed);
    }

    /// Build a fresh fleet and recompute the progression bookkeeping
    pub fn rebuild_fleet(&mut self) {
        self.aliens = fleet::build_fleet(&self.settings);
        self.stats.aliens_left = self.aliens.len();
        self.stats.recompute_speedup_threshold(self.aliens.len());
    }

    /// Fresh bunkers for a new level
    pub(crate) fn reset_bunkers(&mut self) {
        self.bunkers = build_bunkers(&self.settings);
    }

    /// Recompute `aliens_left` from the live group rather than trusting the
    /// running count
    pub fn sync_aliens_left(&mut self) {
        self.stats.aliens_left = self.aliens.iter().filter(|a| a.is_alive()).count();
    }

    /// Seconds elapsed since a recorded tick timestamp
    pub(crate) fn secs_since(&self, tick: u64) -> f32 {
        (self.time_ticks.saturating_sub(tick)) as f32 * SIM_DT
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this tick's events, leaving the queue empty
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Random point value for a freshly spawned UFO
    pub(crate) fn roll_ufo_score(&mut self) -> u32 {
        if self.settings.ufo_scores.is_empty() {
            return 100;
        }
        let idx = self.rng.random_range(0..self.settings.ufo_scores.len());
        self.settings.ufo_scores[idx]
    }
}

/// Four bunkers of a block grid, evenly spaced above the ship row
fn build_bunkers(settings: &Settings) -> Vec<BunkerBlock> {
    const COLS: usize = 5;
    const ROWS: usize = 3;

    let block = settings.bunker_block_size;
    let bunker_w = block * COLS as f32;
    let top = settings.screen_height - settings.ship_height - 120.0;
    let count = settings.bunker_count;

    let mut blocks = Vec::with_capacity(count * COLS * ROWS);
    for i in 0..count {
        // Center each bunker in its slot of the screen
        let slot = settings.screen_width / count as f32;
        let left = slot * i as f32 + (slot - bunker_w) / 2.0;
        for row in 0..ROWS {
            for col in 0..COLS {
                let rect = Rect::new(
                    left + col as f32 * block,
                    top + row as f32 * block,
                    block,
                    block,
                );
                blocks.push(BunkerBlock::new(rect, settings.bunker_block_hp));
            }
        }
    }
    blocks
}

/// Random star field built once per session from the seeded RNG
fn build_stars(settings: &Settings, rng: &mut Pcg32) -> Vec<Star> {
    (0..settings.stars_limit)
        .map(|_| Star {
            pos: Vec2::new(
                rng.random_range(0.0..settings.screen_width),
                rng.random_range(0.0..settings.screen_height),
            ),
            drift: rng.random_range(2.0..10.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_game_builds_a_full_board() {
        let mut state = GameState::new(7, Settings::default(), 0);
        assert_eq!(state.phase, GamePhase::GameOver);

        state.start_game();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.stats.game_active);
        assert_eq!(state.stats.ships_left, state.settings.ship_limit);
        assert!(!state.aliens.is_empty());
        assert_eq!(state.stats.aliens_left, state.aliens.len());
        assert_eq!(
            state.stats.next_speedup,
            state.aliens.len() - state.aliens.len() / 5
        );
        assert!(!state.bunkers.is_empty());
        assert_eq!(state.stars.len(), state.settings.stars_limit);
    }

    #[test]
    fn same_seed_same_star_field() {
        let a = GameState::new(42, Settings::default(), 0);
        let b = GameState::new(42, Settings::default(), 0);
        for (x, y) in a.stars.iter().zip(b.stars.iter()) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.drift, y.drift);
        }
    }

    #[test]
    fn sync_counts_live_aliens_only() {
        let mut state = GameState::new(1, Settings::default(), 0);
        state.start_game();
        let total = state.aliens.len();

        state.aliens[0].begin_death();
        state.aliens[1].begin_death();
        state.sync_aliens_left();
        assert_eq!(state.stats.aliens_left, total - 2);
    }
}
