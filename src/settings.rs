//! Game settings and balance values
//!
//! One struct owns every tunable: screen geometry, entity speeds, fire-rate
//! caps, spawn cooldowns and point values. The dynamic difficulty fields
//! (alien speed, fleet direction) are only ever changed through the named
//! mutators below, never by free-form field writes.

use serde::{Deserialize, Serialize};

use crate::sim::entity::AlienTier;

/// All tunables for a session. Speeds are px/second; intervals are seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Ship ===
    pub ship_width: f32,
    pub ship_height: f32,
    pub ship_speed: f32,
    /// Lives per session
    pub ship_limit: u32,

    // === Projectiles ===
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,
    /// Max player bullets outstanding
    pub bullets_allowed: usize,
    pub beam_width: f32,
    pub beam_height: f32,
    pub beam_speed: f32,
    /// Max alien beams outstanding
    pub beams_allowed: usize,
    /// Minimum time between alien beams
    pub beam_min_interval: f32,

    // === Aliens / fleet ===
    pub alien_width: f32,
    pub alien_height: f32,
    /// Vertical distance the whole fleet drops at a screen edge
    pub fleet_drop: f32,
    /// Per-level multiplier applied to the base alien speed
    pub level_speed_scale: f32,
    /// Multiplier applied to the current alien speed at each speedup ratchet
    pub speedup_scale: f32,
    /// Hard cap on alien speed
    pub alien_speed_limit: f32,
    /// Starting alien speed (level 1 base)
    pub alien_speed_start: f32,

    // === UFO ===
    pub ufo_width: f32,
    pub ufo_height: f32,
    pub ufo_speed: f32,
    /// Minimum time between UFO spawn attempts
    pub ufo_min_interval: f32,
    /// Chance a spawn attempt actually produces a UFO
    pub ufo_spawn_chance: f64,
    /// Candidate UFO point values, picked at random per spawn
    pub ufo_scores: Vec<u32>,

    // === Bunkers ===
    pub bunker_count: usize,
    pub bunker_block_size: f32,
    pub bunker_block_hp: u8,

    // === Background ===
    pub stars_limit: usize,

    // --- Dynamic difficulty state (mutate through methods only) ---
    /// Base alien speed for the current level
    base_alien_speed: f32,
    /// Current alien speed (base plus speedup ratchets)
    alien_speed: f32,
    /// Shared fleet direction: +1.0 right, -1.0 left
    fleet_direction: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 1200.0,
            screen_height: 800.0,

            ship_width: 50.0,
            ship_height: 40.0,
            ship_speed: 330.0,
            ship_limit: 3,

            bullet_width: 4.0,
            bullet_height: 16.0,
            bullet_speed: 480.0,
            bullets_allowed: 3,
            beam_width: 6.0,
            beam_height: 18.0,
            beam_speed: 300.0,
            beams_allowed: 3,
            beam_min_interval: 1.0,

            alien_width: 50.0,
            alien_height: 45.0,
            fleet_drop: 10.0,
            level_speed_scale: 1.2,
            speedup_scale: 1.1,
            alien_speed_limit: 210.0,
            alien_speed_start: 60.0,

            ufo_width: 64.0,
            ufo_height: 28.0,
            ufo_speed: 180.0,
            ufo_min_interval: 25.0,
            ufo_spawn_chance: 0.15,
            ufo_scores: vec![100, 150, 200, 300],

            bunker_count: 4,
            bunker_block_size: 16.0,
            bunker_block_hp: 3,

            stars_limit: 50,

            base_alien_speed: 60.0,
            alien_speed: 60.0,
            fleet_direction: 1.0,
        }
    }
}

impl Settings {
    /// Per-tier alien point values
    pub fn alien_points(&self, tier: AlienTier) -> u32 {
        match tier {
            AlienTier::Tier1 => 150,
            AlienTier::Tier2 => 100,
            AlienTier::Tier3 => 50,
        }
    }

    /// Reset the dynamic difficulty state for a new game
    pub fn initialize_dynamic(&mut self) {
        self.base_alien_speed = self.alien_speed_start;
        self.alien_speed = self.alien_speed_start;
        self.fleet_direction = 1.0;
    }

    pub fn alien_speed(&self) -> f32 {
        self.alien_speed
    }

    pub fn base_alien_speed(&self) -> f32 {
        self.base_alien_speed
    }

    pub fn fleet_direction(&self) -> f32 {
        self.fleet_direction
    }

    /// Raise the per-level base speed (monotonic ramp, capped)
    pub fn increase_base_speed(&mut self) {
        self.base_alien_speed =
            (self.base_alien_speed * self.level_speed_scale).min(self.alien_speed_limit);
    }

    /// Drop the current speed back to the level base
    pub fn reset_alien_speed(&mut self) {
        self.alien_speed = self.base_alien_speed;
    }

    /// Speedup ratchet step, capped at the hard limit
    pub fn increase_alien_speed(&mut self) {
        self.alien_speed = (self.alien_speed * self.speedup_scale).min(self.alien_speed_limit);
    }

    /// Flip the shared fleet direction (called when the fleet drops)
    pub fn flip_fleet_direction(&mut self) {
        self.fleet_direction = -self.fleet_direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_mutators_respect_cap() {
        let mut settings = Settings::default();
        settings.initialize_dynamic();

        for _ in 0..100 {
            settings.increase_alien_speed();
        }
        assert!(settings.alien_speed() <= settings.alien_speed_limit);

        for _ in 0..100 {
            settings.increase_base_speed();
        }
        assert!(settings.base_alien_speed() <= settings.alien_speed_limit);
    }

    #[test]
    fn reset_returns_to_level_base() {
        let mut settings = Settings::default();
        settings.initialize_dynamic();

        settings.increase_alien_speed();
        settings.increase_alien_speed();
        assert!(settings.alien_speed() > settings.base_alien_speed());

        settings.reset_alien_speed();
        assert_eq!(settings.alien_speed(), settings.base_alien_speed());
    }

    #[test]
    fn fleet_direction_flips() {
        let mut settings = Settings::default();
        assert_eq!(settings.fleet_direction(), 1.0);
        settings.flip_fleet_direction();
        assert_eq!(settings.fleet_direction(), -1.0);
        settings.flip_fleet_direction();
        assert_eq!(settings.fleet_direction(), 1.0);
    }
}
