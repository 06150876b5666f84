//! Session scoring and progression state
//!
//! Mutated by the collision resolver and the tick orchestrator; persists
//! across levels within a session and is reset on new-game.

use serde::{Deserialize, Serialize};

/// Score, lives and level progression for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStats {
    pub score: u32,
    /// Best score seen this process (seeded from the leaderboard at startup)
    pub high_score: u32,
    pub level: u32,
    /// Remaining lives. Never goes negative.
    pub ships_left: u32,
    /// Live aliens in the fleet, recomputed from the group every tick
    pub aliens_left: usize,
    /// Live-alien count at or below which the fleet speeds up next
    pub next_speedup: usize,
    pub game_active: bool,
}

impl GameStats {
    pub fn new(high_score: u32) -> Self {
        Self {
            score: 0,
            high_score,
            level: 1,
            ships_left: 0,
            aliens_left: 0,
            next_speedup: 0,
            game_active: false,
        }
    }

    /// Reset everything except the high score for a fresh game
    pub fn reset(&mut self, ship_limit: u32) {
        self.score = 0;
        self.level = 1;
        self.ships_left = ship_limit;
        self.aliens_left = 0;
        self.next_speedup = 0;
        self.game_active = true;
    }

    /// Raise the high score if the running score beats it.
    /// Returns true only when a new high score was set.
    pub fn check_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    /// Threshold recomputation shared by fleet builds and speedup ratchets
    pub fn recompute_speedup_threshold(&mut self, aliens: usize) {
        self.next_speedup = aliens - aliens / 5;
    }

    /// Spend one life. Clamps at zero in release; a hit at zero lives is a
    /// sequencing bug upstream.
    pub fn lose_ship(&mut self) {
        debug_assert!(self.ships_left > 0, "lost a ship with no lives remaining");
        self.ships_left = self.ships_left.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_score_updates_only_when_exceeded() {
        let mut stats = GameStats::new(500);
        stats.reset(3);

        stats.score = 400;
        assert!(!stats.check_high_score());
        assert_eq!(stats.high_score, 500);

        stats.score = 500;
        assert!(!stats.check_high_score());

        stats.score = 501;
        assert!(stats.check_high_score());
        assert_eq!(stats.high_score, 501);
    }

    #[test]
    fn speedup_threshold_matches_fleet_fifths() {
        let mut stats = GameStats::new(0);
        stats.recompute_speedup_threshold(30);
        assert_eq!(stats.next_speedup, 24);
        stats.recompute_speedup_threshold(24);
        assert_eq!(stats.next_speedup, 20);
    }

    #[test]
    fn lives_never_go_negative() {
        let mut stats = GameStats::new(0);
        stats.reset(1);
        stats.lose_ship();
        assert_eq!(stats.ships_left, 0);
    }
}
