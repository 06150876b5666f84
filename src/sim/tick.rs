//! Per-frame simulation tick
//!
//! One tick per rendered frame, strictly sequential: input intents, ship
//! movement, firing, projectile motion, collision resolution, fleet motion,
//! spawners, death animations, background. While the ship is dying only the
//! death animation advances; the rest of the world is suspended.

use rand::Rng;

use super::collision;
use super::entity::{Beam, Bullet, HitEdge, Ufo};
use super::fleet;
use super::state::{GameEvent, GamePhase, GameState};

/// Decoded input intents for a single tick. The core never polls devices;
/// quit is handled by the frontend between ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Move-left intent is held
    pub left: bool,
    /// Move-right intent is held
    pub right: bool,
    /// Fire was pressed this tick
    pub fire: bool,
}

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::GameOver => return,
        GamePhase::ShipDying => {
            state.time_ticks += 1;
            step_ship_death(state, dt);
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    // Input intents drive the ship
    state.ship.moving_left = input.left;
    state.ship.moving_right = input.right;
    state.ship.update_movement(&state.settings, dt);
    if input.fire {
        fire_bullet(state);
    }

    // Projectile motion and off-screen cull
    update_projectiles(state, dt);

    // Combat resolution against current positions
    resolve_bullet_hits(state);
    check_level_clear(state);
    state.sync_aliens_left();
    check_speedup_ratchet(state);

    if collision::ship_hit_by_beam(&state.ship, &state.beams) {
        ship_hit(state);
        return;
    }

    // Fleet motion: edge drop first, then the shared horizontal step
    fleet::check_fleet_edges(&mut state.settings, &mut state.aliens);
    fleet::update_positions(&state.settings, &mut state.aliens, dt);

    if collision::ship_hit_by_alien(&state.ship, &state.aliens) {
        ship_hit(state);
        return;
    }
    // A fleet breach is as fatal as direct contact
    if collision::fleet_reached_bottom(&state.aliens, state.settings.screen_height) {
        ship_hit(state);
        return;
    }

    fire_random_beam(state);
    resolve_bunker_hits(state);

    update_ufo(state, dt);
    maybe_spawn_ufo(state);

    // Death animations finish and the dead leave the groups
    state.aliens.retain_mut(|a| !a.step_death());

    for star in state.stars.iter_mut() {
        star.update(&state.settings, dt);
    }

    state.sync_aliens_left();
    debug_assert!(state.bullets.len() <= state.settings.bullets_allowed);
    debug_assert!(state.beams.len() <= state.settings.beams_allowed);
}

/// Fire a player bullet if the outstanding cap allows it
fn fire_bullet(state: &mut GameState) {
    if state.bullets.len() >= state.settings.bullets_allowed {
        return;
    }
    let bullet = Bullet::fire(&state.settings, &state.ship);
    state.bullets.push(bullet);
    state.push_event(GameEvent::BulletFired);
}

/// A uniformly random live alien fires a beam, gated by the outstanding cap
/// and the minimum interval since the last beam
fn fire_random_beam(state: &mut GameState) {
    if state.beams.len() >= state.settings.beams_allowed {
        return;
    }
    if let Some(last) = state.last_beam_tick {
        if state.secs_since(last) <= state.settings.beam_min_interval {
            return;
        }
    }
    let live: Vec<usize> = state
        .aliens
        .iter()
        .enumerate()
        .filter(|(_, a)| a.is_alive())
        .map(|(i, _)| i)
        .collect();
    if live.is_empty() {
        return;
    }
    let shooter = live[state.rng.random_range(0..live.len())];
    let beam = Beam::fire(&state.settings, &state.aliens[shooter]);
    state.beams.push(beam);
    state.last_beam_tick = Some(state.time_ticks);
    state.push_event(GameEvent::BeamFired);
}

fn update_projectiles(state: &mut GameState, dt: f32) {
    for bullet in state.bullets.iter_mut() {
        bullet.update(dt);
    }
    for beam in state.beams.iter_mut() {
        beam.update(dt);
    }
    state.bullets.retain(|b| !b.offscreen());
    let settings = &state.settings;
    state.beams.retain(|b| !b.offscreen(settings));
}

/// Bullet vs alien and bullet vs UFO. A bullet that hits anything is
/// consumed immediately, so it can never score against two targets.
fn resolve_bullet_hits(state: &mut GameState) {
    let mut i = 0;
    while i < state.bullets.len() {
        let rect = state.bullets[i].rect();

        if let Some(idx) = collision::first_live_alien_hit(&rect, &state.aliens) {
            let tier = state.aliens[idx].tier;
            let points = state.settings.alien_points(tier);
            state.aliens[idx].begin_death();
            state.stats.score += points;
            state.push_event(GameEvent::AlienKilled { tier, points });
            if state.stats.check_high_score() {
                let score = state.stats.high_score;
                state.push_event(GameEvent::NewHighScore { score });
            }
            state.bullets.swap_remove(i);
            continue;
        }

        let mut ufo_points = None;
        if let Some(ufo) = state.ufo.as_mut() {
            if ufo.is_alive() && ufo.rect().intersects(&rect) {
                ufo.begin_death();
                ufo_points = Some(ufo.score);
            }
        }
        if let Some(points) = ufo_points {
            state.stats.score += points;
            state.push_event(GameEvent::UfoKilled { points });
            if state.stats.check_high_score() {
                let score = state.stats.high_score;
                state.push_event(GameEvent::NewHighScore { score });
            }
            state.bullets.swap_remove(i);
            continue;
        }

        i += 1;
    }
}

/// Bunker damage: bullets hit from below, beams from above. Either way the
/// projectile is consumed.
fn resolve_bunker_hits(state: &mut GameState) {
    let mut i = 0;
    while i < state.bullets.len() {
        let rect = state.bullets[i].rect();
        if let Some(idx) = collision::first_block_hit(&rect, &state.bunkers) {
            if state.bunkers[idx].damage(HitEdge::Bottom) {
                state.bunkers.swap_remove(idx);
                state.push_event(GameEvent::BlockDestroyed);
            }
            state.bullets.swap_remove(i);
            continue;
        }
        i += 1;
    }

    let mut i = 0;
    while i < state.beams.len() {
        let rect = state.beams[i].rect();
        if let Some(idx) = collision::first_block_hit(&rect, &state.bunkers) {
            if state.bunkers[idx].damage(HitEdge::Top) {
                state.bunkers.swap_remove(idx);
                state.push_event(GameEvent::BlockDestroyed);
            }
            state.beams.swap_remove(i);
            continue;
        }
        i += 1;
    }
}

/// Fleet cleared: advance the level. The fleet must be fully gone, dying
/// animations included, before the next level starts.
fn check_level_clear(state: &mut GameState) {
    if !state.aliens.is_empty() {
        return;
    }
    // Kill any bonus enemy before the new level
    state.ufo = None;
    state.bullets.clear();
    state.beams.clear();
    state.stats.level += 1;
    state.settings.increase_base_speed();
    state.settings.reset_alien_speed();
    state.rebuild_fleet();
    state.reset_bunkers();
    state.push_event(GameEvent::LevelCleared {
        level: state.stats.level,
    });
    log::info!(
        "level {} begins, base alien speed {:.0}",
        state.stats.level,
        state.settings.base_alien_speed()
    );
}

/// Discrete speedup ratchet: the fleet accelerates as it thins out,
/// independent of level boundaries
fn check_speedup_ratchet(state: &mut GameState) {
    let left = state.stats.aliens_left;
    if left > 0
        && left <= state.stats.next_speedup
        && state.settings.alien_speed() < state.settings.alien_speed_limit
    {
        state.settings.increase_alien_speed();
        state.stats.recompute_speedup_threshold(left);
        log::debug!(
            "fleet speedup at {} aliens, next at {}",
            left,
            state.stats.next_speedup
        );
    }
}

/// Enter the ship-hit sequence: ALIVE -> DYING.
/// The UFO is force-removed so its cues don't overlap the ship's death cue.
fn ship_hit(state: &mut GameState) {
    state.ufo = None;
    state.ship.begin_death();
    state.phase = GamePhase::ShipDying;
    state.push_event(GameEvent::ShipHit);
}

/// Step the death animation; on completion resolve DYING -> RESPAWNING or
/// DYING -> GAME_OVER
fn step_ship_death(state: &mut GameState, dt: f32) {
    if !state.ship.step_death(dt) {
        return;
    }
    if state.stats.ships_left > 0 {
        state.stats.lose_ship();
        state.aliens.clear();
        state.bullets.clear();
        state.beams.clear();
        state.settings.reset_alien_speed();
        state.rebuild_fleet();
        state.ship.revive(&state.settings);
        state.phase = GamePhase::Playing;
        state.push_event(GameEvent::ShipRespawned);
    } else {
        state.stats.game_active = false;
        state.phase = GamePhase::GameOver;
        state.push_event(GameEvent::GameOver {
            score: state.stats.score,
        });
        log::info!(
            "game over at level {}, score {}",
            state.stats.level,
            state.stats.score
        );
    }
}

/// Move the active UFO and remove it when its death effect finishes or it
/// leaves the screen
fn update_ufo(state: &mut GameState, dt: f32) {
    let done = match state.ufo.as_mut() {
        Some(ufo) => ufo.update(&state.settings, dt),
        None => false,
    };
    if done {
        state.ufo = None;
    }
}

/// Cooldown-gated random spawner. The attempt timestamp is recorded even on
/// a missed roll; re-rolling every tick would change the pacing.
fn maybe_spawn_ufo(state: &mut GameState) {
    if state.ufo.is_some() {
        return;
    }
    if let Some(last) = state.last_ufo_attempt {
        if state.secs_since(last) <= state.settings.ufo_min_interval {
            return;
        }
    }
    state.last_ufo_attempt = Some(state.time_ticks);
    if state.rng.random_bool(state.settings.ufo_spawn_chance) {
        let score = state.roll_ufo_score();
        state.ufo = Some(Ufo::new(&state.settings, score));
        state.push_event(GameEvent::UfoSpawned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SHIP_DEATH_TICKS, SIM_DT};
    use crate::settings::Settings;
    use crate::sim::entity::{Alien, AlienState, AlienTier};
    use glam::Vec2;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Settings::default(), 0);
        state.start_game();
        state
    }

    fn live_count(state: &GameState) -> usize {
        state.aliens.iter().filter(|a| a.is_alive()).count()
    }

    #[test]
    fn aliens_left_matches_live_group_every_tick() {
        let mut state = playing_state(11);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut state, &input, SIM_DT);
            if state.phase != GamePhase::Playing {
                break;
            }
            assert_eq!(state.stats.aliens_left, live_count(&state));
        }
    }

    #[test]
    fn bullet_cap_is_enforced() {
        let mut state = playing_state(3);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut state, &input, SIM_DT);
            if state.phase != GamePhase::Playing {
                break;
            }
            assert!(state.bullets.len() <= state.settings.bullets_allowed);
        }
    }

    #[test]
    fn beam_cap_and_interval_are_enforced() {
        let mut state = playing_state(5);
        let input = TickInput::default();
        let mut beam_events = 0;
        for _ in 0..600 {
            tick(&mut state, &input, SIM_DT);
            if state.phase != GamePhase::Playing {
                break;
            }
            assert!(state.beams.len() <= state.settings.beams_allowed);
            beam_events += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::BeamFired))
                .count();
        }
        // 600 ticks = 10 s; the 1 s interval allows at most 10 beams
        assert!(beam_events <= 10, "beams fired too often: {beam_events}");
    }

    #[test]
    fn bullet_kill_scores_exactly_once() {
        let mut state = playing_state(7);
        state.drain_events();
        state.bullets.clear();
        state.beams.clear();

        // Drop a bullet right on the first alien
        let target = state.aliens[0].rect().center();
        state.bullets.push(Bullet {
            x: target.x,
            y: target.y,
            size: Vec2::new(state.settings.bullet_width, state.settings.bullet_height),
            speed: state.settings.bullet_speed,
        });
        let expected = state.settings.alien_points(state.aliens[0].tier);
        let before = state.stats.score;

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.stats.score, before + expected);
        assert!(matches!(state.aliens[0].state, AlienState::Dying { .. }));
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn bullet_never_hits_two_targets() {
        let mut state = playing_state(9);
        state.bullets.clear();
        state.beams.clear();

        // Two aliens stacked on the same spot, one bullet overlapping both
        let pos = Vec2::new(300.0, 300.0);
        state.aliens = vec![
            Alien::new(pos, &state.settings, AlienTier::Tier1),
            Alien::new(pos, &state.settings, AlienTier::Tier1),
        ];
        state.sync_aliens_left();
        state.stats.recompute_speedup_threshold(2);
        state.bullets.push(Bullet {
            x: pos.x + 10.0,
            y: pos.y + 10.0,
            size: Vec2::new(state.settings.bullet_width, state.settings.bullet_height),
            speed: state.settings.bullet_speed,
        });

        tick(&mut state, &TickInput::default(), SIM_DT);

        let dying = state
            .aliens
            .iter()
            .filter(|a| matches!(a.state, AlienState::Dying { .. }))
            .count();
        assert_eq!(dying, 1);
        assert_eq!(
            state.stats.score,
            state.settings.alien_points(AlienTier::Tier1)
        );
    }

    #[test]
    fn score_is_monotonically_non_decreasing() {
        let mut state = playing_state(13);
        let input = TickInput {
            fire: true,
            left: true,
            ..Default::default()
        };
        let mut last = 0;
        for _ in 0..600 {
            tick(&mut state, &input, SIM_DT);
            assert!(state.stats.score >= last);
            last = state.stats.score;
        }
    }

    #[test]
    fn high_score_event_only_when_exceeded() {
        let mut state = playing_state(15);
        state.stats.high_score = 1_000_000;
        state.drain_events();
        state.bullets.clear();
        state.beams.clear();

        let target = state.aliens[0].rect().center();
        state.bullets.push(Bullet {
            x: target.x,
            y: target.y,
            size: Vec2::new(state.settings.bullet_width, state.settings.bullet_height),
            speed: state.settings.bullet_speed,
        });
        tick(&mut state, &TickInput::default(), SIM_DT);

        let events = state.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::AlienKilled { .. })));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::NewHighScore { .. })));
        assert_eq!(state.stats.high_score, 1_000_000);
    }

    #[test]
    fn speedup_ratchet_steps_thirty_to_twentyfour_to_twenty() {
        let mut state = playing_state(17);

        // Exactly 30 live aliens, placed safely mid-screen
        state.aliens = (0..30)
            .map(|i| {
                Alien::new(
                    Vec2::new(100.0 + (i % 6) as f32 * 80.0, 150.0 + (i / 6) as f32 * 60.0),
                    &state.settings,
                    AlienTier::Tier2,
                )
            })
            .collect();
        state.sync_aliens_left();
        state.stats.recompute_speedup_threshold(30);
        assert_eq!(state.stats.next_speedup, 24);

        // Above the threshold: no ratchet
        let speed = state.settings.alien_speed();
        check_speedup_ratchet(&mut state);
        assert_eq!(state.settings.alien_speed(), speed);

        // Thin the fleet to the threshold
        for alien in state.aliens.iter_mut().take(6) {
            alien.begin_death();
        }
        state.sync_aliens_left();
        assert_eq!(state.stats.aliens_left, 24);

        check_speedup_ratchet(&mut state);
        assert!(state.settings.alien_speed() > speed);
        assert_eq!(state.stats.next_speedup, 20);

        // Must not fire again until the count drops to 20
        let bumped = state.settings.alien_speed();
        check_speedup_ratchet(&mut state);
        assert_eq!(state.settings.alien_speed(), bumped);
    }

    #[test]
    fn ship_hit_with_lives_rebuilds_and_recenters() {
        let mut state = playing_state(19);
        let fleet_size = state.aliens.len();
        let lives = state.stats.ships_left;
        state.ship.x = 100.0;

        ship_hit(&mut state);
        assert_eq!(state.phase, GamePhase::ShipDying);
        assert!(state.ufo.is_none());

        for _ in 0..=SHIP_DEATH_TICKS {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats.ships_left, lives - 1);
        assert_eq!(state.aliens.len(), fleet_size);
        assert!(state.bullets.is_empty());
        assert_eq!(state.ship.x, state.settings.screen_width / 2.0);
        assert_eq!(
            state.settings.alien_speed(),
            state.settings.base_alien_speed()
        );
    }

    #[test]
    fn ship_hit_without_lives_ends_the_game() {
        let mut state = playing_state(21);
        state.stats.ships_left = 0;
        let fleet_size = state.aliens.len();

        ship_hit(&mut state);
        for _ in 0..=SHIP_DEATH_TICKS {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.stats.game_active);
        // No rebuild on the game-over path
        assert_eq!(state.aliens.len(), fleet_size);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. })));

        // Further ticks are no-ops
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn cleared_fleet_advances_the_level() {
        let mut state = playing_state(23);
        state.drain_events();
        let level = state.stats.level;
        let base = state.settings.base_alien_speed();

        state.aliens.clear();
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.stats.level, level + 1);
        assert!(!state.aliens.is_empty());
        assert!(state.settings.base_alien_speed() > base);
        assert_eq!(
            state.settings.alien_speed(),
            state.settings.base_alien_speed()
        );
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::LevelCleared { .. })));
    }

    #[test]
    fn ufo_attempt_timestamp_recorded_on_miss() {
        let mut state = playing_state(25);
        state.settings.ufo_spawn_chance = 0.0;
        state.time_ticks = 100;
        state.last_ufo_attempt = None;

        maybe_spawn_ufo(&mut state);
        assert!(state.ufo.is_none());
        // The miss still reset the cooldown clock
        assert_eq!(state.last_ufo_attempt, Some(100));

        // Within the interval nothing happens, even with a guaranteed roll
        state.settings.ufo_spawn_chance = 1.0;
        state.time_ticks = 101;
        maybe_spawn_ufo(&mut state);
        assert!(state.ufo.is_none());
        assert_eq!(state.last_ufo_attempt, Some(100));

        // Past the interval the guaranteed roll spawns
        state.time_ticks = 100 + (state.settings.ufo_min_interval / SIM_DT) as u64 + 2;
        maybe_spawn_ufo(&mut state);
        assert!(state.ufo.is_some());
    }

    #[test]
    fn beam_hit_suspends_the_world() {
        let mut state = playing_state(27);
        state.beams.clear();
        state.bullets.clear();

        // Park a beam on the ship
        let center = state.ship.rect().center();
        state.beams.push(Beam {
            x: center.x,
            y: center.y,
            size: Vec2::new(state.settings.beam_width, state.settings.beam_height),
            speed: 0.0,
        });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::ShipDying);

        // Aliens do not move while the ship dies
        let positions: Vec<f32> = state.aliens.iter().map(|a| a.pos.x).collect();
        tick(&mut state, &TickInput::default(), SIM_DT);
        for (alien, x) in state.aliens.iter().zip(positions) {
            assert_eq!(alien.pos.x, x);
        }
    }
}
