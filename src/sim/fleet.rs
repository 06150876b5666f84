//! Fleet construction and shared movement
//!
//! The fleet is a grid sized to the screen, moving as one body: every alien
//! shares the direction stored in `Settings`, and when any alien touches a
//! horizontal edge the entire fleet drops and the direction flips.

use glam::Vec2;

use super::entity::{Alien, AlienTier};
use crate::settings::Settings;

/// Aliens that fit in one row, given a one-alien margin on each side and a
/// 2.5-width spacing stride
pub fn fleet_columns(settings: &Settings) -> usize {
    let available = settings.screen_width - 2.0 * settings.alien_width;
    (available / (2.5 * settings.alien_width)) as usize
}

/// Rows that fit above the ship, with headroom for bunkers and projectiles
pub fn fleet_rows(settings: &Settings) -> usize {
    let available =
        settings.screen_height - 4.0 * settings.alien_height - settings.ship_height;
    (available / (2.5 * settings.alien_height)) as usize
}

/// Build a full fleet grid. Row 0 is the top row; tiers follow row index.
pub fn build_fleet(settings: &Settings) -> Vec<Alien> {
    let columns = fleet_columns(settings);
    let rows = fleet_rows(settings);
    let mut fleet = Vec::with_capacity(columns * rows);

    let w = settings.alien_width;
    let h = settings.alien_height;
    let y_offset = settings.screen_height / 8.0;

    for row in 0..rows {
        let tier = AlienTier::for_row(row);
        for col in 0..columns {
            let x = w + 1.25 * w * col as f32;
            let y = h + 1.25 * h * row as f32 + y_offset;
            fleet.push(Alien::new(Vec2::new(x, y), settings, tier));
        }
    }

    log::info!(
        "fleet built: {} aliens ({} rows x {} columns)",
        fleet.len(),
        rows,
        columns
    );
    fleet
}

/// Drop the whole fleet and flip its direction if any alien is at an edge.
/// Returns true when a drop happened.
pub fn check_fleet_edges(settings: &mut Settings, aliens: &mut [Alien]) -> bool {
    if !aliens.iter().any(|a| a.at_edge(settings)) {
        return false;
    }
    for alien in aliens.iter_mut() {
        alien.pos.y += settings.fleet_drop;
    }
    settings.flip_fleet_direction();
    true
}

/// Advance every alien horizontally by the shared fleet speed
pub fn update_positions(settings: &Settings, aliens: &mut [Alien], dt: f32) {
    let dx = settings.alien_speed() * settings.fleet_direction() * dt;
    for alien in aliens.iter_mut() {
        alien.pos.x += dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fleet_fills_grid_with_row_tiers() {
        let settings = Settings::default();
        let fleet = build_fleet(&settings);
        let columns = fleet_columns(&settings);
        let rows = fleet_rows(&settings);

        assert_eq!(fleet.len(), columns * rows);
        assert!(rows >= 2, "default settings should give a multi-row fleet");

        // Top row is Tier1
        assert!(fleet[..columns].iter().all(|a| a.tier == AlienTier::Tier1));
        // Every alien starts alive and on screen
        assert!(fleet.iter().all(|a| a.is_alive()));
        assert!(fleet
            .iter()
            .all(|a| a.rect().left() >= 0.0 && a.rect().right() <= settings.screen_width));
    }

    #[test]
    fn edge_contact_drops_fleet_and_flips_direction() {
        let mut settings = Settings::default();
        settings.initialize_dynamic();
        let mut fleet = build_fleet(&settings);

        // Not at an edge yet
        assert!(!check_fleet_edges(&mut settings, &mut fleet));
        assert_eq!(settings.fleet_direction(), 1.0);

        // Push the rightmost alien to the edge
        let rightmost = fleet
            .iter()
            .map(|a| a.rect().right())
            .fold(f32::MIN, f32::max);
        for alien in fleet.iter_mut() {
            alien.pos.x += settings.screen_width - rightmost;
        }
        let before: Vec<f32> = fleet.iter().map(|a| a.pos.y).collect();

        assert!(check_fleet_edges(&mut settings, &mut fleet));
        assert_eq!(settings.fleet_direction(), -1.0);
        for (alien, y) in fleet.iter().zip(before) {
            assert_eq!(alien.pos.y, y + settings.fleet_drop);
        }
    }

    #[test]
    fn fleet_moves_as_one_body() {
        let mut settings = Settings::default();
        settings.initialize_dynamic();
        let mut fleet = build_fleet(&settings);
        let before: Vec<f32> = fleet.iter().map(|a| a.pos.x).collect();

        update_positions(&settings, &mut fleet, 1.0 / 60.0);

        let dx = fleet[0].pos.x - before[0];
        assert!(dx > 0.0);
        for (alien, x) in fleet.iter().zip(before) {
            assert!((alien.pos.x - x - dx).abs() < f32::EPSILON);
        }
    }
}
