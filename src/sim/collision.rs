//! Collision queries between projectiles, entities and bunkers
//!
//! Pure hit-scan helpers over the entity groups. Dead or dying entities are
//! never collision candidates; every query skips them. The tick orchestrator
//! owns the mutation side (consuming projectiles, starting death animations).

use super::entity::{Alien, Beam, BunkerBlock, Ship};
use super::rect::Rect;

/// First live alien overlapping `rect`, if any.
///
/// A projectile consults this once and is consumed on a hit, so a bullet can
/// never be counted against two aliens in the same tick.
pub fn first_live_alien_hit(rect: &Rect, aliens: &[Alien]) -> Option<usize> {
    aliens
        .iter()
        .position(|a| a.is_alive() && a.rect().intersects(rect))
}

/// True if any beam overlaps the ship
pub fn ship_hit_by_beam(ship: &Ship, beams: &[Beam]) -> bool {
    let rect = ship.rect();
    beams.iter().any(|b| b.rect().intersects(&rect))
}

/// True if any live alien overlaps the ship (body collision)
pub fn ship_hit_by_alien(ship: &Ship, aliens: &[Alien]) -> bool {
    let rect = ship.rect();
    aliens
        .iter()
        .any(|a| a.is_alive() && a.rect().intersects(&rect))
}

/// True if any live alien has breached the bottom of the screen
pub fn fleet_reached_bottom(aliens: &[Alien], screen_height: f32) -> bool {
    aliens
        .iter()
        .any(|a| a.is_alive() && a.rect().bottom() >= screen_height)
}

/// First bunker block overlapping `rect`, if any
pub fn first_block_hit(rect: &Rect, blocks: &[BunkerBlock]) -> Option<usize> {
    blocks.iter().position(|b| b.rect.intersects(rect))
}
