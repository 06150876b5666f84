//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies; lifecycle flows outward
//!   through the `GameEvent` queue

pub mod collision;
pub mod entity;
pub mod fleet;
pub mod rect;
pub mod state;
pub mod tick;

pub use entity::{
    Alien, AlienState, AlienTier, Beam, Bullet, BunkerBlock, HitEdge, Ship, ShipState, Star, Ufo,
};
pub use fleet::{build_fleet, check_fleet_edges, fleet_columns, fleet_rows};
pub use rect::Rect;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{tick, TickInput};
