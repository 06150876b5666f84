//! Entity primitives
//!
//! Each entity owns its position, size and lifecycle state. Rects are
//! derived from float positions on demand so sub-pixel speed accumulation
//! never rounds away.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::{ALIEN_DEATH_TICKS, SHIP_DEATH_TICKS, UFO_DEATH_TICKS};
use crate::settings::Settings;

/// Ship lifecycle. Dying steps once per tick until the animation completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipState {
    Alive,
    Dying { ticks_left: u32 },
}

/// The player's ship. Created once per session, recentered on respawn.
#[derive(Debug, Clone)]
pub struct Ship {
    /// Horizontal center, float for sub-pixel accumulation
    pub x: f32,
    pub y: f32,
    pub size: Vec2,
    pub moving_left: bool,
    pub moving_right: bool,
    pub state: ShipState,
}

impl Ship {
    pub fn new(settings: &Settings) -> Self {
        let mut ship = Self {
            x: 0.0,
            y: settings.screen_height - settings.ship_height - 10.0,
            size: Vec2::new(settings.ship_width, settings.ship_height),
            moving_left: false,
            moving_right: false,
            state: ShipState::Alive,
        };
        ship.center(settings);
        ship
    }

    /// Recenter at the bottom of the screen (new game or respawn)
    pub fn center(&mut self, settings: &Settings) {
        self.x = settings.screen_width / 2.0;
        self.y = settings.screen_height - settings.ship_height - 10.0;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x - self.size.x / 2.0, self.y, self.size.x, self.size.y)
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.state, ShipState::Alive)
    }

    /// Apply held movement intents, clamped to the screen
    pub fn update_movement(&mut self, settings: &Settings, dt: f32) {
        if self.moving_right {
            self.x += settings.ship_speed * dt;
        }
        if self.moving_left {
            self.x -= settings.ship_speed * dt;
        }
        let half = self.size.x / 2.0;
        self.x = self.x.clamp(half, settings.screen_width - half);
    }

    /// Enter the dying animation
    pub fn begin_death(&mut self) {
        self.state = ShipState::Dying {
            ticks_left: SHIP_DEATH_TICKS,
        };
    }

    /// Step the death animation one tick. Returns true when it completes.
    pub fn step_death(&mut self, dt: f32) -> bool {
        match self.state {
            ShipState::Dying { ticks_left } if ticks_left > 0 => {
                // Wreck sinks slowly while the animation plays
                self.y += 20.0 * dt;
                self.state = ShipState::Dying {
                    ticks_left: ticks_left - 1,
                };
                ticks_left == 1
            }
            ShipState::Dying { .. } => true,
            ShipState::Alive => false,
        }
    }

    /// Return to play after a respawn
    pub fn revive(&mut self, settings: &Settings) {
        self.state = ShipState::Alive;
        self.moving_left = false;
        self.moving_right = false;
        self.center(settings);
    }
}

/// Fleet row tier; determines point value and sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlienTier {
    /// Rows 0-1 (top of the fleet)
    Tier1,
    /// Rows 2-3
    Tier2,
    /// Rows 4 and below
    Tier3,
}

impl AlienTier {
    pub fn for_row(row: usize) -> Self {
        match row {
            0 | 1 => AlienTier::Tier1,
            2 | 3 => AlienTier::Tier2,
            _ => AlienTier::Tier3,
        }
    }
}

/// Alien lifecycle. Dying aliens keep animating but no longer collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlienState {
    Alive,
    Dying { ticks_left: u32 },
}

/// One fleet member
#[derive(Debug, Clone)]
pub struct Alien {
    pub pos: Vec2,
    pub size: Vec2,
    pub tier: AlienTier,
    pub state: AlienState,
}

impl Alien {
    pub fn new(pos: Vec2, settings: &Settings, tier: AlienTier) -> Self {
        Self {
            pos,
            size: Vec2::new(settings.alien_width, settings.alien_height),
            tier,
            state: AlienState::Alive,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.state, AlienState::Alive)
    }

    /// True if this alien sits at a horizontal screen edge
    pub fn at_edge(&self, settings: &Settings) -> bool {
        let rect = self.rect();
        rect.right() >= settings.screen_width || rect.left() <= 0.0
    }

    pub fn begin_death(&mut self) {
        self.state = AlienState::Dying {
            ticks_left: ALIEN_DEATH_TICKS,
        };
    }

    /// Step the dying animation. Returns true when the alien should be removed.
    pub fn step_death(&mut self) -> bool {
        match self.state {
            AlienState::Dying { ticks_left } if ticks_left > 1 => {
                self.state = AlienState::Dying {
                    ticks_left: ticks_left - 1,
                };
                false
            }
            AlienState::Dying { .. } => true,
            AlienState::Alive => false,
        }
    }
}

/// Bonus enemy crossing the top of the screen
#[derive(Debug, Clone)]
pub struct Ufo {
    pub x: f32,
    pub y: f32,
    pub size: Vec2,
    /// Randomized point value picked at spawn
    pub score: u32,
    pub dying_ticks: Option<u32>,
}

impl Ufo {
    pub fn new(settings: &Settings, score: u32) -> Self {
        Self {
            x: -settings.ufo_width,
            y: 30.0,
            size: Vec2::new(settings.ufo_width, settings.ufo_height),
            score,
            dying_ticks: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.size.x, self.size.y)
    }

    pub fn is_alive(&self) -> bool {
        self.dying_ticks.is_none()
    }

    pub fn begin_death(&mut self) {
        self.dying_ticks = Some(UFO_DEATH_TICKS);
    }

    /// Advance one tick. Returns true when the UFO should be removed.
    pub fn update(&mut self, settings: &Settings, dt: f32) -> bool {
        match self.dying_ticks {
            Some(0) | Some(1) => true,
            Some(t) => {
                self.dying_ticks = Some(t - 1);
                false
            }
            None => {
                self.x += settings.ufo_speed * dt;
                self.x > settings.screen_width
            }
        }
    }
}

/// Player projectile, travels up
#[derive(Debug, Clone)]
pub struct Bullet {
    pub x: f32,
    /// Float y for smooth motion
    pub y: f32,
    pub size: Vec2,
    pub speed: f32,
}

impl Bullet {
    /// Fired from the ship's nose
    pub fn fire(settings: &Settings, ship: &Ship) -> Self {
        Self {
            x: ship.x,
            y: ship.rect().top(),
            size: Vec2::new(settings.bullet_width, settings.bullet_height),
            speed: settings.bullet_speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x - self.size.x / 2.0, self.y, self.size.x, self.size.y)
    }

    pub fn update(&mut self, dt: f32) {
        self.y -= self.speed * dt;
    }

    pub fn offscreen(&self) -> bool {
        self.rect().bottom() <= 0.0
    }
}

/// Alien projectile, travels down
#[derive(Debug, Clone)]
pub struct Beam {
    pub x: f32,
    pub y: f32,
    pub size: Vec2,
    pub speed: f32,
}

impl Beam {
    /// Fired from an alien's underside
    pub fn fire(settings: &Settings, alien: &Alien) -> Self {
        Self {
            x: alien.rect().center().x,
            y: alien.rect().bottom(),
            size: Vec2::new(settings.beam_width, settings.beam_height),
            speed: settings.beam_speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x - self.size.x / 2.0, self.y, self.size.x, self.size.y)
    }

    pub fn update(&mut self, dt: f32) {
        self.y += self.speed * dt;
    }

    pub fn offscreen(&self, settings: &Settings) -> bool {
        self.rect().top() >= settings.screen_height
    }
}

/// Which edge a bunker block was last damaged from (visual handle)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitEdge {
    Top,
    Bottom,
}

/// One destructible block of a bunker
#[derive(Debug, Clone)]
pub struct BunkerBlock {
    pub rect: Rect,
    pub hp: u8,
    pub last_hit: Option<HitEdge>,
}

impl BunkerBlock {
    pub fn new(rect: Rect, hp: u8) -> Self {
        Self {
            rect,
            hp,
            last_hit: None,
        }
    }

    /// Apply one point of damage from the given edge.
    /// Returns true when the block is destroyed.
    pub fn damage(&mut self, edge: HitEdge) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.last_hit = Some(edge);
        self.hp == 0
    }
}

/// Decorative background star, drifts slowly downward and wraps
#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub drift: f32,
}

impl Star {
    pub fn update(&mut self, settings: &Settings, dt: f32) {
        self.pos.y += self.drift * dt;
        if self.pos.y > settings.screen_height {
            self.pos.y = 0.0;
        }
    }
}
