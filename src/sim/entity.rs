//! Entity model
//!
//! Every on-screen object is a circular [`Body`]. Its [`EntityId`] is what the
//! render boundary keys visuals on, so ids must stay stable for the lifetime
//! of the entity and unique within a snapshot.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What an entity is, which also decides its id prefix and visual class
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    PlayerProjectile,
    EnemyProjectile,
    Enemy,
    Wall,
    BreachHole,
}

impl EntityKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Ship => "ship",
            EntityKind::PlayerProjectile => "pbullet",
            EntityKind::EnemyProjectile => "ebullet",
            EntityKind::Enemy => "alien",
            EntityKind::Wall => "wall",
            EntityKind::BreachHole => "hole",
        }
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self, EntityKind::PlayerProjectile | EntityKind::EnemyProjectile)
    }
}

/// Stable entity identity: kind plus a sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId {
    pub kind: EntityKind,
    pub serial: u32,
}

impl EntityId {
    pub const SHIP: EntityId = EntityId {
        kind: EntityKind::Ship,
        serial: 0,
    };

    pub fn new(kind: EntityKind, serial: u32) -> Self {
        Self { kind, serial }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            // There is only ever one ship
            EntityKind::Ship => f.write_str(self.kind.prefix()),
            _ => write!(f, "{}{}", self.kind.prefix(), self.serial),
        }
    }
}

/// Upgrades bought from the shop, carried on the ship only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Upgrades {
    /// Fire three bullets per shot
    pub multishot: bool,
    /// Player bullets survive hitting enemies
    pub piercing: bool,
}

/// A circular body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrades: Option<Upgrades>,
}

impl Body {
    pub fn kind(&self) -> EntityKind {
        self.id.kind
    }
}

/// The player ship, centred near the bottom edge
pub fn make_ship() -> Body {
    Body {
        id: EntityId::SHIP,
        pos: Vec2::new(CANVAS_SIZE / 2.0, CANVAS_SIZE - SHIP_RADIUS),
        vel: Vec2::ZERO,
        radius: SHIP_RADIUS,
        upgrades: Some(Upgrades::default()),
    }
}

/// Generic factory for every non-ship kind
pub fn make_circle(kind: EntityKind, serial: u32, radius: f32, pos: Vec2, vel: Vec2) -> Body {
    Body {
        id: EntityId::new(kind, serial),
        pos,
        vel,
        radius,
        upgrades: None,
    }
}

/// `count` walls evenly spaced across the playfield at a fixed height
pub fn make_wall_row(count: u32, radius: f32) -> Vec<Body> {
    let spacing = CANVAS_SIZE / (count + 1) as f32;
    (0..count)
        .map(|i| {
            make_circle(
                EntityKind::Wall,
                i,
                radius,
                Vec2::new((i + 1) as f32 * spacing, WALL_HEIGHT),
                Vec2::ZERO,
            )
        })
        .collect()
}

/// A `rows` x `cols` fleet moving right, spaced so nobody overlaps
pub fn make_enemy_grid(rows: u32, cols: u32) -> Vec<Body> {
    let pitch = ALIEN_RADIUS * 3.0;
    (0..rows * cols)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            let pos = Vec2::new(
                col as f32 * pitch + 2.0 * ALIEN_RADIUS,
                row as f32 * pitch + 2.0 * ALIEN_RADIUS + ALIEN_TOP_MARGIN,
            );
            make_circle(EntityKind::Enemy, i, ALIEN_RADIUS, pos, Vec2::new(ALIEN_SPEED, 0.0))
        })
        .collect()
}

/// A stationary breach marker; `serial` comes from the world's object counter
pub fn make_breach_hole(serial: u32, at: Vec2) -> Body {
    make_circle(EntityKind::BreachHole, serial, HOLE_RADIUS, at, Vec2::ZERO)
}
