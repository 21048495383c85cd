//! World state
//!
//! One immutable snapshot of everything in play. Transitions never mutate a
//! published snapshot; they consume it and return the next one.

use serde::{Deserialize, Serialize};

use super::command::Upgrade;
use super::entity::{Body, make_enemy_grid, make_ship, make_wall_row};
use super::rng::Lcg;
use crate::consts::*;

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Seed the run was started with, reused on restart
    pub seed: u32,
    /// Monotonic counter for minting entity ids
    pub object_counter: u32,
    pub ship: Body,
    pub player_projectiles: Vec<Body>,
    pub enemy_projectiles: Vec<Body>,
    pub enemies: Vec<Body>,
    pub walls: Vec<Body>,
    pub breach_holes: Vec<Body>,
    /// Entities removed by the transition that produced this snapshot
    pub exiting: Vec<Body>,
    pub score: u32,
    /// Not clamped: a purchased life can bring it back above zero
    pub lives: i32,
    pub level: u32,
    pub out_of_lives: bool,
    pub enemies_breached: bool,
    pub won: bool,
    pub random: Lcg,
}

impl WorldState {
    /// The canonical starting state for a run seeded with `seed`
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            object_counter: STARTING_ALIEN_COLUMNS * STARTING_ALIEN_ROWS,
            ship: make_ship(),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            enemies: make_enemy_grid(STARTING_ALIEN_ROWS, STARTING_ALIEN_COLUMNS),
            walls: make_wall_row(STARTING_WALL_COUNT, WALL_RADIUS),
            breach_holes: Vec::new(),
            exiting: Vec::new(),
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            out_of_lives: false,
            enemies_breached: false,
            won: false,
            random: Lcg::new(seed),
        }
    }

    /// Whether the ship currently has `upgrade`. Extra lives are consumables
    /// and are never "owned".
    pub fn owns(&self, upgrade: Upgrade) -> bool {
        let upgrades = self.ship.upgrades.unwrap_or_default();
        match upgrade {
            Upgrade::Multishot => upgrades.multishot,
            Upgrade::PiercingRounds => upgrades.piercing,
            Upgrade::ExtraLife => false,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.out_of_lives || self.enemies_breached
    }

    /// Final level cleared
    pub fn is_cleared(&self) -> bool {
        self.enemies.is_empty() && self.level >= LEVEL_CAP
    }

    /// No motion happens once the run is over or won
    pub fn is_frozen(&self) -> bool {
        self.is_game_over() || self.is_cleared()
    }

    /// Every active entity, ship first, in render order
    pub fn live_bodies(&self) -> impl Iterator<Item = &Body> {
        std::iter::once(&self.ship)
            .chain(&self.breach_holes)
            .chain(&self.player_projectiles)
            .chain(&self.enemy_projectiles)
            .chain(&self.enemies)
            .chain(&self.walls)
    }

    /// Every active entity except the ship and walls, which survive a restart
    pub(crate) fn transient_bodies(&self) -> impl Iterator<Item = &Body> {
        self.player_projectiles
            .iter()
            .chain(&self.enemy_projectiles)
            .chain(&self.breach_holes)
            .chain(&self.enemies)
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new(0)
    }
}
