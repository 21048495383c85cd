//! Commands and the top-level reducer
//!
//! Every external event (timer or player) is a [`Command`]. Folding a command
//! sequence through [`reduce`] from [`WorldState::new`] replays a whole game.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, EntityKind, make_circle};
use super::state::WorldState;
use super::tick::advance;
use super::vector::UP;
use crate::consts::*;

/// Upgrades sold in the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Upgrade {
    Multishot,
    ExtraLife,
    PiercingRounds,
}

impl Upgrade {
    pub const ALL: [Upgrade; 3] = [Upgrade::PiercingRounds, Upgrade::Multishot, Upgrade::ExtraLife];

    /// Shop price in score points
    pub fn price(&self) -> u32 {
        match self {
            Upgrade::Multishot => MULTISHOT_COST,
            Upgrade::ExtraLife => BUY_LIFE_COST,
            Upgrade::PiercingRounds => PIERCING_ROUNDS_COST,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Upgrade::Multishot => "multishot",
            Upgrade::ExtraLife => "extra life",
            Upgrade::PiercingRounds => "piercing",
        }
    }
}

/// A single external event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Timer fired; the payload counts timer events since start
    Tick(u64),
    /// Add to the ship's velocity (key-up sends the negated key-down delta)
    Move(Vec2),
    Fire,
    Restart,
    Purchase(Upgrade, u32),
}

/// Apply one command to a state, producing the next state
pub fn reduce(state: WorldState, command: Command) -> WorldState {
    match command {
        Command::Tick(elapsed) => advance(state, elapsed),
        Command::Move(delta) => steer(new_step(state), delta),
        Command::Fire => fire(new_step(state)),
        Command::Restart => restart(state),
        Command::Purchase(upgrade, cost) => purchase(new_step(state), upgrade, cost),
    }
}

/// Removals belong to the step that made them
fn new_step(state: WorldState) -> WorldState {
    WorldState {
        exiting: Vec::new(),
        ..state
    }
}

fn steer(state: WorldState, delta: Vec2) -> WorldState {
    let ship = Body {
        vel: state.ship.vel + delta,
        ..state.ship
    };
    WorldState { ship, ..state }
}

fn player_shot(serial: u32, ship: &Body, direction: Vec2) -> Body {
    make_circle(
        EntityKind::PlayerProjectile,
        serial,
        BULLET_RADIUS,
        ship.pos + UP * ship.radius,
        direction * BULLET_VELOCITY,
    )
}

const SINGLE_SHOT: [Vec2; 1] = [UP];
/// Straight up plus a pair at 45 degrees either side
const SPREAD_SHOT: [Vec2; 3] = [UP, Vec2::new(1.0, -1.0), Vec2::new(-1.0, -1.0)];

fn fire(state: WorldState) -> WorldState {
    let directions: &[Vec2] = if state.owns(Upgrade::Multishot) {
        &SPREAD_SHOT
    } else {
        &SINGLE_SHOT
    };

    let mut player_projectiles = state.player_projectiles;
    for (i, &direction) in directions.iter().enumerate() {
        player_projectiles.push(player_shot(
            state.object_counter + i as u32,
            &state.ship,
            direction,
        ));
    }

    WorldState {
        object_counter: state.object_counter + directions.len() as u32,
        player_projectiles,
        ..state
    }
}

/// Fresh run from the same seed. Everything the old run had in flight is
/// handed to the renderer for cleanup; the ship and walls come back under the
/// same ids.
fn restart(state: WorldState) -> WorldState {
    log::info!("Restarting (score was {}, level {})", state.score, state.level);
    let exiting = state.transient_bodies().cloned().collect();
    WorldState {
        exiting,
        ..WorldState::new(state.seed)
    }
}

fn purchase(state: WorldState, upgrade: Upgrade, cost: u32) -> WorldState {
    if state.owns(upgrade) {
        log::debug!("Already own {}, not charging", upgrade.as_str());
        return state;
    }
    if state.score < cost {
        log::debug!(
            "Cannot afford {} ({} < {})",
            upgrade.as_str(),
            state.score,
            cost
        );
        return state;
    }

    log::debug!("Bought {} for {}", upgrade.as_str(), cost);
    let score = state.score - cost;
    match upgrade {
        Upgrade::ExtraLife => {
            let lives = state.lives + 1;
            WorldState {
                score,
                lives,
                out_of_lives: lives <= 0,
                ..state
            }
        }
        Upgrade::Multishot | Upgrade::PiercingRounds => {
            let mut upgrades = state.ship.upgrades.unwrap_or_default();
            match upgrade {
                Upgrade::Multishot => upgrades.multishot = true,
                _ => upgrades.piercing = true,
            }
            let ship = Body {
                upgrades: Some(upgrades),
                ..state.ship
            };
            WorldState {
                score,
                ship,
                ..state
            }
        }
    }
}
