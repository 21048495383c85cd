//! Timer-driven simulation step
//!
//! Advances the world by one tick: enemy fire, off-playfield cleanup, level
//! progression, motion, then collision resolution.

use glam::Vec2;

use super::collision::handle_collisions;
use super::entity::{Body, EntityKind, make_circle, make_enemy_grid};
use super::state::WorldState;
use super::vector::{Axis, UP, VectorExt};
use crate::consts::*;

/// Advance the game state by one timer event
pub fn advance(state: WorldState, elapsed: u64) -> WorldState {
    // Game over or final level cleared: nothing moves any more
    if state.is_frozen() {
        return freeze(state);
    }

    let state = WorldState {
        exiting: Vec::new(),
        ..state
    };
    let state = sample_enemy_fire(state, elapsed);
    let state = cull_off_playfield(state);
    let state = if state.enemies.is_empty() {
        next_level(state)
    } else {
        integrate(state)
    };

    handle_collisions(state)
}

fn freeze(state: WorldState) -> WorldState {
    let won = !state.is_game_over() && state.is_cleared();
    if won && !state.won {
        log::info!("Final level {} cleared with score {}", state.level, state.score);
    }
    WorldState {
        exiting: Vec::new(),
        won,
        ..state
    }
}

/// Aimed straight down from just below the enemy
fn enemy_shot(serial: u32, enemy: &Body) -> Body {
    make_circle(
        EntityKind::EnemyProjectile,
        serial,
        BULLET_RADIUS,
        enemy.pos - UP * enemy.radius,
        (UP * BULLET_VELOCITY).reflect_across(Axis::Y),
    )
}

/// Each enemy rolls once, in fleet order, on every sampling tick
fn sample_enemy_fire(state: WorldState, elapsed: u64) -> WorldState {
    if elapsed % FIRE_SAMPLE_PERIOD != 0 {
        return state;
    }

    let mut random = state.random;
    let mut object_counter = state.object_counter;
    let mut enemy_projectiles = state.enemy_projectiles;
    for enemy in &state.enemies {
        let (sample, next) = random.draw();
        random = next;
        if sample <= CHANCE_TO_SHOOT {
            enemy_projectiles.push(enemy_shot(object_counter, enemy));
            object_counter += 1;
        }
    }

    WorldState {
        random,
        object_counter,
        enemy_projectiles,
        ..state
    }
}

fn off_playfield(body: &Body) -> bool {
    body.pos.y <= body.radius || body.pos.y >= CANVAS_SIZE - body.radius
}

/// Drop projectiles that reached the top or bottom edge
fn cull_off_playfield(state: WorldState) -> WorldState {
    let (player_projectiles, gone_player): (Vec<_>, Vec<_>) = state
        .player_projectiles
        .into_iter()
        .partition(|b| !off_playfield(b));
    let (enemy_projectiles, gone_enemy): (Vec<_>, Vec<_>) = state
        .enemy_projectiles
        .into_iter()
        .partition(|b| !off_playfield(b));

    let mut exiting = state.exiting;
    exiting.extend(gone_player);
    exiting.extend(gone_enemy);

    WorldState {
        player_projectiles,
        enemy_projectiles,
        exiting,
        ..state
    }
}

fn next_level(state: WorldState) -> WorldState {
    let level = state.level + 1;
    log::info!("Level {} cleared, advancing to level {}", state.level, level);

    let mut exiting = state.exiting;
    exiting.extend(state.player_projectiles);
    exiting.extend(state.enemy_projectiles);
    exiting.extend(state.breach_holes);

    WorldState {
        ship: move_ship(state.ship),
        level,
        player_projectiles: Vec::new(),
        enemy_projectiles: Vec::new(),
        breach_holes: Vec::new(),
        enemies: make_enemy_grid(STARTING_ALIEN_ROWS * level, STARTING_ALIEN_COLUMNS),
        exiting,
        ..state
    }
}

fn playfield_bounds(radius: f32) -> (Vec2, Vec2) {
    (Vec2::splat(radius), Vec2::splat(CANVAS_SIZE - radius))
}

fn move_clamped(body: Body, speed: f32) -> Body {
    let (lower, upper) = playfield_bounds(body.radius);
    Body {
        pos: (body.pos + body.vel * speed).clamp_between(lower, upper),
        ..body
    }
}

fn move_ship(ship: Body) -> Body {
    move_clamped(ship, 1.0)
}

/// Projectiles bounce off the side walls and fly freely otherwise
fn move_projectile(body: Body) -> Body {
    let outside = body.pos.x < body.radius || body.pos.x > CANVAS_SIZE - body.radius;
    let vel = if outside {
        body.vel.reflect_across(Axis::X)
    } else {
        body.vel
    };
    Body {
        pos: body.pos + vel,
        vel,
        ..body
    }
}

fn integrate(state: WorldState) -> WorldState {
    let speed = if state.enemies.len() == 1 {
        LAST_ALIEN_SPEEDUP
    } else {
        1.0
    };

    WorldState {
        ship: move_ship(state.ship),
        player_projectiles: state
            .player_projectiles
            .into_iter()
            .map(move_projectile)
            .collect(),
        enemy_projectiles: state
            .enemy_projectiles
            .into_iter()
            .map(move_projectile)
            .collect(),
        enemies: state
            .enemies
            .into_iter()
            .map(|e| move_clamped(e, speed))
            .collect(),
        ..state
    }
}
