//! Collision detection and resolution
//!
//! Everything is a circle, so detection is two distance tests. The interesting
//! part is resolution: one pass computes every interaction for the step (kills,
//! ship hits, wall breaches, fleet reversal, break-through) against the same
//! snapshot, and only then assembles the next state. Removal is set-based on
//! [`EntityId`], so an entity caught by several rules leaves exactly once.

use std::collections::BTreeSet;

use glam::Vec2;

use super::entity::{Body, EntityId, make_breach_hole};
use super::state::WorldState;
use super::vector::{Axis, VectorExt, distance};
use crate::consts::*;

/// Two bodies overlap when their centres are closer than the sum of radii
#[inline]
pub fn collides(a: &Body, b: &Body) -> bool {
    distance(a.pos, b.pos) < a.radius + b.radius
}

/// `body`'s centre lies inside `container`. Only the container's radius
/// counts, so a bullet must be well inside a hole to pass through it.
#[inline]
pub fn contains(container: &Body, body: &Body) -> bool {
    distance(body.pos, container.pos) < container.radius
}

/// Some enemy sits exactly on the left or right edge (positions are clamped)
fn fleet_touches_edge(enemies: &[Body]) -> bool {
    enemies
        .iter()
        .any(|e| e.pos.x == e.radius || e.pos.x == CANVAS_SIZE - e.radius)
}

fn drop_and_reverse(enemy: Body) -> Body {
    Body {
        vel: enemy.vel.reflect_across(Axis::X),
        pos: enemy.pos + Vec2::new(0.0, 2.0 * enemy.radius),
        ..enemy
    }
}

fn fleet_broke_through(enemies: &[Body]) -> bool {
    enemies
        .iter()
        .any(|e| e.pos.y >= ALIEN_BOUNDARY - e.radius)
}

/// Split `bodies` into survivors and the ones whose id is in `removed`
fn partition_out(bodies: Vec<Body>, removed: &BTreeSet<EntityId>) -> (Vec<Body>, Vec<Body>) {
    bodies.into_iter().partition(|b| !removed.contains(&b.id))
}

/// Resolve every interaction in `state` and return the resulting state
pub fn handle_collisions(state: WorldState) -> WorldState {
    let piercing = state.ship.upgrades.is_some_and(|u| u.piercing);

    // Player bullets against enemies
    let mut killed: BTreeSet<EntityId> = BTreeSet::new();
    let mut spent: BTreeSet<EntityId> = BTreeSet::new();
    for bullet in &state.player_projectiles {
        for enemy in &state.enemies {
            if collides(bullet, enemy) {
                killed.insert(enemy.id);
                if !piercing {
                    spent.insert(bullet.id);
                }
            }
        }
    }

    // Enemy bullets against the ship
    let ship_hits: BTreeSet<EntityId> = state
        .enemy_projectiles
        .iter()
        .filter(|b| collides(&state.ship, b))
        .map(|b| b.id)
        .collect();
    let ship_was_hit = !ship_hits.is_empty();

    // Bullets travelling through an existing breach ignore the wall
    let projectiles = || {
        state
            .player_projectiles
            .iter()
            .chain(&state.enemy_projectiles)
    };
    let in_transit: BTreeSet<EntityId> = projectiles()
        .filter(|b| state.breach_holes.iter().any(|h| contains(h, b)))
        .map(|b| b.id)
        .collect();

    // Everything else that touches a wall is absorbed and leaves a hole
    let absorbed: Vec<(EntityId, Vec2)> = projectiles()
        .filter(|b| !in_transit.contains(&b.id))
        .filter(|b| state.walls.iter().any(|w| collides(b, w)))
        .map(|b| (b.id, b.pos))
        .collect();

    let mut object_counter = state.object_counter;
    let mut breach_holes = state.breach_holes;
    for &(_, pos) in &absorbed {
        breach_holes.push(make_breach_hole(object_counter, pos));
        object_counter += 1;
    }

    // Break-through is judged on where the fleet stood before this step's drop
    let enemies_breached = state.enemies_breached || fleet_broke_through(&state.enemies);
    let enemies = if fleet_touches_edge(&state.enemies) {
        state.enemies.into_iter().map(drop_and_reverse).collect()
    } else {
        state.enemies
    };

    let mut removed = spent;
    removed.extend(ship_hits);
    removed.extend(absorbed.iter().map(|&(id, _)| id));

    let (player_projectiles, gone_player) = partition_out(state.player_projectiles, &removed);
    let (enemy_projectiles, gone_enemy) = partition_out(state.enemy_projectiles, &removed);
    let (enemies, gone_enemies) = partition_out(enemies, &killed);

    let score = state.score + gone_enemies.len() as u32;
    let lives = state.lives - i32::from(ship_was_hit);

    let mut exiting = state.exiting;
    exiting.extend(gone_enemies);
    exiting.extend(gone_player);
    exiting.extend(gone_enemy);

    WorldState {
        object_counter,
        player_projectiles,
        enemy_projectiles,
        enemies,
        breach_holes,
        exiting,
        score,
        lives,
        out_of_lives: lives <= 0,
        enemies_breached,
        ..state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EntityKind, Upgrades, make_circle};
    use proptest::prelude::*;

    fn bullet(kind: EntityKind, serial: u32, x: f32, y: f32) -> Body {
        make_circle(kind, serial, BULLET_RADIUS, Vec2::new(x, y), Vec2::ZERO)
    }

    fn enemy(serial: u32, x: f32, y: f32) -> Body {
        make_circle(
            EntityKind::Enemy,
            serial,
            ALIEN_RADIUS,
            Vec2::new(x, y),
            Vec2::new(ALIEN_SPEED, 0.0),
        )
    }

    /// A state with no walls, no enemies and nothing in flight
    fn empty_state() -> WorldState {
        WorldState {
            enemies: Vec::new(),
            walls: Vec::new(),
            ..WorldState::new(0)
        }
    }

    fn ids(bodies: &[Body]) -> Vec<EntityId> {
        bodies.iter().map(|b| b.id).collect()
    }

    #[test]
    fn test_player_bullet_kills_enemy() {
        let state = WorldState {
            player_projectiles: vec![bullet(EntityKind::PlayerProjectile, 30, 100.0, 100.0)],
            enemies: vec![enemy(0, 100.0, 105.0), enemy(1, 200.0, 100.0)],
            ..empty_state()
        };
        let next = handle_collisions(state);
        assert_eq!(next.score, 1);
        assert!(next.player_projectiles.is_empty());
        assert_eq!(ids(&next.enemies), vec![EntityId::new(EntityKind::Enemy, 1)]);
        assert_eq!(next.exiting.len(), 2);
    }

    #[test]
    fn test_piercing_bullet_survives_kill() {
        let mut state = WorldState {
            player_projectiles: vec![bullet(EntityKind::PlayerProjectile, 30, 100.0, 100.0)],
            enemies: vec![enemy(0, 100.0, 105.0)],
            ..empty_state()
        };
        state.ship.upgrades = Some(Upgrades {
            multishot: false,
            piercing: true,
        });
        let next = handle_collisions(state);
        assert_eq!(next.score, 1);
        assert_eq!(next.player_projectiles.len(), 1);
        assert!(next.enemies.is_empty());
    }

    #[test]
    fn test_two_bullets_one_enemy_scores_once() {
        let state = WorldState {
            player_projectiles: vec![
                bullet(EntityKind::PlayerProjectile, 30, 100.0, 100.0),
                bullet(EntityKind::PlayerProjectile, 31, 102.0, 100.0),
            ],
            enemies: vec![enemy(0, 101.0, 104.0)],
            ..empty_state()
        };
        let next = handle_collisions(state);
        assert_eq!(next.score, 1);
        assert!(next.player_projectiles.is_empty());
        assert_eq!(next.exiting.len(), 3);
    }

    #[test]
    fn test_enemy_bullet_hits_ship() {
        let state = empty_state();
        let ship_pos = state.ship.pos;
        let state = WorldState {
            enemy_projectiles: vec![
                bullet(EntityKind::EnemyProjectile, 40, ship_pos.x, ship_pos.y - 5.0),
                bullet(EntityKind::EnemyProjectile, 41, ship_pos.x + 2.0, ship_pos.y),
                bullet(EntityKind::EnemyProjectile, 42, 20.0, 20.0),
            ],
            ..state
        };
        let next = handle_collisions(state);
        // Several bullets in one step still cost a single life
        assert_eq!(next.lives, STARTING_LIVES - 1);
        assert!(next.out_of_lives);
        assert_eq!(
            ids(&next.enemy_projectiles),
            vec![EntityId::new(EntityKind::EnemyProjectile, 42)]
        );
    }

    #[test]
    fn test_wall_absorbs_bullet_and_leaves_hole() {
        let state = WorldState {
            walls: vec![make_circle(
                EntityKind::Wall,
                0,
                WALL_RADIUS,
                Vec2::new(100.0, 500.0),
                Vec2::ZERO,
            )],
            enemy_projectiles: vec![bullet(EntityKind::EnemyProjectile, 40, 100.0, 465.0)],
            object_counter: 50,
            ..empty_state()
        };
        let next = handle_collisions(state);
        assert!(next.enemy_projectiles.is_empty());
        assert_eq!(next.breach_holes.len(), 1);
        let hole = &next.breach_holes[0];
        assert_eq!(hole.id, EntityId::new(EntityKind::BreachHole, 50));
        assert_eq!(hole.pos, Vec2::new(100.0, 465.0));
        assert_eq!(hole.radius, HOLE_RADIUS);
        assert_eq!(next.object_counter, 51);
        assert_eq!(ids(&next.exiting), vec![EntityId::new(EntityKind::EnemyProjectile, 40)]);
    }

    #[test]
    fn test_bullet_inside_hole_passes_wall() {
        let state = WorldState {
            walls: vec![make_circle(
                EntityKind::Wall,
                0,
                WALL_RADIUS,
                Vec2::new(100.0, 500.0),
                Vec2::ZERO,
            )],
            breach_holes: vec![make_breach_hole(60, Vec2::new(100.0, 465.0))],
            player_projectiles: vec![bullet(EntityKind::PlayerProjectile, 30, 100.0, 470.0)],
            ..empty_state()
        };
        let next = handle_collisions(state);
        assert_eq!(next.player_projectiles.len(), 1);
        assert_eq!(next.breach_holes.len(), 1);
        assert!(next.exiting.is_empty());
    }

    #[test]
    fn test_bullet_on_hole_rim_is_absorbed() {
        // Overlapping the hole but with its centre outside the hole's radius
        let state = WorldState {
            walls: vec![make_circle(
                EntityKind::Wall,
                0,
                WALL_RADIUS,
                Vec2::new(100.0, 500.0),
                Vec2::ZERO,
            )],
            breach_holes: vec![make_breach_hole(60, Vec2::new(100.0, 465.0))],
            player_projectiles: vec![bullet(EntityKind::PlayerProjectile, 30, 100.0, 477.0)],
            object_counter: 70,
            ..empty_state()
        };
        assert!(collides(&state.breach_holes[0], &state.player_projectiles[0]));
        assert!(!contains(&state.breach_holes[0], &state.player_projectiles[0]));

        let next = handle_collisions(state);
        assert!(next.player_projectiles.is_empty());
        assert_eq!(next.breach_holes.len(), 2);
        let minted = &next.breach_holes[1];
        assert_eq!(minted.id, EntityId::new(EntityKind::BreachHole, 70));
        assert_eq!(minted.pos, Vec2::new(100.0, 477.0));
        assert_eq!(next.object_counter, 71);
        assert_eq!(ids(&next.exiting), vec![EntityId::new(EntityKind::PlayerProjectile, 30)]);
    }

    #[test]
    fn test_bullet_touching_two_walls_makes_one_hole() {
        let wall = |serial, x| {
            make_circle(EntityKind::Wall, serial, WALL_RADIUS, Vec2::new(x, 500.0), Vec2::ZERO)
        };
        let state = WorldState {
            walls: vec![wall(0, 100.0), wall(1, 170.0)],
            player_projectiles: vec![bullet(EntityKind::PlayerProjectile, 30, 135.0, 500.0)],
            ..empty_state()
        };
        let next = handle_collisions(state);
        assert_eq!(next.breach_holes.len(), 1);
        assert_eq!(next.exiting.len(), 1);
    }

    #[test]
    fn test_bullet_hitting_enemy_and_wall_exits_once() {
        let state = WorldState {
            walls: vec![make_circle(
                EntityKind::Wall,
                0,
                WALL_RADIUS,
                Vec2::new(100.0, 500.0),
                Vec2::ZERO,
            )],
            enemies: vec![enemy(0, 100.0, 456.0)],
            player_projectiles: vec![bullet(EntityKind::PlayerProjectile, 30, 100.0, 462.0)],
            ..empty_state()
        };
        let next = handle_collisions(state);
        assert_eq!(next.score, 1);
        assert_eq!(next.breach_holes.len(), 1);
        let bullet_exits = next
            .exiting
            .iter()
            .filter(|b| b.kind() == EntityKind::PlayerProjectile)
            .count();
        assert_eq!(bullet_exits, 1);
    }

    #[test]
    fn test_fleet_reverses_at_right_edge() {
        let state = WorldState {
            enemies: vec![enemy(0, CANVAS_SIZE - ALIEN_RADIUS, 50.0), enemy(1, 300.0, 80.0)],
            ..empty_state()
        };
        let next = handle_collisions(state);
        assert_eq!(next.enemies[0].pos, Vec2::new(CANVAS_SIZE - ALIEN_RADIUS, 62.0));
        assert_eq!(next.enemies[1].pos, Vec2::new(300.0, 92.0));
        assert!(next.enemies.iter().all(|e| e.vel == Vec2::new(-ALIEN_SPEED, 0.0)));
    }

    #[test]
    fn test_fleet_reverses_at_left_edge() {
        let heading_left = |serial, x, y| Body {
            vel: Vec2::new(-ALIEN_SPEED, 0.0),
            ..enemy(serial, x, y)
        };
        let state = WorldState {
            enemies: vec![heading_left(0, 200.0, 80.0), heading_left(1, ALIEN_RADIUS, 50.0)],
            ..empty_state()
        };
        let next = handle_collisions(state);
        assert_eq!(next.enemies[0].pos, Vec2::new(200.0, 92.0));
        assert_eq!(next.enemies[1].pos, Vec2::new(ALIEN_RADIUS, 62.0));
        assert!(next.enemies.iter().all(|e| e.vel == Vec2::new(ALIEN_SPEED, 0.0)));
    }

    #[test]
    fn test_fleet_near_but_not_on_edge_keeps_going() {
        let state = WorldState {
            enemies: vec![enemy(0, CANVAS_SIZE - ALIEN_RADIUS - 0.5, 50.0)],
            ..empty_state()
        };
        let next = handle_collisions(state);
        assert_eq!(next.enemies[0].pos.y, 50.0);
        assert_eq!(next.enemies[0].vel.x, ALIEN_SPEED);
    }

    #[test]
    fn test_breach_at_bottom() {
        let state = WorldState {
            enemies: vec![enemy(0, 300.0, ALIEN_BOUNDARY - ALIEN_RADIUS)],
            ..empty_state()
        };
        let next = handle_collisions(state);
        assert!(next.enemies_breached);
        assert!(next.is_game_over());
    }

    #[test]
    fn test_drop_onto_boundary_breaches_next_step() {
        let start_y = ALIEN_BOUNDARY - ALIEN_RADIUS - 10.0;
        let state = WorldState {
            enemies: vec![enemy(0, CANVAS_SIZE - ALIEN_RADIUS, start_y)],
            ..empty_state()
        };
        let next = handle_collisions(state);
        assert_eq!(next.enemies[0].pos.y, start_y + 2.0 * ALIEN_RADIUS);
        assert!(!next.enemies_breached);
        assert!(handle_collisions(next).enemies_breached);
    }

    #[test]
    fn test_breach_is_sticky() {
        let state = WorldState {
            enemies_breached: true,
            enemies: vec![enemy(0, 300.0, 50.0)],
            ..empty_state()
        };
        assert!(handle_collisions(state).enemies_breached);
    }

    #[test]
    fn test_exiting_from_earlier_in_the_step_is_kept() {
        let culled = bullet(EntityKind::PlayerProjectile, 5, 300.0, 1.0);
        let state = WorldState {
            exiting: vec![culled.clone()],
            ..empty_state()
        };
        assert_eq!(handle_collisions(state).exiting, vec![culled]);
    }

    fn arb_body() -> impl Strategy<Value = Body> {
        (0.0f32..600.0, 0.0f32..600.0, 1.0f32..40.0, 0u32..100).prop_map(|(x, y, r, serial)| {
            make_circle(EntityKind::Enemy, serial, r, Vec2::new(x, y), Vec2::ZERO)
        })
    }

    fn arb_bullet(kind: EntityKind) -> impl Strategy<Value = Body> {
        (0.0f32..600.0, 0.0f32..600.0).prop_map(move |(x, y)| {
            make_circle(kind, 0, BULLET_RADIUS, Vec2::new(x, y), Vec2::ZERO)
        })
    }

    fn with_serials(mut bodies: Vec<Body>, start: u32) -> Vec<Body> {
        for (i, b) in bodies.iter_mut().enumerate() {
            b.id.serial = start + i as u32;
        }
        bodies
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in arb_body(), b in arb_body()) {
            prop_assert_eq!(collides(&a, &b), collides(&b, &a));
        }

        #[test]
        fn exiting_never_overlaps_survivors(
            player in prop::collection::vec(arb_bullet(EntityKind::PlayerProjectile), 0..12),
            enemy_fire in prop::collection::vec(arb_bullet(EntityKind::EnemyProjectile), 0..12),
            holes in prop::collection::vec((0.0f32..600.0, 0.0f32..600.0), 0..4),
        ) {
            let base = WorldState::new(0);
            let state = WorldState {
                player_projectiles: with_serials(player, 100),
                enemy_projectiles: with_serials(enemy_fire, 200),
                breach_holes: holes
                    .into_iter()
                    .enumerate()
                    .map(|(i, (x, y))| make_breach_hole(300 + i as u32, Vec2::new(x, y)))
                    .collect(),
                object_counter: 400,
                ..base
            };
            let next = handle_collisions(state);
            let exiting: BTreeSet<EntityId> = next.exiting.iter().map(|b| b.id).collect();
            prop_assert_eq!(exiting.len(), next.exiting.len());
            for body in next.live_bodies() {
                prop_assert!(!exiting.contains(&body.id), "{} exited but is still live", body.id);
            }
        }
    }
}
