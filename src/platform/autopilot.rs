//! Demo autopilot
//!
//! Plays the game through the same key events a human would produce. It uses
//! its own seeded RNG so a demo run is reproducible, and never touches the
//! simulation's generator.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::input::{Key, KeyBindings, KeyEvent};
use crate::consts::*;
use crate::sim::{Body, Upgrade, WorldState};

/// Ticks between shots
const FIRE_COOLDOWN: u32 = 12;
/// Horizontal distance at which the ship counts as lined up
const AIM_TOLERANCE: f32 = 6.0;
/// How far above the ship incoming fire is worth dodging
const DODGE_RANGE: f32 = 60.0;

pub struct Autopilot {
    rng: Pcg32,
    bindings: KeyBindings,
    holding: Option<Key>,
    cooldown: u32,
}

impl Autopilot {
    pub fn new(seed: u64, bindings: KeyBindings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            bindings,
            holding: None,
            cooldown: 0,
        }
    }

    /// Key events to send before the next tick
    pub fn poll(&mut self, state: &WorldState) -> Vec<KeyEvent> {
        let mut events = Vec::new();

        if state.is_frozen() {
            self.release(&mut events);
            if state.out_of_lives && !state.enemies_breached && state.score >= BUY_LIFE_COST {
                self.tap(self.bindings.buy_life, &mut events);
            } else if self.rng.random_bool(0.02) {
                self.tap(self.bindings.restart, &mut events);
            }
            return events;
        }

        self.shop(state, &mut events);

        let steer = self.choose_direction(state);
        if steer != self.holding {
            self.release(&mut events);
            if let Some(key) = steer {
                events.push(KeyEvent::down(key));
                self.holding = Some(key);
            }
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        let lined_up =
            target(state).is_some_and(|t| (t.pos.x - state.ship.pos.x).abs() < AIM_TOLERANCE);
        if self.cooldown == 0 && (lined_up || self.rng.random_bool(0.05)) {
            self.tap(self.bindings.fire, &mut events);
            self.cooldown = FIRE_COOLDOWN;
        }

        events
    }

    fn shop(&mut self, state: &WorldState, events: &mut Vec<KeyEvent>) {
        for upgrade in [Upgrade::PiercingRounds, Upgrade::Multishot] {
            if !state.owns(upgrade) && state.score >= upgrade.price() && self.rng.random_bool(0.1) {
                log::debug!("Autopilot buying {}", upgrade.as_str());
                self.tap(self.bindings.purchase_key(upgrade), events);
                return;
            }
        }
    }

    fn choose_direction(&mut self, state: &WorldState) -> Option<Key> {
        let ship = &state.ship;

        // Dodge the closest incoming bullet first
        let threat = state
            .enemy_projectiles
            .iter()
            .filter(|b| b.pos.y < ship.pos.y && ship.pos.y - b.pos.y < DODGE_RANGE)
            .filter(|b| (b.pos.x - ship.pos.x).abs() < ship.radius + b.radius + 4.0)
            .min_by(|a, b| b.pos.y.total_cmp(&a.pos.y));
        if let Some(bullet) = threat {
            let go_left = (bullet.pos.x >= ship.pos.x && ship.pos.x > ship.radius + 20.0)
                || ship.pos.x >= CANVAS_SIZE - ship.radius - 20.0;
            return Some(if go_left {
                self.bindings.move_left
            } else {
                self.bindings.move_right
            });
        }

        let dx = target(state)?.pos.x - ship.pos.x;
        if dx.abs() < AIM_TOLERANCE / 2.0 {
            None
        } else if dx < 0.0 {
            Some(self.bindings.move_left)
        } else {
            Some(self.bindings.move_right)
        }
    }

    fn release(&mut self, events: &mut Vec<KeyEvent>) {
        if let Some(key) = self.holding.take() {
            events.push(KeyEvent::up(key));
        }
    }

    fn tap(&self, key: Key, events: &mut Vec<KeyEvent>) {
        events.push(KeyEvent::down(key));
        events.push(KeyEvent::up(key));
    }
}

/// The lowest enemy, since it is the most urgent one
fn target(state: &WorldState) -> Option<&Body> {
    state
        .enemies
        .iter()
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y).then(b.pos.x.total_cmp(&a.pos.x)))
}
