//! Rendering boundary
//!
//! The simulation never draws. After every transition a [`SceneRenderer`]
//! mirrors the new [`WorldState`] onto a [`Surface`]: visuals are keyed by
//! entity id, created on first sight, moved every frame and removed when the
//! entity shows up in `exiting`.

pub mod text;

pub use text::TextSurface;

use glam::Vec2;

use crate::consts::BUY_LIFE_COST;
use crate::sim::{Body, EntityId, WorldState};

/// Terminal message shown over the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    /// Invaders reached the bottom; no purchase can fix that
    Breached,
    /// Out of lives, but a life can be bought
    Revivable,
    GameOver,
    Victory,
}

impl Banner {
    pub fn for_state(state: &WorldState) -> Option<Banner> {
        if state.enemies_breached {
            Some(Banner::Breached)
        } else if state.out_of_lives && state.score >= BUY_LIFE_COST {
            Some(Banner::Revivable)
        } else if state.out_of_lives {
            Some(Banner::GameOver)
        } else if state.is_cleared() {
            Some(Banner::Victory)
        } else {
            None
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Banner::Breached => "GAME OVER! The invaders broke through",
            Banner::Revivable => "Buy Life 'P' to Resume!",
            Banner::GameOver => "GAME OVER!",
            Banner::Victory => "YOU BEAT THE GAME!!!",
        }
    }
}

/// Heads-up display contents
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub level: u32,
    pub lives: i32,
    /// Labels of owned upgrades
    pub upgrades: Vec<&'static str>,
    pub banner: Option<Banner>,
}

impl Hud {
    pub fn from_state(state: &WorldState) -> Self {
        let owned = state.ship.upgrades.unwrap_or_default();
        let mut upgrades = Vec::new();
        if owned.multishot {
            upgrades.push("multishot");
        }
        if owned.piercing {
            upgrades.push("piercing");
        }
        Self {
            score: state.score,
            level: state.level,
            lives: state.lives,
            upgrades,
            banner: Banner::for_state(state),
        }
    }
}

/// Something that can display bodies keyed by id
pub trait Surface {
    fn contains(&self, id: EntityId) -> bool;
    /// Create a visual for a body not yet shown
    fn create(&mut self, body: &Body);
    fn move_to(&mut self, id: EntityId, pos: Vec2);
    /// Remove a visual; returns `false` if there was nothing to remove
    fn remove(&mut self, id: EntityId) -> bool;
    fn set_hud(&mut self, hud: &Hud);
}

/// Applies world states to a surface
#[derive(Debug, Default)]
pub struct SceneRenderer {
    frames: u64,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn present<S: Surface + ?Sized>(&mut self, surface: &mut S, state: &WorldState) {
        // Removals go first: a restart re-creates walls and the fleet under
        // ids that may also be listed as exiting
        for body in &state.exiting {
            if !surface.remove(body.id) {
                log::debug!("Already removed: {}", body.id);
            }
        }

        for body in state.live_bodies() {
            if !surface.contains(body.id) {
                surface.create(body);
            }
            surface.move_to(body.id, body.pos);
        }

        surface.set_hud(&Hud::from_state(state));
        self.frames += 1;
    }
}
