//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Every transition consumes a state and returns a new one
//! - Seeded LCG only, threaded through the state
//! - Stable iteration order (collection order, removal by entity id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod command;
pub mod entity;
pub mod rng;
pub mod state;
pub mod tick;
pub mod vector;

pub use collision::{collides, contains, handle_collisions};
pub use command::{Command, Upgrade, reduce};
pub use entity::{Body, EntityId, EntityKind, Upgrades};
pub use rng::Lcg;
pub use state::WorldState;
pub use tick::advance;
pub use vector::{Axis, Vector, VectorExt, distance};
