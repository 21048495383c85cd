//! Platform abstraction layer
//!
//! Everything that feeds commands into the simulation:
//! - Keyboard events mapped to commands
//! - Timer ticks and merging of event sources into one ordered stream
//! - A seeded autopilot that plays in place of a human

pub mod autopilot;
pub mod input;
pub mod time;

pub use autopilot::Autopilot;
pub use input::{InputAdapter, Key, KeyAction, KeyBindings, KeyEvent};
pub use time::{GameEvent, Scheduled, TickClock, Timeline, spawn_timer};
