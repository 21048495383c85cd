//! Keyboard input mapping
//!
//! Raw key transitions become [`Command`]s. Movement is expressed as a
//! velocity delta on key-down and the opposite delta on key-up, so holding
//! both arrows and releasing one leaves the ship moving the other way.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SHIP_SPEED;
use crate::sim::{Command, Upgrade};

/// Physical key codes, named like DOM `KeyboardEvent.code`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Enter,
    Escape,
    KeyA,
    KeyD,
    KeyI,
    KeyO,
    KeyP,
    KeyR,
    KeyS,
    KeyW,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub action: KeyAction,
    /// Auto-repeat from a held key
    pub repeat: bool,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Down,
            repeat: false,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Up,
            repeat: false,
        }
    }
}

/// Which key does what
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: Key,
    pub move_right: Key,
    pub fire: Key,
    pub restart: Key,
    pub buy_piercing: Key,
    pub buy_multishot: Key,
    pub buy_life: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: Key::ArrowLeft,
            move_right: Key::ArrowRight,
            fire: Key::Space,
            restart: Key::KeyR,
            buy_piercing: Key::KeyI,
            buy_multishot: Key::KeyO,
            buy_life: Key::KeyP,
        }
    }
}

impl KeyBindings {
    /// Key that buys `upgrade`
    pub fn purchase_key(&self, upgrade: Upgrade) -> Key {
        match upgrade {
            Upgrade::PiercingRounds => self.buy_piercing,
            Upgrade::Multishot => self.buy_multishot,
            Upgrade::ExtraLife => self.buy_life,
        }
    }
}

/// Maps key events to commands using a set of bindings
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    bindings: KeyBindings,
}

impl InputAdapter {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// The command for `event`, or `None` if it should be ignored
    pub fn translate(&self, event: &KeyEvent) -> Option<Command> {
        if event.repeat {
            return None;
        }

        let b = &self.bindings;
        let key = event.key;
        let pressed = event.action == KeyAction::Down;

        let steer = |dx: f32| {
            let delta = Vec2::new(dx, 0.0);
            Command::Move(if pressed { delta } else { -delta })
        };

        if key == b.move_left {
            return Some(steer(-SHIP_SPEED));
        }
        if key == b.move_right {
            return Some(steer(SHIP_SPEED));
        }
        if !pressed {
            return None;
        }
        if key == b.fire {
            return Some(Command::Fire);
        }
        if key == b.restart {
            return Some(Command::Restart);
        }
        Upgrade::ALL
            .into_iter()
            .find(|&u| key == b.purchase_key(u))
            .map(|u| Command::Purchase(u, u.price()))
    }
}
