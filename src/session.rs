//! Single-threaded game loop
//!
//! A [`Session`] owns the one current [`WorldState`]. Events are applied one
//! at a time in arrival order: each is translated, folded through
//! [`reduce`], and the result is presented before the next event is taken.

use std::sync::mpsc::Receiver;

use crate::platform::{GameEvent, InputAdapter};
use crate::renderer::{Banner, SceneRenderer, Surface};
use crate::sim::{Command, WorldState, reduce};

pub struct Session<S: Surface> {
    state: WorldState,
    input: InputAdapter,
    renderer: SceneRenderer,
    surface: S,
    events_handled: u64,
}

impl<S: Surface> Session<S> {
    pub fn new(seed: u32, input: InputAdapter, surface: S) -> Self {
        let mut session = Self {
            state: WorldState::new(seed),
            input,
            renderer: SceneRenderer::new(),
            surface,
            events_handled: 0,
        };
        session.renderer.present(&mut session.surface, &session.state);
        session
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn input(&self) -> &InputAdapter {
        &self.input
    }

    pub fn events_handled(&self) -> u64 {
        self.events_handled
    }

    /// Translate and apply one raw event. Returns the command it produced.
    pub fn handle(&mut self, event: GameEvent) -> Option<Command> {
        self.events_handled += 1;
        let command = match event {
            GameEvent::Timer(n) => Command::Tick(n),
            GameEvent::Key(key) => self.input.translate(&key)?,
        };
        self.dispatch(command);
        Some(command)
    }

    /// Fold one command into the current state and present the result
    pub fn dispatch(&mut self, command: Command) {
        let before = Banner::for_state(&self.state);
        let level = self.state.level;

        let previous = std::mem::take(&mut self.state);
        self.state = reduce(previous, command);

        let after = Banner::for_state(&self.state);
        if after != before {
            match after {
                Some(banner) => log::info!("{} (score {})", banner.message(), self.state.score),
                None => log::info!("Play resumed"),
            }
        }
        if self.state.level != level {
            log::debug!("Now on level {}", self.state.level);
        }

        self.renderer.present(&mut self.surface, &self.state);
    }

    /// Consume an ordered event stream to the end
    pub fn run<I: IntoIterator<Item = GameEvent>>(&mut self, events: I) {
        for event in events {
            self.handle(event);
        }
    }

    /// Consume events from a channel until every sender has hung up or
    /// `until` says to stop
    pub fn run_channel(
        &mut self,
        receiver: &Receiver<GameEvent>,
        mut until: impl FnMut(&Self) -> bool,
    ) {
        while let Ok(event) = receiver.recv() {
            self.handle(event);
            if until(self) {
                break;
            }
        }
    }
}
