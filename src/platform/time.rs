//! Timer sources and event ordering
//!
//! The simulation consumes one totally ordered stream of [`GameEvent`]s.
//! [`Timeline`] builds that stream in virtual time (headless runs, replays);
//! [`spawn_timer`] feeds a real-time channel from a background thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::input::{Key, KeyAction, KeyEvent};

/// One raw event, before key translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Key(KeyEvent),
    /// Timer fired; payload counts timer events since start
    Timer(u64),
}

/// Emits `Timer(0)`, `Timer(1)`, ... at a fixed period
#[derive(Debug, Clone)]
pub struct TickClock {
    period: Duration,
    count: u64,
}

impl TickClock {
    pub fn new(period: Duration) -> Self {
        Self { period, count: 0 }
    }

    /// Virtual time at which the next tick is due. Saturates at
    /// `Duration::MAX`.
    pub fn next_due(&self) -> Duration {
        const NANOS_PER_SEC: u128 = 1_000_000_000;
        match self.period.as_nanos().checked_mul(u128::from(self.count)) {
            Some(nanos) => match u64::try_from(nanos / NANOS_PER_SEC) {
                Ok(secs) => Duration::new(secs, (nanos % NANOS_PER_SEC) as u32),
                Err(_) => Duration::MAX,
            },
            None => Duration::MAX,
        }
    }

    pub fn fire(&mut self) -> GameEvent {
        let event = GameEvent::Timer(self.count);
        self.count += 1;
        event
    }

    pub fn ticks_fired(&self) -> u64 {
        self.count
    }
}

/// A key event scheduled at a virtual time offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scheduled {
    pub at_ms: u64,
    pub key: Key,
    pub action: KeyAction,
}

impl Scheduled {
    fn event(&self) -> KeyEvent {
        KeyEvent {
            key: self.key,
            action: self.action,
            repeat: false,
        }
    }
}

/// Merges a tick clock with scheduled input into one ordered stream.
/// At equal timestamps input comes before the tick.
#[derive(Debug, Clone)]
pub struct Timeline {
    clock: TickClock,
    inputs: Vec<Scheduled>,
    next_input: usize,
    total_ticks: u64,
}

impl Timeline {
    pub fn new(period: Duration, mut inputs: Vec<Scheduled>, total_ticks: u64) -> Self {
        // Stable, so same-time inputs keep their given order
        inputs.sort_by_key(|s| s.at_ms);
        Self {
            clock: TickClock::new(period),
            inputs,
            next_input: 0,
            total_ticks,
        }
    }
}

impl Iterator for Timeline {
    type Item = GameEvent;

    fn next(&mut self) -> Option<GameEvent> {
        if self.clock.ticks_fired() >= self.total_ticks {
            return None;
        }
        let due = self.clock.next_due();
        match self.inputs.get(self.next_input) {
            Some(input) if Duration::from_millis(input.at_ms) <= due => {
                self.next_input += 1;
                Some(GameEvent::Key(input.event()))
            }
            _ => Some(self.clock.fire()),
        }
    }
}

/// Send `Timer(n)` on `sender` every `period` until `stop` is set or the
/// receiver hangs up
pub fn spawn_timer(
    period: Duration,
    sender: Sender<GameEvent>,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut clock = TickClock::new(period);
        while !stop.load(Ordering::Relaxed) {
            thread::sleep(period);
            if sender.send(clock.fire()).is_err() {
                break;
            }
        }
        log::debug!("Timer stopped after {} ticks", clock.ticks_fired());
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn at(at_ms: u64, key: Key) -> Scheduled {
        Scheduled {
            at_ms,
            key,
            action: KeyAction::Down,
        }
    }

    #[test]
    fn test_ticks_count_up() {
        let events: Vec<_> = Timeline::new(Duration::from_millis(10), Vec::new(), 3).collect();
        assert_eq!(
            events,
            vec![GameEvent::Timer(0), GameEvent::Timer(1), GameEvent::Timer(2)]
        );
    }

    #[test]
    fn test_inputs_interleave_by_time() {
        let inputs = vec![at(25, Key::KeyR), at(10, Key::Space)];
        let events: Vec<_> = Timeline::new(Duration::from_millis(10), inputs, 4).collect();
        assert_eq!(
            events,
            vec![
                GameEvent::Timer(0),
                GameEvent::Key(KeyEvent::down(Key::Space)),
                GameEvent::Timer(1),
                GameEvent::Timer(2),
                GameEvent::Key(KeyEvent::down(Key::KeyR)),
                GameEvent::Timer(3),
            ]
        );
    }

    #[test]
    fn test_due_time_keeps_growing_past_u32_ticks() {
        let clock = TickClock {
            period: Duration::from_millis(10),
            count: u64::from(u32::MAX) + 1,
        };
        assert_eq!(clock.next_due(), Duration::from_millis(10 * (1u64 << 32)));

        let far = TickClock {
            period: Duration::MAX,
            count: 2,
        };
        assert_eq!(far.next_due(), Duration::MAX);
    }

    #[test]
    fn test_inputs_after_last_tick_are_dropped() {
        let inputs = vec![at(1000, Key::Space)];
        let events: Vec<_> = Timeline::new(Duration::from_millis(10), inputs, 2).collect();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_spawned_timer_delivers_in_order() {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let handle = spawn_timer(Duration::from_millis(1), tx, stop.clone());
        let received: Vec<_> = rx.iter().take(5).collect();
        stop.store(true, Ordering::Relaxed);
        drop(rx);
        handle.join().unwrap();
        assert_eq!(
            received,
            (0..5).map(GameEvent::Timer).collect::<Vec<_>>()
        );
    }
}
