use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Everything the game loop reacts to
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    /// Nothing arrived before the wake-up time; timers may be due
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait GameEventSource {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread and hands them over a channel
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // windows reports releases too; a release must not count as a press
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => GameEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => GameEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed source for tests
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the game one event at a time.
///
/// Waits at most one tick interval so the live readout keeps moving, and
/// less than that when a round timer is due sooner.
pub struct Runner<E: GameEventSource> {
    event_source: E,
    tick: Duration,
}

impl<E: GameEventSource> Runner<E> {
    pub fn new(event_source: E, tick: Duration) -> Self {
        Self { event_source, tick }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// How long to block given the next pending round deadline
    pub fn wait_for(&self, now: Instant, deadline: Option<Instant>) -> Duration {
        match deadline {
            Some(at) => at.saturating_duration_since(now).min(self.tick),
            None => self.tick,
        }
    }

    /// Returns the next event, or `Tick` when the wait runs out
    pub fn step(&self, deadline: Option<Instant>) -> GameEvent {
        let wait = self.wait_for(Instant::now(), deadline);
        match self.event_source.recv_timeout(wait) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                GameEvent::Tick
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(1));
        assert!(matches!(runner.step(None), GameEvent::Tick));
    }

    #[test]
    fn step_passes_through_keys() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
        )))
        .unwrap();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(10));
        match runner.step(None) {
            GameEvent::Key(key) => assert_eq!(key.code, KeyCode::Char('q')),
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn disconnected_source_yields_tick() {
        let (tx, rx) = mpsc::channel::<GameEvent>();
        drop(tx);
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(10));
        assert!(matches!(runner.step(None), GameEvent::Tick));
    }

    #[test]
    fn wait_is_capped_by_deadline() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(100));
        let now = Instant::now();

        assert_eq!(runner.wait_for(now, None), Duration::from_millis(100));
        assert_eq!(
            runner.wait_for(now, Some(now + Duration::from_millis(30))),
            Duration::from_millis(30)
        );
        assert_eq!(
            runner.wait_for(now, Some(now + Duration::from_secs(5))),
            Duration::from_millis(100)
        );
        // overdue deadline: don't block at all
        assert_eq!(
            runner.wait_for(now + Duration::from_secs(1), Some(now)),
            Duration::ZERO
        );
    }
}
