use std::ops::Range;
use std::time::{Duration, Instant};

use rand::{seq::SliceRandom, Rng};
use tracing::{debug, info};

use crate::difficulty::Difficulty;

/// Symbols a round can ask for
pub const SYMBOLS: [char; 36] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Wait before the reveal, identical for every difficulty
pub const REVEAL_DELAY_MS: Range<u64> = 1500..3500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Hit { target: char, elapsed: Duration },
    Timeout { target: char },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Idle,
    ArmedWaiting {
        reveal_at: Instant,
    },
    KeyShown {
        target: char,
        armed_at: Instant,
        deadline: Instant,
    },
    Resolved(Resolution),
}

/// What happened when the controller was advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    Revealed { target: char },
    Hit { target: char, elapsed: Duration },
    TimedOut { target: char },
}

/// How a hit is described to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Exceptional,
    Great,
    Good,
    TooSlow,
}

impl Verdict {
    pub fn classify(elapsed_ms: u64, difficulty: Difficulty) -> Self {
        match elapsed_ms {
            0..=200 => Verdict::Exceptional,
            201..=300 => Verdict::Great,
            ms if ms <= difficulty.timeout_ms() => Verdict::Good,
            _ => Verdict::TooSlow,
        }
    }

    pub fn within_limit(self) -> bool {
        !matches!(self, Verdict::TooSlow)
    }
}

/// One round at a time: wait a random delay, show a symbol, time the answer.
///
/// Nothing here reads the clock; every transition takes `now` so the event
/// loop (or a test) decides what time it is.
#[derive(Debug, Clone)]
pub struct RoundController {
    state: RoundState,
    difficulty: Difficulty,
}

impl Default for RoundController {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundController {
    pub fn new() -> Self {
        Self {
            state: RoundState::Idle,
            difficulty: Difficulty::default(),
        }
    }

    /// Arm a new round. Anything pending from a previous round is dropped.
    pub fn start<R: Rng>(&mut self, difficulty: Difficulty, now: Instant, rng: &mut R) {
        self.state = RoundState::Idle;
        self.difficulty = difficulty;

        let delay = Duration::from_millis(rng.gen_range(REVEAL_DELAY_MS));
        self.state = RoundState::ArmedWaiting {
            reveal_at: now + delay,
        };
        info!(%difficulty, delay_ms = delay.as_millis() as u64, "round armed");
    }

    /// Fire whichever deadline has passed, if any
    pub fn poll<R: Rng>(&mut self, now: Instant, rng: &mut R) -> Option<RoundEvent> {
        match self.state {
            RoundState::ArmedWaiting { reveal_at } if now >= reveal_at => {
                let target = *SYMBOLS.choose(rng).unwrap_or(&SYMBOLS[0]);
                self.state = RoundState::KeyShown {
                    target,
                    armed_at: now,
                    deadline: now + self.difficulty.timeout(),
                };
                info!(%target, "target revealed");
                Some(RoundEvent::Revealed { target })
            }
            RoundState::KeyShown {
                target, deadline, ..
            } if now >= deadline => Some(self.time_out(target)),
            _ => None,
        }
    }

    /// Feed a key press. Only the revealed symbol resolves the round.
    ///
    /// A press arriving at or after the deadline loses to the timeout.
    pub fn press(&mut self, symbol: char, now: Instant) -> Option<RoundEvent> {
        let RoundState::KeyShown {
            target,
            armed_at,
            deadline,
        } = self.state
        else {
            debug!(%symbol, "key ignored outside of a shown target");
            return None;
        };

        if now >= deadline {
            return Some(self.time_out(target));
        }

        if !symbol.eq_ignore_ascii_case(&target) {
            debug!(%symbol, %target, "wrong key");
            return None;
        }

        let elapsed = now.saturating_duration_since(armed_at);
        self.state = RoundState::Resolved(Resolution::Hit { target, elapsed });
        info!(%target, elapsed_ms = elapsed.as_millis() as u64, "target hit");
        Some(RoundEvent::Hit { target, elapsed })
    }

    pub fn cancel(&mut self) {
        if self.is_running() {
            debug!("round cancelled");
        }
        self.state = RoundState::Idle;
    }

    fn time_out(&mut self, target: char) -> RoundEvent {
        self.state = RoundState::Resolved(Resolution::Timeout { target });
        info!(%target, "round timed out");
        RoundEvent::TimedOut { target }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            RoundState::ArmedWaiting { .. } | RoundState::KeyShown { .. }
        )
    }

    pub fn target(&self) -> Option<char> {
        match self.state {
            RoundState::KeyShown { target, .. } => Some(target),
            RoundState::Resolved(Resolution::Hit { target, .. })
            | RoundState::Resolved(Resolution::Timeout { target }) => Some(target),
            _ => None,
        }
    }

    /// Time shown on the readout: running while the key is shown, frozen once hit
    pub fn live_elapsed(&self, now: Instant) -> Option<Duration> {
        match self.state {
            RoundState::KeyShown { armed_at, .. } => Some(now.saturating_duration_since(armed_at)),
            RoundState::Resolved(Resolution::Hit { elapsed, .. }) => Some(elapsed),
            _ => None,
        }
    }

    /// When the next timer is due, so the event loop can wake up for it
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            RoundState::ArmedWaiting { reveal_at } => Some(reveal_at),
            RoundState::KeyShown { deadline, .. } => Some(deadline),
            _ => None,
        }
    }
}
