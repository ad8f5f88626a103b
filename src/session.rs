use std::time::Instant;

use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use crate::{
    difficulty::Difficulty,
    error::GameError,
    ranking::RankingStore,
    round::{RoundController, RoundEvent, Verdict},
    util::{mean_ms, normalize_name, std_dev_ms},
};

pub const MAX_PLAYER_NAME: usize = 20;

/// Outcome of advancing the session, ready for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundReport {
    Revealed {
        target: char,
    },
    Hit {
        target: char,
        elapsed_ms: u64,
        verdict: Verdict,
        new_best: bool,
    },
    TimedOut {
        target: char,
    },
}

/// Counters for the current process only
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub rounds: u32,
    pub timeouts: u32,
    pub hits_ms: Vec<u64>,
}

impl SessionStats {
    pub fn hits(&self) -> usize {
        self.hits_ms.len()
    }

    pub fn fastest(&self) -> Option<u64> {
        self.hits_ms.iter().copied().min()
    }

    pub fn mean(&self) -> Option<f64> {
        mean_ms(&self.hits_ms)
    }

    pub fn std_dev(&self) -> Option<f64> {
        std_dev_ms(&self.hits_ms)
    }
}

/// Everything a game needs between key presses: who is playing, at what
/// difficulty, the ranking and the round in flight.
#[derive(Debug)]
pub struct Session {
    player: Option<String>,
    difficulty: Difficulty,
    ranking: RankingStore,
    round: RoundController,
    rng: StdRng,
    stats: SessionStats,
}

impl Session {
    pub fn new(player: Option<String>, difficulty: Difficulty) -> Self {
        Self::with_rng(player, difficulty, StdRng::from_entropy())
    }

    pub fn with_rng(player: Option<String>, difficulty: Difficulty, rng: StdRng) -> Self {
        let player = player
            .map(|p| normalize_name(&p, MAX_PLAYER_NAME))
            .filter(|p| !p.is_empty());

        Self {
            player,
            difficulty,
            ranking: RankingStore::new(),
            round: RoundController::new(),
            rng,
            stats: SessionStats::default(),
        }
    }

    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn ranking(&self) -> &RankingStore {
        &self.ranking
    }

    pub fn round(&self) -> &RoundController {
        &self.round
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn is_round_running(&self) -> bool {
        self.round.is_running()
    }

    pub fn set_player(&mut self, raw: &str) -> Result<(), GameError> {
        self.ensure_idle()?;
        let name = normalize_name(raw, MAX_PLAYER_NAME);
        if name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }
        info!(player = %name, "player selected");
        self.player = Some(name);
        Ok(())
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        self.ensure_idle()?;
        self.difficulty = difficulty;
        Ok(())
    }

    pub fn cycle_difficulty(&mut self, forward: bool) -> Result<Difficulty, GameError> {
        let next = if forward {
            self.difficulty.next()
        } else {
            self.difficulty.previous()
        };
        self.set_difficulty(next)?;
        Ok(next)
    }

    /// Best time of the current player at the current difficulty
    pub fn best_time(&self) -> Option<u64> {
        self.player
            .as_deref()
            .and_then(|p| self.ranking.best_time_for(p, self.difficulty))
    }

    /// Begin a round, replacing any round already in flight
    pub fn start_round(&mut self, now: Instant) -> Result<(), GameError> {
        if self.player.is_none() {
            return Err(GameError::MissingPlayer);
        }
        self.round.start(self.difficulty, now, &mut self.rng);
        self.stats.rounds += 1;
        Ok(())
    }

    pub fn abort_round(&mut self) {
        self.round.cancel();
    }

    pub fn clear_ranking(&mut self) -> Result<(), GameError> {
        self.ensure_idle()?;
        self.ranking.clear();
        info!("ranking cleared");
        Ok(())
    }

    /// Let timers fire
    pub fn on_tick(&mut self, now: Instant) -> Option<RoundReport> {
        let event = self.round.poll(now, &mut self.rng)?;
        Some(self.settle(event))
    }

    pub fn on_key(&mut self, symbol: char, now: Instant) -> Option<RoundReport> {
        let event = self.round.press(symbol, now)?;
        Some(self.settle(event))
    }

    fn settle(&mut self, event: RoundEvent) -> RoundReport {
        match event {
            RoundEvent::Revealed { target } => RoundReport::Revealed { target },
            RoundEvent::TimedOut { target } => {
                self.stats.timeouts += 1;
                RoundReport::TimedOut { target }
            }
            RoundEvent::Hit { target, elapsed } => {
                let elapsed_ms = elapsed.as_millis() as u64;
                let difficulty = self.round.difficulty();
                let new_best = match &self.player {
                    Some(player) => self.ranking.record_attempt(player, difficulty, elapsed_ms),
                    None => false,
                };
                self.stats.hits_ms.push(elapsed_ms);

                RoundReport::Hit {
                    target,
                    elapsed_ms,
                    verdict: Verdict::classify(elapsed_ms, difficulty),
                    new_best,
                }
            }
        }
    }

    fn ensure_idle(&self) -> Result<(), GameError> {
        if self.round.is_running() {
            Err(GameError::RoundInProgress)
        } else {
            Ok(())
        }
    }
}
