use thiserror::Error;

/// Operations the game refuses. Everything else that arrives at the wrong
/// moment (stray keys, late timers) is simply ignored.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("no player selected")]
    MissingPlayer,

    #[error("player name must not be empty")]
    EmptyPlayerName,

    #[error("a round is in progress")]
    RoundInProgress,
}
