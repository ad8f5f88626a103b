use std::time::Duration;

use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// How much slack a round gives before the live readout turns amber and
/// before the round is lost outright.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Elapsed time after which the readout is shown as a warning
    pub fn warning_ms(self) -> u64 {
        match self {
            Difficulty::Easy => 3000,
            Difficulty::Medium => 2000,
            Difficulty::Hard => 1500,
        }
    }

    /// Time the player has after the reveal before the round times out
    pub fn timeout_ms(self) -> u64 {
        match self {
            Difficulty::Easy => 5000,
            Difficulty::Medium => 4000,
            Difficulty::Hard => 3000,
        }
    }

    pub fn timeout(self) -> Duration {
        Duration::from_millis(self.timeout_ms())
    }

    pub fn color(self) -> Color {
        match self {
            Difficulty::Easy => Color::Green,
            Difficulty::Medium => Color::Rgb(255, 165, 0),
            Difficulty::Hard => Color::Red,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}
