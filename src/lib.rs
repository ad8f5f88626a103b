// Library surface shared by the binary and the headless integration tests.
pub mod app;
pub mod celebration;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod logging;
pub mod ranking;
pub mod round;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod util;

pub use app::App;
pub use difficulty::Difficulty;
pub use error::GameError;
