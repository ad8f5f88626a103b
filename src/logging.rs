//! Logging setup.
//!
//! The terminal belongs to the TUI, so log lines only ever go to a file.
//! Without a log file no subscriber is installed and `tracing` macros are
//! no-ops.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the verbosity flag
pub const LOG_ENV: &str = "SNAPKEY_LOG";

/// Maps `-v` occurrences to a tracing directive
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber writing to `log_file`, appending.
///
/// Uses `try_init`, so a second call is harmless.
pub fn init_logging(log_file: Option<&Path>, verbosity: u8) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(verbosity >= 2)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(())
}
