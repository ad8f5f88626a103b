use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use snapkey::{
    app::{App, Control},
    config::{Config, ConfigStore, FileConfigStore},
    logging::init_logging,
    runtime::{CrosstermEventSource, GameEvent, Runner},
    ui::screen::{current_screen, Screen},
    Difficulty,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::info;

/// reaction time tui: wait for the key, hit it fast, climb the ranking
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Wait for a random key to appear, press it as fast as you can, and compete for a spot in the top 10 across players and difficulties."
)]
pub struct Cli {
    /// player name (trimmed, max 20 characters)
    #[clap(short = 'p', long)]
    player: Option<String>,

    /// difficulty to start with
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// refresh interval of the live readout in milliseconds
    #[clap(long)]
    tick_rate_ms: Option<u64>,

    /// append logs to this file (the terminal itself is never logged to)
    #[clap(long, env = "SNAPKEY_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// more log output: -v info, -vv debug, -vvv trace
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// preferences file to use instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// save the effective preferences to the config file and exit
    #[clap(long)]
    write_config: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        self.config
            .as_ref()
            .map(FileConfigStore::with_path)
            .unwrap_or_default()
    }

    /// File preferences with command line flags layered on top
    fn effective_config(&self, store: &impl ConfigStore) -> Config {
        store
            .load()
            .merged(self.player.clone(), self.difficulty, self.tick_rate_ms)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref(), cli.verbose)?;

    let store = cli.config_store();
    let config = cli.effective_config(&store);

    if cli.write_config {
        store.save(&config)?;
        println!("wrote {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    info!(?config, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config);
    let result = start_tui(
        &mut terminal,
        &mut app,
        Duration::from_millis(config.tick_rate_ms),
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick: Duration,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), tick);

    let size = terminal.size()?;
    app.resize(size.width, size.height);
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step(app.next_deadline()) {
            GameEvent::Tick => {
                if app.on_tick(Instant::now()) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            GameEvent::Resize => {
                let size = terminal.size()?;
                app.resize(size.width, size.height);
                terminal.draw(|f| ui(app, f))?;
            }
            GameEvent::Key(key) => {
                let now = Instant::now();
                // timers due by now fire before the key is looked at
                app.on_tick(now);
                if app.handle_key(key, now) == Control::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    info!("quit");
    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    current_screen(&app.state).render(app, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["snapkey"]);

        assert_eq!(cli.player, None);
        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.tick_rate_ms, None);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.write_config);
    }

    #[test]
    fn test_cli_player_and_difficulty() {
        let cli = Cli::parse_from(["snapkey", "-p", "Ana", "-d", "hard"]);
        assert_eq!(cli.player.as_deref(), Some("Ana"));
        assert_eq!(cli.difficulty, Some(Difficulty::Hard));

        let cli = Cli::parse_from(["snapkey", "--player", "Bob", "--difficulty", "easy"]);
        assert_eq!(cli.player.as_deref(), Some("Bob"));
        assert_eq!(cli.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn test_cli_rejects_unknown_difficulty() {
        assert!(Cli::try_parse_from(["snapkey", "-d", "insane"]).is_err());
    }

    #[test]
    fn test_cli_verbosity_counts() {
        let cli = Cli::parse_from(["snapkey", "-vvv"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_effective_config_layers_cli_over_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        store
            .save(&Config {
                player: Some("Ana".into()),
                difficulty: Difficulty::Easy,
                tick_rate_ms: 40,
            })
            .unwrap();

        let cli = Cli::parse_from([
            "snapkey",
            "--config",
            path.to_str().unwrap(),
            "-d",
            "hard",
        ]);
        let cfg = cli.effective_config(&cli.config_store());
        assert_eq!(cfg.player.as_deref(), Some("Ana"));
        assert_eq!(cfg.difficulty, Difficulty::Hard);
        assert_eq!(cfg.tick_rate_ms, 40);
    }

    #[test]
    fn test_app_starts_with_cli_player() {
        let cli = Cli::parse_from(["snapkey", "-p", "  Ana  "]);
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("none.json"));
        let app = App::new(&cli.effective_config(&store));
        assert_eq!(app.session.player(), Some("Ana"));
        assert_eq!(app.state, snapkey::app::AppState::Playing);
    }
}
