use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    celebration::Celebration,
    config::Config,
    error::GameError,
    round::Verdict,
    session::{RoundReport, Session, MAX_PLAYER_NAME},
};

/// How long a feedback message stays before the idle hint comes back
pub const FEEDBACK_DURATION: Duration = Duration::from_secs(2);

pub const IDLE_HINT: &str = "Press ENTER to play";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

/// Feedback line under the readout
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub tone: Tone,
    expires_at: Option<Instant>,
}

impl StatusLine {
    fn idle() -> Self {
        Self::sticky(IDLE_HINT, Tone::Neutral)
    }

    fn sticky(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
            expires_at: None,
        }
    }

    fn timed(text: impl Into<String>, tone: Tone, now: Instant) -> Self {
        Self {
            text: text.into(),
            tone,
            expires_at: Some(now + FEEDBACK_DURATION),
        }
    }

    fn expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    NamePrompt,
    Playing,
    ConfirmClear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub state: AppState,
    pub name_input: String,
    pub instruction: String,
    pub status: StatusLine,
    pub celebration: Celebration,
    /// Clock value of the last event handled; rendering reads time from here
    pub now: Instant,
    viewport: (u16, u16),
    start_after_prompt: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self::with_session(Session::new(config.player.clone(), config.difficulty))
    }

    pub fn with_session(session: Session) -> Self {
        let state = if session.player().is_some() {
            AppState::Playing
        } else {
            AppState::NamePrompt
        };
        let mut app = Self {
            session,
            state,
            name_input: String::new(),
            instruction: String::new(),
            status: StatusLine::idle(),
            celebration: Celebration::new(),
            now: Instant::now(),
            viewport: (80, 24),
            start_after_prompt: false,
        };
        app.instruction = app.welcome();
        app
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }

    /// Something on screen moves on its own and needs redrawing every tick
    pub fn is_animating(&self) -> bool {
        self.session.is_round_running() || self.celebration.is_active()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.round().next_deadline()
    }

    /// Fire due timers and expire feedback. Returns true when the screen changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        self.now = now;
        let mut changed = self.is_animating();

        self.celebration.update(now);

        if self.status.expired(now) {
            self.status = StatusLine::idle();
            changed = true;
        }

        if let Some(report) = self.session.on_tick(now) {
            self.apply_report(report, now);
            changed = true;
        }

        changed
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        self.now = now;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        match self.state {
            AppState::NamePrompt => self.on_name_key(key, now),
            AppState::ConfirmClear => self.on_confirm_key(key, now),
            AppState::Playing if self.session.is_round_running() => {
                self.on_round_key(key, now);
                Control::Continue
            }
            AppState::Playing => self.on_menu_key(key, now),
        }
    }

    fn on_round_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.session.abort_round();
                self.instruction = self.welcome();
                self.status = StatusLine::timed("Round cancelled", Tone::Info, now);
            }
            KeyCode::Char(c) if c.is_ascii_alphanumeric() => {
                if let Some(report) = self.session.on_key(c, now) {
                    self.apply_report(report, now);
                }
            }
            _ => {}
        }
    }

    fn on_menu_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
            KeyCode::Enter | KeyCode::Char(' ') => self.start_round(now),
            KeyCode::Right | KeyCode::Char('d') => self.cycle_difficulty(true),
            KeyCode::Left => self.cycle_difficulty(false),
            KeyCode::Char('p') => self.open_name_prompt(),
            KeyCode::Char('c') => self.state = AppState::ConfirmClear,
            _ => {}
        }
        Control::Continue
    }

    fn on_name_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        match key.code {
            KeyCode::Enter => match self.session.set_player(&self.name_input) {
                Ok(()) => {
                    self.state = AppState::Playing;
                    self.name_input.clear();
                    self.instruction = self.welcome();
                    let name = self.player_name();
                    self.status =
                        StatusLine::timed(format!("Player changed to: {name}"), Tone::Info, now);
                    if std::mem::take(&mut self.start_after_prompt) {
                        self.start_round(now);
                    }
                }
                Err(GameError::EmptyPlayerName) => {
                    self.status = StatusLine::timed("Type a name first", Tone::Warning, now);
                }
                Err(_) => {}
            },
            KeyCode::Esc => {
                self.state = AppState::Playing;
                self.name_input.clear();
                self.start_after_prompt = false;
            }
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Char(c) if !c.is_control() => {
                if self.name_input.chars().count() < MAX_PLAYER_NAME {
                    self.name_input.push(c);
                }
            }
            _ => {}
        }
        Control::Continue
    }

    fn on_confirm_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.state = AppState::Playing;
                if self.session.clear_ranking().is_ok() {
                    self.status = StatusLine::timed("Ranking cleared ✅", Tone::Success, now);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::Playing;
            }
            _ => {}
        }
        Control::Continue
    }

    fn open_name_prompt(&mut self) {
        self.name_input = self.session.player().unwrap_or_default().to_string();
        self.state = AppState::NamePrompt;
    }

    fn cycle_difficulty(&mut self, forward: bool) {
        // only fails while a round runs, and menu keys never reach here then
        let _ = self.session.cycle_difficulty(forward);
    }

    fn start_round(&mut self, now: Instant) {
        match self.session.start_round(now) {
            Ok(()) => {
                self.celebration.stop();
                self.instruction = format!("🎯 {}, get ready...", self.player_name());
                self.status = StatusLine::sticky("Waiting for the target...", Tone::Neutral);
            }
            Err(GameError::MissingPlayer) => {
                self.start_after_prompt = true;
                self.open_name_prompt();
            }
            Err(_) => {}
        }
    }

    fn apply_report(&mut self, report: RoundReport, now: Instant) {
        let name = self.player_name();
        match report {
            RoundReport::Revealed { target } => {
                self.instruction = format!("⚡ {name}, PRESS: {target}");
                self.status = StatusLine::sticky("NOW!", Tone::Info);
            }
            RoundReport::Hit {
                elapsed_ms,
                verdict,
                new_best,
                ..
            } => {
                self.status = hit_feedback(&name, elapsed_ms, verdict, new_best, now);
                if new_best && verdict.within_limit() {
                    let (w, h) = self.viewport;
                    self.celebration.start(w, h, now);
                }
                self.instruction = format!("🎮 {name}, ready for another?");
            }
            RoundReport::TimedOut { .. } => {
                self.status = StatusLine::timed("⏰ TIME'S UP! Too slow!", Tone::Danger, now);
                self.instruction = format!("😅 {name}, try again!");
            }
        }
    }

    fn player_name(&self) -> String {
        self.session.player().unwrap_or("Player").to_string()
    }

    fn welcome(&self) -> String {
        match self.session.player() {
            Some(name) => format!("🎮 {name}, welcome to the challenge!"),
            None => "🎮 Welcome to the reaction time test!".to_string(),
        }
    }
}

fn hit_feedback(
    name: &str,
    elapsed_ms: u64,
    verdict: Verdict,
    new_best: bool,
    now: Instant,
) -> StatusLine {
    let (text, tone) = match verdict {
        Verdict::TooSlow => (
            format!("🐌 {name} - {elapsed_ms} ms - outside the time limit!"),
            Tone::Warning,
        ),
        _ if new_best => (
            format!("🎉 {name} - NEW RECORD! {elapsed_ms} ms"),
            Tone::Success,
        ),
        Verdict::Exceptional => (
            format!("🤯 {name} - INCREDIBLE! {elapsed_ms} ms"),
            Tone::Success,
        ),
        Verdict::Great => (format!("🚀 {name} - GREAT! {elapsed_ms} ms"), Tone::Success),
        Verdict::Good => (
            format!("✅ {name} - {elapsed_ms} ms - Good job!"),
            Tone::Success,
        ),
    };
    StatusLine::timed(text, tone, now)
}
