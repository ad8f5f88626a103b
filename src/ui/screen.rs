use ratatui::Frame;

use crate::{
    app::{App, AppState},
    ui::{render_confirm_clear, render_name_prompt},
};

/// A UI Screen boundary: the game board plus whatever sits on top of it
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Board only
pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Board with the player name popup
pub struct NamePromptScreen;

impl Screen for NamePromptScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        f.render_widget(app, area);
        render_name_prompt(app, area, f.buffer_mut());
    }
}

/// Board with the clear-ranking confirmation
pub struct ConfirmClearScreen;

impl Screen for ConfirmClearScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        f.render_widget(app, area);
        render_confirm_clear(area, f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Playing => Box::new(PlayingScreen),
        AppState::NamePrompt => Box::new(NamePromptScreen),
        AppState::ConfirmClear => Box::new(ConfirmClearScreen),
    }
}
