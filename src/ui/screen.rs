use ratatui::Frame;

use crate::{
    app::{App, AppState},
    ui::passage_width,
};

/// A UI Screen boundary: responsible for rendering the current state
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Typing screen - lays the passage out for the frame width, then renders
pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        app.sync_layout(passage_width(f.area().width));
        f.render_widget(&*app, f.area());
    }
}

/// Results screen - chart and final figures
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: AppState) -> Box<dyn Screen> {
    match state {
        AppState::Typing => Box::new(TypingScreen),
        AppState::Results => Box::new(ResultsScreen),
    }
}
