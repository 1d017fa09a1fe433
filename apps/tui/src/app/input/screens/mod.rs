use crate::app::state::{App, AppScreen, InputState};
use crossterm::event::KeyCode;

mod chooser;
mod notice;
mod overview;
mod progress;
mod prompt;

/// Routes a key to whatever currently has focus: the notice, the chooser
/// menu, an open prompt, then the screen itself.
pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if app.dashboard.notice().is_some() {
        notice::handle_notice_input(app, key);
        return;
    }

    if app.dashboard.menu().is_some() {
        chooser::handle_chooser_input(app, key);
        return;
    }

    match app.input_state {
        InputState::Typing { .. } => prompt::handle_text_input(app, key),
        InputState::Confirming { .. } => prompt::handle_confirm_input(app, key),
        InputState::Browsing => match app.screen() {
            AppScreen::Overview => overview::handle_overview_input(app, key),
            AppScreen::Progress => progress::handle_progress_input(app, key),
        },
    }
}

pub fn dispatch_click(app: &mut App, column: u16, row: u16) {
    if app.dashboard.notice().is_some() {
        app.dashboard.dismiss_notice();
        return;
    }

    if app.dashboard.menu().is_some() {
        chooser::handle_chooser_click(app, column, row);
        return;
    }

    if app.input_state == InputState::Browsing && app.screen() == AppScreen::Overview {
        overview::handle_radar_click(app, column, row);
    }
}
