// Draws the current screen, then whichever overlay has focus

pub mod screens;
pub mod widgets;

use crate::app::{App, AppScreen, InputState};
use crate::ui::widgets::popup::{render_chooser, render_confirm, render_notice, render_prompt};
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    app.screen_area.set(f.area());

    match app.screen() {
        AppScreen::Overview => screens::overview::render_overview(app, f),
        AppScreen::Progress => screens::progress::render_progress(app, f),
    }

    match &app.input_state {
        InputState::Typing { kind, buffer } => render_prompt(f, &kind.title(), buffer),
        InputState::Confirming { prompt, .. } => render_confirm(f, prompt),
        InputState::Browsing => {}
    }

    if let Some(menu) = app.dashboard.menu() {
        render_chooser(f, menu);
    }

    if let Some(notice) = app.dashboard.notice() {
        render_notice(f, notice);
    }
}
