use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, PromptKind};
use crossterm::event::KeyCode;
use study_radar_tui::controller::EditCommand;
use study_radar_tui::nav::Route;

pub fn handle_progress_input(app: &mut App, key: KeyCode) {
    let rows = app.table_len();

    match key {
        KeyCode::Up => app.selected_row = wrap_decrement(app.selected_row, rows),
        KeyCode::Down => app.selected_row = wrap_increment(app.selected_row, rows),
        KeyCode::Left | KeyCode::Right => {
            let Some(row) = app.selected_table_row() else {
                return;
            };
            let status = if key == KeyCode::Right {
                row.status.next()
            } else {
                row.status.prev()
            };
            let command = EditCommand::SetStatus {
                module: row.module.clone(),
                subject: row.subject.clone(),
                status,
            };
            app.submit(command);
        }
        KeyCode::Char('a') => app.start_prompt(PromptKind::AddSubject),
        KeyCode::Char('x') => {
            let Some(row) = app.selected_table_row() else {
                return;
            };
            let prompt = format!("Delete \"{}\" from {}?", row.subject, row.module);
            let command = EditCommand::DeleteSubject {
                module: row.module.clone(),
                subject: row.subject.clone(),
            };
            app.confirm(prompt, command);
        }
        KeyCode::Esc => app.navigate(Route::Overview),
        KeyCode::Char('q') => app.running = false,
        _ => {}
    }
}
