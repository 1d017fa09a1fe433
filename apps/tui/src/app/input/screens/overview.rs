use crate::app::state::{App, PromptKind};
use crossterm::event::KeyCode;
use study_radar_tui::controller::EditCommand;
use study_radar_tui::nav::Route;

fn selected_module(app: &App) -> Option<String> {
    let spec = app.dashboard.session().radar()?;
    app.dashboard.selection().module(spec).map(str::to_string)
}

pub fn handle_overview_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Left => app.dashboard.select_prev_axis(),
        KeyCode::Right => app.dashboard.select_next_axis(),
        KeyCode::Enter => {
            app.dashboard.open_selected();
            app.selected_row = 0;
        }
        KeyCode::Char('p') => app.navigate(Route::Progress { module: None }),
        KeyCode::Char('n') => app.start_prompt(PromptKind::NewModule),
        KeyCode::Char('r') => {
            if let Some(old_name) = selected_module(app) {
                app.start_prompt(PromptKind::RenameModule { old_name });
            } else {
                app.status_message = "Select a module first".to_string();
            }
        }
        KeyCode::Char('d') => {
            if let Some(module) = selected_module(app) {
                let prompt = format!("Delete module \"{module}\" and its history?");
                app.confirm(prompt, EditCommand::DeleteModule { module });
            } else {
                app.status_message = "Select a module first".to_string();
            }
        }
        KeyCode::Char('q') => app.running = false,
        _ => {}
    }
}

pub fn handle_radar_click(app: &mut App, column: u16, row: u16) {
    let area = app.radar_area.get();
    app.dashboard.click_radar(area, column, row);
    app.selected_row = 0;
}
