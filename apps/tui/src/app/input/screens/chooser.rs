use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_chooser_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up => {
            if let Some(menu) = app.dashboard.menu_mut() {
                menu.highlight_prev();
            }
        }
        KeyCode::Down => {
            if let Some(menu) = app.dashboard.menu_mut() {
                menu.highlight_next();
            }
        }
        KeyCode::Enter => {
            let module = app
                .dashboard
                .menu()
                .and_then(|menu| menu.highlighted_entry())
                .map(str::to_string);
            if let Some(module) = module {
                app.dashboard.choose(&module);
                app.selected_row = 0;
            }
        }
        KeyCode::Esc => app.dashboard.dismiss_menu(),
        _ => {}
    }
}

/// Picks the clicked entry, or closes the menu when the click lands outside.
pub fn handle_chooser_click(app: &mut App, column: u16, row: u16) {
    let screen = app.screen_area.get();
    let picked = app
        .dashboard
        .menu()
        .and_then(|menu| menu.entry_at(screen, column, row))
        .map(str::to_string);

    match picked {
        Some(module) => {
            app.dashboard.choose(&module);
            app.selected_row = 0;
        }
        None => {
            let inside = app
                .dashboard
                .menu()
                .is_some_and(|menu| menu.contains(screen, column, row));
            if !inside {
                app.dashboard.dismiss_menu();
            }
        }
    }
}
