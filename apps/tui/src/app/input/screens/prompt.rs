use crate::app::state::{App, InputState};
use crossterm::event::KeyCode;

pub fn handle_text_input(app: &mut App, key: KeyCode) {
    let InputState::Typing { buffer, .. } = &mut app.input_state else {
        return;
    };

    match key {
        KeyCode::Char(c) => buffer.push(c),
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Enter => {
            let state = std::mem::replace(&mut app.input_state, InputState::Browsing);
            if let InputState::Typing { kind, buffer } = state {
                app.submit(kind.into_command(buffer));
            }
        }
        KeyCode::Esc => app.reset_input(),
        _ => {}
    }
}

pub fn handle_confirm_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
            let state = std::mem::replace(&mut app.input_state, InputState::Browsing);
            if let InputState::Confirming { command, .. } = state {
                app.submit(command);
            }
        }
        KeyCode::Char('n' | 'N') | KeyCode::Esc => app.reset_input(),
        _ => {}
    }
}
