mod helpers;
pub mod screens;

use crate::app::state::App;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};

pub fn handle_input(app: &mut App, key: KeyCode) {
    screens::dispatch_input(app, key);
}

/// Left clicks only; everything else the mouse does is ignored.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
        screens::dispatch_click(app, mouse.column, mouse.row);
    }
}
