// Terminal-side application state and key/mouse handling

pub mod input;
pub mod state;

pub use input::{handle_input, handle_mouse};
pub use state::{App, AppScreen, InputState, PromptKind};
