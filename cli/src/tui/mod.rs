mod app;
pub mod events;
mod terminal;
pub mod ui;

pub use app::{AppAction, Focus, TuiApp};
pub use terminal::{check_tui_support, restore_terminal, setup_terminal};
