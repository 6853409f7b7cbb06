//! Ratatui front-end: one screen with a search line, the record form and the
//! records table. Split across submodules the same way the screen is split.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
