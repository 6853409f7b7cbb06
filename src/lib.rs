//! Core library surface for the Caravan Weigh terminal application.
//!
//! The store is usable on its own (every user action is a method on
//! `RecordStore`), while `ui` wires it to a Ratatui screen. The binary target
//! only glues configuration, logging and the event loop together.
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

pub use config::Config;
pub use error::{ConfigError, StoreError};

/// Domain types other layers manipulate.
pub use models::{Record, RecordId};

/// The state container behind the screen.
pub use store::{Draft, DraftField, FilteredRow, RecordStore, SubmitOutcome};

/// The interactive application entry point.
pub use ui::{run_app, App};
