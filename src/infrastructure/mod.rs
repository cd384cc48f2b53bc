//! Infrastructure layer: SQLite persistence, HTTP wiring and startup
//! configuration around the circulation services.

pub mod config;
pub mod db;
pub mod repositories;
pub mod seed;
pub mod server;
pub mod state;

pub use repositories::*;
pub use state::AppState;
