//! Configuration loading for the reader core.
//!
//! Settings are read from a TOML file with `[reader]`, `[timing]`,
//! `[storage]` and `[logging]` tables. Missing or invalid entries fall back
//! to defaults so a session can always start.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, parse_config, serialize_config};
pub use models::{AppConfig, ContentSet, LogLevel};
