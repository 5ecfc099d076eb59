//! Configuration for the narrator.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! sensible defaults so the reader can still launch.

mod defaults;
mod io;
mod models;

pub use io::load_config;
pub use models::{LogLevel, NarratorConfig};
