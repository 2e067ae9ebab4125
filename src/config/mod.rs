//! Configuration module for the outfit store
//!
//! Provides types and parsing for `outfits.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError, CONFIG_FILE_NAME};
pub use schema::*;
