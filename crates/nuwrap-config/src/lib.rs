//! Parse and resolve `nuwrap.toml`.

pub mod config;

pub use config::{Config, ConfigError, NuGetSection, CONFIG_FILE_NAME};
