//! Configuration management for logsink
//!
//! Settings are layered, lowest priority first:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//!
//! # Environment Variables
//!
//! Any key can be overridden with `LOGSINK__<section>__<key>`, for example
//! `LOGSINK__SERVER__BIND_ADDR=127.0.0.1:8080` or
//! `LOGSINK__LOGS__FILE_PATH=/var/lib/logsink/logs.json`.
//!
//! # Configuration File
//!
//! Read from `config/logsink.toml` unless `LOGSINK_CONFIG` points elsewhere.
//! A missing file is not an error.

mod models;
mod sources;
mod validation;

pub use models::{Config, LogsConfig, ServerConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Re-run validation, e.g. after CLI overrides were applied
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate(self)?;
        Ok(())
    }
}
