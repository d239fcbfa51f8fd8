//! Configuration system: file/env-layered loading via `figment`, plus a
//! fluent `ConfigBuilder`.

mod builder;
mod loader;
mod models;
#[cfg(test)]
mod tests;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;

/// Default configuration file names this crate will look for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "databayes.toml",
    "databayes.yaml",
    "databayes.yml",
    "databayes.json",
    ".databayes/config.toml",
    ".databayes/config.yaml",
    ".databayes/config.yml",
    ".databayes/config.json",
];

/// Environment variable prefix for `databayes` configuration.
pub const ENV_PREFIX: &str = "DATABAYES_";

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration file: {0}")]
    FileLoadError(String),

    #[error("failed to load environment variables: {0}")]
    EnvLoadError(String),

    #[error("configuration validation error: {0}")]
    ValidationError(String),

    #[error("configuration parsing error: {0}")]
    ParseError(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
