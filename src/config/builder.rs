//! Fluent `ConfigBuilder` for programmatic construction — tests and
//! embedding applications that don't want to go through a file/env loader.

use super::{models::*, validation, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: DatabayesConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: DatabayesConfig::default(),
        }
    }

    pub fn with_in_memory_store(mut self) -> Self {
        self.config.store.backend = StoreBackend::InMemory;
        self.config.store.redis_url = None;
        self
    }

    pub fn with_redis_store(mut self, url: impl Into<String>) -> Self {
        self.config.store.backend = StoreBackend::Redis;
        self.config.store.redis_url = Some(url.into());
        self
    }

    pub fn with_key_separator(mut self, sep: impl Into<String>) -> Self {
        self.config.store.key_separator = sep.into();
        self
    }

    pub fn with_counter_key(mut self, key: impl Into<String>) -> Self {
        self.config.store.counter_key = key.into();
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// In-memory store, compact stdout logging at info — a sane default
    /// for embedding applications and examples.
    pub fn development() -> Self {
        Self::new()
            .with_in_memory_store()
            .with_log_level(LogLevel::Debug)
            .with_log_format(LogFormat::Pretty)
    }

    /// In-memory store with a dedicated test data directory convention —
    /// for automated tests that want an explicit, named config rather than
    /// bare defaults.
    pub fn testing() -> Self {
        Self::new()
            .with_in_memory_store()
            .with_log_level(LogLevel::Warn)
            .with_counter_key("total_relations_test".to_string())
    }

    pub fn build(self) -> Result<DatabayesConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_builds_successfully() {
        let config = ConfigBuilder::development().build().unwrap();
        assert_eq!(config.store.backend, StoreBackend::InMemory);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn redis_without_url_fails_to_build() {
        let mut builder = ConfigBuilder::new();
        builder.config.store.backend = StoreBackend::Redis;
        assert!(builder.build().is_err());
    }

    #[test]
    fn log_file_is_recorded() {
        let config = ConfigBuilder::new()
            .with_log_file(PathBuf::from("/tmp/databayes.log"))
            .build()
            .unwrap();
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/databayes.log")));
    }
}
