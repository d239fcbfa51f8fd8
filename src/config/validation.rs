//! Configuration validation utilities.

use super::models::*;
use super::ConfigError;

pub fn validate_config(config: &DatabayesConfig) -> Result<(), ConfigError> {
    validate_store_config(&config.store)
}

fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.key_separator.is_empty() {
        return Err(ConfigError::ValidationError(
            "key_separator cannot be empty".to_string(),
        ));
    }
    if config.counter_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "counter_key cannot be empty".to_string(),
        ));
    }
    if config.backend == StoreBackend::Redis
        && config.redis_url.as_deref().unwrap_or("").trim().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "redis_url is required when backend = redis".to_string(),
        ));
    }
    Ok(())
}
