//! Config validation: endpoint shape and pool bounds.

use crate::config::{ClientConfig, DbConfig};
use crate::error::ConfigError;

pub fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    let endpoint = config.endpoint.trim();
    if endpoint.is_empty() {
        return Err(ConfigError::Missing("endpoint"));
    }
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            key: "endpoint",
            reason: format!("'{}' must start with http:// or https://", endpoint),
        });
    }
    if config.timeout.map(|t| t.is_zero()).unwrap_or(false) {
        return Err(ConfigError::Invalid {
            key: "timeout",
            reason: "use None instead of a zero timeout".into(),
        });
    }
    Ok(())
}

pub fn validate_db_config(config: &DbConfig) -> Result<(), ConfigError> {
    if config.pool_max == 0 {
        return Err(ConfigError::Invalid {
            key: "pool_max",
            reason: "pool needs at least one connection".into(),
        });
    }
    if config.pool_min > config.pool_max {
        return Err(ConfigError::Invalid {
            key: "pool_min",
            reason: format!("{} exceeds pool_max {}", config.pool_min, config.pool_max),
        });
    }
    Ok(())
}
