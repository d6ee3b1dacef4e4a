//! Load client and pool settings from environment variables.

use crate::config::types::*;
use crate::config::{validate_client_config, validate_db_config};
use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_HTTP_ENDPOINT: &str = "HTTP_ENDPOINT";
pub const ENV_HTTP_USER: &str = "HTTP_USER";
pub const ENV_HTTP_PASS: &str = "HTTP_PASS";
pub const ENV_HTTP_VERIFY_TLS: &str = "HTTP_VERIFY_TLS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_DATABASE: &str = "DB_DATABASE";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_POOL_MIN: &str = "DB_CONNECTION_POOL_MIN";
pub const ENV_DB_POOL_MAX: &str = "DB_CONNECTION_POOL_MAX";

impl ClientConfig {
    /// Read `HTTP_ENDPOINT` (required), `HTTP_USER`, `HTTP_PASS`, `HTTP_VERIFY_TLS` and `HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        client_config_from(|key| std::env::var(key).ok())
    }
}

impl DbConfig {
    /// Read `DATABASE_URL` or the discrete `DB_*` settings, plus `DB_CONNECTION_POOL_MIN`/`_MAX`.
    pub fn from_env() -> Result<Self, ConfigError> {
        db_config_from(|key| std::env::var(key).ok())
    }
}

/// Build a [`ClientConfig`] from any key lookup (the environment, a map in tests).
pub fn client_config_from<F>(lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let endpoint = get(ENV_HTTP_ENDPOINT).ok_or(ConfigError::Missing(ENV_HTTP_ENDPOINT))?;
    let mut config = ClientConfig::new(endpoint);
    config.username = get(ENV_HTTP_USER);
    config.password = get(ENV_HTTP_PASS);
    if let Some(v) = get(ENV_HTTP_VERIFY_TLS) {
        config.verify_tls = parse_bool(ENV_HTTP_VERIFY_TLS, &v)?;
    }
    if let Some(v) = get(ENV_HTTP_TIMEOUT_SECS) {
        let secs: u64 = parse_num(ENV_HTTP_TIMEOUT_SECS, &v)?;
        config.timeout = if secs == 0 { None } else { Some(Duration::from_secs(secs)) };
    }

    validate_client_config(&config)?;
    Ok(config)
}

/// Build a [`DbConfig`] from any key lookup.
pub fn db_config_from<F>(lookup: F) -> Result<DbConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let mut config = DbConfig {
        database_url: get(ENV_DATABASE_URL),
        ..DbConfig::default()
    };
    if let Some(host) = get(ENV_DB_HOST) {
        config.host = host;
    }
    if let Some(port) = get(ENV_DB_PORT) {
        config.port = parse_num(ENV_DB_PORT, &port)?;
    }
    config.database = get(ENV_DB_DATABASE).unwrap_or_default();
    config.user = get(ENV_DB_USER).unwrap_or_default();
    config.password = lookup(ENV_DB_PASSWORD).unwrap_or_default();
    if let Some(min) = get(ENV_DB_POOL_MIN) {
        config.pool_min = parse_num(ENV_DB_POOL_MIN, &min)?;
    }
    if let Some(max) = get(ENV_DB_POOL_MAX) {
        config.pool_max = parse_num(ENV_DB_POOL_MAX, &max)?;
    }

    validate_db_config(&config)?;
    Ok(config)
}

fn parse_num<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: format!("'{}': {}", value, e),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            reason: format!("'{}' is not a boolean", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn client_config_defaults() {
        let config = client_config_from(lookup(&[(ENV_HTTP_ENDPOINT, "http://localhost:8080")])).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080");
        assert!(config.verify_tls);
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
        assert!(config.basic_auth().is_none());
    }

    #[test]
    fn client_config_requires_endpoint() {
        let err = client_config_from(lookup(&[(ENV_HTTP_ENDPOINT, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_HTTP_ENDPOINT)));
    }

    #[test]
    fn client_config_reads_everything() {
        let config = client_config_from(lookup(&[
            (ENV_HTTP_ENDPOINT, "https://api.example.com"),
            (ENV_HTTP_USER, "admin"),
            (ENV_HTTP_PASS, "secret"),
            (ENV_HTTP_VERIFY_TLS, "false"),
            (ENV_HTTP_TIMEOUT_SECS, "0"),
        ]))
        .unwrap();
        assert_eq!(config.basic_auth(), Some(("admin", "secret")));
        assert!(!config.verify_tls);
        assert_eq!(config.timeout, None);
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn basic_auth_needs_both_halves() {
        let config = client_config_from(lookup(&[
            (ENV_HTTP_ENDPOINT, "http://localhost"),
            (ENV_HTTP_USER, "admin"),
        ]))
        .unwrap();
        assert!(config.basic_auth().is_none());
    }

    #[test]
    fn rejects_bad_booleans_and_numbers() {
        let err = client_config_from(lookup(&[
            (ENV_HTTP_ENDPOINT, "http://localhost"),
            (ENV_HTTP_VERIFY_TLS, "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_HTTP_VERIFY_TLS, .. }));

        let err = db_config_from(lookup(&[(ENV_DB_PORT, "postgres")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_DB_PORT, .. }));
    }

    #[test]
    fn db_config_from_discrete_settings() {
        let config = db_config_from(lookup(&[
            (ENV_DB_HOST, "db.internal"),
            (ENV_DB_PORT, "6543"),
            (ENV_DB_DATABASE, "httpsql"),
            (ENV_DB_USER, "svc"),
            (ENV_DB_PASSWORD, "pw"),
            (ENV_DB_POOL_MIN, "2"),
            (ENV_DB_POOL_MAX, "10"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 6543);
        assert_eq!(config.database, "httpsql");
        assert_eq!((config.pool_min, config.pool_max), (2, 10));
    }

    #[test]
    fn db_config_defaults() {
        let config = db_config_from(lookup(&[])).unwrap();
        assert_eq!(config.host, DEFAULT_DB_HOST);
        assert_eq!(config.port, DEFAULT_DB_PORT);
        assert_eq!((config.pool_min, config.pool_max), (DEFAULT_POOL_MIN, DEFAULT_POOL_MAX));
    }
}
