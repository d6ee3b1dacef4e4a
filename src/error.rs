//! Typed errors for configuration, the HTTP client and the database pool.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing setting: {0}")]
    Missing(&'static str),
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Closed set of failure kinds a caller can branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    Malformed,
    Internal,
    /// The server could not be reached (DNS, connect, TLS, timeout).
    Transport,
}

#[derive(Error, Debug)]
pub enum ClientError {
    /// 404, or a name that resolves to neither a method nor a resource.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error("internal server error: {0}")]
    Internal(String),
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    /// A successful response whose body does not have the expected shape.
    #[error("decode: {0}")]
    Decode(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::Unauthorized(_) => ErrorKind::Unauthorized,
            ClientError::Malformed(_) | ClientError::Decode(_) | ClientError::Config(_) => {
                ErrorKind::Malformed
            }
            ClientError::Internal(_) => ErrorKind::Internal,
            ClientError::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Raw response body for server-reported failures.
    pub fn body(&self) -> Option<&str> {
        match self {
            ClientError::NotFound(b)
            | ClientError::Unauthorized(b)
            | ClientError::Malformed(b)
            | ClientError::Internal(b) => Some(b),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_and_config_errors_report_malformed() {
        assert_eq!(ClientError::Decode("x".into()).kind(), ErrorKind::Malformed);
        let cfg = ClientError::from(ConfigError::Missing("HTTP_ENDPOINT"));
        assert_eq!(cfg.kind(), ErrorKind::Malformed);
        assert_eq!(cfg.to_string(), "missing setting: HTTP_ENDPOINT");
    }

    #[test]
    fn body_is_exposed_for_status_errors_only() {
        assert_eq!(ClientError::Internal("boom".into()).body(), Some("boom"));
        assert_eq!(ClientError::Unauthorized(String::new()).body(), Some(""));
        assert_eq!(ClientError::Decode("count".into()).body(), None);
    }
}
