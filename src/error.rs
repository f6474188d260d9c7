//! Error types for beverage_inventory

use thiserror::Error;

/// Unified error type for record store and server operations
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP request failed (connection refused, DNS, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse a JSON payload
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Store answered with a non-success status
    #[error("HTTP error: {status} - {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    /// Local SQLite operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Invalid configuration (missing credentials, bad table name, ...)
    #[error("Configuration error: {0}")]
    Config(String),
    /// File or socket I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for beverage_inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = InventoryError::Config("missing anon key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing anon key");
    }

    #[test]
    fn test_http_status_display() {
        let err = InventoryError::HttpStatus {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: "invalid api key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error: 401 Unauthorized - invalid api key"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: InventoryError = parse_err.into();
        assert!(matches!(err, InventoryError::Parse(_)));
    }
}
