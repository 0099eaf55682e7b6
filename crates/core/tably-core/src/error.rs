//! Error types for Tably core

use thiserror::Error;

/// Main error type for Tably operations
#[derive(Debug, Error)]
pub enum TablyError {
    /// Malformed upload (CSV or spreadsheet parse failure)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Gateway credential missing or invalid; reported once at startup
    #[error("Gateway configuration error: {0}")]
    GatewayConfig(String),

    /// Per-call generative API failure
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using TablyError
pub type Result<T> = std::result::Result<T, TablyError>;

impl TablyError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        TablyError::Parse(msg.into())
    }

    /// Create a gateway configuration error
    pub fn gateway_config(msg: impl Into<String>) -> Self {
        TablyError::GatewayConfig(msg.into())
    }

    /// Create a gateway error
    pub fn gateway(msg: impl Into<String>) -> Self {
        TablyError::Gateway(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        TablyError::Config(msg.into())
    }

    /// Create a template error
    pub fn template(msg: impl Into<String>) -> Self {
        TablyError::Template(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        TablyError::Other(msg.into())
    }

    /// True when the failure only degrades a feature and the chat loop
    /// should keep running (everything except configuration failures)
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, TablyError::GatewayConfig(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TablyError::parse("bad header row");
        assert_eq!(err.to_string(), "Parse error: bad header row");

        let err = TablyError::gateway("quota exceeded");
        assert_eq!(err.to_string(), "Gateway error: quota exceeded");

        let err = TablyError::gateway_config("missing API key");
        assert_eq!(
            err.to_string(),
            "Gateway configuration error: missing API key"
        );
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(TablyError::parse("x").is_recoverable());
        assert!(TablyError::gateway("x").is_recoverable());
        assert!(!TablyError::gateway_config("x").is_recoverable());
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(returns_result().unwrap(), 42);
    }
}
