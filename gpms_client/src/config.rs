//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated
//! configuration.

use std::time::Duration;

/// Complete client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL
    pub server_url: String,
    /// Path of the JSON file backing the credential store
    pub storage_path: String,
    /// Notification poll interval
    pub poll_interval: Duration,
    /// Page size for notification fetches
    pub notification_limit: usize,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `server_override` - Optional base URL override (from CLI args)
    /// * `storage_override` - Optional storage path override (from CLI args)
    /// * `interval_override` - Optional poll interval override in
    ///   milliseconds (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a value is present but invalid
    pub fn from_env(
        server_override: Option<String>,
        storage_override: Option<String>,
        interval_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let server_url = server_override
            .or_else(|| std::env::var("GPMS_SERVER_URL").ok())
            .unwrap_or_else(|| "http://localhost:8000/api".to_string());

        let storage_path = storage_override
            .or_else(|| std::env::var("GPMS_STORAGE_PATH").ok())
            .unwrap_or_else(|| "gpms_session.json".to_string());

        let poll_interval_ms =
            interval_override.unwrap_or_else(|| parse_env_or("GPMS_POLL_INTERVAL_MS", 5_000));

        let config = ClientConfig {
            server_url,
            storage_path,
            poll_interval: Duration::from_millis(poll_interval_ms),
            notification_limit: parse_env_or("GPMS_NOTIFICATION_LIMIT", 50),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "GPMS_SERVER_URL".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.storage_path.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "GPMS_STORAGE_PATH".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid {
                var: "GPMS_POLL_INTERVAL_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.notification_limit == 0 {
            return Err(ConfigError::Invalid {
                var: "GPMS_NOTIFICATION_LIMIT".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ClientConfig {
        ClientConfig {
            server_url: "http://localhost:8000/api".to_string(),
            storage_path: "gpms_session.json".to_string(),
            poll_interval: Duration::from_millis(5_000),
            notification_limit: 50,
        }
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_empty_server_url_is_invalid() {
        let config = ClientConfig {
            server_url: "  ".to_string(),
            ..valid_config()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_zero_interval_is_invalid() {
        let config = ClientConfig {
            poll_interval: Duration::ZERO,
            ..valid_config()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GPMS_POLL_INTERVAL_MS"));
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        let config = ClientConfig {
            notification_limit: 0,
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }
}
