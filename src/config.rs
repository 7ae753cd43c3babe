//! # Unified Application Configuration
//!
//! Centralized, environment-driven configuration for the service: the HTTP
//! server settings and the tunable knobs of the parsing heuristics. Each
//! section supports loading from environment variables and validation before
//! the service starts accepting requests.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;

/// HTTP server and runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for the public OCR API
    pub port: u16,
    /// Port for the Prometheus metrics and health endpoints
    pub metrics_port: u16,
    /// Environment name (development, staging, production)
    pub environment: String,
    /// Log level for the service
    pub log_level: String,
    /// Whether to include the diagnostic trace in API responses
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            metrics_port: 9090,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            debug: false,
        }
    }
}

impl ServerConfig {
    /// Load server configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            metrics_port: env::var("METRICS_PORT")
                .unwrap_or_else(|_| "9090".to_string())
                .parse()
                .unwrap_or(9090),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            debug: env::var("DEBUG").unwrap_or_else(|_| "false".to_string()) == "true",
        }
    }

    /// Check if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Validate server configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.port == 0 {
            return Err(AppError::Config("API port cannot be 0".to_string()));
        }
        if self.metrics_port == 0 {
            return Err(AppError::Config("Metrics port cannot be 0".to_string()));
        }
        if self.metrics_port == self.port {
            return Err(AppError::Config(
                "Metrics port must differ from the API port".to_string(),
            ));
        }
        Ok(())
    }
}

/// Tunable knobs of the parsing heuristics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Minimum value for a standalone amount line to qualify as the receipt
    /// total. Calibrated per locale so ordinary item prices stay below it.
    pub standalone_total_min: f64,
    /// Upper sanity bound on a single line-item total
    pub max_item_price: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            standalone_total_min: 10.0,
            max_item_price: 10000.0,
        }
    }
}

impl ParserConfig {
    /// Load parser configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            standalone_total_min: env::var("STANDALONE_TOTAL_MIN")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.standalone_total_min),
            max_item_price: env::var("MAX_ITEM_PRICE")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.max_item_price),
        }
    }

    /// Validate parser configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.standalone_total_min < 0.0 {
            return Err(AppError::Config(
                "standalone_total_min cannot be negative".to_string(),
            ));
        }
        if self.max_item_price <= 0.0 {
            return Err(AppError::Config(
                "max_item_price must be greater than 0".to_string(),
            ));
        }
        if self.standalone_total_min >= self.max_item_price {
            return Err(AppError::Config(
                "standalone_total_min must be below max_item_price".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub parser: ParserConfig,
}

impl AppConfig {
    /// Load the full configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            parser: ParserConfig::from_env(),
        }
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.server.validate()?;
        self.parser.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.metrics_port, 9090);
        assert_eq!(config.parser.standalone_total_min, 10.0);
    }

    #[test]
    fn test_server_validation_rejects_bad_ports() {
        let mut config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.port = 9090;
        config.metrics_port = 9090;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parser_validation_rejects_bad_thresholds() {
        let mut config = ParserConfig {
            standalone_total_min: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.standalone_total_min = 10.0;
        config.max_item_price = 0.0;
        assert!(config.validate().is_err());

        config.max_item_price = 5.0;
        assert!(config.validate().is_err());
    }
}
