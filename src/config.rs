//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8080)
    pub port: u16,
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
}

/// Pagination defaults and caps for listing endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Default page size for notification listings
    pub notification_limit: u32,
    /// Default page size for watch-history listings
    pub history_limit: u32,
    /// Hard cap on any requested page size
    pub max_limit: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format ("pretty" or "json")
    pub format: String,
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// # Priority (low to high)
    /// 1. Default values
    /// 2. config/default.toml
    /// 3. config/local.toml
    /// 4. Environment variables (CLIPNEST__*)
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.path", "data/clipnest.db")?
            .set_default("pagination.notification_limit", 10)?
            .set_default("pagination.history_limit", 20)?
            .set_default("pagination.max_limit", 100)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (CLIPNEST_*)
            .add_source(
                Environment::with_prefix("CLIPNEST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), crate::error::AppError> {
        if self.pagination.max_limit == 0 {
            return Err(crate::error::AppError::Config(
                "pagination.max_limit must be greater than zero".to_string(),
            ));
        }
        if self.pagination.notification_limit == 0 || self.pagination.history_limit == 0 {
            return Err(crate::error::AppError::Config(
                "pagination default limits must be greater than zero".to_string(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(crate::error::AppError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                path: PathBuf::from("data/test.db"),
            },
            pagination: PaginationConfig {
                notification_limit: 10,
                history_limit: 20,
                max_limit: 100,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn zero_max_limit_is_rejected() {
        let mut config = base_config();
        config.pagination.max_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let mut config = base_config();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }
}
