/// Configuration management for maintdesk
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub version: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub database: PathBuf,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds
    pub ttl_secs: i64,
    /// Set the Secure attribute on the session cookie (enable behind HTTPS)
    pub cookie_secure: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenv::dotenv().ok();

        let hostname =
            env::var("MAINTDESK_HOSTNAME").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("MAINTDESK_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| AppError::Validation("Invalid port number".to_string()))?;
        let version = env!("CARGO_PKG_VERSION").to_string();

        let data_directory: PathBuf = env::var("MAINTDESK_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let database = env::var("MAINTDESK_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("maintdesk.sqlite"));

        let session_ttl = env::var("MAINTDESK_SESSION_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .map_err(|_| AppError::Validation("Invalid session TTL".to_string()))?;
        let cookie_secure = env::var("MAINTDESK_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        let log_level = env::var("RUST_LOG")
            .unwrap_or_else(|_| "maintdesk=debug,tower_http=debug".to_string());

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                version,
            },
            storage: StorageConfig {
                data_directory,
                database,
            },
            session: SessionConfig {
                ttl_secs: session_ttl,
                cookie_secure,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.service.hostname.is_empty() {
            return Err(AppError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.session.ttl_secs <= 0 {
            return Err(AppError::Validation(
                "Session TTL must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            service: ServiceConfig {
                hostname: "localhost".to_string(),
                port: 3000,
                version: "0.1.0".to_string(),
            },
            storage: StorageConfig {
                data_directory: "./data".into(),
                database: "./data/maintdesk.sqlite".into(),
            },
            session: SessionConfig {
                ttl_secs: 3600,
                cookie_secure: false,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_session_ttl() {
        let mut config = test_config();
        config.session.ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    // Single test for the env-sensitive paths so parallel tests never see
    // each other's variables.
    #[test]
    fn test_from_env_ttl_and_log_level() {
        env::remove_var("RUST_LOG");

        env::set_var("MAINTDESK_SESSION_TTL_SECS", "soon");
        let err = ServerConfig::from_env().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        env::set_var("MAINTDESK_SESSION_TTL_SECS", "7200");
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.session.ttl_secs, 7200);
        assert_eq!(config.logging.level, "maintdesk=debug,tower_http=debug");

        env::remove_var("MAINTDESK_SESSION_TTL_SECS");
    }
}
