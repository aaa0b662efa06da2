// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;
use std::str::FromStr;

/// Which storage engine backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// JSON file of serialized objects
    File,
    /// PostgreSQL database
    Db,
}

impl FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "" => Ok(StorageMode::File),
            "db" => Ok(StorageMode::Db),
            other => Err(format!("unknown storage type: {}", other)),
        }
    }
}

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (HBNB_API_HOST)
    pub api_host: String,

    /// Server listen port (HBNB_API_PORT, default 5000)
    pub api_port: u16,

    /// Storage engine selector as given (HBNB_TYPE_STORAGE: "db" or "file")
    pub storage_type: String,

    /// Path of the JSON document used by the file engine
    pub file_path: String,

    /// Database credentials and location
    pub db_user: String,
    pub db_password: String,
    pub db_host: String,
    pub db_port: u16,
    pub db_name: String,

    /// Environment name (HBNB_ENV); "test" wipes the database at startup
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Maximum connections in database pool
    pub db_max_connections: u32,

    /// Connection timeout in seconds
    pub db_connection_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_host: "0.0.0.0".to_string(),
            api_port: 5000,
            storage_type: "file".to_string(),
            file_path: "file.json".to_string(),
            db_user: String::new(),
            db_password: String::new(),
            db_host: "localhost".to_string(),
            db_port: 5432,
            db_name: String::new(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
            db_max_connections: 10,
            db_connection_timeout: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv().ok();
        let defaults = Config::default();

        Config {
            api_host: env::var("HBNB_API_HOST").unwrap_or(defaults.api_host),

            api_port: env::var("HBNB_API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.api_port),

            storage_type: env::var("HBNB_TYPE_STORAGE").unwrap_or(defaults.storage_type),

            file_path: env::var("HBNB_FILE_PATH").unwrap_or(defaults.file_path),

            db_user: env::var("HBNB_DB_USER").unwrap_or(defaults.db_user),

            db_password: env::var("HBNB_DB_PWD").unwrap_or(defaults.db_password),

            db_host: env::var("HBNB_DB_HOST").unwrap_or(defaults.db_host),

            db_port: env::var("HBNB_DB_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.db_port),

            db_name: env::var("HBNB_DB_NAME").unwrap_or(defaults.db_name),

            environment: env::var("HBNB_ENV").unwrap_or(defaults.environment),

            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.db_max_connections),

            db_connection_timeout: env::var("DB_CONNECTION_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.db_connection_timeout),
        }
    }

    /// Parsed storage engine selector
    pub fn storage_mode(&self) -> Result<StorageMode, String> {
        self.storage_type.parse()
    }

    pub fn is_test_env(&self) -> bool {
        self.environment == "test"
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        let mode = self.storage_mode()?;
        match mode {
            StorageMode::Db => {
                if self.db_user.is_empty() {
                    return Err("HBNB_DB_USER is required for db storage".to_string());
                }
                if self.db_name.is_empty() {
                    return Err("HBNB_DB_NAME is required for db storage".to_string());
                }
            }
            StorageMode::File => {
                if self.file_path.is_empty() {
                    return Err("HBNB_FILE_PATH cannot be empty".to_string());
                }
            }
        }

        if self.is_test_env() && mode == StorageMode::Db {
            log::warn!("HBNB_ENV=test - all tables will be dropped at startup");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_mode_parsing() {
        assert_eq!("db".parse::<StorageMode>(), Ok(StorageMode::Db));
        assert_eq!("DB".parse::<StorageMode>(), Ok(StorageMode::Db));
        assert_eq!("file".parse::<StorageMode>(), Ok(StorageMode::File));
        assert!("mysql".parse::<StorageMode>().is_err());
    }

    #[test]
    fn test_db_mode_with_credentials_is_valid() {
        let config = Config {
            storage_type: "db".to_string(),
            db_user: "hbnb_dev".to_string(),
            db_password: "hbnb_dev_pwd".to_string(),
            db_name: "hbnb_dev_db".to_string(),
            ..Config::default()
        };
        assert_eq!(config.storage_mode(), Ok(StorageMode::Db));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_db_mode_requires_credentials() {
        let config = Config {
            storage_type: "db".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_unknown_storage_type_is_rejected() {
        let config = Config {
            storage_type: "dbb".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("dbb"), "{}", err);
    }
}
