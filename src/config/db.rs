// src/config/db.rs
// DOCUMENTATION: Database connection pool initialization
// PURPOSE: Setup and manage PostgreSQL connection pool

use crate::config::Config;
use crate::storage::StorageError;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;

/// Connection settings from the HBNB_DB_* variables
/// DOCUMENTATION: Credentials are passed as separate fields, never spliced
/// into a URL, so reserved characters in a password need no escaping.
pub fn connect_options(config: &Config) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .username(&config.db_user)
        .password(&config.db_password)
        .database(&config.db_name)
}

/// Initialize PostgreSQL connection pool
/// DOCUMENTATION: Creates connection pool with optimal settings
/// Called once during startup when HBNB_TYPE_STORAGE=db
pub async fn init_db_pool(config: &Config) -> Result<PgPool, StorageError> {
    log::info!(
        "Initializing database pool: {}@{}:{}/{}",
        config.db_user,
        config.db_host,
        config.db_port,
        config.db_name
    );

    let pool = PgPoolOptions::new()
        // Maximum concurrent connections
        .max_connections(config.db_max_connections)
        // Timeout waiting for connection from pool
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        // Connection idle timeout (5 minutes)
        .idle_timeout(Duration::from_secs(300))
        // Connection lifetime (30 minutes before recycle)
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(connect_options(config))
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    // Verify connection works
    sqlx::query("SELECT 1").execute(&pool).await?;

    log::info!("Database pool initialized successfully");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_keep_reserved_characters_out_of_the_target() {
        let config = Config {
            storage_type: "db".to_string(),
            db_user: "hbnb_dev".to_string(),
            db_password: "p@ss/w#rd?%20".to_string(),
            db_host: "db.internal".to_string(),
            db_port: 6543,
            db_name: "hbnb_dev_db".to_string(),
            ..Config::default()
        };

        let options = connect_options(&config);
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "hbnb_dev");
        assert_eq!(options.get_database(), Some("hbnb_dev_db"));
    }
}
