//! Configuration for the database connection.

use crate::DbError;
use gantry_core::AppConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection pool configuration for the transaction plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Database URL.
    pub database_url: String,

    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Enable SQLx statement logging.
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl DbConfig {
    /// Create a configuration with the given database URL and defaults
    /// elsewhere.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
            sqlx_logging: false,
        }
    }

    /// Derive the database configuration from the application
    /// configuration. A missing database URL is a configuration error,
    /// surfaced at startup rather than at request time.
    pub fn from_app(config: &AppConfig) -> Result<Self, DbError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| DbError::Config("GANTRY_DATABASE_URL not set".to_string()))?;
        Ok(Self::new(url))
    }

    /// Set the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_secs = timeout.as_secs();
        self
    }

    /// Enable or disable SQLx logging.
    pub fn sqlx_logging(mut self, enabled: bool) -> Self {
        self.sqlx_logging = enabled;
        self
    }

    /// Convert to SeaORM connect options.
    pub fn to_connect_options(&self) -> sea_orm::ConnectOptions {
        let mut options = sea_orm::ConnectOptions::new(&self.database_url);
        options
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .sqlx_logging(self.sqlx_logging);
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DbConfig::new("postgres://localhost/booking");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.connect_timeout_secs, 30);
        assert!(!config.sqlx_logging);
    }

    #[test]
    fn test_from_app_requires_database_url() {
        let app = AppConfig::new("secret");
        assert!(matches!(DbConfig::from_app(&app), Err(DbError::Config(_))));

        let app = AppConfig::new("secret").database_url("postgres://localhost/booking");
        let config = DbConfig::from_app(&app).unwrap();
        assert_eq!(config.database_url, "postgres://localhost/booking");
    }

    #[test]
    fn test_builders() {
        let config = DbConfig::new("postgres://localhost/booking")
            .max_connections(5)
            .connect_timeout(Duration::from_secs(3))
            .sqlx_logging(true);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.connect_timeout_secs, 3);
        assert!(config.sqlx_logging);
    }
}
