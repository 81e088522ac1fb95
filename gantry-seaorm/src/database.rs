//! Database connection management.

use crate::{DbConfig, DbError, DbResult};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared connection pool used by the transaction plugin.
#[derive(Clone)]
pub struct Database {
    conn: DatabaseConnection,
    config: Arc<DbConfig>,
}

impl Database {
    /// Connect to the database with the given configuration.
    pub async fn connect(config: DbConfig) -> DbResult<Self> {
        info!("Connecting to database");

        let options = config.to_connect_options();
        let conn = sea_orm::Database::connect(options)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        info!("Database connection established");

        Ok(Self {
            conn,
            config: Arc::new(config),
        })
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Get the configuration.
    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Begin one transaction.
    pub async fn begin(&self) -> DbResult<DatabaseTransaction> {
        debug!("Beginning database transaction");
        self.conn.begin().await.map_err(DbError::from)
    }

    /// Ping the database to check connectivity.
    pub async fn ping(&self) -> DbResult<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| DbError::Connection(e.to_string()))
    }

    /// Close the database connection.
    pub async fn close(self) -> DbResult<()> {
        info!("Closing database connection");
        self.conn
            .close()
            .await
            .map_err(|e| DbError::Connection(e.to_string()))
    }
}

impl std::ops::Deref for Database {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl AsRef<DatabaseConnection> for Database {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.conn
    }
}
