//! Error types for the database integration.

use thiserror::Error;

/// Errors from connecting, beginning and finishing transactions.
#[derive(Error, Debug)]
pub enum DbError {
    /// Database connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error from SeaORM.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Transaction error.
    #[error("Transaction error: {0}")]
    Transaction(String),
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Database failures surface to the pipeline as request-fatal errors.
impl From<DbError> for gantry_core::Error {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Config(msg) => gantry_core::Error::Config(msg),
            other => gantry_core::Error::Database(other.to_string()),
        }
    }
}
