//! The transaction plugin.
//!
//! Opens the connection pool at application startup, begins one
//! transaction before each request, commits it after a successful request
//! and rolls it back on the exception edge. A transaction the action
//! already finished itself is benign on both edges; any other commit or
//! rollback failure is fatal to the request.

use crate::{Database, DbConfig, RequestTransaction, TxnOutcome};
use async_trait::async_trait;
use gantry_core::{AppConfig, Error, Plugin, RequestContext};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Plugin wrapping every request in a database transaction.
pub struct TransactionPlugin {
    config: DbConfig,
    database: OnceLock<Database>,
}

impl TransactionPlugin {
    pub fn new(config: DbConfig) -> Self {
        Self {
            config,
            database: OnceLock::new(),
        }
    }

    /// Build the plugin from the application configuration. Fails here,
    /// at initialization, when no database URL is configured.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, Error> {
        Ok(Self::new(DbConfig::from_app(config)?))
    }

    /// The connection pool, once the plugin has started.
    pub fn database(&self) -> Option<&Database> {
        self.database.get()
    }
}

#[async_trait]
impl Plugin for TransactionPlugin {
    fn name(&self) -> &str {
        "transaction"
    }

    async fn on_app_start(&self) -> Result<(), Error> {
        let database = Database::connect(self.config.clone())
            .await
            .map_err(Error::from)?;
        // A second start leaves the existing pool in place.
        let _ = self.database.set(database);
        Ok(())
    }

    async fn before_request(&self, ctx: &mut RequestContext) -> Result<(), Error> {
        let Some(database) = self.database.get() else {
            return Err(Error::Database(
                "Transaction plugin was not started".to_string(),
            ));
        };
        let txn = database.begin().await.map_err(Error::from)?;
        ctx.extensions
            .insert_arc(Arc::new(RequestTransaction::new(txn)));
        Ok(())
    }

    async fn after_request(&self, ctx: &mut RequestContext) -> Result<(), Error> {
        let Some(txn) = ctx.extensions.get_arc::<RequestTransaction>() else {
            return Ok(());
        };
        if txn.commit().await.map_err(Error::from)? == TxnOutcome::AlreadyFinished {
            debug!("Transaction was already finished by the action");
        }
        Ok(())
    }

    async fn on_exception(&self, ctx: &mut RequestContext, _error: &Error) -> Result<(), Error> {
        let Some(txn) = ctx.extensions.get_arc::<RequestTransaction>() else {
            return Ok(());
        };
        if !txn.is_active() {
            return Ok(());
        }
        txn.rollback().await.map_err(Error::from)?;
        Ok(())
    }
}

/// Access to the per-request transaction from hooks and actions.
pub trait TransactionAccess {
    fn transaction(&self) -> Option<Arc<RequestTransaction>>;
}

impl TransactionAccess for RequestContext {
    fn transaction(&self) -> Option<Arc<RequestTransaction>> {
        self.extensions.get_arc::<RequestTransaction>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::HttpRequest;

    fn context() -> RequestContext {
        RequestContext::new(
            HttpRequest::new("GET", "/"),
            "Hotels.show",
            Arc::new(AppConfig::new("secret")),
        )
    }

    #[test]
    fn test_from_app_config_requires_database_url() {
        let config = AppConfig::new("secret");
        assert!(TransactionPlugin::from_app_config(&config).is_err());

        let config = AppConfig::new("secret").database_url("postgres://localhost/booking");
        assert!(TransactionPlugin::from_app_config(&config).is_ok());
    }

    #[tokio::test]
    async fn test_before_request_fails_without_startup() {
        let plugin = TransactionPlugin::new(DbConfig::new("postgres://localhost/booking"));
        let mut ctx = context();
        assert!(plugin.before_request(&mut ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_hooks_are_benign_without_a_transaction() {
        let plugin = TransactionPlugin::new(DbConfig::new("postgres://localhost/booking"));
        let mut ctx = context();

        assert!(plugin.after_request(&mut ctx).await.is_ok());
        let error = Error::Internal("boom".into());
        assert!(plugin.on_exception(&mut ctx, &error).await.is_ok());
    }

    #[tokio::test]
    async fn test_exception_hook_skips_finished_transaction() {
        let plugin = TransactionPlugin::new(DbConfig::new("postgres://localhost/booking"));
        let mut ctx = context();
        ctx.extensions
            .insert_arc(Arc::new(RequestTransaction::finished()));

        let error = Error::Internal("boom".into());
        assert!(plugin.on_exception(&mut ctx, &error).await.is_ok());
        assert!(plugin.after_request(&mut ctx).await.is_ok());
    }
}
