//! The per-request transaction handle.
//!
//! One [`RequestTransaction`] is attached to the request context by the
//! transaction plugin. The action may finish it early with
//! [`commit`](RequestTransaction::commit) or
//! [`rollback`](RequestTransaction::rollback); the plugin's own commit or
//! rollback then observes [`TxnOutcome::AlreadyFinished`], which is benign.

use crate::{DbError, DbResult};
use sea_orm::DatabaseTransaction;
use std::sync::Mutex;
use tracing::debug;

/// How a commit or rollback call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnOutcome {
    Committed,
    RolledBack,
    /// The transaction was already committed or rolled back earlier in
    /// the request.
    AlreadyFinished,
}

/// Handle to the transaction opened for the current request.
///
/// The underlying transaction is consumed by the first commit or rollback;
/// later calls report [`TxnOutcome::AlreadyFinished`] instead of failing.
pub struct RequestTransaction {
    inner: Mutex<Option<DatabaseTransaction>>,
}

impl RequestTransaction {
    pub(crate) fn new(txn: DatabaseTransaction) -> Self {
        Self {
            inner: Mutex::new(Some(txn)),
        }
    }

    /// Whether the transaction is still open.
    pub fn is_active(&self) -> bool {
        self.inner.lock().unwrap().is_some()
    }

    /// Commit the transaction.
    pub async fn commit(&self) -> DbResult<TxnOutcome> {
        let txn = self.inner.lock().unwrap().take();
        match txn {
            Some(txn) => {
                txn.commit().await.map_err(DbError::from)?;
                debug!("Transaction committed");
                Ok(TxnOutcome::Committed)
            }
            None => Ok(TxnOutcome::AlreadyFinished),
        }
    }

    /// Roll the transaction back.
    pub async fn rollback(&self) -> DbResult<TxnOutcome> {
        let txn = self.inner.lock().unwrap().take();
        match txn {
            Some(txn) => {
                txn.rollback().await.map_err(DbError::from)?;
                debug!("Transaction rolled back");
                Ok(TxnOutcome::RolledBack)
            }
            None => Ok(TxnOutcome::AlreadyFinished),
        }
    }

    #[cfg(test)]
    pub(crate) fn finished() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }
}
