//! Unit-of-work helpers.
//!
//! Services open a transaction with [`begin`], run repository calls against
//! it, and hand the outcome to [`finish`]:
//!
//! ```ignore
//! let txn = uow::begin(&db).await?;
//! let result = repo.delete(&txn, id).await;
//! uow::finish(txn, result).await
//! ```

use helpcenter_common::{AppResult, db_err};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

/// Begin a transaction on the pool.
pub async fn begin(db: &DatabaseConnection) -> AppResult<DatabaseTransaction> {
    db.begin().await.map_err(db_err)
}

/// Commit on `Ok`, roll back on `Err`.
///
/// A failed rollback is logged; the original error is still returned.
pub async fn finish<T>(txn: DatabaseTransaction, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(db_err)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!(error = %rollback_err, "Transaction rollback failed");
            } else {
                tracing::warn!(error = %err, "Transaction rolled back");
            }
            Err(err)
        }
    }
}
