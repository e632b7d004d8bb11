use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;
#[cfg(feature = "postgres")]
use tokio_postgres;

/// Error raised by a database driver or by parameter handling below the
/// transaction layer.
#[derive(Debug, Error)]
pub enum DriverError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Parameter error: {0}")]
    Parameter(String),

    #[error("Database error: {0}")]
    Other(String),
}

/// Error returned by the transactional executor, classified by the phase
/// that failed.
///
/// `RollbackFailed` is the most severe case: the remedial rollback itself
/// failed and the transaction is in an indeterminate state. It carries both
/// the rollback error and the failure that triggered the rollback, so
/// neither is lost.
#[derive(Debug, Error)]
pub enum TransactorError {
    /// The statement could not be prepared from the query template.
    #[error("failed to prepare statement: {0}")]
    Preparation(#[source] DriverError),

    /// The bound value could not be applied to the statement parameters.
    #[error("failed to bind statement parameters: {0}")]
    Binding(#[source] DriverError),

    /// The query failed during execution or result retrieval.
    #[error("query execution failed: {0}")]
    Execution(#[source] DriverError),

    /// The transaction could not be committed.
    #[error("failed to commit transaction: {0}")]
    Commit(#[source] DriverError),

    /// The remedial rollback failed; the original error is preserved
    /// alongside the rollback error.
    #[error("rollback failed: {rollback} (while handling: {cause})")]
    RollbackFailed {
        cause: Box<TransactorError>,
        #[source]
        rollback: DriverError,
    },
}

impl TransactorError {
    /// The error that started the failure, unwrapping a failed rollback to
    /// the failure that triggered it.
    #[must_use]
    pub fn original(&self) -> &TransactorError {
        match self {
            TransactorError::RollbackFailed { cause, .. } => cause.original(),
            other => other,
        }
    }
}
