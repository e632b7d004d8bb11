use async_trait::async_trait;

use crate::error::DriverError;
use crate::results::ResultSet;
use crate::types::SqlValue;

/// A prepared statement owned by one executor.
///
/// Handles carry the query text and the bound-parameter state; the owning
/// connection performs the actual execution. Placeholder indexes are
/// 1-based, matching SQL placeholder numbering (`?1`, `$1`).
pub trait StatementHandle {
    /// The SQL text this statement was prepared from.
    fn sql(&self) -> &str;

    /// Number of placeholders the statement declares.
    fn parameter_count(&self) -> usize;

    /// Bind a value at a 1-based placeholder index.
    ///
    /// # Errors
    /// Returns `DriverError::Parameter` if the index is zero or beyond the
    /// declared placeholder count.
    fn bind_parameter(&mut self, index: usize, value: SqlValue) -> Result<(), DriverError>;

    /// The first placeholder index with no value bound, if any.
    fn first_unbound(&self) -> Option<usize>;
}

/// A live database session that can demarcate an explicit transaction.
///
/// Implementations wrap a caller-owned driver connection; the trait assumes
/// exclusive use for the duration of one executor call, which the executor
/// enforces by holding `&mut`. Serializing access across threads is the
/// caller's concern.
#[async_trait]
pub trait TransactionalConnection: Send {
    type Statement: StatementHandle + Send;

    /// Toggle auto-commit. Disabling it starts an explicit transaction;
    /// re-enabling it ends the transactional scope.
    ///
    /// # Errors
    /// Returns `DriverError` if the underlying transaction command fails.
    async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), DriverError>;

    /// Current auto-commit mode.
    fn auto_commit(&self) -> bool;

    /// Prepare a statement from a query template, eagerly validating it.
    ///
    /// # Errors
    /// Returns `DriverError` if the SQL is malformed or the session is
    /// unusable.
    async fn prepare(&mut self, query: &str) -> Result<Self::Statement, DriverError>;

    /// Execute a prepared statement as a query and materialize the rows.
    ///
    /// # Errors
    /// Returns `DriverError` if execution or row retrieval fails, or if a
    /// placeholder was left unbound.
    async fn execute_query(
        &mut self,
        statement: &mut Self::Statement,
    ) -> Result<ResultSet, DriverError>;

    /// Commit the open transaction.
    ///
    /// # Errors
    /// Returns `DriverError` if no transaction is active or the commit
    /// command fails.
    async fn commit(&mut self) -> Result<(), DriverError>;

    /// Roll back the open transaction.
    ///
    /// # Errors
    /// Returns `DriverError` if no transaction is active or the rollback
    /// command fails.
    async fn rollback(&mut self) -> Result<(), DriverError>;
}
