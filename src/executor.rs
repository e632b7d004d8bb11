use crate::binder::ParameterBinder;
use crate::connection::{StatementHandle, TransactionalConnection};
use crate::error::{DriverError, TransactorError};
use crate::results::ResultSet;

/// Executes one parameterized query inside an explicit transaction boundary.
///
/// The executor borrows a live connection exclusively, prepares its statement
/// eagerly at construction, and runs exactly one transactional lifecycle:
/// disable auto-commit, bind, execute, fetch, then commit on success or roll
/// back on failure, restoring auto-commit before returning on every path.
/// Consuming `self` in [`execute_and_return`](Self::execute_and_return)
/// enforces the one-shot lifecycle; the statement is dropped with the
/// executor.
///
/// ```rust
/// use sql_transactor::prelude::*;
///
/// # #[cfg(feature = "sqlite")]
/// # async fn demo(conn: &mut SqliteConnection) -> Result<(), TransactorError> {
/// let executor = TransactionalQueryExecutor::new(
///     conn,
///     vec![SqlValue::Int(42)],
///     "SELECT * FROM users WHERE id = ?1",
///     PositionalBinder,
/// )
/// .await?;
/// let rows = executor.execute_and_return().await?;
/// if rows.is_empty() {
///     // ran fine, matched nothing
/// }
/// # Ok(()) }
/// ```
pub struct TransactionalQueryExecutor<'conn, C, V, B>
where
    C: TransactionalConnection,
    B: ParameterBinder<C::Statement, V>,
{
    connection: &'conn mut C,
    statement: C::Statement,
    value: V,
    binder: B,
}

impl<'conn, C, V, B> TransactionalQueryExecutor<'conn, C, V, B>
where
    C: TransactionalConnection,
    B: ParameterBinder<C::Statement, V>,
{
    /// Build an executor, eagerly preparing `query` against the connection.
    ///
    /// Preparation happens here rather than at execution time so a malformed
    /// template surfaces before any transaction is started; there is no
    /// degraded half-constructed state.
    ///
    /// # Errors
    /// Returns [`TransactorError::Preparation`] if the statement cannot be
    /// prepared.
    pub async fn new(
        connection: &'conn mut C,
        value: V,
        query: &str,
        binder: B,
    ) -> Result<Self, TransactorError> {
        let statement = connection
            .prepare(query)
            .await
            .map_err(TransactorError::Preparation)?;
        Ok(Self {
            connection,
            statement,
            value,
            binder,
        })
    }

    /// The SQL text of the prepared statement.
    #[must_use]
    pub fn sql(&self) -> &str {
        self.statement.sql()
    }

    /// Run the full transactional lifecycle and return the result set.
    ///
    /// The connection is expected in its default auto-commit mode when
    /// handed over; that is the mode restored on exit.
    ///
    /// Steps, in strict order: disable auto-commit, bind parameters, execute
    /// the statement as a query, fetch the rows. Success commits; any
    /// failure in the protected region rolls back instead — commit is never
    /// attempted after a failure. If the commit itself fails, rollback is
    /// attempted once as the remedial action. Auto-commit is restored before
    /// returning on every path.
    ///
    /// An empty result set inside `Ok` means the query ran and matched no
    /// rows; failures are always typed errors.
    ///
    /// # Errors
    /// - [`TransactorError::Binding`] — the bound value did not fit the
    ///   statement parameters; the transaction was rolled back.
    /// - [`TransactorError::Execution`] — the query failed; rolled back.
    /// - [`TransactorError::Commit`] — commit failed; rolled back.
    /// - [`TransactorError::RollbackFailed`] — the rollback itself failed;
    ///   carries the original failure as well.
    pub async fn execute_and_return(mut self) -> Result<ResultSet, TransactorError> {
        // Nothing to restore if the mode change itself failed.
        self.connection
            .set_auto_commit(false)
            .await
            .map_err(TransactorError::Execution)?;

        let outcome = self.run_transaction().await;
        self.restore_auto_commit().await;
        outcome
    }

    async fn run_transaction(&mut self) -> Result<ResultSet, TransactorError> {
        match self.run_protected().await {
            Ok(rows) => match self.connection.commit().await {
                Ok(()) => Ok(rows),
                Err(e) => self.recover(TransactorError::Commit(e)).await,
            },
            Err(cause) => self.recover(cause).await,
        }
    }

    /// The protected region: bind, verify every placeholder is filled,
    /// execute, fetch.
    async fn run_protected(&mut self) -> Result<ResultSet, TransactorError> {
        self.binder
            .bind(&mut self.statement, &self.value)
            .map_err(TransactorError::Binding)?;
        if let Some(index) = self.statement.first_unbound() {
            return Err(TransactorError::Binding(DriverError::Parameter(format!(
                "placeholder {index} left unbound"
            ))));
        }
        self.connection
            .execute_query(&mut self.statement)
            .await
            .map_err(TransactorError::Execution)
    }

    /// Roll back exactly once on behalf of `cause`. A rollback failure is
    /// reported together with the failure that triggered it.
    async fn recover(&mut self, cause: TransactorError) -> Result<ResultSet, TransactorError> {
        match self.connection.rollback().await {
            Ok(()) => Err(cause),
            Err(rollback) => Err(TransactorError::RollbackFailed {
                cause: Box::new(cause),
                rollback,
            }),
        }
    }

    /// Best-effort restore; the primary outcome of the call is never
    /// replaced by a restore failure.
    async fn restore_auto_commit(&mut self) {
        if let Err(e) = self.connection.set_auto_commit(true).await {
            tracing::warn!(error = %e, "failed to restore auto-commit after transactional execution");
        }
    }
}
