use std::fmt;

use async_trait::async_trait;
use tokio_postgres::Client;

use crate::connection::{StatementHandle, TransactionalConnection};
use crate::error::DriverError;
use crate::results::ResultSet;

use super::params::{as_refs, convert_bindings};
use super::query::build_result_set;
use super::statement::PostgresStatement;

/// Wrapper around a caller-supplied `tokio_postgres::Client`.
///
/// The caller owns the connection task (the future returned by
/// `tokio_postgres::connect`); this wrapper only issues commands on the
/// client.
pub struct PostgresConnection {
    client: Client,
    auto_commit: bool,
    in_transaction: bool,
}

impl PostgresConnection {
    /// Wrap a live client. Auto-commit starts enabled, matching the server
    /// session default.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            auto_commit: true,
            in_transaction: false,
        }
    }

    /// Execute a batch of SQL statements in auto-commit mode.
    ///
    /// Intended for schema setup and seeding around transactional calls.
    ///
    /// # Errors
    /// Returns `DriverError` if a transaction is open or execution fails.
    pub async fn execute_batch(&mut self, sql: &str) -> Result<(), DriverError> {
        if self.in_transaction {
            return Err(DriverError::Other(
                "Postgres transaction in progress; operation not permitted (execute batch)".into(),
            ));
        }
        self.client
            .batch_execute(sql)
            .await
            .map_err(DriverError::Postgres)
    }
}

#[async_trait]
impl TransactionalConnection for PostgresConnection {
    type Statement = PostgresStatement;

    async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), DriverError> {
        if enabled == self.auto_commit {
            return Ok(());
        }
        if enabled {
            // Re-enabling ends the transactional scope; a still-open
            // transaction is committed, matching driver semantics.
            if self.in_transaction {
                self.client
                    .batch_execute("COMMIT")
                    .await
                    .map_err(DriverError::Postgres)?;
                self.in_transaction = false;
            }
            self.auto_commit = true;
        } else {
            self.client
                .batch_execute("BEGIN")
                .await
                .map_err(DriverError::Postgres)?;
            self.in_transaction = true;
            self.auto_commit = false;
        }
        Ok(())
    }

    fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    async fn prepare(&mut self, query: &str) -> Result<PostgresStatement, DriverError> {
        let stmt = self
            .client
            .prepare(query)
            .await
            .map_err(DriverError::Postgres)?;
        Ok(PostgresStatement::new(stmt, query.to_owned()))
    }

    async fn execute_query(
        &mut self,
        statement: &mut PostgresStatement,
    ) -> Result<ResultSet, DriverError> {
        if let Some(index) = statement.first_unbound() {
            return Err(DriverError::Parameter(format!(
                "placeholder {index} left unbound"
            )));
        }
        let values = convert_bindings(statement.bindings())?;
        let refs = as_refs(&values);
        let rows = self
            .client
            .query(statement.driver_statement(), &refs)
            .await
            .map_err(DriverError::Postgres)?;
        build_result_set(statement.driver_statement(), &rows)
    }

    async fn commit(&mut self) -> Result<(), DriverError> {
        if !self.in_transaction {
            return Err(DriverError::Other("Postgres transaction not active".into()));
        }
        self.client
            .batch_execute("COMMIT")
            .await
            .map_err(DriverError::Postgres)?;
        self.in_transaction = false;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DriverError> {
        if !self.in_transaction {
            return Err(DriverError::Other("Postgres transaction not active".into()));
        }
        self.client
            .batch_execute("ROLLBACK")
            .await
            .map_err(DriverError::Postgres)?;
        self.in_transaction = false;
        Ok(())
    }
}

impl fmt::Debug for PostgresConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConnection")
            .field("auto_commit", &self.auto_commit)
            .field("in_transaction", &self.in_transaction)
            .finish()
    }
}
