use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::spawn_blocking;

use crate::connection::{StatementHandle, TransactionalConnection};
use crate::error::DriverError;
use crate::results::ResultSet;

use super::params::convert_bindings;
use super::query::build_result_set;
use super::statement::SqliteStatement;

type SharedConnection = Arc<tokio::sync::Mutex<rusqlite::Connection>>;

/// Wrapper around a caller-supplied `rusqlite::Connection`.
///
/// The connection stays owned by this wrapper behind a mutex so driver calls
/// can run on the blocking pool; callers hand it to an executor by `&mut`
/// for the duration of one call.
pub struct SqliteConnection {
    conn: SharedConnection,
    auto_commit: bool,
    in_transaction: bool,
}

impl SqliteConnection {
    /// Wrap a live connection. Auto-commit starts enabled, matching the
    /// driver's default.
    #[must_use]
    pub fn new(conn: rusqlite::Connection) -> Self {
        Self {
            conn: Arc::new(tokio::sync::Mutex::new(conn)),
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
                "SQLite transaction in progress; operation not permitted (execute batch)".into(),
            ));
        }
        let sql_owned = sql.to_owned();
        run_blocking(self.conn_handle(), move |guard| {
            guard.execute_batch(&sql_owned).map_err(DriverError::Sqlite)
        })
        .await
    }

    async fn transaction_command(&mut self, command: &'static str) -> Result<(), DriverError> {
        run_blocking(self.conn_handle(), move |guard| {
            guard.execute_batch(command).map_err(DriverError::Sqlite)
        })
        .await
    }

    fn conn_handle(&self) -> SharedConnection {
        Arc::clone(&self.conn)
    }
}

#[async_trait]
impl TransactionalConnection for SqliteConnection {
    type Statement = SqliteStatement;

    async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), DriverError> {
        if enabled == self.auto_commit {
            return Ok(());
        }
        if enabled {
            // Re-enabling ends the transactional scope; a still-open
            // transaction is committed, matching driver semantics.
            if self.in_transaction {
                self.transaction_command("COMMIT").await?;
                self.in_transaction = false;
            }
            self.auto_commit = true;
        } else {
            self.transaction_command("BEGIN").await?;
            self.in_transaction = true;
            self.auto_commit = false;
        }
        Ok(())
    }

    fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    async fn prepare(&mut self, query: &str) -> Result<SqliteStatement, DriverError> {
        let sql = Arc::new(query.to_owned());
        let sql_clone = Arc::clone(&sql);
        // Warm the driver's statement cache and capture the declared
        // placeholder count; execution re-enters the cache by SQL text.
        let parameter_count = run_blocking(self.conn_handle(), move |guard| {
            let stmt = guard
                .prepare_cached(sql_clone.as_ref())
                .map_err(DriverError::Sqlite)?;
            Ok(stmt.parameter_count())
        })
        .await?;
        Ok(SqliteStatement::new(sql, parameter_count))
    }

    async fn execute_query(
        &mut self,
        statement: &mut SqliteStatement,
    ) -> Result<ResultSet, DriverError> {
        if let Some(index) = statement.first_unbound() {
            return Err(DriverError::Parameter(format!(
                "placeholder {index} left unbound"
            )));
        }
        let sql = statement.sql_arc();
        let params = convert_bindings(statement.bindings())?;
        run_blocking(self.conn_handle(), move |guard| {
            let mut stmt = guard
                .prepare_cached(sql.as_ref())
                .map_err(DriverError::Sqlite)?;
            build_result_set(&mut stmt, &params)
        })
        .await
    }

    async fn commit(&mut self) -> Result<(), DriverError> {
        if !self.in_transaction {
            return Err(DriverError::Other("SQLite transaction not active".into()));
        }
        self.transaction_command("COMMIT").await?;
        self.in_transaction = false;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DriverError> {
        if !self.in_transaction {
            return Err(DriverError::Other("SQLite transaction not active".into()));
        }
        self.transaction_command("ROLLBACK").await?;
        self.in_transaction = false;
        Ok(())
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("auto_commit", &self.auto_commit)
            .field("in_transaction", &self.in_transaction)
            .finish()
    }
}

async fn run_blocking<F, R>(conn: SharedConnection, func: F) -> Result<R, DriverError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, DriverError> + Send + 'static,
    R: Send + 'static,
{
    spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| DriverError::Other(format!("sqlite spawn_blocking join error: {e}")))?
}
