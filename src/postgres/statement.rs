use crate::connection::StatementHandle;
use crate::error::DriverError;
use crate::types::SqlValue;

/// Handle to a prepared Postgres statement.
///
/// `tokio_postgres::Statement` is an owned handle, so the statement travels
/// with the executor while the client performs the execution.
#[derive(Debug, Clone)]
pub struct PostgresStatement {
    stmt: tokio_postgres::Statement,
    sql: String,
    bindings: Vec<Option<SqlValue>>,
}

impl PostgresStatement {
    pub(crate) fn new(stmt: tokio_postgres::Statement, sql: String) -> Self {
        let parameter_count = stmt.params().len();
        Self {
            stmt,
            sql,
            bindings: vec![None; parameter_count],
        }
    }

    pub(crate) fn driver_statement(&self) -> &tokio_postgres::Statement {
        &self.stmt
    }

    pub(crate) fn bindings(&self) -> &[Option<SqlValue>] {
        &self.bindings
    }
}

impl StatementHandle for PostgresStatement {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn parameter_count(&self) -> usize {
        self.bindings.len()
    }

    fn bind_parameter(&mut self, index: usize, value: SqlValue) -> Result<(), DriverError> {
        if index == 0 || index > self.bindings.len() {
            return Err(DriverError::Parameter(format!(
                "placeholder index {index} out of range (statement declares {})",
                self.bindings.len()
            )));
        }
        self.bindings[index - 1] = Some(value);
        Ok(())
    }

    fn first_unbound(&self) -> Option<usize> {
        self.bindings.iter().position(Option::is_none).map(|i| i + 1)
    }
}
