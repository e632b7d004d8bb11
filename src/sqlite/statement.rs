use std::sync::Arc;

use crate::connection::StatementHandle;
use crate::error::DriverError;
use crate::types::SqlValue;

/// Handle to a prepared `SQLite` statement.
///
/// The handle carries the SQL text and the bind buffer; the underlying
/// driver statement lives in the connection's `prepare_cached` cache, warmed
/// at preparation time, so the handle never borrows the connection.
#[derive(Debug, Clone)]
pub struct SqliteStatement {
    sql: Arc<String>,
    parameter_count: usize,
    bindings: Vec<Option<SqlValue>>,
}

impl SqliteStatement {
    pub(crate) fn new(sql: Arc<String>, parameter_count: usize) -> Self {
        Self {
            sql,
            parameter_count,
            bindings: vec![None; parameter_count],
        }
    }

    pub(crate) fn sql_arc(&self) -> Arc<String> {
        Arc::clone(&self.sql)
    }

    pub(crate) fn bindings(&self) -> &[Option<SqlValue>] {
        &self.bindings
    }
}

impl StatementHandle for SqliteStatement {
    fn sql(&self) -> &str {
        self.sql.as_str()
    }

    fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    fn bind_parameter(&mut self, index: usize, value: SqlValue) -> Result<(), DriverError> {
        if index == 0 || index > self.parameter_count {
            return Err(DriverError::Parameter(format!(
                "placeholder index {index} out of range (statement declares {})",
                self.parameter_count
            )));
        }
        self.bindings[index - 1] = Some(value);
        Ok(())
    }

    fn first_unbound(&self) -> Option<usize> {
        self.bindings.iter().position(Option::is_none).map(|i| i + 1)
    }
}
