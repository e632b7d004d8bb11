use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Statement, ToSql};

use crate::error::DriverError;
use crate::results::ResultSet;
use crate::types::SqlValue;

/// Extract a [`SqlValue`] from a `SQLite` row.
///
/// # Errors
/// Returns `DriverError` if the cell cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<SqlValue, DriverError> {
    let value: Value = row.get(idx).map_err(DriverError::Sqlite)?;
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Integer(i) => Ok(SqlValue::Int(i)),
        Value::Real(f) => Ok(SqlValue::Float(f)),
        Value::Text(s) => Ok(SqlValue::Text(s)),
        Value::Blob(b) => Ok(SqlValue::Blob(b)),
    }
}

/// Run a prepared statement as a query and materialize every row.
///
/// Statements that return no rows (DML stepped as a query) yield an empty
/// result set.
///
/// # Errors
/// Returns `DriverError` if execution or row extraction fails.
pub fn build_result_set(stmt: &mut Statement, params: &[Value]) -> Result<ResultSet, DriverError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let column_count = column_names.len();

    let mut rows_iter = stmt.query(&param_refs[..]).map_err(DriverError::Sqlite)?;
    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    while let Some(row) = rows_iter.next().map_err(DriverError::Sqlite)? {
        let mut values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            values.push(sqlite_extract_value(row, i)?);
        }
        result_set.add_row_values(values);
    }

    Ok(result_set)
}
