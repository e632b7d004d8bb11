use crate::error::DriverError;
use crate::types::SqlValue;

/// Convert one [`SqlValue`] to the driver's value type.
#[must_use]
pub fn to_sqlite_value(value: &SqlValue) -> rusqlite::types::Value {
    match value {
        SqlValue::Int(i) => rusqlite::types::Value::Integer(*i),
        SqlValue::Float(f) => rusqlite::types::Value::Real(*f),
        SqlValue::Text(s) => rusqlite::types::Value::Text(s.clone()),
        SqlValue::Bool(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        SqlValue::Timestamp(dt) => {
            let formatted = dt.format("%F %T%.f").to_string();
            rusqlite::types::Value::Text(formatted)
        }
        SqlValue::Null => rusqlite::types::Value::Null,
        SqlValue::Json(jval) => rusqlite::types::Value::Text(jval.to_string()),
        SqlValue::Blob(bytes) => rusqlite::types::Value::Blob(bytes.clone()),
    }
}

/// Convert a fully-bound parameter buffer into driver values.
///
/// # Errors
/// Returns `DriverError::Parameter` naming the first unbound placeholder.
pub(crate) fn convert_bindings(
    bindings: &[Option<SqlValue>],
) -> Result<Vec<rusqlite::types::Value>, DriverError> {
    let mut values = Vec::with_capacity(bindings.len());
    for (i, binding) in bindings.iter().enumerate() {
        match binding {
            Some(v) => values.push(to_sqlite_value(v)),
            None => {
                return Err(DriverError::Parameter(format!(
                    "placeholder {} left unbound",
                    i + 1
                )));
            }
        }
    }
    Ok(values)
}
