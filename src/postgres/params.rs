use std::error::Error;

use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_util::bytes;

use crate::error::DriverError;
use crate::types::SqlValue;

/// Convert a fully-bound parameter buffer into owned values for execution.
///
/// # Errors
/// Returns `DriverError::Parameter` naming the first unbound placeholder.
pub(crate) fn convert_bindings(
    bindings: &[Option<SqlValue>],
) -> Result<Vec<SqlValue>, DriverError> {
    let mut values = Vec::with_capacity(bindings.len());
    for (i, binding) in bindings.iter().enumerate() {
        match binding {
            Some(v) => values.push(v.clone()),
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

/// Borrow a value slice as the driver's parameter references.
pub(crate) fn as_refs(values: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut bytes::BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Int(i) => (*i).to_sql(ty, out),
            SqlValue::Float(f) => (*f).to_sql(ty, out),
            SqlValue::Text(s) => s.to_sql(ty, out),
            SqlValue::Bool(b) => (*b).to_sql(ty, out),
            SqlValue::Timestamp(dt) => dt.to_sql(ty, out),
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Json(jsval) => jsval.to_sql(ty, out),
            SqlValue::Blob(bytes) => bytes.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        match *ty {
            // Integer types
            Type::INT2 | Type::INT4 | Type::INT8 => true,
            // Floating point types
            Type::FLOAT4 | Type::FLOAT8 => true,
            // Text types
            Type::TEXT | Type::VARCHAR | Type::CHAR | Type::NAME => true,
            // Boolean type
            Type::BOOL => true,
            // Date/time types
            Type::TIMESTAMP | Type::TIMESTAMPTZ | Type::DATE => true,
            // JSON types
            Type::JSON | Type::JSONB => true,
            // Binary data
            Type::BYTEA => true,
            _ => false,
        }
    }

    to_sql_checked!();
}
