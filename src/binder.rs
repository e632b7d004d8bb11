use crate::connection::StatementHandle;
use crate::error::DriverError;
use crate::types::SqlValue;

/// Capability supplying the parameter-binding step for one query type.
///
/// The executor holds a binder by composition; each concrete query type
/// either implements the trait or wraps a closure in [`BindWith`].
pub trait ParameterBinder<S, V> {
    /// Apply `value` to the statement's placeholders.
    ///
    /// # Errors
    /// Returns `DriverError` if the value does not fit the statement's
    /// declared parameters.
    fn bind(&self, statement: &mut S, value: &V) -> Result<(), DriverError>;
}

/// Adapter turning a plain closure into a [`ParameterBinder`] for one-off
/// query types.
///
/// ```rust
/// use sql_transactor::prelude::*;
///
/// struct Lookup { id: i64 }
///
/// # fn assert_binder<S: StatementHandle>(_: impl ParameterBinder<S, Lookup>) {}
/// # fn demo<S: StatementHandle>() {
/// let binder = BindWith(|stmt: &mut S, lookup: &Lookup| {
///     stmt.bind_parameter(1, SqlValue::Int(lookup.id))
/// });
/// # assert_binder(binder);
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BindWith<F>(pub F);

impl<S, V, F> ParameterBinder<S, V> for BindWith<F>
where
    F: Fn(&mut S, &V) -> Result<(), DriverError>,
{
    fn bind(&self, statement: &mut S, value: &V) -> Result<(), DriverError> {
        (self.0)(statement, value)
    }
}

/// Binds a slice of [`SqlValue`]s positionally, in order.
///
/// The supplied value count must match the statement's declared placeholder
/// count exactly; a mismatch is reported before anything is bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalBinder;

impl<S, V> ParameterBinder<S, V> for PositionalBinder
where
    S: StatementHandle,
    V: AsRef<[SqlValue]>,
{
    fn bind(&self, statement: &mut S, value: &V) -> Result<(), DriverError> {
        let values = value.as_ref();
        let expected = statement.parameter_count();
        if values.len() != expected {
            return Err(DriverError::Parameter(format!(
                "statement declares {expected} placeholder(s), {} value(s) supplied",
                values.len()
            )));
        }
        for (i, v) in values.iter().enumerate() {
            statement.bind_parameter(i + 1, v.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeStatement {
        count: usize,
        bound: Vec<Option<SqlValue>>,
    }

    impl FakeStatement {
        fn new(count: usize) -> Self {
            Self {
                count,
                bound: vec![None; count],
            }
        }
    }

    impl StatementHandle for FakeStatement {
        fn sql(&self) -> &str {
            "SELECT 1"
        }

        fn parameter_count(&self) -> usize {
            self.count
        }

        fn bind_parameter(&mut self, index: usize, value: SqlValue) -> Result<(), DriverError> {
            if index == 0 || index > self.count {
                return Err(DriverError::Parameter(format!(
                    "placeholder index {index} out of range"
                )));
            }
            self.bound[index - 1] = Some(value);
            Ok(())
        }

        fn first_unbound(&self) -> Option<usize> {
            self.bound.iter().position(Option::is_none).map(|i| i + 1)
        }
    }

    #[test]
    fn positional_binder_fills_every_placeholder() {
        let mut stmt = FakeStatement::new(2);
        let params = vec![SqlValue::Int(7), SqlValue::Text("x".into())];
        PositionalBinder.bind(&mut stmt, &params).unwrap();
        assert_eq!(stmt.first_unbound(), None);
        assert_eq!(stmt.bound[0], Some(SqlValue::Int(7)));
    }

    #[test]
    fn positional_binder_rejects_count_mismatch() {
        let mut stmt = FakeStatement::new(2);
        let params = vec![SqlValue::Int(7)];
        let err = PositionalBinder.bind(&mut stmt, &params).unwrap_err();
        assert!(matches!(err, DriverError::Parameter(_)));
        // Nothing bound on mismatch.
        assert_eq!(stmt.first_unbound(), Some(1));
    }

    #[test]
    fn closures_bind_through_the_adapter() {
        let mut stmt = FakeStatement::new(1);
        let binder = BindWith(|s: &mut FakeStatement, v: &i64| {
            s.bind_parameter(1, SqlValue::Int(*v))
        });
        binder.bind(&mut stmt, &99).unwrap();
        assert_eq!(stmt.bound[0], Some(SqlValue::Int(99)));
    }
}
