use crate::binder::PositionalBinder;
use crate::connection::TransactionalConnection;
use crate::error::TransactorError;
use crate::executor::TransactionalQueryExecutor;
use crate::results::ResultSet;
use crate::types::SqlValue;

/// Prepare and run one query transactionally with positional parameters.
///
/// Convenience over building a [`TransactionalQueryExecutor`] by hand; the
/// parameter count must match the statement's declared placeholders.
///
/// # Errors
/// Returns [`TransactorError`] for any preparation, binding, execution,
/// commit, or rollback failure.
pub async fn execute_with_transaction<C>(
    connection: &mut C,
    query: &str,
    params: &[SqlValue],
) -> Result<ResultSet, TransactorError>
where
    C: TransactionalConnection,
{
    let executor =
        TransactionalQueryExecutor::new(connection, params.to_vec(), query, PositionalBinder)
            .await?;
    executor.execute_and_return().await
}
