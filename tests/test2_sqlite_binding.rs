#![cfg(feature = "sqlite")]

use sql_transactor::prelude::*;
use sql_transactor::sqlite::{SqliteStatement, rusqlite};

async fn account_connection() -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    let mut conn = SqliteConnection::new(rusqlite::Connection::open_in_memory()?);
    conn.execute_batch(
        "CREATE TABLE accounts (id INTEGER PRIMARY KEY, balance REAL NOT NULL);
         INSERT INTO accounts (id, balance) VALUES (1, 100.0);",
    )
    .await?;
    Ok(conn)
}

async fn balance_of(conn: &mut SqliteConnection, id: i64) -> f64 {
    let rows = execute_with_transaction(
        conn,
        "SELECT balance FROM accounts WHERE id = ?1",
        &[SqlValue::Int(id)],
    )
    .await
    .expect("balance lookup");
    rows.results[0]
        .get("balance")
        .and_then(SqlValue::as_float)
        .expect("balance column")
}

#[tokio::test]
async fn missing_parameter_is_a_binding_error_and_rolls_back()
-> Result<(), Box<dyn std::error::Error>> {
    let mut conn = account_connection().await?;

    // Two placeholders, one supplied value.
    let err = execute_with_transaction(
        &mut conn,
        "UPDATE accounts SET balance = ?1 WHERE id = ?2",
        &[SqlValue::Float(0.0)],
    )
    .await
    .unwrap_err();

    assert!(matches!(err, TransactorError::Binding(_)));
    assert!(conn.auto_commit(), "auto-commit must be restored after the failure");
    // Nothing was committed.
    assert_eq!(balance_of(&mut conn, 1).await, 100.0);
    Ok(())
}

#[tokio::test]
async fn surplus_parameters_are_rejected_before_binding()
-> Result<(), Box<dyn std::error::Error>> {
    let mut conn = account_connection().await?;

    let err = execute_with_transaction(
        &mut conn,
        "SELECT balance FROM accounts WHERE id = ?1",
        &[SqlValue::Int(1), SqlValue::Int(2)],
    )
    .await
    .unwrap_err();

    assert!(matches!(err, TransactorError::Binding(_)));
    assert!(format!("{err}").contains("2 value(s) supplied"));
    Ok(())
}

#[tokio::test]
async fn out_of_range_bind_index_is_a_binding_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = account_connection().await?;

    let binder = BindWith(|stmt: &mut SqliteStatement, _value: &()| {
        stmt.bind_parameter(3, SqlValue::Int(1))
    });
    let executor = TransactionalQueryExecutor::new(
        &mut conn,
        (),
        "SELECT balance FROM accounts WHERE id = ?1",
        binder,
    )
    .await?;
    let err = executor.execute_and_return().await.unwrap_err();

    assert!(matches!(err, TransactorError::Binding(_)));
    assert!(format!("{err}").contains("out of range"));
    assert!(conn.auto_commit());
    Ok(())
}

#[tokio::test]
async fn placeholders_left_unbound_by_the_binder_are_caught()
-> Result<(), Box<dyn std::error::Error>> {
    let mut conn = account_connection().await?;

    // Binder fills only the first of two placeholders.
    let binder = BindWith(|stmt: &mut SqliteStatement, _value: &()| {
        stmt.bind_parameter(1, SqlValue::Float(0.0))
    });
    let executor = TransactionalQueryExecutor::new(
        &mut conn,
        (),
        "UPDATE accounts SET balance = ?1 WHERE id = ?2",
        binder,
    )
    .await?;
    let err = executor.execute_and_return().await.unwrap_err();

    assert!(matches!(err, TransactorError::Binding(_)));
    assert!(format!("{err}").contains("placeholder 2 left unbound"));
    assert_eq!(balance_of(&mut conn, 1).await, 100.0);
    Ok(())
}
