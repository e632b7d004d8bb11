//! Commit/rollback recovery behavior, driven through a scripted connection
//! that records every operation and injects failures at chosen steps.

use async_trait::async_trait;
use sql_transactor::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Prepare,
    SetAutoCommit(bool),
    Execute,
    Commit,
    Rollback,
}

#[derive(Default)]
struct ScriptedConnection {
    fail_execute: bool,
    fail_commit: bool,
    fail_rollback: bool,
    auto_commit_enabled: bool,
    ops: Vec<Op>,
}

impl ScriptedConnection {
    fn new() -> Self {
        Self {
            auto_commit_enabled: true,
            ..Self::default()
        }
    }

    fn count(&self, op: &Op) -> usize {
        self.ops.iter().filter(|o| *o == op).count()
    }
}

struct ScriptedStatement {
    sql: String,
    bindings: Vec<Option<SqlValue>>,
}

impl StatementHandle for ScriptedStatement {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn parameter_count(&self) -> usize {
        self.bindings.len()
    }

    fn bind_parameter(&mut self, index: usize, value: SqlValue) -> Result<(), DriverError> {
        if index == 0 || index > self.bindings.len() {
            return Err(DriverError::Parameter(format!(
                "placeholder index {index} out of range"
            )));
        }
        self.bindings[index - 1] = Some(value);
        Ok(())
    }

    fn first_unbound(&self) -> Option<usize> {
        self.bindings.iter().position(Option::is_none).map(|i| i + 1)
    }
}

#[async_trait]
impl TransactionalConnection for ScriptedConnection {
    type Statement = ScriptedStatement;

    async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), DriverError> {
        self.ops.push(Op::SetAutoCommit(enabled));
        self.auto_commit_enabled = enabled;
        Ok(())
    }

    fn auto_commit(&self) -> bool {
        self.auto_commit_enabled
    }

    async fn prepare(&mut self, query: &str) -> Result<ScriptedStatement, DriverError> {
        self.ops.push(Op::Prepare);
        // One placeholder per '?' in the template keeps the script simple.
        let count = query.matches('?').count();
        Ok(ScriptedStatement {
            sql: query.to_owned(),
            bindings: vec![None; count],
        })
    }

    async fn execute_query(
        &mut self,
        _statement: &mut ScriptedStatement,
    ) -> Result<ResultSet, DriverError> {
        self.ops.push(Op::Execute);
        if self.fail_execute {
            return Err(DriverError::Other("execute boom".into()));
        }
        let mut rs = ResultSet::with_capacity(1);
        rs.set_column_names(Arc::new(vec!["id".to_string()]));
        rs.add_row_values(vec![SqlValue::Int(1)]);
        Ok(rs)
    }

    async fn commit(&mut self) -> Result<(), DriverError> {
        self.ops.push(Op::Commit);
        if self.fail_commit {
            return Err(DriverError::Other("commit boom".into()));
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DriverError> {
        self.ops.push(Op::Rollback);
        if self.fail_rollback {
            return Err(DriverError::Other("rollback boom".into()));
        }
        Ok(())
    }
}

async fn run_one(conn: &mut ScriptedConnection) -> Result<ResultSet, TransactorError> {
    let executor = TransactionalQueryExecutor::new(
        conn,
        vec![SqlValue::Int(1)],
        "SELECT id FROM t WHERE id = ?",
        PositionalBinder,
    )
    .await?;
    executor.execute_and_return().await
}

#[tokio::test]
async fn success_path_commits_in_strict_order() {
    let mut conn = ScriptedConnection::new();
    let rows = run_one(&mut conn).await.expect("success path");

    assert_eq!(rows.results.len(), 1);
    assert_eq!(
        conn.ops,
        vec![
            Op::Prepare,
            Op::SetAutoCommit(false),
            Op::Execute,
            Op::Commit,
            Op::SetAutoCommit(true),
        ]
    );
    assert!(conn.auto_commit());
}

#[tokio::test]
async fn execution_failure_rolls_back_and_never_commits() {
    let mut conn = ScriptedConnection::new();
    conn.fail_execute = true;

    let err = run_one(&mut conn).await.unwrap_err();

    assert!(matches!(err, TransactorError::Execution(_)));
    assert_eq!(conn.count(&Op::Commit), 0);
    assert_eq!(conn.count(&Op::Rollback), 1);
    assert!(conn.auto_commit(), "auto-commit restored on the failure path");
}

#[tokio::test]
async fn commit_failure_triggers_exactly_one_rollback() {
    let mut conn = ScriptedConnection::new();
    conn.fail_commit = true;

    let err = run_one(&mut conn).await.unwrap_err();

    assert!(matches!(err, TransactorError::Commit(_)));
    assert_eq!(conn.count(&Op::Commit), 1);
    assert_eq!(conn.count(&Op::Rollback), 1);
    assert!(conn.auto_commit());
}

#[tokio::test]
async fn failed_rollback_reports_both_errors() {
    let mut conn = ScriptedConnection::new();
    conn.fail_commit = true;
    conn.fail_rollback = true;

    let err = run_one(&mut conn).await.unwrap_err();

    let TransactorError::RollbackFailed { ref cause, .. } = err else {
        panic!("expected RollbackFailed, got {err}");
    };
    assert!(matches!(**cause, TransactorError::Commit(_)));
    assert!(matches!(err.original(), TransactorError::Commit(_)));

    // Neither failure is silently swallowed.
    let rendered = format!("{err}");
    assert!(rendered.contains("rollback boom"));
    assert!(rendered.contains("commit boom"));
    assert!(conn.auto_commit());
}

#[tokio::test]
async fn binding_failure_short_circuits_before_execution() {
    let mut conn = ScriptedConnection::new();

    // Two placeholders, one supplied value.
    let executor = TransactionalQueryExecutor::new(
        &mut conn,
        vec![SqlValue::Int(1)],
        "UPDATE t SET a = ? WHERE id = ?",
        PositionalBinder,
    )
    .await
    .expect("prepare");
    let err = executor.execute_and_return().await.unwrap_err();

    assert!(matches!(err, TransactorError::Binding(_)));
    assert_eq!(conn.count(&Op::Execute), 0);
    assert_eq!(conn.count(&Op::Commit), 0);
    assert_eq!(conn.count(&Op::Rollback), 1);
    assert!(conn.auto_commit());
}
