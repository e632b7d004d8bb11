//! Single-statement transactional query execution.
//!
//! This crate runs one parameterized SQL statement inside an explicit
//! transaction boundary and hands the result set back to the caller. The
//! core is [`TransactionalQueryExecutor`]: prepare eagerly, bind
//! caller-supplied parameters through a [`ParameterBinder`], execute, commit
//! on success, roll back on failure without losing the original error, and
//! restore the connection's auto-commit mode on every exit path.
//!
//! The connection itself is an external collaborator: callers hand in a live
//! `rusqlite::Connection` or `tokio_postgres::Client` wrapped in the
//! matching backend type, and keep ownership of pooling, retries, and
//! configuration.
//!
//! ```rust
//! use sql_transactor::prelude::*;
//!
//! # #[cfg(feature = "sqlite")]
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! # use sql_transactor::sqlite::rusqlite;
//! let mut conn = SqliteConnection::new(rusqlite::Connection::open_in_memory()?);
//! conn.execute_batch(
//!     "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
//!      INSERT INTO users (id, name) VALUES (42, 'arthur');",
//! )
//! .await?;
//!
//! let rows = execute_with_transaction(
//!     &mut conn,
//!     "SELECT * FROM users WHERE id = ?1",
//!     &[SqlValue::Int(42)],
//! )
//! .await?;
//! assert_eq!(rows.results[0].get("name").unwrap().as_text(), Some("arthur"));
//! # Ok(()) }
//! ```

pub mod binder;
pub mod connection;
pub mod error;
pub mod executor;
pub mod helpers;
pub mod prelude;
pub mod results;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use binder::{BindWith, ParameterBinder, PositionalBinder};
pub use connection::{StatementHandle, TransactionalConnection};
pub use error::{DriverError, TransactorError};
pub use executor::TransactionalQueryExecutor;
pub use helpers::execute_with_transaction;
pub use results::{ResultSet, Row};
pub use types::SqlValue;
