//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::binder::{BindWith, ParameterBinder, PositionalBinder};
pub use crate::connection::{StatementHandle, TransactionalConnection};
pub use crate::error::{DriverError, TransactorError};
pub use crate::executor::TransactionalQueryExecutor;
pub use crate::helpers::execute_with_transaction;
pub use crate::results::{ResultSet, Row};
pub use crate::types::SqlValue;

#[cfg(feature = "postgres")]
pub use crate::postgres::PostgresConnection;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteConnection;
