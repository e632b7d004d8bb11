//! Postgres backend: implements the connection traits over a caller-supplied
//! `tokio_postgres::Client`.
//!
//! The caller owns the connection task; transaction control uses explicit
//! BEGIN/COMMIT/ROLLBACK commands guarded by an auto-commit flag.

pub use tokio_postgres;

mod connection;
mod params;
mod query;
mod statement;

pub use connection::PostgresConnection;
pub use query::{build_result_set, postgres_extract_value};
pub use statement::PostgresStatement;
