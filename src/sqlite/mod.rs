//! `SQLite` backend: implements the connection traits over a caller-supplied
//! `rusqlite::Connection`.
//!
//! All driver calls run on the blocking pool; transaction control uses
//! explicit BEGIN/COMMIT/ROLLBACK commands guarded by an auto-commit flag.

pub use rusqlite;

mod connection;
mod params;
mod query;
mod statement;

pub use connection::SqliteConnection;
pub use query::build_result_set;
pub use statement::SqliteStatement;
