//! Database layer: read-only connections, statement execution,
//! and schema introspection over a SQLite file.

pub mod connection;
pub mod executor;
pub mod types;

pub use connection::open_read_only;
pub use executor::{database_info, list_tables, run_query, table_schema};
pub use types::{ColumnInfo, DatabaseInfo, ResultRow, SqlValue};
