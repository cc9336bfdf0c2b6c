//! Statement execution and schema introspection.
//!
//! All entry points take an already-open connection and return
//! materialized results. `run_query` enforces the SELECT-only statement
//! class before SQLite sees the text; the read-only open in
//! [`connection`](super::connection) backs it up at the engine level.

use rusqlite::Connection;
use tracing::debug;

use super::types::{ColumnInfo, DatabaseInfo, ResultRow, SqlValue};
use crate::error::{LensError, Result};

/// Execute a single SELECT statement and materialize every row.
pub fn run_query(conn: &Connection, sql: &str) -> Result<Vec<ResultRow>> {
    ensure_select(sql)?;

    let mut stmt = conn.prepare(sql)?;
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut rows = stmt.query([])?;
    let mut results = Vec::new();
    while let Some(row) = rows.next()? {
        let mut pairs = Vec::with_capacity(column_names.len());
        for (index, name) in column_names.iter().enumerate() {
            pairs.push((name.clone(), SqlValue::from(row.get_ref(index)?)));
        }
        results.push(ResultRow(pairs));
    }

    debug!(rows = results.len(), "query executed");
    Ok(results)
}

/// List user tables from the catalog, sorted ascending by name.
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(names)
}

/// Column metadata for `table`, verbatim from `PRAGMA table_info`.
///
/// A table absent from the store yields an empty list, not an error.
pub fn table_schema(conn: &Connection, table: &str) -> Result<Vec<ColumnInfo>> {
    let sql = format!("PRAGMA table_info({})", quote_identifier(table));
    let mut stmt = conn.prepare(&sql)?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnInfo {
                cid: row.get(0)?,
                name: row.get(1)?,
                column_type: row.get(2)?,
                notnull: row.get(3)?,
                dflt_value: row.get(4)?,
                pk: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<ColumnInfo>, _>>()?;
    Ok(columns)
}

/// Page-level size statistics plus the user table count.
pub fn database_info(conn: &Connection) -> Result<DatabaseInfo> {
    let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
    let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;
    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
        [],
        |row| row.get(0),
    )?;

    Ok(DatabaseInfo {
        page_count,
        page_size,
        approximate_size_mb: DatabaseInfo::approximate_size_mb(page_count, page_size),
        table_count,
    })
}

/// Reject anything that does not start with the SELECT keyword.
///
/// The handle underneath is already read-only; this guard exists so a
/// rejected statement never reaches the engine at all.
fn ensure_select(sql: &str) -> Result<()> {
    let normalized = sql.trim().to_uppercase();
    if normalized.starts_with("SELECT") {
        return Ok(());
    }
    let keyword = normalized
        .split_whitespace()
        .next()
        .unwrap_or("(empty)")
        .to_string();
    Err(LensError::QueryNotAllowed(keyword))
}

/// Double-quote an identifier so user-supplied table names cannot break
/// out of the PRAGMA argument position.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
