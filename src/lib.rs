//! # sqlens
//!
//! Read-only SQLite exploration for AI agents.
//!
//! sqlens exposes a fixed catalog of schema-described query tools over
//! the Model Context Protocol (JSON-RPC 2.0 on stdin/stdout), so an
//! agent can inspect and query a database file without ever being able
//! to write to it.
//!
//! ## Guarantees
//!
//! - **Read-only, twice over**: connections are opened read-only at the
//!   engine level, and `execute_query` additionally rejects anything
//!   that is not a SELECT before SQLite sees it.
//! - **Per-call isolation**: every call opens and drops its own
//!   connection; no state crosses calls except the static catalog and
//!   the startup configuration.
//! - **Failure containment**: every storage or validation failure comes
//!   back as a structured error result. Only losing the transport
//!   itself ends the process.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use sqlens::{standard_registry, ToolDefaults};
//!
//! let registry = standard_registry(ToolDefaults {
//!     database: Some("wiki.db".into()),
//!     query_timeout: None,
//! });
//! // Blocks until stdin closes.
//! sqlens::mcp::server::run(&registry).unwrap();
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;

// Re-exports for convenience
pub use config::Config;
pub use error::{LensError, Result};

pub use db::{ColumnInfo, DatabaseInfo, ResultRow, SqlValue};
pub use mcp::{standard_registry, ToolDefaults, ToolHandler, ToolRegistry, ToolsCallResult};

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use serde_json::{json, Value};
    use std::path::{Path, PathBuf};

    /// A database with tables created in reverse alphabetical order and
    /// a little data of every storage class.
    fn sample_db(dir: &Path) -> PathBuf {
        let path = dir.join("sample.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE revisions (id INTEGER PRIMARY KEY, page_id INTEGER, note TEXT);
             CREATE TABLE pages (
                 id INTEGER PRIMARY KEY,
                 title TEXT NOT NULL,
                 score REAL,
                 thumb BLOB
             );
             INSERT INTO pages (title, score, thumb) VALUES
                 ('home', 0.5, X'CAFE'),
                 ('about', NULL, NULL);
             INSERT INTO revisions (page_id, note) VALUES (1, 'initial');",
        )
        .unwrap();
        path
    }

    fn registry_for(path: &Path) -> ToolRegistry {
        standard_registry(ToolDefaults {
            database: Some(path.to_path_buf()),
            query_timeout: None,
        })
    }

    fn payload(result: &ToolsCallResult) -> Value {
        assert!(!result.is_error(), "unexpected error: {}", result.content[0].text);
        serde_json::from_str(&result.content[0].text).unwrap()
    }

    #[test]
    fn execute_query_count_matches_results_and_direct_query() {
        let dir = tempfile::tempdir().unwrap();
        let db = sample_db(dir.path());
        let registry = registry_for(&db);

        let result = registry.dispatch(
            "execute_query",
            &json!({"query": "SELECT id, title FROM pages ORDER BY id"}),
        );
        let body = payload(&result);

        assert_eq!(body["success"], true);
        assert_eq!(body["query"], "SELECT id, title FROM pages ORDER BY id");
        let rows = body["results"].as_array().unwrap();
        assert_eq!(body["count"], rows.len());

        // Cross-check against an independent direct query.
        let conn = Connection::open(&db).unwrap();
        let direct: i64 = conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows.len() as i64, direct);
        assert_eq!(rows[0]["title"], "home");
        assert_eq!(rows[1]["title"], "about");
    }

    #[test]
    fn dynamic_types_round_trip_into_the_payload() {
        let dir = tempfile::tempdir().unwrap();
        let db = sample_db(dir.path());
        let registry = registry_for(&db);

        let result = registry.dispatch(
            "execute_query",
            &json!({"query": "SELECT title, score, thumb FROM pages WHERE id = 1"}),
        );
        let body = payload(&result);
        let row = &body["results"][0];
        assert_eq!(row["title"], "home");
        assert_eq!(row["score"], 0.5);
        // X'CAFE' as base64
        assert_eq!(row["thumb"], "yv4=");

        let result = registry.dispatch(
            "execute_query",
            &json!({"query": "SELECT score FROM pages WHERE id = 2"}),
        );
        assert!(payload(&result)["results"][0]["score"].is_null());
    }

    #[test]
    fn every_write_class_is_rejected_and_the_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let db = sample_db(dir.path());
        let registry = registry_for(&db);
        let before = std::fs::read(&db).unwrap();

        for sql in [
            "INSERT INTO pages (title) VALUES ('evil')",
            "UPDATE pages SET title = 'evil'",
            "DELETE FROM revisions",
            "DROP TABLE pages",
            "PRAGMA journal_mode = DELETE",
        ] {
            let result = registry.dispatch("execute_query", &json!({"query": sql}));
            assert!(result.is_error(), "expected rejection for: {}", sql);
            assert!(result.content[0].text.contains("Only SELECT queries are allowed"));
        }

        let after = std::fs::read(&db).unwrap();
        assert_eq!(before, after, "database bytes changed");
    }

    #[test]
    fn engine_failures_become_error_results_not_crashes() {
        let dir = tempfile::tempdir().unwrap();
        let db = sample_db(dir.path());
        let registry = registry_for(&db);

        let result = registry.dispatch(
            "execute_query",
            &json!({"query": "SELECT nope FROM missing_table"}),
        );
        assert!(result.is_error());
        assert!(result.content[0].text.contains("missing_table"));
    }

    #[test]
    fn get_tables_is_sorted_independent_of_creation_order() {
        let dir = tempfile::tempdir().unwrap();
        // sample_db creates revisions before pages.
        let db = sample_db(dir.path());
        let registry = registry_for(&db);

        let body = payload(&registry.dispatch("get_tables", &json!({})));
        assert_eq!(body["tables"], json!(["pages", "revisions"]));
        assert_eq!(body["count"], 2);
    }

    #[test]
    fn get_table_schema_reports_columns() {
        let dir = tempfile::tempdir().unwrap();
        let db = sample_db(dir.path());
        let registry = registry_for(&db);

        let body = payload(&registry.dispatch(
            "get_table_schema",
            &json!({"table_name": "pages"}),
        ));
        assert_eq!(body["table_name"], "pages");
        let columns = body["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 4);
        assert_eq!(columns[1]["name"], "title");
        assert_eq!(columns[1]["type"], "TEXT");
        assert_eq!(columns[1]["notnull"], 1);
        assert_eq!(body["count"], 4);
    }

    #[test]
    fn schema_of_absent_table_is_a_successful_empty_list() {
        // Pins the current contract: no error, empty columns.
        let dir = tempfile::tempdir().unwrap();
        let db = sample_db(dir.path());
        let registry = registry_for(&db);

        let result = registry.dispatch("get_table_schema", &json!({"table_name": "phantom"}));
        let body = payload(&result);
        assert_eq!(body["success"], true);
        assert_eq!(body["columns"], json!([]));
        assert_eq!(body["count"], 0);
    }

    #[test]
    fn get_database_info_reports_consistent_stats() {
        let dir = tempfile::tempdir().unwrap();
        let db = sample_db(dir.path());
        let registry = registry_for(&db);

        let body = payload(&registry.dispatch("get_database_info", &json!({})));
        assert_eq!(body["success"], true);
        assert_eq!(body["table_count"], 2);

        let conn = Connection::open(&db).unwrap();
        let page_count: i64 = conn
            .query_row("PRAGMA page_count", [], |row| row.get(0))
            .unwrap();
        let page_size: i64 = conn
            .query_row("PRAGMA page_size", [], |row| row.get(0))
            .unwrap();
        assert_eq!(body["page_count"], page_count);
        assert_eq!(body["page_size"], page_size);
        assert_eq!(
            body["approximate_size_mb"],
            DatabaseInfo::approximate_size_mb(page_count, page_size)
        );
    }

    #[test]
    fn back_to_back_calls_do_not_interfere() {
        let dir = tempfile::tempdir().unwrap();
        let db = sample_db(dir.path());
        let registry = registry_for(&db);

        let first = payload(&registry.dispatch(
            "execute_query",
            &json!({"query": "SELECT COUNT(*) AS n FROM pages"}),
        ));
        let second = payload(&registry.dispatch(
            "execute_query",
            &json!({"query": "SELECT COUNT(*) AS n FROM revisions"}),
        ));
        assert_eq!(first["results"][0]["n"], 2);
        assert_eq!(second["results"][0]["n"], 1);
    }

    #[test]
    fn deadline_interrupts_runaway_queries() {
        let dir = tempfile::tempdir().unwrap();
        let db = sample_db(dir.path());
        let registry = standard_registry(ToolDefaults {
            database: Some(db),
            query_timeout: Some(std::time::Duration::from_millis(10)),
        });

        // Millions of recursive steps; must be cut off by the deadline
        // and come back as an error result, not a hang or a crash.
        let runaway = "SELECT COUNT(*) FROM (
            WITH RECURSIVE c(x) AS (
                SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 100000000
            ) SELECT x FROM c
        )";
        let result = registry.dispatch("execute_query", &json!({"query": runaway}));
        assert!(result.is_error());
        assert!(result.content[0].text.to_lowercase().contains("interrupt"));
    }

    #[test]
    fn nonexistent_database_path_errors_with_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let db = sample_db(dir.path());
        let registry = registry_for(&db);
        let ghost = dir.path().join("ghost.db");

        for tool in ["execute_query", "get_tables", "get_table_schema", "get_database_info"] {
            let mut args = json!({"database_path": ghost.to_str().unwrap()});
            args["query"] = json!("SELECT 1");
            args["table_name"] = json!("pages");
            let result = registry.dispatch(tool, &args);
            assert!(result.is_error(), "{} should fail", tool);
            assert!(
                result.content[0].text.contains("ghost.db"),
                "{} error should name the path",
                tool
            );
        }
    }

    #[test]
    fn full_protocol_round_trip_over_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let db = sample_db(dir.path());
        let registry = registry_for(&db);

        let input = format!(
            "{}\n{}\n{}\n",
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_tables","arguments":{}}}"#,
        );
        let mut output = Vec::new();
        mcp::server::serve(&registry, std::io::Cursor::new(input), &mut output).unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], 2);
        let text = responses[1]["result"]["content"][0]["text"].as_str().unwrap();
        let body: Value = serde_json::from_str(text).unwrap();
        assert_eq!(body["tables"], json!(["pages", "revisions"]));
    }
}
