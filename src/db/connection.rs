//! Read-only connection handling.
//!
//! Every tool call opens its own connection and drops it on the way out,
//! so release is guaranteed on success, handled-error, and panic paths
//! alike. The handle is read-only at the engine level; the SELECT guard
//! in the executor is a second, independent layer.

use std::path::Path;
use std::time::{Duration, Instant};

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::Result;

/// How long to wait on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// VM instructions between deadline checks when a timeout is configured.
const PROGRESS_INTERVAL_OPS: i32 = 1000;

/// Open `path` read-only, with the busy timeout applied and, when
/// `deadline` is set, a progress handler that interrupts any statement
/// still running once the budget is spent.
///
/// The interrupt surfaces as a regular engine error on the statement,
/// never as a process-level failure.
pub fn open_read_only(path: &Path, deadline: Option<Duration>) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;

    if let Some(budget) = deadline {
        let cutoff = Instant::now() + budget;
        conn.progress_handler(
            PROGRESS_INTERVAL_OPS,
            Some(move || Instant::now() >= cutoff),
        );
    }

    debug!(path = %path.display(), "opened read-only connection");
    Ok(conn)
}
