//! Read-only SQLite connections for Messages and AddressBook databases.
//!
//! Connections are owned by the phase that opens them and closed when they
//! go out of scope.
//!
//! CHANGELOG:
//! - 10/18/2026 - Open arbitrary source paths; path discovery moved to config
//! - 01/10/2026 - Initial stub

use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// Open a read-only connection to a SQLite database.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    debug!(path = %path.display(), "opening database read-only");
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}
