//! Connection bootstrap for the customer store.
//!
//! # Responsibility
//! - Open writable file stores, in-memory stores and read-only file stores.
//! - Apply connection pragmas and bring the schema to `latest_version()`.
//!
//! # Invariants
//! - Every returned connection has `foreign_keys=ON` and the latest schema.
//! - Read-only stores are never migrated; an outdated one is rejected.

use super::migrations::{apply_migrations, latest_version, schema_version};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenMode {
    File,
    Memory,
    ReadOnly,
}

impl OpenMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
            Self::ReadOnly => "read_only",
        }
    }
}

/// Opens (or creates) a SQLite file and migrates it.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with(OpenMode::File, || Connection::open(path))
}

/// Opens a fresh in-memory store with the schema applied and no rows.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(OpenMode::Memory, Connection::open_in_memory)
}

/// Opens an existing, already migrated SQLite file without write access.
///
/// # Errors
/// - `SchemaNotReady` when the file is older than this build.
/// - `UnsupportedSchemaVersion` when the file is newer than this build.
pub fn open_db_read_only(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with(OpenMode::ReadOnly, || {
        Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    })
}

fn open_with(
    mode: OpenMode,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={}", mode.as_str());

    let outcome = connect()
        .map_err(|err| ("db_open_failed", DbError::from(err)))
        .and_then(|mut conn| {
            prepare(&mut conn, mode)
                .map(|()| conn)
                .map_err(|err| ("db_bootstrap_failed", err))
        });

    match outcome {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode.as_str(),
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err((error_code, err)) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code={} error={}",
                mode.as_str(),
                started_at.elapsed().as_millis(),
                error_code,
                err
            );
            Err(err)
        }
    }
}

fn prepare(conn: &mut Connection, mode: OpenMode) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if mode == OpenMode::ReadOnly {
        return ensure_current_schema(conn);
    }
    apply_migrations(conn)
}

fn ensure_current_schema(conn: &Connection) -> DbResult<()> {
    let db_version = schema_version(conn)?;
    let required = latest_version();
    if db_version > required {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported: required,
        });
    }
    if db_version < required {
        return Err(DbError::SchemaNotReady {
            db_version,
            required,
        });
    }
    Ok(())
}
