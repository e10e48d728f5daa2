//! Rollback-only transaction scope.
//!
//! # Responsibility
//! - Run a unit of work against a store and discard every write it made.
//!
//! # Invariants
//! - The transaction never commits; it is rolled back on normal return,
//!   on error, and by `Drop` while unwinding from a panic.

use crate::db::DbError;
use log::debug;
use rusqlite::{Connection, DropBehavior, Transaction};

/// Runs `work` inside a transaction that is always rolled back.
///
/// Repositories accept `&Connection`, and `Transaction` derefs to it, so the
/// closure can build repositories directly on `tx`.
///
/// # Errors
/// - Returns the closure error unchanged.
/// - Returns `DbError` when the transaction cannot be opened or rolled back.
pub fn with_rollback<T, E, F>(conn: &mut Connection, work: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<DbError>,
{
    let mut tx = conn.transaction().map_err(DbError::from)?;
    tx.set_drop_behavior(DropBehavior::Rollback);
    debug!("event=rollback_scope module=db status=start");

    let outcome = work(&tx);

    tx.rollback().map_err(DbError::from)?;
    debug!(
        "event=rollback_scope module=db status=ok work_ok={}",
        outcome.is_ok()
    );
    outcome
}
