//! Repository layer abstractions and implementations.
//!
//! # Responsibility
//! - Define the read-only customer data-access contract.
//! - Isolate SQLite query details from service/caller orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `InvalidArgument`,
//!   `Query`) in addition to DB transport errors.
//! - SQLite and in-memory implementations return identical results for the
//!   same query against the same data.

use crate::repo::customer_repo::RepoResult;
use log::{debug, error};
use std::time::Instant;

pub mod customer_repo;
pub mod memory_repo;
mod sql;

/// Runs one repository operation and emits its `customer_query` event.
pub(crate) fn traced<T>(
    store: &'static str,
    op: &'static str,
    run: impl FnOnce() -> RepoResult<T>,
    rows: impl FnOnce(&T) -> usize,
) -> RepoResult<T> {
    let started_at = Instant::now();
    let result = run();
    match &result {
        Ok(value) => debug!(
            "event=customer_query module=repo store={} op={} status=ok rows={} duration_ms={}",
            store,
            op,
            rows(value),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=customer_query module=repo store={} op={} status=error duration_ms={} error={}",
            store,
            op,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}
