//! Bundled Sakila-style sample dataset.
//!
//! # Responsibility
//! - Seed an empty, migrated store with the 599-customer sample.
//!
//! # Invariants
//! - Loading is all-or-nothing (single transaction).
//! - Loading into a store that already holds customers is rejected.

use crate::db::{open_db_in_memory, DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::time::Instant;

const SAMPLE_DATASET_SQL: &str = include_str!("fixtures/sample_dataset.sql");

/// Number of customers in the bundled sample.
pub const SAMPLE_CUSTOMER_COUNT: u64 = 599;

/// Inserts the sample countries, cities, addresses and customers.
pub fn load_sample_dataset(conn: &mut Connection) -> DbResult<()> {
    let started_at = Instant::now();
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM customer;", [], |row| row.get(0))?;
    let customers = u64::try_from(existing)
        .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, existing))?;
    if customers > 0 {
        return Err(DbError::DatasetNotEmpty { customers });
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SAMPLE_DATASET_SQL)?;
    tx.commit()?;

    info!(
        "event=sample_load module=db status=ok customers={} duration_ms={}",
        SAMPLE_CUSTOMER_COUNT,
        started_at.elapsed().as_millis()
    );
    Ok(())
}

/// Opens an in-memory store and seeds it with the sample dataset.
pub fn open_sample_db_in_memory() -> DbResult<Connection> {
    let mut conn = open_db_in_memory()?;
    load_sample_dataset(&mut conn)?;
    Ok(conn)
}
