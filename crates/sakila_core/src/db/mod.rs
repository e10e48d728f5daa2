//! SQLite storage bootstrap, schema migrations and sample data.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the customer store.
//! - Apply schema migrations in deterministic order.
//! - Load the bundled sample dataset and provide rollback-only scopes.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Repositories refuse connections whose schema is not the latest.

use thiserror::Error;

pub mod fixture;
pub mod migrations;
mod open;
mod scope;

pub use fixture::{load_sample_dataset, open_sample_db_in_memory, SAMPLE_CUSTOMER_COUNT};
pub use open::{open_db, open_db_in_memory, open_db_read_only};
pub use scope::with_rollback;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },

    #[error("database schema version {db_version} does not match required {required}")]
    SchemaNotReady { db_version: u32, required: u32 },

    #[error("sample dataset requires an empty store, found {customers} customers")]
    DatasetNotEmpty { customers: u64 },
}
