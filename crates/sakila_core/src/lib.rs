//! Read-only customer repository core over the Sakila sample schema.
//! This crate owns query semantics: lookup, paging, sorting and predicates.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_sample_db_in_memory, with_rollback, DbError, SAMPLE_CUSTOMER_COUNT};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::customer::{Address, City, Customer, CustomerId};
pub use query::field::{CustomerField, Value};
pub use query::page::{Direction, Order, Page, PageRequest, Sort};
pub use query::predicate::Predicate;
pub use query::{InvalidArgument, QueryError};
pub use repo::customer_repo::{
    CustomerRepository, RepoError, RepoResult, SqliteCustomerRepository,
    EQUAL_LENGTH_NAMES_QUERY,
};
pub use repo::memory_repo::InMemoryCustomerRepository;
pub use service::customer_service::{CustomerFilter, CustomerService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
