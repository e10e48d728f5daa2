//! Customer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide read-only lookup, listing, paging and predicate queries over
//!   canonical customer storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Predicates are validated before any SQL is prepared.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every ordered result ends with an ascending id tie-break, so repeated
//!   calls against an unchanged store return identical sequences.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::customer::{Address, City, Customer, CustomerId};
use crate::query::page::{Page, PageRequest, Sort};
use crate::query::predicate::Predicate;
use crate::query::{InvalidArgument, QueryError};
use crate::repo::sql::{filter_for, SqlFilter};
use crate::repo::traced;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, Row};
use thiserror::Error;

const STORE: &str = "sqlite";

const CUSTOMER_SELECT_SQL: &str = "SELECT
    customer_id,
    first_name,
    last_name,
    email,
    active,
    address_id,
    address,
    district,
    postal_code,
    phone,
    city_id,
    city,
    country
FROM customer_detail";

/// Name of the equal-length-names query, used in diagnostics.
pub const EQUAL_LENGTH_NAMES_QUERY: &str = "Customer.findWithEqualLengthNames";

const EQUAL_LENGTH_NAMES_SQL: &str = "WHERE length(first_name) = ?1 AND length(last_name) = ?1";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for customer queries.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("customer not found: {0}")]
    NotFound(CustomerId),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("invalid persisted customer data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Read-only customer queries.
pub trait CustomerRepository {
    /// Looks up one customer; `None` when the id is absent.
    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>>;

    /// Looks up one customer that must exist.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no customer has `id`.
    fn find_one(&self, id: CustomerId) -> RepoResult<Customer> {
        self.find_by_id(id)?.ok_or(RepoError::NotFound(id))
    }

    fn exists_by_id(&self, id: CustomerId) -> RepoResult<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }

    /// Exact email match; the lowest id wins when emails repeat.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Customer>>;

    fn count(&self) -> RepoResult<u64>;

    /// Every customer, ascending id.
    fn find_all(&self) -> RepoResult<Vec<Customer>>;

    fn find_all_sorted(&self, sort: &Sort) -> RepoResult<Vec<Customer>>;

    /// One page of all customers. A page past the end is empty, not an error.
    fn find_all_paged(&self, request: &PageRequest) -> RepoResult<Page<Customer>>;

    /// Every customer accepted by `predicate`, ascending id.
    fn find_all_matching(&self, predicate: &Predicate) -> RepoResult<Vec<Customer>>;

    fn find_all_matching_paged(
        &self,
        predicate: &Predicate,
        request: &PageRequest,
    ) -> RepoResult<Page<Customer>>;

    fn count_matching(&self, predicate: &Predicate) -> RepoResult<u64>;

    /// Customers whose first and last names both have `length` characters.
    fn find_with_equal_length_names(&self, length: u32) -> RepoResult<Vec<Customer>>;
}

/// SQLite-backed customer repository.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `DbError::SchemaNotReady` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let db_version = schema_version(conn)?;
        let required = latest_version();
        if db_version != required {
            return Err(DbError::SchemaNotReady {
                db_version,
                required,
            }
            .into());
        }
        Ok(Self { conn })
    }

    fn query_customers(
        &self,
        op: &'static str,
        tail_sql: &str,
        binds: Vec<SqlValue>,
    ) -> RepoResult<Vec<Customer>> {
        traced(STORE, op, || self.run_select(tail_sql, binds), Vec::len)
    }

    fn count_customers(&self, op: &'static str, filter: &SqlFilter) -> RepoResult<u64> {
        traced(
            STORE,
            op,
            || self.count_where(filter),
            |count| usize::try_from(*count).unwrap_or(usize::MAX),
        )
    }

    fn run_select(&self, tail_sql: &str, binds: Vec<SqlValue>) -> RepoResult<Vec<Customer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} {tail_sql};"))?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut customers = Vec::new();
        while let Some(row) = rows.next()? {
            customers.push(parse_customer_row(row)?);
        }
        Ok(customers)
    }

    fn count_where(&self, filter: &SqlFilter) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM customer_detail WHERE {};", filter.clause),
            params_from_iter(filter.binds.iter()),
            |row| row.get(0),
        )?;
        checked_count(count)
    }

    fn select_page(
        &self,
        op: &'static str,
        filter: SqlFilter,
        request: &PageRequest,
    ) -> RepoResult<Page<Customer>> {
        let total = self.count_where(&filter)?;
        let sql = format!(
            "WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
            filter.clause,
            request.sort().order_by_sql()
        );
        let mut binds = filter.binds;
        binds.push(SqlValue::Integer(i64::from(request.limit())));
        binds.push(SqlValue::Integer(request.offset()));

        let content = self.query_customers(op, &sql, binds)?;
        Ok(Page::new(content, request, total))
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let mut found = self.query_customers(
            "find_by_id",
            "WHERE customer_id = ?",
            vec![SqlValue::Integer(id)],
        )?;
        Ok(found.pop())
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        let mut found = self.query_customers(
            "find_by_email",
            "WHERE email = ? ORDER BY customer_id ASC LIMIT 1",
            vec![SqlValue::Text(email.to_string())],
        )?;
        Ok(found.pop())
    }

    fn count(&self) -> RepoResult<u64> {
        self.count_customers("count", &filter_for(&Predicate::always()))
    }

    fn find_all(&self) -> RepoResult<Vec<Customer>> {
        self.query_customers("find_all", "ORDER BY customer_id ASC", Vec::new())
    }

    fn find_all_sorted(&self, sort: &Sort) -> RepoResult<Vec<Customer>> {
        self.query_customers(
            "find_all_sorted",
            &format!("ORDER BY {}", sort.order_by_sql()),
            Vec::new(),
        )
    }

    fn find_all_paged(&self, request: &PageRequest) -> RepoResult<Page<Customer>> {
        self.select_page(
            "find_all_paged",
            filter_for(&Predicate::always()),
            request,
        )
    }

    fn find_all_matching(&self, predicate: &Predicate) -> RepoResult<Vec<Customer>> {
        predicate.validate()?;
        let filter = filter_for(predicate);
        self.query_customers(
            "find_all_matching",
            &format!("WHERE {} ORDER BY customer_id ASC", filter.clause),
            filter.binds,
        )
    }

    fn find_all_matching_paged(
        &self,
        predicate: &Predicate,
        request: &PageRequest,
    ) -> RepoResult<Page<Customer>> {
        predicate.validate()?;
        self.select_page("find_all_matching_paged", filter_for(predicate), request)
    }

    fn count_matching(&self, predicate: &Predicate) -> RepoResult<u64> {
        predicate.validate()?;
        self.count_customers("count_matching", &filter_for(predicate))
    }

    fn find_with_equal_length_names(&self, length: u32) -> RepoResult<Vec<Customer>> {
        self.query_customers(
            EQUAL_LENGTH_NAMES_QUERY,
            &format!("{EQUAL_LENGTH_NAMES_SQL} ORDER BY customer_id ASC"),
            vec![SqlValue::Integer(i64::from(length))],
        )
    }
}

/// `COUNT(*)` as `u64`; a negative count means a corrupt store.
fn checked_count(count: i64) -> RepoResult<u64> {
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
}

fn parse_customer_row(row: &Row<'_>) -> RepoResult<Customer> {
    let id: CustomerId = row.get("customer_id")?;
    let active = match row.get::<_, i64>("active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid active value `{other}` for customer {id}"
            )));
        }
    };

    Ok(Customer {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        active,
        address: Address {
            id: row.get("address_id")?,
            address: row.get("address")?,
            district: row.get("district")?,
            postal_code: row.get("postal_code")?,
            phone: row.get("phone")?,
            city: City {
                id: row.get("city_id")?,
                name: row.get("city")?,
                country: row.get("country")?,
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::{checked_count, RepoError};

    #[test]
    fn checked_count_rejects_negative_counts() {
        assert_eq!(checked_count(599).unwrap(), 599);
        assert_eq!(checked_count(0).unwrap(), 0);
        assert!(matches!(
            checked_count(-1),
            Err(RepoError::InvalidData(message)) if message.contains("-1")
        ));
    }
}
