//! Snapshot-backed customer repository.
//!
//! # Responsibility
//! - Answer the same queries as the SQLite repository by interpreting
//!   predicates and sorts over an owned, immutable customer list.
//!
//! # Invariants
//! - The snapshot is sorted by id and holds each id at most once.
//! - The repository never mutates after construction, so it is `Send + Sync`
//!   and can serve concurrent readers without locking.

use crate::model::customer::{Customer, CustomerId};
use crate::query::field::CustomerField;
use crate::query::page::{Page, PageRequest, Sort};
use crate::query::predicate::Predicate;
use crate::repo::customer_repo::{CustomerRepository, RepoResult, EQUAL_LENGTH_NAMES_QUERY};
use crate::repo::traced;
use log::debug;

const STORE: &str = "memory";

/// In-memory customer repository over a fixed snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerRepository {
    customers: Vec<Customer>,
}

impl InMemoryCustomerRepository {
    /// Builds a snapshot; when ids repeat, the first occurrence wins.
    pub fn from_customers(mut customers: Vec<Customer>) -> Self {
        customers.sort_by_key(|customer| customer.id);
        customers.dedup_by_key(|customer| customer.id);
        Self { customers }
    }

    /// Copies every customer out of another repository.
    pub fn snapshot_of(source: &impl CustomerRepository) -> RepoResult<Self> {
        let customers = source.find_all()?;
        debug!(
            "event=snapshot_load module=repo status=ok rows={}",
            customers.len()
        );
        Ok(Self::from_customers(customers))
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    fn matching<'a>(&'a self, predicate: &'a Predicate) -> impl Iterator<Item = &'a Customer> {
        self.customers
            .iter()
            .filter(move |customer| predicate.evaluate(customer))
    }

    fn find_matching(
        &self,
        op: &'static str,
        predicate: &Predicate,
    ) -> RepoResult<Vec<Customer>> {
        traced(
            STORE,
            op,
            || {
                predicate.validate()?;
                Ok(self.matching(predicate).cloned().collect())
            },
            Vec::len,
        )
    }

    fn page_of(&self, mut selected: Vec<&Customer>, request: &PageRequest) -> Page<Customer> {
        let total = selected.len() as u64;
        // Snapshot order is already ascending id.
        if !request.sort().is_unsorted() {
            selected.sort_by(|left, right| request.sort().compare(left, right));
        }
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let content = selected
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Page::new(content, request, total)
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        traced(
            STORE,
            "find_by_id",
            || {
                Ok(self
                    .customers
                    .binary_search_by_key(&id, |customer| customer.id)
                    .ok()
                    .map(|index| self.customers[index].clone()))
            },
            |found| usize::from(found.is_some()),
        )
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        traced(
            STORE,
            "find_by_email",
            || {
                Ok(self
                    .customers
                    .iter()
                    .find(|customer| customer.email == email)
                    .cloned())
            },
            |found| usize::from(found.is_some()),
        )
    }

    fn count(&self) -> RepoResult<u64> {
        traced(STORE, "count", || Ok(self.customers.len() as u64), |_| 1)
    }

    fn find_all(&self) -> RepoResult<Vec<Customer>> {
        traced(STORE, "find_all", || Ok(self.customers.clone()), Vec::len)
    }

    fn find_all_sorted(&self, sort: &Sort) -> RepoResult<Vec<Customer>> {
        traced(
            STORE,
            "find_all_sorted",
            || {
                let mut sorted = self.customers.clone();
                sorted.sort_by(|left, right| sort.compare(left, right));
                Ok(sorted)
            },
            Vec::len,
        )
    }

    fn find_all_paged(&self, request: &PageRequest) -> RepoResult<Page<Customer>> {
        traced(
            STORE,
            "find_all_paged",
            || Ok(self.page_of(self.customers.iter().collect(), request)),
            Page::len,
        )
    }

    fn find_all_matching(&self, predicate: &Predicate) -> RepoResult<Vec<Customer>> {
        self.find_matching("find_all_matching", predicate)
    }

    fn find_all_matching_paged(
        &self,
        predicate: &Predicate,
        request: &PageRequest,
    ) -> RepoResult<Page<Customer>> {
        traced(
            STORE,
            "find_all_matching_paged",
            || {
                predicate.validate()?;
                Ok(self.page_of(self.matching(predicate).collect(), request))
            },
            Page::len,
        )
    }

    fn count_matching(&self, predicate: &Predicate) -> RepoResult<u64> {
        traced(
            STORE,
            "count_matching",
            || {
                predicate.validate()?;
                Ok(self.matching(predicate).count() as u64)
            },
            |_| 1,
        )
    }

    fn find_with_equal_length_names(&self, length: u32) -> RepoResult<Vec<Customer>> {
        let predicate = CustomerField::FirstName
            .length()
            .eq(i64::from(length))
            .and(CustomerField::LastName.length().eq(i64::from(length)));
        self.find_matching(EQUAL_LENGTH_NAMES_QUERY, &predicate)
    }
}
