//! Customer use-case service.
//!
//! # Responsibility
//! - Provide stable query entry points for core callers (CLI, harnesses).
//! - Turn request-shaped inputs (filters, `field,dir` sort strings) into
//!   repository queries.
//!
//! # Invariants
//! - Service APIs never bypass repository validation contracts.
//! - Service layer remains storage-agnostic.

use crate::model::customer::{Customer, CustomerId};
use crate::query::field::CustomerField;
use crate::query::page::{Page, PageRequest, Sort};
use crate::query::predicate::Predicate;
use crate::repo::customer_repo::{CustomerRepository, RepoResult};

/// Search options combined with AND; unset options match everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    /// Case-insensitive first-name prefix.
    pub first_name_prefix: Option<String>,
    /// Case-insensitive last-name prefix.
    pub last_name_prefix: Option<String>,
    /// Keep customers whose city name is strictly longer than this.
    pub city_longer_than: Option<u32>,
    pub active: Option<bool>,
}

impl CustomerFilter {
    pub fn to_predicate(&self) -> Predicate {
        let mut clauses = Vec::new();
        if let Some(prefix) = self.first_name_prefix.as_deref() {
            clauses.push(CustomerField::FirstName.starts_with_ignore_case(prefix));
        }
        if let Some(prefix) = self.last_name_prefix.as_deref() {
            clauses.push(CustomerField::LastName.starts_with_ignore_case(prefix));
        }
        if let Some(length) = self.city_longer_than {
            clauses.push(CustomerField::CityName.length().gt(i64::from(length)));
        }
        if let Some(active) = self.active {
            clauses.push(CustomerField::Active.eq(active));
        }
        Predicate::all(clauses)
    }
}

/// Use-case service wrapper for customer queries.
pub struct CustomerService<R: CustomerRepository> {
    repo: R,
}

impl<R: CustomerRepository> CustomerService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Gets one customer; absent ids are `RepoError::NotFound`.
    pub fn get(&self, id: CustomerId) -> RepoResult<Customer> {
        self.repo.find_one(id)
    }

    pub fn get_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        self.repo.find_by_email(email.trim())
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count()
    }

    pub fn list(&self) -> RepoResult<Vec<Customer>> {
        self.repo.find_all()
    }

    /// Lists one page, sorted by an optional `field[,asc|desc]` string.
    pub fn page(&self, page: u32, size: u32, sort: Option<&str>) -> RepoResult<Page<Customer>> {
        let request = page_request(page, size, sort)?;
        self.repo.find_all_paged(&request)
    }

    pub fn equal_length_names(&self, length: u32) -> RepoResult<Vec<Customer>> {
        self.repo.find_with_equal_length_names(length)
    }

    pub fn search(&self, filter: &CustomerFilter) -> RepoResult<Vec<Customer>> {
        self.repo.find_all_matching(&filter.to_predicate())
    }

    pub fn search_page(
        &self,
        filter: &CustomerFilter,
        page: u32,
        size: u32,
        sort: Option<&str>,
    ) -> RepoResult<Page<Customer>> {
        let request = page_request(page, size, sort)?;
        self.repo
            .find_all_matching_paged(&filter.to_predicate(), &request)
    }
}

fn page_request(page: u32, size: u32, sort: Option<&str>) -> RepoResult<PageRequest> {
    let sort = match sort {
        Some(spec) => Sort::parse(spec)?,
        None => Sort::unsorted(),
    };
    Ok(PageRequest::new(page, size, sort)?)
}
