//! Sorting and pagination requests.
//!
//! # Responsibility
//! - Validate page requests at construction time.
//! - Produce the `(offset, limit, sort)` triple consumed by repositories.
//! - Carry query results together with paging metadata.
//!
//! # Invariants
//! - `size > 0` and `page * size` fits into a SQLite `INTEGER` (i64).
//! - Every sort ends with an implicit ascending `id` tie-break.

use crate::model::customer::Customer;
use crate::query::field::CustomerField;
use crate::query::InvalidArgument;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for Direction {
    type Err = InvalidArgument;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(InvalidArgument::new(
                "direction",
                format!("unsupported sort direction `{other}`; expected asc|desc"),
            )),
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub field: CustomerField,
    pub direction: Direction,
}

impl Order {
    pub const fn asc(field: CustomerField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub const fn desc(field: CustomerField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

/// Ordered list of sort keys. Empty means "by id".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(order: Order) -> Self {
        Self {
            orders: vec![order],
        }
    }

    /// Builds a single-key sort from an attribute path such as `lastName`.
    ///
    /// # Errors
    /// - `InvalidArgument` when the path names no customer attribute.
    pub fn by_name(direction: Direction, field: &str) -> Result<Self, InvalidArgument> {
        let field = field
            .parse::<CustomerField>()
            .map_err(|err| InvalidArgument::new("sort", err.to_string()))?;
        Ok(Self::by(Order { field, direction }))
    }

    /// Parses the `field[,asc|desc]` request form, e.g. `lastName,desc`.
    pub fn parse(spec: &str) -> Result<Self, InvalidArgument> {
        let mut parts = spec.splitn(2, ',');
        let field = parts.next().unwrap_or_default();
        let direction = match parts.next() {
            Some(direction) => direction.parse::<Direction>()?,
            None => Direction::Asc,
        };
        Self::by_name(direction, field)
    }

    /// Appends a lower-priority sort key.
    pub fn and(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    /// Total order over customers, tie-broken by ascending id.
    pub fn compare(&self, left: &Customer, right: &Customer) -> Ordering {
        self.orders
            .iter()
            .map(|order| {
                let ordering = order
                    .field
                    .value_of(left)
                    .cmp(&order.field.value_of(right));
                match order.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| left.id.cmp(&right.id))
    }

    /// SQL `ORDER BY` clause body, always ending with the id tie-break.
    pub(crate) fn order_by_sql(&self) -> String {
        let mut keys = self
            .orders
            .iter()
            .map(|order| format!("{} {}", order.field.column(), order.direction.sql()))
            .collect::<Vec<_>>();
        keys.push(format!("{} ASC", CustomerField::Id.column()));
        keys.join(", ")
    }
}

/// Zero-based page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Sort,
    offset: i64,
}

impl PageRequest {
    /// # Errors
    /// - `InvalidArgument` when `size == 0` or the offset overflows.
    pub fn new(page: u32, size: u32, sort: Sort) -> Result<Self, InvalidArgument> {
        if size == 0 {
            return Err(InvalidArgument::new(
                "size",
                "page size must be greater than zero",
            ));
        }
        let offset = i64::from(page)
            .checked_mul(i64::from(size))
            .ok_or_else(|| {
                InvalidArgument::new("page", format!("offset of page {page} x {size} overflows"))
            })?;

        Ok(Self {
            page,
            size,
            sort,
            offset,
        })
    }

    /// Page ordered by ascending id.
    pub fn of(page: u32, size: u32) -> Result<Self, InvalidArgument> {
        Self::new(page, size, Sort::unsorted())
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    pub const fn offset(&self) -> i64 {
        self.offset
    }

    pub const fn limit(&self) -> u32 {
        self.size
    }

    pub fn next(&self) -> Result<Self, InvalidArgument> {
        let page = self
            .page
            .checked_add(1)
            .ok_or_else(|| InvalidArgument::new("page", "page index overflows"))?;
        Self::new(page, self.size, self.sort.clone())
    }

    /// Previous page, or the first page when already there.
    pub fn previous_or_first(&self) -> Self {
        Self {
            page: self.page.saturating_sub(1),
            offset: self.offset.saturating_sub(i64::from(self.size)).max(0),
            ..self.clone()
        }
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            number: request.page(),
            size: request.size(),
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(u64::from(self.size.max(1)))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.number) + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.content.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.iter()
    }
}
