//! Queryable customer attribute paths.
//!
//! # Responsibility
//! - Name every customer attribute that predicates and sorts may reference.
//! - Map attribute paths to storage columns and to in-memory values.
//!
//! # Invariants
//! - Every field has exactly one `FieldKind`; values read from a customer
//!   always carry that kind.
//! - Column names refer to the `customer_detail` view.

use crate::model::customer::Customer;
use crate::query::QueryError;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Value category of a field or literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Boolean,
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Text => "text",
            Self::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// Attribute path on `Customer`, written the way external callers name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    Id,
    FirstName,
    LastName,
    Email,
    Active,
    AddressLine,
    District,
    PostalCode,
    Phone,
    CityName,
    Country,
}

impl CustomerField {
    pub const ALL: [Self; 11] = [
        Self::Id,
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Active,
        Self::AddressLine,
        Self::District,
        Self::PostalCode,
        Self::Phone,
        Self::CityName,
        Self::Country,
    ];

    /// Dotted attribute path, e.g. `address.city.cityName`.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Active => "active",
            Self::AddressLine => "address.address",
            Self::District => "address.district",
            Self::PostalCode => "address.postalCode",
            Self::Phone => "address.phone",
            Self::CityName => "address.city.cityName",
            Self::Country => "address.city.country",
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Id => FieldKind::Integer,
            Self::Active => FieldKind::Boolean,
            _ => FieldKind::Text,
        }
    }

    /// Column of the `customer_detail` view backing this field.
    pub(crate) const fn column(self) -> &'static str {
        match self {
            Self::Id => "customer_id",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Active => "active",
            Self::AddressLine => "address",
            Self::District => "district",
            Self::PostalCode => "postal_code",
            Self::Phone => "phone",
            Self::CityName => "city",
            Self::Country => "country",
        }
    }

    /// Reads this field from a loaded customer.
    pub fn value_of(self, customer: &Customer) -> FieldValue<'_> {
        match self {
            Self::Id => FieldValue::Integer(customer.id),
            Self::FirstName => FieldValue::Text(&customer.first_name),
            Self::LastName => FieldValue::Text(&customer.last_name),
            Self::Email => FieldValue::Text(&customer.email),
            Self::Active => FieldValue::Boolean(customer.active),
            Self::AddressLine => FieldValue::Text(&customer.address.address),
            Self::District => FieldValue::Text(&customer.address.district),
            Self::PostalCode => FieldValue::Text(&customer.address.postal_code),
            Self::Phone => FieldValue::Text(&customer.address.phone),
            Self::CityName => FieldValue::Text(&customer.address.city.name),
            Self::Country => FieldValue::Text(&customer.address.city.country),
        }
    }
}

impl Display for CustomerField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for CustomerField {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.path() == trimmed)
            .ok_or_else(|| QueryError::UnknownField(trimmed.to_string()))
    }
}

/// Borrowed field value read from a customer.
///
/// Values of one field always share a variant, so the derived ordering is the
/// natural ordering of that field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue<'a> {
    Integer(i64),
    Text(&'a str),
    Boolean(bool),
}

impl FieldValue<'_> {
    /// Compares against a literal; `None` when kinds differ.
    pub fn compare_to(&self, literal: &Value) -> Option<Ordering> {
        match (self, literal) {
            (Self::Integer(left), Value::Integer(right)) => Some(left.cmp(right)),
            (Self::Text(left), Value::Text(right)) => Some((*left).cmp(right.as_str())),
            (Self::Boolean(left), Value::Boolean(right)) => Some(left.cmp(right)),
            _ => None,
        }
    }
}

/// Owned literal used on the right-hand side of comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Text(String),
    Boolean(bool),
}

impl Value {
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Integer(_) => FieldKind::Integer,
            Self::Text(_) => FieldKind::Text,
            Self::Boolean(_) => FieldKind::Boolean,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
