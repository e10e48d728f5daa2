//! Customer domain model.
//!
//! # Responsibility
//! - Define the read-only records exposed by customer repositories.
//! - Mirror the Sakila `customer -> address -> city -> country` chain.
//!
//! # Invariants
//! - `id` is unique and never reused for another customer.
//! - Every customer owns exactly one `Address`, which resolves one `City`.

use serde::{Deserialize, Serialize};

/// Stable identifier of a customer row (`customer.customer_id`).
pub type CustomerId = i64;

/// City a customer address belongs to, flattened with its country name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    /// Serialized as `cityName` to match the external schema naming.
    #[serde(rename = "cityName")]
    pub name: String,
    pub country: String,
}

/// Postal address owned by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: i64,
    /// Street line, e.g. `1913 Hanoi Way`.
    pub address: String,
    pub district: String,
    pub postal_code: String,
    pub phone: String,
    pub city: City,
}

/// Canonical customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    /// Treated as unique by lookups, although storage does not enforce it.
    pub email: String,
    /// Inactive customers stay queryable; the flag is plain data.
    pub active: bool,
    pub address: Address,
}

impl Customer {
    /// Returns `"FIRST LAST"` as stored.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Shortcut for `address.city.name`.
    pub fn city_name(&self) -> &str {
        self.address.city.name.as_str()
    }
}
