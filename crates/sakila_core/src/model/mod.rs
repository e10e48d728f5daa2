//! Domain model for the customer dataset.
//!
//! # Responsibility
//! - Define plain data records returned by repositories.
//!
//! # Invariants
//! - Records are read-only snapshots; repositories never hand out shared state.

pub mod customer;
