//! Storage-agnostic query building blocks.
//!
//! # Responsibility
//! - Name queryable customer attributes (`field`).
//! - Express filters as a predicate AST (`predicate`).
//! - Express ordering and slicing (`page`).
//!
//! # Invariants
//! - Nothing in this module touches storage; repositories translate or
//!   interpret these values.

use crate::query::field::FieldKind;
use thiserror::Error;

pub mod field;
pub mod page;
pub mod predicate;

/// Predicate or field resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown customer field `{0}`")]
    UnknownField(String),

    #[error("operation `{operation}` is not supported on field `{field}`")]
    UnsupportedOperation {
        field: &'static str,
        operation: &'static str,
    },

    #[error("field `{field}` expects a {expected} value, got {found}")]
    TypeMismatch {
        field: &'static str,
        expected: FieldKind,
        found: FieldKind,
    },
}

/// Malformed caller-supplied parameter, such as a zero page size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid argument `{name}`: {message}")]
pub struct InvalidArgument {
    pub name: &'static str,
    pub message: String,
}

impl InvalidArgument {
    pub fn new(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
        }
    }
}
