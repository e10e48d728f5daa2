//! Predicate expression tree over customer attributes.
//!
//! # Responsibility
//! - Represent boolean conditions as a closed, tagged-variant AST.
//! - Validate predicates against field kinds before execution.
//! - Evaluate predicates against loaded customers.
//!
//! # Invariants
//! - Evaluation is pure: no I/O, no shared state, no allocation-visible effects.
//! - `And`/`Or` evaluate children left to right and short-circuit.
//! - Case folding is ASCII-only so in-memory results match SQLite `lower()`.
//! - An unvalidated predicate with mismatched kinds evaluates to `false`
//!   instead of panicking.

use crate::model::customer::Customer;
use crate::query::field::{CustomerField, FieldKind, FieldValue, Value};
use crate::query::QueryError;
use std::cmp::Ordering;

/// String matching operator for `Predicate::Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    StartsWith,
    EndsWith,
    Contains,
}

impl TextOp {
    pub const fn name(self) -> &'static str {
        match self {
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Contains => "contains",
        }
    }

    fn matches(self, haystack: &str, needle: &str) -> bool {
        match self {
            Self::StartsWith => haystack.starts_with(needle),
            Self::EndsWith => haystack.ends_with(needle),
            Self::Contains => haystack.contains(needle),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    Sensitive,
    Insensitive,
}

/// Ordering comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    pub(crate) fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }
}

/// Left-hand side of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// The field value itself.
    Field(CustomerField),
    /// Character count of a text field.
    Length(CustomerField),
}

impl Operand {
    pub const fn field(self) -> CustomerField {
        match self {
            Self::Field(field) | Self::Length(field) => field,
        }
    }
}

/// Boolean expression over one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Conjunction; an empty list is `true`.
    And(Vec<Predicate>),
    /// Disjunction; an empty list is `false`.
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    Text {
        field: CustomerField,
        op: TextOp,
        value: String,
        case: CaseMode,
    },
    Compare {
        operand: Operand,
        op: CompareOp,
        value: Value,
    },
}

impl Predicate {
    /// Predicate accepting every customer.
    pub fn always() -> Self {
        Self::And(Vec::new())
    }

    /// Conjunction of all given predicates.
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        predicates
            .into_iter()
            .fold(Self::always(), |acc, next| acc.and(next))
    }

    /// Disjunction of all given predicates.
    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self::Or(predicates.into_iter().collect())
    }

    /// Returns `self AND other`, flattening nested conjunctions.
    pub fn and(self, other: Predicate) -> Self {
        let mut children = match self {
            Self::And(children) => children,
            single => vec![single],
        };
        match other {
            Self::And(more) => children.extend(more),
            single => children.push(single),
        }
        Self::And(children)
    }

    /// Returns `self OR other`, flattening nested disjunctions.
    pub fn or(self, other: Predicate) -> Self {
        let mut children = match self {
            Self::Or(children) => children,
            single => vec![single],
        };
        match other {
            Self::Or(more) => children.extend(more),
            single => children.push(single),
        }
        Self::Or(children)
    }

    pub fn not(self) -> Self {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    /// Nesting depth; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => {
                1 + children.iter().map(Self::depth).max().unwrap_or(0)
            }
            Self::Not(inner) => 1 + inner.depth(),
            Self::Text { .. } | Self::Compare { .. } => 1,
        }
    }

    /// Checks operators and literals against field kinds.
    pub fn validate(&self) -> Result<(), QueryError> {
        match self {
            Self::And(children) | Self::Or(children) => {
                children.iter().try_for_each(Self::validate)
            }
            Self::Not(inner) => inner.validate(),
            Self::Text { field, op, .. } => require_text(*field, op.name()),
            Self::Compare {
                operand: Operand::Field(field),
                value,
                ..
            } => {
                if field.kind() != value.kind() {
                    return Err(QueryError::TypeMismatch {
                        field: field.path(),
                        expected: field.kind(),
                        found: value.kind(),
                    });
                }
                Ok(())
            }
            Self::Compare {
                operand: Operand::Length(field),
                value,
                ..
            } => {
                require_text(*field, "length")?;
                if value.kind() != FieldKind::Integer {
                    return Err(QueryError::TypeMismatch {
                        field: field.path(),
                        expected: FieldKind::Integer,
                        found: value.kind(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Evaluates this predicate against one customer.
    pub fn evaluate(&self, customer: &Customer) -> bool {
        match self {
            Self::And(children) => children.iter().all(|child| child.evaluate(customer)),
            Self::Or(children) => children.iter().any(|child| child.evaluate(customer)),
            Self::Not(inner) => !inner.evaluate(customer),
            Self::Text {
                field,
                op,
                value,
                case,
            } => {
                let FieldValue::Text(text) = field.value_of(customer) else {
                    return false;
                };
                match case {
                    CaseMode::Sensitive => op.matches(text, value),
                    CaseMode::Insensitive => op.matches(
                        &text.to_ascii_lowercase(),
                        &value.to_ascii_lowercase(),
                    ),
                }
            }
            Self::Compare {
                operand: Operand::Field(field),
                op,
                value,
            } => field
                .value_of(customer)
                .compare_to(value)
                .is_some_and(|ordering| op.accepts(ordering)),
            Self::Compare {
                operand: Operand::Length(field),
                op,
                value,
            } => match (field.value_of(customer), value) {
                (FieldValue::Text(text), Value::Integer(expected)) => {
                    let length = i64::try_from(text.chars().count()).unwrap_or(i64::MAX);
                    op.accepts(length.cmp(expected))
                }
                _ => false,
            },
        }
    }
}

fn require_text(field: CustomerField, operation: &'static str) -> Result<(), QueryError> {
    if field.kind() != FieldKind::Text {
        return Err(QueryError::UnsupportedOperation {
            field: field.path(),
            operation,
        });
    }
    Ok(())
}

/// `length(field)` expression awaiting a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthExpr {
    field: CustomerField,
}

impl LengthExpr {
    fn compare(self, op: CompareOp, length: i64) -> Predicate {
        Predicate::Compare {
            operand: Operand::Length(self.field),
            op,
            value: Value::Integer(length),
        }
    }

    pub fn eq(self, length: i64) -> Predicate {
        self.compare(CompareOp::Eq, length)
    }

    pub fn ne(self, length: i64) -> Predicate {
        self.compare(CompareOp::Ne, length)
    }

    pub fn lt(self, length: i64) -> Predicate {
        self.compare(CompareOp::Lt, length)
    }

    pub fn le(self, length: i64) -> Predicate {
        self.compare(CompareOp::Le, length)
    }

    pub fn gt(self, length: i64) -> Predicate {
        self.compare(CompareOp::Gt, length)
    }

    pub fn ge(self, length: i64) -> Predicate {
        self.compare(CompareOp::Ge, length)
    }
}

/// Fluent predicate builders, e.g.
/// `CustomerField::FirstName.starts_with_ignore_case("Mar")`.
impl CustomerField {
    fn text(self, op: TextOp, value: impl Into<String>, case: CaseMode) -> Predicate {
        Predicate::Text {
            field: self,
            op,
            value: value.into(),
            case,
        }
    }

    fn compare(self, op: CompareOp, value: impl Into<Value>) -> Predicate {
        Predicate::Compare {
            operand: Operand::Field(self),
            op,
            value: value.into(),
        }
    }

    pub fn starts_with(self, prefix: impl Into<String>) -> Predicate {
        self.text(TextOp::StartsWith, prefix, CaseMode::Sensitive)
    }

    pub fn starts_with_ignore_case(self, prefix: impl Into<String>) -> Predicate {
        self.text(TextOp::StartsWith, prefix, CaseMode::Insensitive)
    }

    pub fn ends_with(self, suffix: impl Into<String>) -> Predicate {
        self.text(TextOp::EndsWith, suffix, CaseMode::Sensitive)
    }

    pub fn ends_with_ignore_case(self, suffix: impl Into<String>) -> Predicate {
        self.text(TextOp::EndsWith, suffix, CaseMode::Insensitive)
    }

    pub fn contains(self, needle: impl Into<String>) -> Predicate {
        self.text(TextOp::Contains, needle, CaseMode::Sensitive)
    }

    pub fn contains_ignore_case(self, needle: impl Into<String>) -> Predicate {
        self.text(TextOp::Contains, needle, CaseMode::Insensitive)
    }

    pub fn eq(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Eq, value)
    }

    pub fn ne(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Ne, value)
    }

    pub fn lt(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Lt, value)
    }

    pub fn le(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Le, value)
    }

    pub fn gt(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Gt, value)
    }

    pub fn ge(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Ge, value)
    }

    pub fn length(self) -> LengthExpr {
        LengthExpr { field: self }
    }
}
