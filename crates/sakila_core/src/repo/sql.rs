//! Predicate-to-SQL translation for the `customer_detail` view.
//!
//! # Invariants
//! - Only positional `?` placeholders are emitted; binds are returned in
//!   placeholder order so callers can append LIMIT/OFFSET binds afterwards.
//! - Literal values never appear in SQL text.
//! - Text semantics match `Predicate::evaluate`: `length`/`substr`/`instr`
//!   count characters, `lower` folds ASCII only.

use crate::query::field::Value;
use crate::query::predicate::{CaseMode, Operand, Predicate, TextOp};
use rusqlite::types::Value as SqlValue;

/// SQL boolean expression plus its bind values.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SqlFilter {
    pub(crate) clause: String,
    pub(crate) binds: Vec<SqlValue>,
}

pub(crate) fn filter_for(predicate: &Predicate) -> SqlFilter {
    let mut clause = String::new();
    let mut binds = Vec::new();
    push_predicate(predicate, &mut clause, &mut binds);
    SqlFilter { clause, binds }
}

fn push_predicate(predicate: &Predicate, sql: &mut String, binds: &mut Vec<SqlValue>) {
    match predicate {
        Predicate::And(children) => push_junction(children, " AND ", "1 = 1", sql, binds),
        Predicate::Or(children) => push_junction(children, " OR ", "0 = 1", sql, binds),
        Predicate::Not(inner) => {
            sql.push_str("NOT (");
            push_predicate(inner, sql, binds);
            sql.push(')');
        }
        Predicate::Text {
            field,
            op,
            value,
            case,
        } => {
            let (column, param) = match case {
                CaseMode::Sensitive => (field.column().to_string(), "?"),
                CaseMode::Insensitive => (format!("lower({})", field.column()), "lower(?)"),
            };
            match op {
                TextOp::StartsWith => {
                    sql.push_str(&format!("instr({column}, {param}) = 1"));
                    binds.push(SqlValue::Text(value.clone()));
                }
                TextOp::Contains => {
                    sql.push_str(&format!("instr({column}, {param}) > 0"));
                    binds.push(SqlValue::Text(value.clone()));
                }
                TextOp::EndsWith => {
                    sql.push_str(&format!(
                        "substr({column}, length({column}) - length({param}) + 1) = {param}"
                    ));
                    binds.push(SqlValue::Text(value.clone()));
                    binds.push(SqlValue::Text(value.clone()));
                }
            }
        }
        Predicate::Compare { operand, op, value } => {
            let lhs = match operand {
                Operand::Field(field) => field.column().to_string(),
                Operand::Length(field) => format!("length({})", field.column()),
            };
            sql.push_str(&format!("{lhs} {} ?", op.symbol()));
            binds.push(sql_value(value));
        }
    }
}

fn push_junction(
    children: &[Predicate],
    separator: &str,
    empty: &str,
    sql: &mut String,
    binds: &mut Vec<SqlValue>,
) {
    if children.is_empty() {
        sql.push_str(empty);
        return;
    }

    sql.push('(');
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            sql.push_str(separator);
        }
        push_predicate(child, sql, binds);
    }
    sql.push(')');
}

fn sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Integer(number) => SqlValue::Integer(*number),
        Value::Text(text) => SqlValue::Text(text.clone()),
        Value::Boolean(flag) => SqlValue::Integer(i64::from(*flag)),
    }
}

#[cfg(test)]
mod tests {
    use super::filter_for;
    use crate::query::field::CustomerField;
    use crate::query::predicate::Predicate;
    use rusqlite::types::Value as SqlValue;

    #[test]
    fn conjunction_of_prefix_and_length() {
        let filter = filter_for(
            &CustomerField::FirstName
                .starts_with_ignore_case("Mar")
                .and(CustomerField::CityName.length().gt(10)),
        );
        assert_eq!(
            filter.clause,
            "(instr(lower(first_name), lower(?)) = 1 AND length(city) > ?)"
        );
        assert_eq!(
            filter.binds,
            vec![SqlValue::Text("Mar".to_string()), SqlValue::Integer(10)]
        );
    }

    #[test]
    fn empty_junctions_and_negation() {
        assert_eq!(filter_for(&Predicate::always()).clause, "1 = 1");
        assert_eq!(filter_for(&Predicate::any(Vec::<Predicate>::new())).clause, "0 = 1");

        let filter = filter_for(&CustomerField::Active.eq(true).not());
        assert_eq!(filter.clause, "NOT (active = ?)");
        assert_eq!(filter.binds, vec![SqlValue::Integer(1)]);
    }

    #[test]
    fn ends_with_binds_needle_twice() {
        let filter = filter_for(&CustomerField::Email.ends_with(".org"));
        assert_eq!(
            filter.clause,
            "substr(email, length(email) - length(?) + 1) = ?"
        );
        assert_eq!(filter.binds.len(), 2);
    }
}
