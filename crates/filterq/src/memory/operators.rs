//! Per-operator comparison semantics.
//!
//! [`comparer`] is a flat table from (field type, operator) to a comparison
//! function. Combinations missing from the table compile to an expression
//! that is always false, for both an operator and its negation.

use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::debug;

use super::expression::MemoryExpression;
use crate::schema::{FieldType, OperatorKind};
use crate::value::Value;

/// Compares a record's value (`Null` when missing) with the comparison value.
/// The first argument is the field's element type.
type Comparer = fn(FieldType, &Value, &Value) -> bool;

/// Looks up the comparison function for an operator on a field type.
pub fn comparer(field_type: FieldType, operator: OperatorKind) -> Option<Comparer> {
    use FieldType::*;
    use OperatorKind::*;

    let is_array = field_type.is_array();
    let element = field_type.element();
    let ordered = matches!(element, Number | Date | Time | DateTime);

    let comparer: Comparer = match operator {
        Equal if !is_array => equal,
        NotEqual if !is_array => not_equal,
        GreaterThan if !is_array && ordered => greater_than,
        GreaterThanOrEqual if !is_array && ordered => greater_than_or_equal,
        LessThan if !is_array && ordered => less_than,
        LessThanOrEqual if !is_array && ordered => less_than_or_equal,
        Contain if is_array => has_element,
        NotContain if is_array => lacks_element,
        Contain if field_type == String => contains,
        NotContain if field_type == String => not_contains,
        StartWith if field_type == String => starts_with,
        NotStartWith if field_type == String => not_starts_with,
        EndWith if field_type == String => ends_with,
        NotEndWith if field_type == String => not_ends_with,
        Blank if is_array || field_type == String => blank,
        NotBlank if is_array || field_type == String => not_blank,
        In if !is_array => is_in,
        NotIn if !is_array => not_in,
        _ => return None,
    };
    Some(comparer)
}

/// Compiles one condition into an expression.
pub fn build(
    field_type: FieldType,
    operator: OperatorKind,
    field_name: &str,
    comparison: Value,
) -> MemoryExpression {
    let Some(compare) = comparer(field_type, operator) else {
        debug!(%field_type, %operator, field = field_name, "unsupported operator, always false");
        return MemoryExpression::constant(false);
    };
    let element = field_type.element();
    let field_name = field_name.to_string();
    MemoryExpression::new(move |record| {
        let actual = record.value(&field_name).unwrap_or(&Value::Null);
        compare(element, actual, &comparison)
    })
}

// ==================== Value helpers ====================

fn as_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(date) => Some(*date),
        Value::DateTime(datetime) => Some(datetime.date()),
        _ => None,
    }
}

/// Equality on the element type. Date fields ignore the time of day.
fn values_equal(element: FieldType, a: &Value, b: &Value) -> bool {
    if element == FieldType::Date {
        if let (Some(a), Some(b)) = (as_date(a), as_date(b)) {
            return a == b;
        }
    }
    match (a, b) {
        (Value::DateTime(a), Value::Date(b)) | (Value::Date(b), Value::DateTime(a)) => {
            *a == b.and_time(chrono::NaiveTime::MIN)
        }
        _ => a == b,
    }
}

fn compare(element: FieldType, a: &Value, b: &Value) -> Option<Ordering> {
    if element == FieldType::Date {
        return Some(as_date(a)?.cmp(&as_date(b)?));
    }
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::Date(b)) => Some(a.cmp(&b.and_time(chrono::NaiveTime::MIN))),
        (Value::Date(a), Value::DateTime(b)) => Some(a.and_time(chrono::NaiveTime::MIN).cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn ordering_is(element: FieldType, actual: &Value, expected: &Value, accept: &[Ordering]) -> bool {
    !actual.is_null() && compare(element, actual, expected).is_some_and(|o| accept.contains(&o))
}

// ==================== Equality ====================

fn equal(element: FieldType, actual: &Value, expected: &Value) -> bool {
    !actual.is_null() && values_equal(element, actual, expected)
}

fn not_equal(element: FieldType, actual: &Value, expected: &Value) -> bool {
    actual.is_null() || !values_equal(element, actual, expected)
}

// ==================== Ordering ====================

fn greater_than(element: FieldType, actual: &Value, expected: &Value) -> bool {
    ordering_is(element, actual, expected, &[Ordering::Greater])
}

fn greater_than_or_equal(element: FieldType, actual: &Value, expected: &Value) -> bool {
    ordering_is(element, actual, expected, &[Ordering::Greater, Ordering::Equal])
}

fn less_than(element: FieldType, actual: &Value, expected: &Value) -> bool {
    ordering_is(element, actual, expected, &[Ordering::Less])
}

fn less_than_or_equal(element: FieldType, actual: &Value, expected: &Value) -> bool {
    ordering_is(element, actual, expected, &[Ordering::Less, Ordering::Equal])
}

// ==================== Text ====================

fn text_test(actual: &Value, expected: &Value, test: fn(&str, &str) -> bool) -> bool {
    match (actual.as_str(), expected.as_str()) {
        (Some(haystack), Some(needle)) => test(haystack, needle),
        _ => false,
    }
}

fn contains(_: FieldType, actual: &Value, expected: &Value) -> bool {
    text_test(actual, expected, |haystack, needle| haystack.contains(needle))
}

fn not_contains(element: FieldType, actual: &Value, expected: &Value) -> bool {
    actual.is_null() || !contains(element, actual, expected)
}

fn starts_with(_: FieldType, actual: &Value, expected: &Value) -> bool {
    text_test(actual, expected, |haystack, needle| haystack.starts_with(needle))
}

fn not_starts_with(element: FieldType, actual: &Value, expected: &Value) -> bool {
    actual.is_null() || !starts_with(element, actual, expected)
}

fn ends_with(_: FieldType, actual: &Value, expected: &Value) -> bool {
    text_test(actual, expected, |haystack, needle| haystack.ends_with(needle))
}

fn not_ends_with(element: FieldType, actual: &Value, expected: &Value) -> bool {
    actual.is_null() || !ends_with(element, actual, expected)
}

// ==================== Arrays ====================

fn has_element(element: FieldType, actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::Null => false,
        Value::List(items) => items
            .iter()
            .any(|item| values_equal(element, item, expected)),
        scalar => values_equal(element, scalar, expected),
    }
}

fn lacks_element(element: FieldType, actual: &Value, expected: &Value) -> bool {
    !has_element(element, actual, expected)
}

// ==================== Blank ====================

fn blank(_: FieldType, actual: &Value, _: &Value) -> bool {
    match actual {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        _ => false,
    }
}

fn not_blank(element: FieldType, actual: &Value, expected: &Value) -> bool {
    !blank(element, actual, expected)
}

// ==================== Membership ====================

fn is_in(element: FieldType, actual: &Value, expected: &Value) -> bool {
    match expected {
        Value::Null => false,
        Value::List(items) => {
            !actual.is_null() && items.iter().any(|item| values_equal(element, actual, item))
        }
        scalar => equal(element, actual, scalar),
    }
}

fn not_in(element: FieldType, actual: &Value, expected: &Value) -> bool {
    match expected {
        Value::Null => false,
        Value::List(_) => !is_in(element, actual, expected),
        scalar => not_equal(element, actual, scalar),
    }
}
