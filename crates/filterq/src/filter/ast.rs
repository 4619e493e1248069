//! Parsed filter trees.

use std::fmt;

use serde::Serialize;

use crate::schema::{FieldType, OperatorKind};
use crate::value::Value;

/// A single `field operator value` comparison.
///
/// `value` is already cast to the field's type. It is `Null` for
/// `Blank`/`NotBlank`, and a `List` when `In`/`NotIn` got several values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    /// Canonical field name from the metadata.
    pub field: String,
    pub field_type: FieldType,
    pub operator: OperatorKind,
    pub value: Value,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        field_type: FieldType,
        operator: OperatorKind,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            field_type,
            operator,
            value: value.into(),
        }
    }
}

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    Condition(Condition),
    /// True when every child is true; true when empty.
    And(Vec<Filter>),
    /// True when any child is true; false when empty.
    Or(Vec<Filter>),
}

impl Filter {
    /// Combines two filters with AND, flattening a left-hand AND.
    pub fn and(left: Filter, right: Filter) -> Self {
        match left {
            Filter::And(mut children) => {
                children.push(right);
                Filter::And(children)
            }
            left => Filter::And(vec![left, right]),
        }
    }

    /// Combines two filters with OR, flattening a left-hand OR.
    pub fn or(left: Filter, right: Filter) -> Self {
        match left {
            Filter::Or(mut children) => {
                children.push(right);
                Filter::Or(children)
            }
            left => Filter::Or(vec![left, right]),
        }
    }

    /// Returns every condition in the tree, left to right.
    pub fn conditions(&self) -> Vec<&Condition> {
        match self {
            Filter::Condition(condition) => vec![condition],
            Filter::And(children) | Filter::Or(children) => {
                children.iter().flat_map(Filter::conditions).collect()
            }
        }
    }
}

impl From<Condition> for Filter {
    fn from(condition: Condition) -> Self {
        Filter::Condition(condition)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.operator)?;
        match &self.value {
            Value::Null => Ok(()),
            Value::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    let separator = if index == 0 { " " } else { ", " };
                    write!(f, "{separator}{}", DisplayLiteral(item))?;
                }
                Ok(())
            }
            value => write!(f, " {}", DisplayLiteral(value)),
        }
    }
}

/// Renders a value the way it would be written in a text query.
struct DisplayLiteral<'a>(&'a Value);

impl fmt::Display for DisplayLiteral<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Value::Time(secs) => write!(
                f,
                "{:02}:{:02}:{:02}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60
            ),
            value => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (children, keyword) = match self {
            Filter::Condition(condition) => return write!(f, "{condition}"),
            Filter::And(children) => (children, "And"),
            Filter::Or(children) => (children, "Or"),
        };
        for (index, child) in children.iter().enumerate() {
            if index > 0 {
                write!(f, " {keyword} ")?;
            }
            match child {
                Filter::Condition(_) => write!(f, "{child}")?,
                group => write!(f, "({group})")?,
            }
        }
        Ok(())
    }
}
