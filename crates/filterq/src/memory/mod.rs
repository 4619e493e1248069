//! In-memory evaluation of filters.
//!
//! A [`Filter`] compiles into a [`MemoryExpression`]: a thread-safe predicate
//! over any [`Record`]. Compilation happens once; evaluation only reads the
//! record.
//!
//! # Example
//!
//! ```
//! use filterq::memory::{compile, FieldRecord};
//! use filterq::{Field, FieldType, FilterParser, Metadata, OperatorKind};
//!
//! let metadata = Metadata::new(vec![
//!     Field::new("Age", FieldType::Number).with_operators(OperatorKind::ALL),
//! ])
//! .unwrap();
//!
//! let filter = FilterParser::parse(&metadata, "Age >= 18").unwrap();
//! let expression = compile(&filter);
//!
//! assert!(expression.evaluate(&FieldRecord::new().with("Age", 30)));
//! assert!(!expression.evaluate(&FieldRecord::new().with("Age", 12)));
//! assert!(!expression.evaluate(&FieldRecord::new()));
//! ```

mod expression;
mod logic;
mod operators;
mod record;

pub use expression::MemoryExpression;
pub use logic::{AndLogic, OrLogic};
pub use operators::{build, comparer};
pub use record::{FieldRecord, Record};

use crate::filter::Filter;

/// Compiles a filter tree into an expression.
pub fn compile(filter: &Filter) -> MemoryExpression {
    match filter {
        Filter::Condition(condition) => build(
            condition.field_type,
            condition.operator,
            &condition.field,
            condition.value.clone(),
        ),
        Filter::And(children) => AndLogic::build(children.iter().map(compile).collect()),
        Filter::Or(children) => OrLogic::build(children.iter().map(compile).collect()),
    }
}
