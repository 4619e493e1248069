//! Filter trees built from validated token streams.
//!
//! [`FilterParser`] accepts the same text and JSON queries as the
//! tokenizers, checks that the tokens form complete clauses, and casts every
//! value to its field's type. The resulting [`Filter`] can be compiled into a
//! predicate with [`crate::memory::compile`].
//!
//! # Example
//!
//! ```
//! use filterq::{Field, FieldType, Filter, FilterParser, Metadata, OperatorKind};
//!
//! let metadata = Metadata::new(vec![
//!     Field::new("Status", FieldType::String).with_operators(OperatorKind::ALL),
//! ])
//! .unwrap();
//!
//! let text = FilterParser::parse(&metadata, "Status in 'A', 'P'").unwrap();
//! let json = FilterParser::parse_json(&metadata, r#"["Status", "In", ["A", "P"]]"#).unwrap();
//! assert_eq!(text, json);
//! ```

mod ast;
mod error;
mod parser;

pub use ast::{Condition, Filter};
pub use error::{FilterError, FilterResult};
pub use parser::FilterParser;
