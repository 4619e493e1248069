//! Grammar-validating filter queries over typed field metadata.
//!
//! A query is written either as infix text
//!
//! ```text
//! Age > 18 and (Status = 'Active' or Status = 'Pending')
//! ```
//!
//! or as nested JSON arrays
//!
//! ```text
//! ["And", [["Age", ">", 18], ["Or", [["Status", "=", "Active"], ["Status", "=", "Pending"]]]]]
//! ```
//!
//! Both front ends produce the same token vocabulary. Every candidate token
//! is checked against the [`Metadata`] as it is produced: unknown fields,
//! operators a field does not allow and values that do not cast to the
//! field's type come out as `None` tokens instead of errors.
//!
//! The [`FilterParser`] turns valid tokens into a [`Filter`] tree, and
//! [`memory::compile`] turns that into a predicate over in-memory records.
//!
//! # Example
//!
//! ```
//! use filterq::memory::{compile, FieldRecord};
//! use filterq::{Field, FieldType, FilterParser, Metadata, OperatorKind, TextTokenizer, TokenType};
//!
//! let metadata = Metadata::new(vec![
//!     Field::new("Age", FieldType::Number).with_operators(OperatorKind::ALL),
//!     Field::new("Name", FieldType::String).with_operators(OperatorKind::ALL),
//! ])
//! .unwrap();
//!
//! let tokens = TextTokenizer::new(&metadata).tokenize("Name = 12 and Age = twelve");
//! assert_eq!(tokens.tokens.last().unwrap().token_type, TokenType::None);
//!
//! let filter = FilterParser::parse(&metadata, "Name starts with 'A' and Age >= 18").unwrap();
//! let expression = compile(&filter);
//! assert!(expression.evaluate(&FieldRecord::new().with("Name", "Ada").with("Age", 36)));
//! ```

pub mod error;
pub mod filter;
pub mod grammar;
pub mod lexer;
pub mod memory;
pub mod schema;
pub mod token;
pub mod tokenizer;
pub mod value;

pub use error::{MetadataError, MetadataResult};
pub use filter::{Condition, Filter, FilterError, FilterParser, FilterResult};
pub use grammar::{Grammar, Rejection, Resolution};
pub use lexer::find_match;
pub use schema::{Field, FieldType, Lookup, Metadata, OperatorKind};
pub use token::{Token, TokenMatch, TokenNode, TokenType};
pub use tokenizer::{
    JsonTokenizer, RejectedToken, TextTokenizer, TextTokens, TokenizeError, TokenizeResult,
};
pub use value::{cast_value, validate_value, Value};
