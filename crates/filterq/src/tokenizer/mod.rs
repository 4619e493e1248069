//! Front-end tokenizers for text and JSON queries.
//!
//! Both are thin drivers: they ask [`crate::lexer`] (text) or the JSON
//! structure (JSON) for the next candidate, and let [`crate::grammar`]
//! decide what it becomes.

mod json;
mod text;

use thiserror::Error;

use crate::grammar::Rejection;

pub use json::JsonTokenizer;
pub use text::{TextTokenizer, TextTokens};

/// A specialized Result type for tokenization.
pub type TokenizeResult<T> = Result<T, TokenizeError>;

/// The input is not shaped like a query at all.
///
/// Grammar problems are not errors: they become `None` tokens.
#[derive(Debug, Error)]
pub enum TokenizeError {
    /// The input is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The root (or a nested query) is not an array.
    #[error("query must be a JSON array, found {found}")]
    NotAnArray {
        /// The JSON kind that was found instead.
        found: &'static str,
    },

    /// A query array has neither 2 nor 3 elements.
    #[error("query array must have 2 or 3 elements, found {len}")]
    InvalidArity {
        /// The number of elements found.
        len: usize,
    },

    /// A field, operator or logic element is not a string.
    #[error("{element} must be a string")]
    ExpectedString {
        /// Which element was wrong.
        element: &'static str,
    },

    /// The second element of a logic query is not an array.
    #[error("logic query must be followed by an array of queries")]
    ExpectedGroupList,

    /// A value element that cannot be a literal (an object, or a nested array).
    #[error("unsupported value: {value}")]
    UnsupportedValue {
        /// The offending JSON, rendered.
        value: String,
    },
}

/// A candidate the grammar rejected, with where and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedToken {
    /// Byte offset for text queries; depth-first token index for JSON queries.
    pub position: usize,
    /// The rejected text.
    pub text: String,
    /// Why it was rejected.
    pub reason: Rejection,
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
