//! Error types for the filter parser.

use thiserror::Error;

use crate::grammar::Rejection;
use crate::tokenizer::{RejectedToken, TokenizeError};

/// A specialized Result type for filter parsing operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while turning a query into a [`super::Filter`].
#[derive(Debug, Error)]
pub enum FilterError {
    /// The filter expression is empty.
    #[error("filter expression is empty")]
    EmptyExpression,

    /// The grammar rejected a token.
    #[error("invalid token '{text}' at position {position}: {reason}")]
    Rejected {
        /// Byte offset (text) or token index (JSON).
        position: usize,
        text: String,
        reason: Rejection,
    },

    /// The lexer could not read the rest of the input.
    #[error("unrecognized input at position {position}: '{text}'")]
    UnmatchedInput { position: usize, text: String },

    /// An unexpected token was encountered during parsing.
    #[error("unexpected token: {token}")]
    UnexpectedToken {
        /// The unexpected token that was encountered.
        token: String,
    },

    /// The expression ended in the middle of a clause.
    #[error("unexpected end of expression")]
    UnexpectedEndOfInput,

    /// An unclosed parenthesis was found.
    #[error("unclosed parenthesis")]
    UnclosedParenthesis,

    /// A clause names a field the metadata does not have.
    #[error("unknown field: {name}")]
    UnknownField { name: String },

    /// A value could not be cast to its field's type.
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidValue { value: String, field: String },

    /// The JSON input is not shaped like a query.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

impl FilterError {
    /// Creates an unexpected token error.
    pub fn unexpected_token(token: impl Into<String>) -> Self {
        FilterError::UnexpectedToken {
            token: token.into(),
        }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        FilterError::UnknownField { name: name.into() }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(value: impl Into<String>, field: impl Into<String>) -> Self {
        FilterError::InvalidValue {
            value: value.into(),
            field: field.into(),
        }
    }

    /// Returns the input position this error points at, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            FilterError::Rejected { position, .. } | FilterError::UnmatchedInput { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }
}

impl From<RejectedToken> for FilterError {
    fn from(rejected: RejectedToken) -> Self {
        FilterError::Rejected {
            position: rejected.position,
            text: rejected.text,
            reason: rejected.reason,
        }
    }
}
