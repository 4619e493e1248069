//! Grammar validation for candidate tokens.
//!
//! The grammar has no state of its own. Everything it needs is derived from
//! the token history by scanning backwards: the last meaningful token, the
//! number of unclosed groups, and the field and operator of the clause being
//! built. A candidate is then either emitted (possibly retyped), skipped, or
//! rejected with a reason.
//!
//! # Positions
//!
//! ```text
//! clause start  ::= <empty> | "(" | And | Or      -> Field, "("
//! after Field                                     -> operator listed for the field
//! after comparer | separator after In/NotIn       -> value valid for the field
//! after value | Blank | NotBlank | ")"            -> And, Or, ")", separator
//! ```

use thiserror::Error;
use tracing::{debug, trace};

use crate::schema::{FieldType, Metadata};
use crate::token::{Token, TokenType};

/// Why a candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The candidate cannot appear after the preceding token.
    #[error("'{text}' is not expected here")]
    UnexpectedPosition { text: String },

    /// A clause starts with a name that is not a field.
    #[error("unknown field '{name}'{}", did_you_mean(.suggestion))]
    UnknownField {
        name: String,
        suggestion: Option<String>,
    },

    /// The operator is not listed for the clause's field.
    #[error("operator '{operator}' is not allowed for field '{field}'")]
    OperatorNotAllowed { operator: String, field: String },

    /// The value cannot be cast to the field's type or lookups.
    #[error("'{value}' is not a valid {field_type} value for field '{field}'")]
    InvalidValue {
        value: String,
        field: String,
        field_type: FieldType,
    },

    /// A closing bracket has no matching opening bracket.
    #[error("')' has no matching '('")]
    UnbalancedGroup,
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|name| format!(" (did you mean '{name}'?)"))
        .unwrap_or_default()
}

/// The outcome of resolving a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The candidate is legal; append this token.
    Emit(Token),
    /// Nothing to append (whitespace after whitespace).
    Skip,
    /// The candidate is illegal here.
    Reject(Rejection),
}

/// What the history says about the current position.
struct Position<'h> {
    /// Last token that is not whitespace.
    last: Option<&'h Token>,
    /// Last token of any kind.
    last_raw: Option<&'h Token>,
    unmatched_open_groups: usize,
    current_field: Option<&'h Token>,
    current_operator: Option<TokenType>,
}

impl<'h> Position<'h> {
    fn of(history: &'h [Token]) -> Self {
        let meaningful = || {
            history
                .iter()
                .enumerate()
                .rev()
                .filter(|(_, token)| token.token_type != TokenType::Space)
        };

        let last = meaningful().next().map(|(_, token)| token);
        let field_index = meaningful()
            .find(|(_, token)| token.token_type == TokenType::Field)
            .map(|(index, _)| index);
        let current_field = field_index.map(|index| &history[index]);
        let current_operator = field_index.and_then(|index| {
            history[index + 1..]
                .iter()
                .find(|token| token.token_type != TokenType::Space)
                .map(|token| token.token_type)
                .filter(|token_type| token_type.is_operator())
        });

        let opens = history
            .iter()
            .filter(|token| token.token_type == TokenType::OpenGroup)
            .count();
        let closes = history
            .iter()
            .filter(|token| token.token_type == TokenType::CloseGroup)
            .count();

        Self {
            last,
            last_raw: history.last(),
            unmatched_open_groups: opens.saturating_sub(closes),
            current_field,
            current_operator,
        }
    }

    fn last_type(&self) -> Option<TokenType> {
        self.last.map(|token| token.token_type)
    }

    fn is_clause_start(&self) -> bool {
        matches!(
            self.last_type(),
            None | Some(TokenType::OpenGroup | TokenType::And | TokenType::Or)
        )
    }

    fn is_value_position(&self) -> bool {
        match self.last_type() {
            Some(token_type) if token_type.is_comparer() => true,
            Some(TokenType::Comma | TokenType::Slash) => self.in_multi_value_clause(),
            _ => false,
        }
    }

    fn in_multi_value_clause(&self) -> bool {
        self.current_operator.is_some_and(TokenType::is_multi_value)
    }

    fn ends_clause(&self) -> bool {
        self.last_type().is_some_and(TokenType::ends_clause)
    }
}

/// Validates candidates against field metadata.
#[derive(Debug, Clone, Copy)]
pub struct Grammar<'m> {
    metadata: &'m Metadata,
}

impl<'m> Grammar<'m> {
    pub fn new(metadata: &'m Metadata) -> Self {
        Self { metadata }
    }

    pub fn metadata(&self) -> &'m Metadata {
        self.metadata
    }

    /// Resolves a candidate to a token: `None`-typed if rejected, no token at
    /// all if skipped.
    pub fn create_token(
        &self,
        history: &[Token],
        candidate_type: TokenType,
        candidate_text: &str,
    ) -> Option<Token> {
        match self.resolve(history, candidate_type, candidate_text) {
            Resolution::Emit(token) => Some(token),
            Resolution::Skip => None,
            Resolution::Reject(_) => Some(Token::none(candidate_text)),
        }
    }

    /// Resolves a candidate and explains rejections.
    pub fn resolve(
        &self,
        history: &[Token],
        candidate_type: TokenType,
        candidate_text: &str,
    ) -> Resolution {
        let position = Position::of(history);
        let resolution = self.resolve_at(&position, candidate_type, candidate_text);
        match &resolution {
            Resolution::Emit(token) => trace!(%token, "emit"),
            Resolution::Reject(reason) => {
                debug!(candidate = %candidate_type, text = candidate_text, %reason, "reject")
            }
            Resolution::Skip => {}
        }
        resolution
    }

    fn resolve_at(
        &self,
        position: &Position<'_>,
        candidate_type: TokenType,
        text: &str,
    ) -> Resolution {
        let unexpected = || {
            Resolution::Reject(Rejection::UnexpectedPosition {
                text: text.to_string(),
            })
        };
        let emit = |token_type: TokenType| Resolution::Emit(Token::new(token_type, text));

        match candidate_type {
            TokenType::Space => match position.last_raw {
                Some(token) if token.token_type == TokenType::Space => Resolution::Skip,
                _ => emit(TokenType::Space),
            },

            TokenType::Field | TokenType::Literal => {
                if position.is_clause_start() {
                    self.resolve_field(text)
                } else if position.is_value_position() {
                    self.resolve_value(position, TokenType::Value, text)
                } else {
                    unexpected()
                }
            }

            value_type if value_type.is_value() => {
                if position.is_value_position() {
                    self.resolve_value(position, value_type, text)
                } else {
                    unexpected()
                }
            }

            operator if operator.is_operator() => match position.last {
                Some(field) if field.token_type == TokenType::Field => {
                    if self.metadata.validate_operator(&field.value, text) {
                        emit(operator)
                    } else {
                        Resolution::Reject(Rejection::OperatorNotAllowed {
                            operator: text.to_string(),
                            field: field.value.clone(),
                        })
                    }
                }
                _ => unexpected(),
            },

            TokenType::And | TokenType::Or => {
                if position.ends_clause() {
                    emit(candidate_type)
                } else {
                    unexpected()
                }
            }

            TokenType::OpenGroup => {
                if position.is_clause_start() {
                    emit(TokenType::OpenGroup)
                } else {
                    unexpected()
                }
            }

            TokenType::CloseGroup => {
                if !position.ends_clause() {
                    unexpected()
                } else if position.unmatched_open_groups == 0 {
                    Resolution::Reject(Rejection::UnbalancedGroup)
                } else {
                    emit(TokenType::CloseGroup)
                }
            }

            TokenType::Comma | TokenType::Slash => {
                let after_value = position.last_type().is_some_and(TokenType::is_value);
                if after_value && position.in_multi_value_clause() {
                    emit(candidate_type)
                } else {
                    unexpected()
                }
            }

            _ => unexpected(),
        }
    }

    fn resolve_field(&self, text: &str) -> Resolution {
        if self.metadata.validate_field(text) {
            Resolution::Emit(Token::new(TokenType::Field, text))
        } else {
            Resolution::Reject(Rejection::UnknownField {
                name: text.to_string(),
                suggestion: self.metadata.suggest_field(text).map(str::to_string),
            })
        }
    }

    fn resolve_value(
        &self,
        position: &Position<'_>,
        token_type: TokenType,
        text: &str,
    ) -> Resolution {
        let Some(field) = position
            .current_field
            .and_then(|token| self.metadata.field(&token.value))
        else {
            return Resolution::Reject(Rejection::UnexpectedPosition {
                text: text.to_string(),
            });
        };

        if crate::value::validate_value(field, text) {
            Resolution::Emit(Token::new(token_type, text))
        } else {
            Resolution::Reject(Rejection::InvalidValue {
                value: text.to_string(),
                field: field.name.clone(),
                field_type: field.field_type,
            })
        }
    }
}

#[cfg(test)]
mod tests;
