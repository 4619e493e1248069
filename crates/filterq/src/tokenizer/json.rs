//! Tokenizer for JSON array queries.
//!
//! ```text
//! query  ::= [field, operator, value]      leaf clause
//!          | [logic, [query, ...]]         logic group
//! ```
//!
//! Every leaf is tokenized with a fresh history, so clauses never see each
//! other. Values keep their JSON type: numbers become `NumberValue`, booleans
//! `BooleanValue`, arrays a comma-separated value list, and `null` no token.

use serde_json::Value as Json;

use crate::grammar::{Grammar, Rejection, Resolution};
use crate::lexer::{logic_spelling, operator_spelling};
use crate::schema::Metadata;
use crate::token::{Token, TokenNode, TokenType};
use crate::value::classify_literal;

use super::{json_kind, RejectedToken, TokenizeError, TokenizeResult};

/// Tokenizes JSON queries such as `["And", [["Age", ">", 18], ["Status", "In", ["A", "P"]]]]`.
#[derive(Debug, Clone, Copy)]
pub struct JsonTokenizer<'m> {
    grammar: Grammar<'m>,
}

impl<'m> JsonTokenizer<'m> {
    pub fn new(metadata: &'m Metadata) -> Self {
        Self {
            grammar: Grammar::new(metadata),
        }
    }

    /// Parses and tokenizes a JSON query string.
    pub fn tokenize(&self, input: &str) -> TokenizeResult<TokenNode> {
        let json: Json = serde_json::from_str(input)?;
        self.tokenize_value(&json)
    }

    /// Tokenizes an already parsed JSON query.
    pub fn tokenize_value(&self, json: &Json) -> TokenizeResult<TokenNode> {
        self.tokenize_with_rejections(json).map(|(node, _)| node)
    }

    /// Tokenizes a JSON query and explains every rejected token.
    ///
    /// Rejection positions are token indices in depth-first order, matching
    /// [`TokenNode::flatten`].
    pub fn tokenize_with_rejections(
        &self,
        json: &Json,
    ) -> TokenizeResult<(TokenNode, Vec<RejectedToken>)> {
        let mut builder = Builder {
            grammar: self.grammar,
            emitted: 0,
            rejections: Vec::new(),
        };
        let node = builder.node(json)?;
        Ok((node, builder.rejections))
    }
}

struct Builder<'m> {
    grammar: Grammar<'m>,
    /// Tokens emitted so far across the whole tree.
    emitted: usize,
    rejections: Vec<RejectedToken>,
}

impl Builder<'_> {
    fn node(&mut self, json: &Json) -> TokenizeResult<TokenNode> {
        let Json::Array(elements) = json else {
            return Err(TokenizeError::NotAnArray {
                found: json_kind(json),
            });
        };
        match elements.as_slice() {
            [field, operator, value] => self.clause(field, operator, value),
            [logic, children] => self.group(logic, children),
            _ => Err(TokenizeError::InvalidArity {
                len: elements.len(),
            }),
        }
    }

    fn clause(&mut self, field: &Json, operator: &Json, value: &Json) -> TokenizeResult<TokenNode> {
        let field = field
            .as_str()
            .ok_or(TokenizeError::ExpectedString { element: "field" })?;
        let operator = operator
            .as_str()
            .ok_or(TokenizeError::ExpectedString { element: "operator" })?;

        let mut tokens = Vec::new();
        self.push(&mut tokens, TokenType::Field, field);
        match operator_spelling(operator) {
            Some(operator_type) => self.push(&mut tokens, operator_type, operator),
            None => self.unknown_operator(&mut tokens, operator),
        }

        match value {
            Json::Null => {}
            Json::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        self.push(&mut tokens, TokenType::Comma, ",");
                    }
                    let (token_type, text) = scalar_candidate(item)?;
                    self.push(&mut tokens, token_type, &text);
                }
            }
            scalar => {
                let (token_type, text) = scalar_candidate(scalar)?;
                self.push(&mut tokens, token_type, &text);
            }
        }

        Ok(TokenNode::Clause(tokens))
    }

    fn group(&mut self, logic: &Json, children: &Json) -> TokenizeResult<TokenNode> {
        let logic = logic
            .as_str()
            .ok_or(TokenizeError::ExpectedString { element: "logic" })?;
        let Json::Array(children) = children else {
            return Err(TokenizeError::ExpectedGroupList);
        };

        let logic = match logic_spelling(logic) {
            Some(token_type) => Token::new(token_type, logic),
            None => {
                self.reject(
                    logic,
                    Rejection::UnexpectedPosition {
                        text: logic.to_string(),
                    },
                );
                Token::none(logic)
            }
        };
        self.emitted += 1;

        let children = children
            .iter()
            .map(|child| self.node(child))
            .collect::<TokenizeResult<Vec<_>>>()?;

        Ok(TokenNode::Group { logic, children })
    }

    fn push(&mut self, history: &mut Vec<Token>, candidate_type: TokenType, text: &str) {
        match self.grammar.resolve(history, candidate_type, text) {
            Resolution::Emit(token) => history.push(token),
            Resolution::Skip => return,
            Resolution::Reject(reason) => {
                self.reject(text, reason);
                history.push(Token::none(text));
            }
        }
        self.emitted += 1;
    }

    /// An operator string with no known spelling. Right after a field it is
    /// reported against that field; anywhere else the grammar decides.
    fn unknown_operator(&mut self, history: &mut Vec<Token>, text: &str) {
        let Some(field) = history
            .last()
            .filter(|last| last.token_type == TokenType::Field)
            .map(|last| last.value.clone())
        else {
            self.push(history, TokenType::Literal, text);
            return;
        };
        self.reject(
            text,
            Rejection::OperatorNotAllowed {
                operator: text.to_string(),
                field,
            },
        );
        history.push(Token::none(text));
        self.emitted += 1;
    }

    fn reject(&mut self, text: &str, reason: Rejection) {
        self.rejections.push(RejectedToken {
            position: self.emitted,
            text: text.to_string(),
            reason,
        });
    }
}

/// Picks the candidate type for a scalar JSON value.
fn scalar_candidate(json: &Json) -> TokenizeResult<(TokenType, String)> {
    match json {
        Json::String(s) => {
            let shape = classify_literal(s);
            let token_type = match shape {
                TokenType::DateValue | TokenType::TimeValue | TokenType::DateTimeValue => shape,
                _ => TokenType::Literal,
            };
            Ok((token_type, s.clone()))
        }
        Json::Number(n) => Ok((TokenType::NumberValue, n.to_string())),
        Json::Bool(b) => Ok((TokenType::BooleanValue, b.to_string())),
        other => Err(TokenizeError::UnsupportedValue {
            value: other.to_string(),
        }),
    }
}
