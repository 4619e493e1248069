//! Recursive descent parser from validated tokens to a [`Filter`].

use serde_json::Value as Json;

use super::ast::{Condition, Filter};
use super::error::{FilterError, FilterResult};
use crate::schema::{Field, Metadata};
use crate::token::{Token, TokenNode, TokenType};
use crate::tokenizer::{JsonTokenizer, TextTokenizer};
use crate::value::{cast_value, Value};

/// Parser for text and JSON filter queries.
///
/// Tokens come from the grammar-validating tokenizers, so by the time the
/// parser runs every token is legal in its position. The parser only has to
/// build the tree and cast values.
///
/// # Grammar
///
/// ```text
/// expression ::= or_expr
/// or_expr    ::= and_expr (Or and_expr)*
/// and_expr   ::= primary (And primary)*
/// primary    ::= "(" expression ")" | clause
/// clause     ::= Field operator [value (("," | "/") value)*]
/// ```
///
/// And binds tighter than Or, so `a Or b And c` is `a Or (b And c)`.
///
/// # Example
///
/// ```
/// use filterq::{Field, FieldType, Filter, FilterParser, Metadata, OperatorKind};
///
/// let metadata = Metadata::new(vec![
///     Field::new("Age", FieldType::Number).with_operators(OperatorKind::ALL),
/// ])
/// .unwrap();
///
/// let filter = FilterParser::parse(&metadata, "Age > 18 or Age < 5").unwrap();
/// assert!(matches!(filter, Filter::Or(_)));
/// ```
pub struct FilterParser<'m> {
    metadata: &'m Metadata,
    tokens: Vec<Token>,
    position: usize,
}

impl<'m> FilterParser<'m> {
    /// Parses a text query.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyExpression` for blank input,
    /// `FilterError::Rejected` for the first token the grammar rejected,
    /// `FilterError::UnmatchedInput` if the lexer stopped early, and a
    /// structural error if the tokens do not form a complete expression.
    pub fn parse(metadata: &'m Metadata, input: &str) -> FilterResult<Filter> {
        if input.trim().is_empty() {
            return Err(FilterError::EmptyExpression);
        }

        let result = TextTokenizer::new(metadata).tokenize(input);
        if let Some(rejected) = result.rejections.first() {
            return Err(rejected.clone().into());
        }
        if !result.remaining.is_empty() {
            return Err(FilterError::UnmatchedInput {
                position: input.len() - result.remaining.len(),
                text: result.remaining.to_string(),
            });
        }

        let tokens = result
            .tokens
            .into_iter()
            .filter(|token| token.token_type != TokenType::Space)
            .collect();
        Self::new(metadata, tokens).parse_all()
    }

    /// Parses a JSON query string.
    pub fn parse_json(metadata: &'m Metadata, input: &str) -> FilterResult<Filter> {
        let json: Json = serde_json::from_str(input).map_err(crate::TokenizeError::from)?;
        Self::parse_json_value(metadata, &json)
    }

    /// Parses an already decoded JSON query.
    pub fn parse_json_value(metadata: &'m Metadata, json: &Json) -> FilterResult<Filter> {
        let (node, rejections) = JsonTokenizer::new(metadata).tokenize_with_rejections(json)?;
        if let Some(rejected) = rejections.into_iter().next() {
            return Err(rejected.into());
        }
        Self::parse_node(metadata, &node)
    }

    /// Builds a filter from a JSON token tree.
    pub fn parse_node(metadata: &'m Metadata, node: &TokenNode) -> FilterResult<Filter> {
        match node {
            TokenNode::Clause(tokens) => Self::new(metadata, tokens.clone()).parse_all(),
            TokenNode::Group { logic, children } => {
                let children = children
                    .iter()
                    .map(|child| Self::parse_node(metadata, child))
                    .collect::<FilterResult<Vec<_>>>()?;
                match logic.token_type {
                    TokenType::And => Ok(Filter::And(children)),
                    TokenType::Or => Ok(Filter::Or(children)),
                    _ => Err(FilterError::unexpected_token(&logic.value)),
                }
            }
        }
    }

    fn new(metadata: &'m Metadata, tokens: Vec<Token>) -> Self {
        Self {
            metadata,
            tokens,
            position: 0,
        }
    }

    fn parse_all(mut self) -> FilterResult<Filter> {
        if self.tokens.is_empty() {
            return Err(FilterError::EmptyExpression);
        }
        if let Some(rejected) = self.tokens.iter().find(|token| token.is_rejected()) {
            return Err(FilterError::unexpected_token(&rejected.value));
        }

        let filter = self.parse_expression()?;

        if let Some(remaining) = self.peek() {
            return Err(FilterError::unexpected_token(&remaining.value));
        }

        Ok(filter)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_type(&self) -> Option<TokenType> {
        self.peek().map(|token| token.token_type)
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn parse_expression(&mut self) -> FilterResult<Filter> {
        self.parse_or_expr()
    }

    /// Parses OR expressions: `and_expr (Or and_expr)*`
    fn parse_or_expr(&mut self) -> FilterResult<Filter> {
        let mut left = self.parse_and_expr()?;

        while self.peek_type() == Some(TokenType::Or) {
            self.advance();
            let right = self.parse_and_expr()?;
            left = Filter::or(left, right);
        }

        Ok(left)
    }

    /// Parses AND expressions: `primary (And primary)*`
    fn parse_and_expr(&mut self) -> FilterResult<Filter> {
        let mut left = self.parse_primary()?;

        while self.peek_type() == Some(TokenType::And) {
            self.advance();
            let right = self.parse_primary()?;
            left = Filter::and(left, right);
        }

        Ok(left)
    }

    /// Parses primary expressions: `"(" expression ")" | clause`
    fn parse_primary(&mut self) -> FilterResult<Filter> {
        let token = self.advance().ok_or(FilterError::UnexpectedEndOfInput)?;

        match token.token_type {
            TokenType::OpenGroup => {
                let inner = self.parse_expression()?;
                if self.peek_type() != Some(TokenType::CloseGroup) {
                    return Err(FilterError::UnclosedParenthesis);
                }
                self.advance();
                Ok(inner)
            }
            TokenType::Field => self.parse_clause(&token.value),
            _ => Err(FilterError::unexpected_token(token.value)),
        }
    }

    /// Parses the rest of a clause after its field.
    fn parse_clause(&mut self, field_name: &str) -> FilterResult<Filter> {
        let metadata = self.metadata;
        let field = metadata
            .field(field_name)
            .ok_or_else(|| FilterError::unknown_field(field_name))?;

        let token = self.advance().ok_or(FilterError::UnexpectedEndOfInput)?;
        let operator = token
            .token_type
            .operator()
            .ok_or_else(|| FilterError::unexpected_token(&token.value))?;

        let value = if operator.takes_value() {
            let mut values = vec![self.parse_value(field)?];
            while matches!(self.peek_type(), Some(TokenType::Comma | TokenType::Slash)) {
                self.advance();
                values.push(self.parse_value(field)?);
            }
            if values.len() == 1 {
                values.swap_remove(0)
            } else {
                Value::List(values)
            }
        } else {
            Value::Null
        };

        Ok(Filter::Condition(Condition::new(
            field.name.clone(),
            field.field_type,
            operator,
            value,
        )))
    }

    fn parse_value(&mut self, field: &Field) -> FilterResult<Value> {
        let token = self.advance().ok_or(FilterError::UnexpectedEndOfInput)?;
        if !token.token_type.is_value() {
            return Err(FilterError::unexpected_token(token.value));
        }
        cast_value(field, &token.value)
            .ok_or_else(|| FilterError::invalid_value(&token.value, &field.name))
    }
}
