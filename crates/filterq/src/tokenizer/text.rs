//! Tokenizer for infix text queries.

use tracing::debug;

use crate::grammar::{Grammar, Resolution};
use crate::lexer::find_match;
use crate::schema::Metadata;
use crate::token::Token;

use super::RejectedToken;

/// Result of tokenizing a text query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTokens<'a> {
    /// Every token produced, rejected ones included, in input order.
    pub tokens: Vec<Token>,
    /// Byte offset of each token in `tokens`.
    pub positions: Vec<usize>,
    /// Why each `None` token was rejected.
    pub rejections: Vec<RejectedToken>,
    /// Input the lexer could not match; empty when the whole input was read.
    pub remaining: &'a str,
}

impl TextTokens<'_> {
    /// Returns true if every candidate was accepted and all input consumed.
    pub fn is_valid(&self) -> bool {
        self.rejections.is_empty() && self.remaining.is_empty()
    }

    /// Byte offset of the unmatched tail.
    pub fn remaining_position(&self, input: &str) -> usize {
        input.len() - self.remaining.len()
    }
}

/// Tokenizes text queries such as `Age > 18 and (Status = 'Active' or Status = 'Pending')`.
#[derive(Debug, Clone, Copy)]
pub struct TextTokenizer<'m> {
    grammar: Grammar<'m>,
}

impl<'m> TextTokenizer<'m> {
    pub fn new(metadata: &'m Metadata) -> Self {
        Self {
            grammar: Grammar::new(metadata),
        }
    }

    /// Tokenizes `input`, stopping at the first text the lexer cannot match.
    ///
    /// Rejected candidates are kept as `None` tokens and tokenization carries
    /// on after them.
    pub fn tokenize<'a>(&self, input: &'a str) -> TextTokens<'a> {
        let metadata = self.grammar.metadata();
        let mut tokens = Vec::new();
        let mut positions = Vec::new();
        let mut rejections = Vec::new();
        let mut rest = input;

        while let Some(found) = find_match(rest, metadata) {
            let position = input.len() - rest.len();
            match self
                .grammar
                .resolve(&tokens, found.token_type, found.matched_text)
            {
                Resolution::Emit(token) => {
                    tokens.push(token);
                    positions.push(position);
                }
                Resolution::Skip => {}
                Resolution::Reject(reason) => {
                    tokens.push(Token::none(found.matched_text));
                    positions.push(position);
                    rejections.push(RejectedToken {
                        position,
                        text: found.matched_text.to_string(),
                        reason,
                    });
                }
            }
            rest = found.remaining_text;
        }

        if !rest.is_empty() {
            debug!(position = input.len() - rest.len(), rest, "unmatched input");
        }

        TextTokens {
            tokens,
            positions,
            rejections,
            remaining: rest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Rejection;
    use crate::schema::{Field, FieldType, OperatorKind};
    use crate::token::TokenType;

    fn metadata() -> Metadata {
        Metadata::new(vec![
            Field::new("Value", FieldType::String).with_operators(OperatorKind::ALL),
            Field::new("Age", FieldType::Number).with_operators(OperatorKind::ALL),
            Field::new("Status", FieldType::String).with_operators(OperatorKind::ALL),
        ])
        .unwrap()
    }

    fn types(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn test_value_equal_test() {
        let metadata = metadata();
        let result = TextTokenizer::new(&metadata).tokenize("Value Equal Test");
        assert!(result.is_valid());
        assert_eq!(
            result.tokens,
            vec![
                Token::new(TokenType::Field, "Value"),
                Token::new(TokenType::Space, " "),
                Token::new(TokenType::Equal, "Equal"),
                Token::new(TokenType::Space, " "),
                Token::new(TokenType::Value, "Test"),
            ]
        );
        assert_eq!(result.positions, vec![0, 5, 6, 11, 12]);
    }

    #[test]
    fn test_grouped_query() {
        let metadata = metadata();
        let result = TextTokenizer::new(&metadata).tokenize(
            "Age GreaterThan 18 And (Status Equal 'Active' Or Status Equal 'Pending')",
        );
        assert!(result.is_valid(), "{:?}", result.rejections);
        let meaningful: Vec<TokenType> = types(&result.tokens)
            .into_iter()
            .filter(|t| *t != TokenType::Space)
            .collect();
        assert_eq!(
            meaningful,
            vec![
                TokenType::Field,
                TokenType::GreaterThan,
                TokenType::NumberValue,
                TokenType::And,
                TokenType::OpenGroup,
                TokenType::Field,
                TokenType::Equal,
                TokenType::StringValue,
                TokenType::Or,
                TokenType::Field,
                TokenType::Equal,
                TokenType::StringValue,
                TokenType::CloseGroup,
            ]
        );
    }

    #[test]
    fn test_symbolic_aliases_without_spaces() {
        let metadata = metadata();
        let result = TextTokenizer::new(&metadata).tokenize("age>=18&&value!=x");
        assert!(result.is_valid());
        assert_eq!(
            types(&result.tokens),
            vec![
                TokenType::Field,
                TokenType::GreaterThanOrEqual,
                TokenType::NumberValue,
                TokenType::And,
                TokenType::Field,
                TokenType::NotEqual,
                TokenType::Value,
            ]
        );
    }

    #[test]
    fn test_multi_value_in() {
        let metadata = metadata();
        let result = TextTokenizer::new(&metadata).tokenize("Status In a, b/c");
        assert!(result.is_valid());
        assert_eq!(
            types(&result.tokens),
            vec![
                TokenType::Field,
                TokenType::Space,
                TokenType::In,
                TokenType::Space,
                TokenType::Value,
                TokenType::Comma,
                TokenType::Space,
                TokenType::Value,
                TokenType::Slash,
                TokenType::Value,
            ]
        );
    }

    #[test]
    fn test_rejection_is_recorded_with_position() {
        let metadata = metadata();
        let result = TextTokenizer::new(&metadata).tokenize("Age = old");
        assert!(!result.is_valid());
        assert_eq!(result.tokens.last(), Some(&Token::none("old")));
        assert_eq!(result.rejections.len(), 1);
        assert_eq!(result.rejections[0].position, 6);
        assert!(matches!(
            result.rejections[0].reason,
            Rejection::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_stops_at_unmatched_input() {
        let metadata = metadata();
        let input = "Age = 5 !";
        let result = TextTokenizer::new(&metadata).tokenize(input);
        assert_eq!(result.remaining, "!");
        assert_eq!(result.remaining_position(input), 8);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_tokenization_is_stable() {
        let metadata = metadata();
        let tokenizer = TextTokenizer::new(&metadata);
        let input = "  Age  in 1 ,2 or Value contains 'x'  ";
        assert_eq!(tokenizer.tokenize(input), tokenizer.tokenize(input));
        let rebuilt: String = tokenizer
            .tokenize(input)
            .tokens
            .iter()
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_empty_input() {
        let metadata = metadata();
        let result = TextTokenizer::new(&metadata).tokenize("");
        assert!(result.tokens.is_empty());
        assert!(result.is_valid());
    }
}
