//! Tokens produced by the tokenizers.

use std::fmt;

use serde::Serialize;

use crate::schema::OperatorKind;

/// The semantic type of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    // ==================== Names ====================
    /// A known field name.
    Field,

    /// A bare word that is either a field name or a value, depending on position.
    Literal,

    // ==================== Layout ====================
    /// A run of whitespace.
    Space,

    /// A rejected candidate; the token still carries the offending text.
    None,

    /// Opening bracket `(`.
    OpenGroup,

    /// Closing bracket `)`.
    CloseGroup,

    /// Value separator `,`.
    Comma,

    /// Value separator `/`.
    Slash,

    // ==================== Logic ====================
    And,
    Or,

    // ==================== Values ====================
    /// A value whose shape was not more specific than a bare word.
    Value,
    StringValue,
    NumberValue,
    BooleanValue,
    DateValue,
    TimeValue,
    DateTimeValue,

    // ==================== Operators ====================
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Blank,
    NotBlank,
    Contain,
    NotContain,
    StartWith,
    NotStartWith,
    EndWith,
    NotEndWith,
    In,
    NotIn,
}

impl TokenType {
    /// Returns true for `Value` and every typed value subtype.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            TokenType::Value
                | TokenType::StringValue
                | TokenType::NumberValue
                | TokenType::BooleanValue
                | TokenType::DateValue
                | TokenType::TimeValue
                | TokenType::DateTimeValue
        )
    }

    /// Returns the operator this token type stands for, if any.
    pub fn operator(self) -> Option<OperatorKind> {
        let op = match self {
            TokenType::Equal => OperatorKind::Equal,
            TokenType::NotEqual => OperatorKind::NotEqual,
            TokenType::GreaterThan => OperatorKind::GreaterThan,
            TokenType::GreaterThanOrEqual => OperatorKind::GreaterThanOrEqual,
            TokenType::LessThan => OperatorKind::LessThan,
            TokenType::LessThanOrEqual => OperatorKind::LessThanOrEqual,
            TokenType::Blank => OperatorKind::Blank,
            TokenType::NotBlank => OperatorKind::NotBlank,
            TokenType::Contain => OperatorKind::Contain,
            TokenType::NotContain => OperatorKind::NotContain,
            TokenType::StartWith => OperatorKind::StartWith,
            TokenType::NotStartWith => OperatorKind::NotStartWith,
            TokenType::EndWith => OperatorKind::EndWith,
            TokenType::NotEndWith => OperatorKind::NotEndWith,
            TokenType::In => OperatorKind::In,
            TokenType::NotIn => OperatorKind::NotIn,
            _ => return None,
        };
        Some(op)
    }

    /// Returns true for any of the sixteen operator tokens.
    pub fn is_operator(self) -> bool {
        self.operator().is_some()
    }

    /// Returns true for operators that must be followed by a value.
    pub fn is_comparer(self) -> bool {
        self.operator().is_some_and(OperatorKind::takes_value)
    }

    /// Returns true for `In`/`NotIn`.
    pub fn is_multi_value(self) -> bool {
        self.operator().is_some_and(OperatorKind::is_multi_value)
    }

    /// Returns true for tokens that may end a clause: values, `Blank`,
    /// `NotBlank` and `CloseGroup`.
    pub fn ends_clause(self) -> bool {
        self.is_value()
            || matches!(
                self,
                TokenType::Blank | TokenType::NotBlank | TokenType::CloseGroup
            )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A typed token. The value is the text it was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub value: String,
}

impl Token {
    pub fn new(token_type: TokenType, value: impl Into<String>) -> Self {
        Self {
            token_type,
            value: value.into(),
        }
    }

    /// Creates a rejection token carrying `value`.
    pub fn none(value: impl Into<String>) -> Self {
        Self::new(TokenType::None, value)
    }

    /// Returns true if this token marks a rejected candidate.
    pub fn is_rejected(&self) -> bool {
        self.token_type == TokenType::None
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.token_type, self.value)
    }
}

/// The next candidate found by [`crate::lexer::find_match`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch<'a> {
    pub token_type: TokenType,
    pub matched_text: &'a str,
    /// Everything after the match, untrimmed.
    pub remaining_text: &'a str,
}

/// Tokens of a JSON query: a leaf clause or a logic group of sub-queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TokenNode {
    Clause(Vec<Token>),
    Group {
        logic: Token,
        children: Vec<TokenNode>,
    },
}

impl TokenNode {
    /// Returns true if this node or any descendant holds a rejection token.
    pub fn has_rejections(&self) -> bool {
        match self {
            TokenNode::Clause(tokens) => tokens.iter().any(Token::is_rejected),
            TokenNode::Group { logic, children } => {
                logic.is_rejected() || children.iter().any(TokenNode::has_rejections)
            }
        }
    }

    /// Returns every token in depth-first order.
    pub fn flatten(&self) -> Vec<&Token> {
        let mut tokens = Vec::new();
        self.collect(&mut tokens);
        tokens
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Token>) {
        match self {
            TokenNode::Clause(tokens) => out.extend(tokens.iter()),
            TokenNode::Group { logic, children } => {
                out.push(logic);
                for child in children {
                    child.collect(out);
                }
            }
        }
    }
}
