//! Tests for the grammar validator.

use super::*;
use crate::schema::{Field, Lookup, OperatorKind};

// ==================== Test Helpers ====================

fn metadata() -> Metadata {
    Metadata::new(vec![
        Field::new("Value", FieldType::String).with_operators(OperatorKind::ALL),
        Field::new("Age", FieldType::Number).with_operators([
            OperatorKind::Equal,
            OperatorKind::GreaterThan,
            OperatorKind::In,
            OperatorKind::Blank,
        ]),
        Field::new("Status", FieldType::String)
            .with_operators([OperatorKind::Equal, OperatorKind::In])
            .with_lookups([Lookup::new("Active", "A"), Lookup::new("Pending", "P")]),
        Field::new("Due", FieldType::Date).with_operators([OperatorKind::LessThan]),
    ])
    .unwrap()
}

fn tok(token_type: TokenType, value: &str) -> Token {
    Token::new(token_type, value)
}

/// Feeds candidates through the grammar, appending every produced token.
fn run(metadata: &Metadata, candidates: &[(TokenType, &str)]) -> Vec<Token> {
    let grammar = Grammar::new(metadata);
    let mut history = Vec::new();
    for (token_type, text) in candidates {
        if let Some(token) = grammar.create_token(&history, *token_type, text) {
            history.push(token);
        }
    }
    history
}

fn resolve(history: &[Token], token_type: TokenType, text: &str) -> Resolution {
    let metadata = metadata();
    Grammar::new(&metadata).resolve(history, token_type, text)
}

// ==================== Field Position ====================

#[test]
fn test_field_at_clause_start() {
    let metadata = metadata();
    let grammar = Grammar::new(&metadata);
    assert_eq!(
        grammar.create_token(&[], TokenType::Literal, "age"),
        Some(tok(TokenType::Field, "age"))
    );
    assert_eq!(
        grammar.create_token(&[], TokenType::Literal, "Height"),
        Some(Token::none("Height"))
    );
}

#[test]
fn test_unknown_field_suggests_closest_name() {
    assert_eq!(
        resolve(&[], TokenType::Literal, "Statsu"),
        Resolution::Reject(Rejection::UnknownField {
            name: "Statsu".to_string(),
            suggestion: Some("Status".to_string()),
        })
    );
}

#[test]
fn test_field_after_open_group_and_logic() {
    let history = vec![tok(TokenType::OpenGroup, "(")];
    assert!(matches!(
        resolve(&history, TokenType::Field, "Age"),
        Resolution::Emit(Token {
            token_type: TokenType::Field,
            ..
        })
    ));

    let history = vec![
        tok(TokenType::Field, "Age"),
        tok(TokenType::Blank, "Blank"),
        tok(TokenType::Space, " "),
        tok(TokenType::Or, "Or"),
        tok(TokenType::Space, " "),
    ];
    assert!(matches!(
        resolve(&history, TokenType::Field, "Value"),
        Resolution::Emit(_)
    ));
}

#[test]
fn test_literal_after_value_is_unexpected() {
    let history = vec![
        tok(TokenType::Field, "Age"),
        tok(TokenType::Equal, "="),
        tok(TokenType::NumberValue, "5"),
    ];
    assert_eq!(
        resolve(&history, TokenType::Literal, "x"),
        Resolution::Reject(Rejection::UnexpectedPosition {
            text: "x".to_string()
        })
    );
}

// ==================== Operators ====================

#[test]
fn test_text_query_value_equal_test() {
    let metadata = metadata();
    let tokens = run(
        &metadata,
        &[
            (TokenType::Field, "Value"),
            (TokenType::Space, " "),
            (TokenType::Equal, "Equal"),
            (TokenType::Space, " "),
            (TokenType::Literal, "Test"),
        ],
    );
    assert_eq!(
        tokens,
        vec![
            tok(TokenType::Field, "Value"),
            tok(TokenType::Space, " "),
            tok(TokenType::Equal, "Equal"),
            tok(TokenType::Space, " "),
            tok(TokenType::Value, "Test"),
        ]
    );
}

#[test]
fn test_operator_must_be_listed_for_field() {
    let history = vec![tok(TokenType::Field, "Age"), tok(TokenType::Space, " ")];
    assert!(matches!(
        resolve(&history, TokenType::GreaterThan, ">"),
        Resolution::Emit(_)
    ));
    assert_eq!(
        resolve(&history, TokenType::Contain, "contains"),
        Resolution::Reject(Rejection::OperatorNotAllowed {
            operator: "contains".to_string(),
            field: "Age".to_string(),
        })
    );
}

#[test]
fn test_operator_requires_preceding_field() {
    assert!(matches!(
        resolve(&[], TokenType::Equal, "="),
        Resolution::Reject(Rejection::UnexpectedPosition { .. })
    ));
    let history = vec![tok(TokenType::Field, "Age"), tok(TokenType::Equal, "=")];
    assert!(matches!(
        resolve(&history, TokenType::Equal, "="),
        Resolution::Reject(Rejection::UnexpectedPosition { .. })
    ));
}

// ==================== Values ====================

#[test]
fn test_literal_value_collapses_to_generic_value() {
    let history = vec![tok(TokenType::Field, "Value"), tok(TokenType::Contain, "contains")];
    assert_eq!(
        resolve(&history, TokenType::Literal, "abc"),
        Resolution::Emit(tok(TokenType::Value, "abc"))
    );
    // A field name in value position is just text.
    assert_eq!(
        resolve(&history, TokenType::Field, "Age"),
        Resolution::Emit(tok(TokenType::Value, "Age"))
    );
}

#[test]
fn test_typed_value_keeps_subtype() {
    let history = vec![tok(TokenType::Field, "Age"), tok(TokenType::Equal, "=")];
    assert_eq!(
        resolve(&history, TokenType::NumberValue, "18"),
        Resolution::Emit(tok(TokenType::NumberValue, "18"))
    );

    // A string field accepts a number-shaped literal but keeps its shape.
    let history = vec![tok(TokenType::Field, "Value"), tok(TokenType::Equal, "=")];
    assert_eq!(
        resolve(&history, TokenType::NumberValue, "100"),
        Resolution::Emit(tok(TokenType::NumberValue, "100"))
    );
}

#[test]
fn test_typed_value_still_validated_against_field_type() {
    let history = vec![tok(TokenType::Field, "Age"), tok(TokenType::Equal, "=")];
    assert_eq!(
        resolve(&history, TokenType::StringValue, "'old'"),
        Resolution::Reject(Rejection::InvalidValue {
            value: "'old'".to_string(),
            field: "Age".to_string(),
            field_type: FieldType::Number,
        })
    );
    let history = vec![tok(TokenType::Field, "Due"), tok(TokenType::LessThan, "<")];
    assert!(matches!(
        resolve(&history, TokenType::DateValue, "2024-13-01"),
        Resolution::Reject(Rejection::InvalidValue { .. })
    ));
}

#[test]
fn test_lookups_narrow_accepted_values() {
    let history = vec![tok(TokenType::Field, "Status"), tok(TokenType::Equal, "=")];
    assert!(matches!(
        resolve(&history, TokenType::Literal, "active"),
        Resolution::Emit(_)
    ));
    assert!(matches!(
        resolve(&history, TokenType::StringValue, "'Pending'"),
        Resolution::Emit(_)
    ));
    assert!(matches!(
        resolve(&history, TokenType::Literal, "Closed"),
        Resolution::Reject(Rejection::InvalidValue { .. })
    ));
}

#[test]
fn test_value_at_clause_start_is_unexpected() {
    assert!(matches!(
        resolve(&[], TokenType::NumberValue, "5"),
        Resolution::Reject(Rejection::UnexpectedPosition { .. })
    ));
}

#[test]
fn test_no_value_after_blank() {
    let history = vec![tok(TokenType::Field, "Age"), tok(TokenType::Blank, "blank")];
    assert!(matches!(
        resolve(&history, TokenType::Literal, "5"),
        Resolution::Reject(_)
    ));
}

// ==================== Separators ====================

#[test]
fn test_separators_only_inside_multi_value_clause() {
    let metadata = metadata();
    let tokens = run(
        &metadata,
        &[
            (TokenType::Field, "Age"),
            (TokenType::In, "In"),
            (TokenType::NumberValue, "1"),
            (TokenType::Comma, ","),
            (TokenType::NumberValue, "2"),
            (TokenType::Slash, "/"),
            (TokenType::NumberValue, "3"),
        ],
    );
    assert!(tokens.iter().all(|t| !t.is_rejected()), "{tokens:?}");

    let history = vec![
        tok(TokenType::Field, "Age"),
        tok(TokenType::Equal, "="),
        tok(TokenType::NumberValue, "1"),
    ];
    assert!(matches!(
        resolve(&history, TokenType::Comma, ","),
        Resolution::Reject(_)
    ));

    let history = vec![tok(TokenType::Field, "Age"), tok(TokenType::In, "In")];
    assert!(matches!(
        resolve(&history, TokenType::Comma, ","),
        Resolution::Reject(_)
    ));
}

#[test]
fn test_value_after_separator_validated() {
    let history = vec![
        tok(TokenType::Field, "Age"),
        tok(TokenType::In, "In"),
        tok(TokenType::NumberValue, "1"),
        tok(TokenType::Comma, ","),
        tok(TokenType::Space, " "),
    ];
    assert_eq!(
        resolve(&history, TokenType::NumberValue, "2"),
        Resolution::Emit(tok(TokenType::NumberValue, "2"))
    );
    assert!(matches!(
        resolve(&history, TokenType::Literal, "two"),
        Resolution::Reject(Rejection::InvalidValue { .. })
    ));
}

// ==================== Logic and Groups ====================

#[test]
fn test_logic_after_clause_end() {
    let after_value = vec![
        tok(TokenType::Field, "Age"),
        tok(TokenType::Equal, "="),
        tok(TokenType::NumberValue, "1"),
    ];
    assert!(matches!(resolve(&after_value, TokenType::And, "and"), Resolution::Emit(_)));
    assert!(matches!(resolve(&after_value, TokenType::Or, "||"), Resolution::Emit(_)));

    let after_field = vec![tok(TokenType::Field, "Age")];
    assert!(matches!(resolve(&after_field, TokenType::And, "and"), Resolution::Reject(_)));
    assert!(matches!(resolve(&[], TokenType::Or, "or"), Resolution::Reject(_)));
}

#[test]
fn test_open_group_positions() {
    assert!(matches!(resolve(&[], TokenType::OpenGroup, "("), Resolution::Emit(_)));
    let nested = vec![tok(TokenType::OpenGroup, "(")];
    assert!(matches!(resolve(&nested, TokenType::OpenGroup, "("), Resolution::Emit(_)));
    let after_field = vec![tok(TokenType::Field, "Age")];
    assert!(matches!(
        resolve(&after_field, TokenType::OpenGroup, "("),
        Resolution::Reject(_)
    ));
}

#[test]
fn test_close_group_requires_open_group() {
    let unbalanced = vec![
        tok(TokenType::Field, "Age"),
        tok(TokenType::Blank, "Blank"),
    ];
    assert_eq!(
        resolve(&unbalanced, TokenType::CloseGroup, ")"),
        Resolution::Reject(Rejection::UnbalancedGroup)
    );

    let balanced = vec![
        tok(TokenType::OpenGroup, "("),
        tok(TokenType::Field, "Age"),
        tok(TokenType::Blank, "Blank"),
    ];
    assert!(matches!(
        resolve(&balanced, TokenType::CloseGroup, ")"),
        Resolution::Emit(_)
    ));

    let closed = vec![
        tok(TokenType::OpenGroup, "("),
        tok(TokenType::Field, "Age"),
        tok(TokenType::Blank, "Blank"),
        tok(TokenType::CloseGroup, ")"),
    ];
    assert_eq!(
        resolve(&closed, TokenType::CloseGroup, ")"),
        Resolution::Reject(Rejection::UnbalancedGroup)
    );
}

// ==================== Whitespace ====================

#[test]
fn test_space_suppressed_after_space() {
    let metadata = metadata();
    let grammar = Grammar::new(&metadata);
    let history = vec![tok(TokenType::Space, " ")];
    assert_eq!(grammar.create_token(&history, TokenType::Space, " "), None);
    assert_eq!(
        grammar.create_token(&[], TokenType::Space, " "),
        Some(tok(TokenType::Space, " "))
    );
}

#[test]
fn test_rejection_cascades() {
    let metadata = metadata();
    let tokens = run(
        &metadata,
        &[
            (TokenType::Literal, "Bogus"),
            (TokenType::Equal, "="),
            (TokenType::NumberValue, "1"),
        ],
    );
    assert!(tokens.iter().all(Token::is_rejected));
    assert_eq!(tokens[0].value, "Bogus");
}

// ==================== Properties ====================

const ALL_CANDIDATES: [TokenType; 33] = [
    TokenType::Field,
    TokenType::Literal,
    TokenType::Space,
    TokenType::None,
    TokenType::OpenGroup,
    TokenType::CloseGroup,
    TokenType::Comma,
    TokenType::Slash,
    TokenType::And,
    TokenType::Or,
    TokenType::Value,
    TokenType::StringValue,
    TokenType::NumberValue,
    TokenType::BooleanValue,
    TokenType::DateValue,
    TokenType::TimeValue,
    TokenType::DateTimeValue,
    TokenType::Equal,
    TokenType::NotEqual,
    TokenType::GreaterThan,
    TokenType::GreaterThanOrEqual,
    TokenType::LessThan,
    TokenType::LessThanOrEqual,
    TokenType::Blank,
    TokenType::NotBlank,
    TokenType::Contain,
    TokenType::NotContain,
    TokenType::StartWith,
    TokenType::NotStartWith,
    TokenType::EndWith,
    TokenType::NotEndWith,
    TokenType::In,
    TokenType::NotIn,
];

fn sample_text(token_type: TokenType) -> &'static str {
    match token_type {
        TokenType::OpenGroup => "(",
        TokenType::CloseGroup => ")",
        TokenType::Comma => ",",
        TokenType::Slash => "/",
        TokenType::Space => " ",
        TokenType::And => "and",
        TokenType::Or => "or",
        TokenType::Field | TokenType::Literal => "Value",
        TokenType::NumberValue => "1",
        t if t.is_operator() => t.operator().map_or("", OperatorKind::name),
        _ => "x",
    }
}

/// Builds every history reachable in up to `depth` accepted steps.
fn reachable_histories(metadata: &Metadata, depth: usize) -> Vec<Vec<Token>> {
    let grammar = Grammar::new(metadata);
    let mut frontier = vec![Vec::new()];
    let mut all = vec![Vec::new()];
    for _ in 0..depth {
        let mut next = Vec::new();
        for history in &frontier {
            for candidate in ALL_CANDIDATES {
                if let Resolution::Emit(token) =
                    grammar.resolve(history, candidate, sample_text(candidate))
                {
                    let mut extended = history.clone();
                    extended.push(token);
                    next.push(extended);
                }
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

#[test]
fn test_emitted_tokens_respect_positional_gate() {
    let metadata = metadata();
    for history in reachable_histories(&metadata, 5) {
        for (index, token) in history.iter().enumerate() {
            let before: Vec<&Token> = history[..index]
                .iter()
                .filter(|t| t.token_type != TokenType::Space)
                .collect();
            let last = before.last().map(|t| t.token_type);
            let clause_operator = before
                .iter()
                .rposition(|t| t.token_type == TokenType::Field)
                .and_then(|field| before.get(field + 1))
                .map(|t| t.token_type)
                .filter(|t| t.is_operator());
            let in_multi_value_clause = clause_operator.is_some_and(TokenType::is_multi_value);
            match token.token_type {
                TokenType::And | TokenType::Or => {
                    assert!(last.is_some_and(TokenType::ends_clause), "{history:?}")
                }
                TokenType::Field | TokenType::OpenGroup => assert!(
                    matches!(
                        last,
                        None | Some(TokenType::OpenGroup | TokenType::And | TokenType::Or)
                    ),
                    "{history:?}"
                ),
                t if t.is_operator() => {
                    assert_eq!(last, Some(TokenType::Field), "{history:?}")
                }
                TokenType::Comma | TokenType::Slash => {
                    assert!(last.is_some_and(TokenType::is_value), "{history:?}");
                    assert!(in_multi_value_clause, "{history:?}");
                }
                t if t.is_value() => {
                    let after_comparer = last.is_some_and(TokenType::is_comparer);
                    let after_separator = matches!(
                        last,
                        Some(TokenType::Comma | TokenType::Slash)
                    ) && in_multi_value_clause;
                    assert!(after_comparer || after_separator, "{history:?}");
                }
                TokenType::CloseGroup => {
                    assert!(last.is_some_and(TokenType::ends_clause), "{history:?}");
                    let opens = before
                        .iter()
                        .filter(|t| t.token_type == TokenType::OpenGroup)
                        .count();
                    let closes = before
                        .iter()
                        .filter(|t| t.token_type == TokenType::CloseGroup)
                        .count();
                    assert!(opens > closes, "{history:?}");
                }
                TokenType::Space => {}
                other => panic!("{other:?} should never be emitted: {history:?}"),
            }
        }
    }
}

#[test]
fn test_close_group_never_emitted_without_open_group() {
    let metadata = metadata();
    for history in reachable_histories(&metadata, 6) {
        let mut depth: i32 = 0;
        for token in &history {
            match token.token_type {
                TokenType::OpenGroup => depth += 1,
                TokenType::CloseGroup => {
                    depth -= 1;
                    assert!(depth >= 0, "unbalanced: {history:?}");
                }
                _ => {}
            }
        }
    }
}
