//! Lexical matcher for filter expressions.
//!
//! [`find_match`] looks at the start of the remaining input and reports the
//! next candidate token. It knows nothing about grammar; deciding whether the
//! candidate is legal at this position is [`crate::grammar`]'s job.
//!
//! Candidates are tried in tiers, longest match winning within a tier:
//!
//! 1. whitespace, punctuation, logic words and operator spellings
//! 2. field names from the metadata
//! 3. literals (quoted string, datetime, or a bare word up to a delimiter)

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::Metadata;
use crate::token::{TokenMatch, TokenType};
use crate::value::classify_literal;

/// Separator allowed between the words of a worded keyword.
const WORD_SEPARATOR: &str = r"[\s_-]*";

/// Symbolic spellings, matched verbatim.
const SYMBOLS: &[(TokenType, &str)] = &[
    (TokenType::OpenGroup, "("),
    (TokenType::CloseGroup, ")"),
    (TokenType::Comma, ","),
    (TokenType::Slash, "/"),
    (TokenType::And, "&&"),
    (TokenType::Or, "||"),
    (TokenType::Equal, "="),
    (TokenType::Equal, "=="),
    (TokenType::NotEqual, "!="),
    (TokenType::NotEqual, "<>"),
    (TokenType::GreaterThan, ">"),
    (TokenType::GreaterThanOrEqual, ">="),
    (TokenType::LessThan, "<"),
    (TokenType::LessThanOrEqual, "<="),
];

/// Worded spellings; words may be joined by spaces, `-`, `_` or nothing.
const WORDS: &[(TokenType, &[&str])] = &[
    (TokenType::And, &["and"]),
    (TokenType::Or, &["or"]),
    (TokenType::Equal, &["equal"]),
    (TokenType::Equal, &["equals"]),
    (TokenType::NotEqual, &["not", "equal"]),
    (TokenType::NotEqual, &["not", "equals"]),
    (TokenType::GreaterThan, &["greater", "than"]),
    (TokenType::GreaterThanOrEqual, &["greater", "than", "or", "equal"]),
    (TokenType::LessThan, &["less", "than"]),
    (TokenType::LessThanOrEqual, &["less", "than", "or", "equal"]),
    (TokenType::Blank, &["blank"]),
    (TokenType::Blank, &["is", "blank"]),
    (TokenType::NotBlank, &["not", "blank"]),
    (TokenType::NotBlank, &["is", "not", "blank"]),
    (TokenType::Contain, &["contain"]),
    (TokenType::Contain, &["contains"]),
    (TokenType::NotContain, &["not", "contain"]),
    (TokenType::NotContain, &["not", "contains"]),
    (TokenType::StartWith, &["start", "with"]),
    (TokenType::StartWith, &["starts", "with"]),
    (TokenType::NotStartWith, &["not", "start", "with"]),
    (TokenType::NotStartWith, &["not", "starts", "with"]),
    (TokenType::EndWith, &["end", "with"]),
    (TokenType::EndWith, &["ends", "with"]),
    (TokenType::NotEndWith, &["not", "end", "with"]),
    (TokenType::NotEndWith, &["not", "ends", "with"]),
    (TokenType::In, &["in"]),
    (TokenType::NotIn, &["not", "in"]),
];

static KEYWORDS: LazyLock<Vec<(TokenType, Regex)>> = LazyLock::new(|| {
    let symbols = SYMBOLS.iter().map(|(token_type, symbol)| {
        let pattern = format!("^{}", regex::escape(symbol));
        (*token_type, Regex::new(&pattern).unwrap())
    });
    let words = WORDS.iter().map(|(token_type, words)| {
        let pattern = format!(r"(?i)^{}\b", words.join(WORD_SEPARATOR));
        (*token_type, Regex::new(&pattern).unwrap())
    });
    symbols.chain(words).collect()
});

static QUOTED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(?:'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*")"#).unwrap());
static DATETIME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\b").unwrap());

/// Characters that end a bare word.
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | ',' | '/' | '=' | '<' | '>' | '!' | '&' | '|')
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Returns the next candidate token at the start of `text`, or `None` if
/// nothing matches (an empty input or a stray symbol).
///
/// `matched_text` keeps the input's original casing and `remaining_text` is
/// the untrimmed rest, so concatenating successive matches rebuilds the input.
pub fn find_match<'a>(text: &'a str, metadata: &Metadata) -> Option<TokenMatch<'a>> {
    let (token_type, len) = match_space(text)
        .or_else(|| match_keyword(text))
        .or_else(|| match_field(text, metadata))
        .or_else(|| match_literal(text))?;
    let (matched_text, remaining_text) = text.split_at(len);
    Some(TokenMatch {
        token_type,
        matched_text,
        remaining_text,
    })
}

/// Returns the token type if `text` is, in its entirety, an operator
/// spelling such as `>=` or `starts with`.
pub fn operator_spelling(text: &str) -> Option<TokenType> {
    let text = text.trim();
    match_keyword(text)
        .filter(|(token_type, len)| *len == text.len() && token_type.is_operator())
        .map(|(token_type, _)| token_type)
}

/// Returns the token type if `text` is, in its entirety, a logic keyword.
pub fn logic_spelling(text: &str) -> Option<TokenType> {
    let text = text.trim();
    match_keyword(text)
        .filter(|(token_type, len)| {
            *len == text.len() && matches!(token_type, TokenType::And | TokenType::Or)
        })
        .map(|(token_type, _)| token_type)
}

fn match_space(text: &str) -> Option<(TokenType, usize)> {
    let len: usize = text
        .chars()
        .take_while(|c| c.is_whitespace())
        .map(char::len_utf8)
        .sum();
    (len > 0).then_some((TokenType::Space, len))
}

fn match_keyword(text: &str) -> Option<(TokenType, usize)> {
    KEYWORDS
        .iter()
        .filter_map(|(token_type, regex)| regex.find(text).map(|m| (*token_type, m.end())))
        .max_by_key(|(_, len)| *len)
}

fn match_field(text: &str, metadata: &Metadata) -> Option<(TokenType, usize)> {
    metadata
        .fields()
        .iter()
        .filter_map(|field| {
            let len = field.name.len();
            let prefix = text.get(..len)?;
            if prefix.to_lowercase() != field.name.to_lowercase() {
                return None;
            }
            let at_boundary = text[len..]
                .chars()
                .next()
                .map_or(true, |c| !is_identifier_char(c));
            at_boundary.then_some((TokenType::Field, len))
        })
        .max_by_key(|(_, len)| *len)
}

fn match_literal(text: &str) -> Option<(TokenType, usize)> {
    let len = QUOTED_PREFIX
        .find(text)
        .or_else(|| DATETIME_PREFIX.find(text))
        .map(|m| m.end())
        .unwrap_or_else(|| {
            text.char_indices()
                .find(|(_, c)| is_delimiter(*c))
                .map_or(text.len(), |(index, _)| index)
        });
    (len > 0).then(|| (classify_literal(&text[..len]), len))
}
