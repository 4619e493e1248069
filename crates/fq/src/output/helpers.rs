//! Common helper functions for output formatting.

use filterq::TokenType;
use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Renders a token type, colored by its role.
pub fn format_token_type(token_type: TokenType, use_colors: bool) -> String {
    let label = format!("{:<20}", token_type.to_string());
    if !use_colors {
        return label;
    }
    match token_type {
        TokenType::None => label.red().bold().to_string(),
        TokenType::Field => label.cyan().to_string(),
        TokenType::And | TokenType::Or => label.magenta().to_string(),
        t if t.is_operator() => label.yellow().to_string(),
        t if t.is_value() => label.green().to_string(),
        _ => label.dimmed().to_string(),
    }
}

/// Renders `query` with a caret under the byte offset `position`.
pub fn format_caret(query: &str, position: usize, use_colors: bool) -> String {
    let column = query
        .get(..position)
        .map_or(query.chars().count(), |prefix| prefix.chars().count());
    let caret = format!("{}^", " ".repeat(column));
    let caret = if use_colors {
        caret.red().bold().to_string()
    } else {
        caret
    };
    format!("  {query}\n  {caret}\n")
}
