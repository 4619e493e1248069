//! Token output formatting.

use filterq::{RejectedToken, TextTokens, Token, TokenNode, TokenType};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{format_caret, format_token_type};

/// JSON output structure for a tokenized text query.
#[derive(Serialize)]
pub struct TextTokensOutput<'a> {
    pub format: &'static str,
    pub valid: bool,
    pub tokens: Vec<PositionedToken<'a>>,
    pub rejections: Vec<RejectionOutput<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<RemainingOutput<'a>>,
}

/// A token and the byte offset it starts at.
#[derive(Serialize)]
pub struct PositionedToken<'a> {
    pub position: usize,
    #[serde(flatten)]
    pub token: &'a Token,
}

/// JSON output structure for a rejected token.
#[derive(Serialize)]
pub struct RejectionOutput<'a> {
    pub position: usize,
    pub text: &'a str,
    pub reason: String,
}

/// JSON output structure for input the lexer could not read.
#[derive(Serialize)]
pub struct RemainingOutput<'a> {
    pub position: usize,
    pub text: &'a str,
}

/// JSON output structure for a tokenized JSON query.
#[derive(Serialize)]
pub struct JsonTokensOutput<'a> {
    pub format: &'static str,
    pub valid: bool,
    pub tokens: &'a TokenNode,
    pub rejections: Vec<RejectionOutput<'a>>,
}

fn rejections_output(rejections: &[RejectedToken]) -> Vec<RejectionOutput<'_>> {
    rejections
        .iter()
        .map(|r| RejectionOutput {
            position: r.position,
            text: &r.text,
            reason: r.reason.to_string(),
        })
        .collect()
}

/// Formats text query tokens as JSON.
pub fn format_text_tokens_json(
    query: &str,
    result: &TextTokens,
) -> Result<String, serde_json::Error> {
    let tokens = result
        .tokens
        .iter()
        .zip(&result.positions)
        .map(|(token, &position)| PositionedToken { position, token })
        .collect();

    let remaining = (!result.remaining.is_empty()).then(|| RemainingOutput {
        position: result.remaining_position(query),
        text: result.remaining,
    });

    let output = TextTokensOutput {
        format: "text",
        valid: result.is_valid(),
        tokens,
        rejections: rejections_output(&result.rejections),
        remaining,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats text query tokens as a table.
///
/// Space tokens are only listed when `show_spaces` is set.
pub fn format_text_tokens_table(
    query: &str,
    result: &TextTokens,
    use_colors: bool,
    show_spaces: bool,
) -> String {
    if result.tokens.is_empty() && result.remaining.is_empty() {
        return "No tokens.\n".to_string();
    }

    let mut output = String::new();

    let header = format!("{:<5} {:<20} {}", "Pos", "Type", "Value");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for (token, position) in result.tokens.iter().zip(&result.positions) {
        if token.token_type == TokenType::Space && !show_spaces {
            continue;
        }
        output.push_str(&format!(
            "{:<5} {} {}\n",
            position,
            format_token_type(token.token_type, use_colors),
            token.value
        ));
    }

    output.push_str(&format_rejections(&result.rejections, use_colors));

    if !result.remaining.is_empty() {
        let position = result.remaining_position(query);
        let label = format!("Unmatched input at {position}: '{}'", result.remaining);
        if use_colors {
            output.push_str(&format!("\n{}\n", label.red()));
        } else {
            output.push_str(&format!("\n{label}\n"));
        }
        output.push_str(&format_caret(query, position, use_colors));
    }

    output
}

/// Formats JSON query tokens as JSON.
pub fn format_json_tokens_json(
    node: &TokenNode,
    rejections: &[RejectedToken],
) -> Result<String, serde_json::Error> {
    let output = JsonTokensOutput {
        format: "json",
        valid: rejections.is_empty(),
        tokens: node,
        rejections: rejections_output(rejections),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats JSON query tokens as an indented tree.
pub fn format_json_tokens_tree(
    node: &TokenNode,
    rejections: &[RejectedToken],
    use_colors: bool,
) -> String {
    let mut output = String::new();
    write_node(&mut output, node, 0, use_colors);
    output.push_str(&format_rejections(rejections, use_colors));
    output
}

fn write_node(output: &mut String, node: &TokenNode, depth: usize, use_colors: bool) {
    let indent = "  ".repeat(depth);
    match node {
        TokenNode::Clause(tokens) => {
            let line: Vec<String> = tokens.iter().map(|t| format_token(t, use_colors)).collect();
            output.push_str(&format!("{indent}{}\n", line.join(" ")));
        }
        TokenNode::Group { logic, children } => {
            output.push_str(&format!("{indent}{}\n", format_token(logic, use_colors)));
            for child in children {
                write_node(output, child, depth + 1, use_colors);
            }
        }
    }
}

fn format_token(token: &Token, use_colors: bool) -> String {
    let rendered = token.to_string();
    if use_colors && token.is_rejected() {
        rendered.red().bold().to_string()
    } else {
        rendered
    }
}

/// Lists rejected tokens and why they were rejected.
pub fn format_rejections(rejections: &[RejectedToken], use_colors: bool) -> String {
    if rejections.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    let header = "Rejected:";
    if use_colors {
        output.push_str(&format!("\n{}\n", header.red().bold()));
    } else {
        output.push_str(&format!("\n{header}\n"));
    }
    for rejection in rejections {
        output.push_str(&format!(
            "  {:<5} '{}': {}\n",
            rejection.position, rejection.text, rejection.reason
        ));
    }
    output
}
