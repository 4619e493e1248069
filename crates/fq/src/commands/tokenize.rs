//! Tokenize command implementation.
//!
//! Shows the tokens a text or JSON query produces, rejected ones included.

use filterq::{JsonTokenizer, Metadata, TextTokenizer, TokenizeError};

use super::{CommandContext, CommandError, Result};
use crate::cli::QueryFormat;
use crate::output::{
    format_json_tokens_json, format_json_tokens_tree, format_text_tokens_json,
    format_text_tokens_table,
};

/// Options for the tokenize command.
pub struct TokenizeOptions<'a> {
    pub query: &'a str,
    pub format: QueryFormat,
}

/// Executes the tokenize command.
///
/// # Errors
///
/// Returns `CommandError::Rejected` when any token was rejected or input was
/// left unread, after printing the tokens.
pub fn execute(ctx: &CommandContext, metadata: &Metadata, opts: &TokenizeOptions) -> Result<()> {
    match opts.format.resolve(opts.query) {
        QueryFormat::Json => execute_json(ctx, metadata, opts.query),
        _ => execute_text(ctx, metadata, opts.query),
    }
}

fn execute_text(ctx: &CommandContext, metadata: &Metadata, query: &str) -> Result<()> {
    let result = TextTokenizer::new(metadata).tokenize(query);

    if ctx.json_output {
        println!("{}", format_text_tokens_json(query, &result)?);
    } else if !ctx.quiet {
        print!(
            "{}",
            format_text_tokens_table(query, &result, ctx.use_colors, ctx.verbose)
        );
    }

    let count = result.rejections.len() + usize::from(!result.remaining.is_empty());
    if count > 0 {
        return Err(CommandError::Rejected { count });
    }
    Ok(())
}

fn execute_json(ctx: &CommandContext, metadata: &Metadata, query: &str) -> Result<()> {
    let json: serde_json::Value = serde_json::from_str(query).map_err(TokenizeError::from)?;
    let (node, rejections) = JsonTokenizer::new(metadata).tokenize_with_rejections(&json)?;

    if ctx.json_output {
        println!("{}", format_json_tokens_json(&node, &rejections)?);
    } else if !ctx.quiet {
        print!(
            "{}",
            format_json_tokens_tree(&node, &rejections, ctx.use_colors)
        );
    }

    if !rejections.is_empty() {
        return Err(CommandError::Rejected {
            count: rejections.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filterq::{Field, FieldType, OperatorKind};

    fn metadata() -> Metadata {
        Metadata::new(vec![Field::new("Age", FieldType::Number)
            .with_operators([OperatorKind::Equal, OperatorKind::GreaterThan])])
        .unwrap()
    }

    fn quiet() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
        }
    }

    fn run(query: &str, format: QueryFormat) -> Result<()> {
        execute(&quiet(), &metadata(), &TokenizeOptions { query, format })
    }

    #[test]
    fn test_valid_text_query() {
        assert!(run("Age > 18", QueryFormat::Auto).is_ok());
    }

    #[test]
    fn test_rejections_are_counted() {
        let err = run("Age = old", QueryFormat::Text).unwrap_err();
        assert!(matches!(err, CommandError::Rejected { count: 1 }));
    }

    #[test]
    fn test_unmatched_input_counts_as_rejection() {
        let err = run("Age = 1 !", QueryFormat::Text).unwrap_err();
        assert!(matches!(err, CommandError::Rejected { count: 1 }));
    }

    #[test]
    fn test_json_query_detected() {
        assert!(run(r#"["Age", ">", 18]"#, QueryFormat::Auto).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = run("[\"Age\", ", QueryFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Tokenize(TokenizeError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_json_arity_error() {
        let err = run(r#"["Age"]"#, QueryFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Tokenize(TokenizeError::InvalidArity { len: 1 })
        ));
    }
}
