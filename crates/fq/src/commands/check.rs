//! Check command implementation.
//!
//! Parses a query and prints its normalized form, or points at the first problem.

use filterq::{Filter, FilterError, FilterParser, Metadata};

use super::{CommandContext, Result};
use crate::cli::QueryFormat;
use crate::output::helpers::format_caret;
use crate::output::{format_check_json, format_check_text};

/// Options for the check command.
pub struct CheckOptions<'a> {
    pub query: &'a str,
    pub format: QueryFormat,
}

/// Parses `query` as text or JSON.
pub fn parse_query(metadata: &Metadata, query: &str, format: QueryFormat) -> Result<Filter> {
    let filter = match format.resolve(query) {
        QueryFormat::Json => FilterParser::parse_json(metadata, query)?,
        _ => FilterParser::parse(metadata, query)?,
    };
    Ok(filter)
}

/// Executes the check command.
pub fn execute(ctx: &CommandContext, metadata: &Metadata, opts: &CheckOptions) -> Result<()> {
    let filter = parse_query(metadata, opts.query, opts.format).inspect_err(|e| {
        if !ctx.json_output && opts.format.resolve(opts.query) == QueryFormat::Text {
            if let Some(position) = filter_position(e) {
                eprint!("{}", format_caret(opts.query, position, ctx.use_colors));
            }
        }
    })?;

    if ctx.json_output {
        println!("{}", format_check_json(&filter)?);
    } else if !ctx.quiet {
        print!("{}", format_check_text(&filter, ctx.use_colors));
    }

    Ok(())
}

fn filter_position(error: &super::CommandError) -> Option<usize> {
    match error {
        super::CommandError::Filter(e) => FilterError::position(e),
        _ => None,
    }
}
