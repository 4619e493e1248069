//! Filter command implementation.
//!
//! Evaluates a query against a JSON array of records and prints the matches.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use filterq::memory::{compile, FieldRecord};
use filterq::Metadata;
use tracing::debug;

use super::check::parse_query;
use super::{CommandContext, CommandError, Result};
use crate::cli::QueryFormat;
use crate::output::{format_count_json, format_records_json, format_records_lines, format_summary};

/// Options for the filter command.
pub struct FilterOptions<'a> {
    pub query: &'a str,
    pub format: QueryFormat,
    /// Records file; stdin when absent.
    pub records: Option<&'a Path>,
    pub count: bool,
}

/// Reads the records document from `path` or stdin.
fn read_records(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            CommandError::Records(format!("failed to read {}: {}", path.display(), e))
        }),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

/// Parses a records document: a JSON array whose elements are all objects.
pub fn parse_records(input: &str) -> Result<Vec<serde_json::Value>> {
    let document: serde_json::Value = serde_json::from_str(input)
        .map_err(|e| CommandError::Records(format!("records are not valid JSON: {e}")))?;

    let serde_json::Value::Array(records) = document else {
        return Err(CommandError::Records(
            "expected a JSON array of objects".to_string(),
        ));
    };

    if let Some(index) = records.iter().position(|r| !r.is_object()) {
        return Err(CommandError::Records(format!(
            "record {index} is not an object"
        )));
    }

    Ok(records)
}

/// Returns the records `query` matches, in input order.
pub fn matching_records<'r>(
    metadata: &Metadata,
    query: &str,
    format: QueryFormat,
    records: &'r [serde_json::Value],
) -> Result<Vec<&'r serde_json::Value>> {
    let filter = parse_query(metadata, query, format)?;
    debug!(filter = %filter, "compiled query");
    let expression = compile(&filter);

    Ok(records
        .iter()
        .filter(|json| expression.evaluate(&FieldRecord::from_json(metadata, json)))
        .collect())
}

/// Executes the filter command.
pub fn execute(ctx: &CommandContext, metadata: &Metadata, opts: &FilterOptions) -> Result<()> {
    let records = parse_records(&read_records(opts.records)?)?;
    let matched = matching_records(metadata, opts.query, opts.format, &records)?;
    debug!(matched = matched.len(), total = records.len(), "filtered records");

    if opts.count {
        if ctx.json_output {
            println!("{}", format_count_json(matched.len(), records.len())?);
        } else {
            println!("{}", matched.len());
        }
        return Ok(());
    }

    if ctx.json_output {
        println!("{}", format_records_json(&matched)?);
    } else {
        print!("{}", format_records_lines(&matched)?);
        if !ctx.quiet {
            eprint!(
                "{}",
                format_summary(matched.len(), records.len(), ctx.use_colors)
            );
        }
    }

    Ok(())
}
