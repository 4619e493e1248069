//! Query check and record filtering output formatting.

use filterq::Filter;
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output structure for the check command.
#[derive(Serialize)]
pub struct CheckOutput<'a> {
    pub valid: bool,
    /// The query in normalized text form.
    pub expression: String,
    pub filter: &'a Filter,
}

/// JSON output structure for the filter command with `--count`.
#[derive(Serialize)]
pub struct CountOutput {
    pub matched: usize,
    pub total: usize,
}

/// Formats a valid query as JSON.
pub fn format_check_json(filter: &Filter) -> Result<String, serde_json::Error> {
    let output = CheckOutput {
        valid: true,
        expression: filter.to_string(),
        filter,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a valid query as its normalized text form.
pub fn format_check_text(filter: &Filter, use_colors: bool) -> String {
    let mark = if use_colors {
        "✓".green().to_string()
    } else {
        "✓".to_string()
    };
    format!("{mark} {filter}\n")
}

/// Formats matched records as a pretty JSON array.
pub fn format_records_json(records: &[&serde_json::Value]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Formats matched records one compact JSON object per line.
pub fn format_records_lines(records: &[&serde_json::Value]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }
    Ok(output)
}

/// Formats the number of matches as JSON.
pub fn format_count_json(matched: usize, total: usize) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CountOutput { matched, total })
}

/// Formats the "n of m records matched" summary.
pub fn format_summary(matched: usize, total: usize, use_colors: bool) -> String {
    let noun = if total == 1 { "record" } else { "records" };
    let line = format!("{matched} of {total} {noun} matched");
    if use_colors {
        format!("{}\n", line.dimmed())
    } else {
        format!("{line}\n")
    }
}
