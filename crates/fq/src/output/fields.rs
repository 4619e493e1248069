//! Field metadata output formatting.

use filterq::{Field, Metadata};
use owo_colors::OwoColorize;

use super::helpers::truncate_str;

/// Formats metadata as JSON, in the same shape it is loaded from.
pub fn format_fields_json(metadata: &Metadata) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(metadata)
}

/// Formats fields as a table.
pub fn format_fields_table(metadata: &Metadata, use_colors: bool) -> String {
    let fields = metadata.fields();
    if fields.is_empty() {
        return "No fields defined.\n".to_string();
    }

    let mut output = String::new();

    let header = format!(
        "{:<20} {:<14} {:<20} {}",
        "Name", "Type", "Label", "Operators"
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for field in fields {
        let name = format!("{:<20}", truncate_str(&field.name, 20));
        let field_type = format!("{:<14}", field.field_type.to_string());
        let label = truncate_str(&field.label, 20);

        if use_colors {
            output.push_str(&format!(
                "{} {} {:<20} {}\n",
                name.cyan(),
                field_type.green(),
                label,
                format_operators(field)
            ));
        } else {
            output.push_str(&format!(
                "{} {} {:<20} {}\n",
                name,
                field_type,
                label,
                format_operators(field)
            ));
        }

        if !field.lookups.is_empty() {
            let labels: Vec<&str> = field.lookups.iter().map(|l| l.label.as_str()).collect();
            let line = format!("{:<20} one of: {}", "", labels.join(", "));
            if use_colors {
                output.push_str(&format!("{}\n", line.dimmed()));
            } else {
                output.push_str(&line);
                output.push('\n');
            }
        }
    }

    output
}

fn format_operators(field: &Field) -> String {
    if field.operators.is_empty() {
        return "-".to_string();
    }
    field
        .operators
        .iter()
        .map(|op| op.name())
        .collect::<Vec<_>>()
        .join(", ")
}
