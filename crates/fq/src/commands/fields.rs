//! Fields command implementation.

use filterq::Metadata;

use super::{CommandContext, Result};
use crate::output::{format_fields_json, format_fields_table};

/// Lists the fields in the loaded metadata.
pub fn execute(ctx: &CommandContext, metadata: &Metadata) -> Result<()> {
    if ctx.json_output {
        println!("{}", format_fields_json(metadata)?);
    } else if !ctx.quiet {
        print!("{}", format_fields_table(metadata, ctx.use_colors));
    }
    Ok(())
}
