use clap::Parser;
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::{load_config, Config};
use commands::{load_metadata, CommandContext, CommandError};
use dispatch::{MetadataCommand, MetadataDispatch, NoMetadataCommand, NoMetadataDispatch};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(rendered) => eprintln!("{rendered}"),
                    Err(_) => eprintln!("Error: {e}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Sends diagnostics to stderr; `RUST_LOG` overrides the level `-v` picks.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    let config = load_config();

    // Config and completions must work even when the config file is broken
    if let Some(dispatch) = NoMetadataDispatch::try_from_cli(cli) {
        let config = config.unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable config");
            Config::default()
        });
        let ctx = CommandContext::from_cli(cli, &config);
        return dispatch.execute(&ctx);
    }

    let config = config?;
    let ctx = CommandContext::from_cli(cli, &config);
    let metadata = load_metadata(cli, &config)?;

    match MetadataDispatch::from_cli(cli) {
        Some(dispatch) => dispatch.execute(&ctx, &metadata),
        None => Ok(()),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Metadata(_) => "METADATA_ERROR",
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Tokenize(_) => "QUERY_ERROR",
        CommandError::Rejected { .. } => "REJECTED",
        CommandError::Records(_) => "RECORDS_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Config(_) | CommandError::Metadata(_) => ExitCode::from(5),
        CommandError::Filter(_)
        | CommandError::Tokenize(_)
        | CommandError::Rejected { .. }
        | CommandError::Records(_)
        | CommandError::Json(_) => ExitCode::from(1),
        CommandError::Io(_) => ExitCode::from(3),
    }
}
