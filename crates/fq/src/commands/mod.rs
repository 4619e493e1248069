//! Command implementations for the fq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod check;
pub mod completions;
pub mod config;
pub mod fields;
pub mod filter;
pub mod tokenize;

use std::path::PathBuf;

use filterq::Metadata;
use tracing::debug;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Metadata could not be loaded.
    #[error("metadata error: {0}")]
    Metadata(#[from] filterq::MetadataError),

    /// The query did not parse.
    #[error("filter error: {0}")]
    Filter(#[from] filterq::FilterError),

    /// The JSON query is not shaped like a query.
    #[error("query error: {0}")]
    Tokenize(#[from] filterq::TokenizeError),

    /// Tokenization produced rejected tokens.
    #[error("query has {count} invalid token(s)")]
    Rejected { count: usize },

    /// Records input is not an array of objects.
    #[error("invalid records: {0}")]
    Records(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the config file.
    pub fn from_cli(cli: &Cli, config: &config::Config) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}

/// Resolves the metadata file with priority: flag > env > config.
///
/// `--metadata` and `FQ_METADATA` both arrive through `cli.metadata`.
pub fn resolve_metadata_path(cli: &Cli, config: &config::Config) -> Result<PathBuf> {
    cli.metadata
        .clone()
        .or_else(|| config.metadata.clone())
        .ok_or_else(|| {
            CommandError::Config(
                "no metadata file; pass --metadata, set FQ_METADATA, or run 'fq config set metadata <path>'"
                    .to_string(),
            )
        })
}

/// Loads the metadata the query commands validate against.
pub fn load_metadata(cli: &Cli, config: &config::Config) -> Result<Metadata> {
    let path = resolve_metadata_path(cli, config)?;
    debug!(path = %path.display(), "loading metadata");
    Ok(Metadata::load(&path)?)
}
