//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the fq CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// fq - Validate filter queries and filter JSON records
#[derive(Parser, Debug)]
#[command(name = "fq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Field metadata file, JSON or TOML (default: from config)
    #[arg(short, long, global = true, env = "FQ_METADATA")]
    pub metadata: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the tokens a query produces
    #[command(alias = "t")]
    Tokenize {
        /// Query text, e.g. "Age > 18 and Status = 'Active'"
        query: String,

        /// Query syntax
        #[arg(short, long, value_enum, default_value_t = QueryFormat::Auto)]
        format: QueryFormat,
    },

    /// Check that a query is valid and show how it is grouped
    #[command(alias = "c")]
    Check {
        /// Query text or JSON
        query: String,

        /// Query syntax
        #[arg(short, long, value_enum, default_value_t = QueryFormat::Auto)]
        format: QueryFormat,
    },

    /// Print the records a query matches
    #[command(alias = "f")]
    Filter {
        /// Query text or JSON
        query: String,

        /// Query syntax
        #[arg(short, long, value_enum, default_value_t = QueryFormat::Auto)]
        format: QueryFormat,

        /// JSON file holding an array of records (default: stdin)
        #[arg(short, long)]
        records: Option<PathBuf>,

        /// Print only the number of matches
        #[arg(long)]
        count: bool,
    },

    /// List the fields a query can reference
    Fields,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Query syntax
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryFormat {
    /// JSON if the query starts with `[`, text otherwise
    Auto,
    Text,
    Json,
}

impl QueryFormat {
    /// Resolves `Auto` by looking at the query.
    pub fn resolve(self, query: &str) -> QueryFormat {
        match self {
            QueryFormat::Auto if query.trim_start().starts_with('[') => QueryFormat::Json,
            QueryFormat::Auto => QueryFormat::Text,
            explicit => explicit,
        }
    }
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (metadata, output.color)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Show config file path
    Path,
}
