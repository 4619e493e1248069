//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands are split by whether they need field metadata, so `config` and
//! `completions` keep working before any metadata file is set up.

use filterq::Metadata;

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that run without field metadata.
pub trait NoMetadataCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that validate against field metadata.
pub trait MetadataCommand {
    /// Execute the command against the loaded metadata.
    fn execute(&self, ctx: &CommandContext, metadata: &Metadata) -> Result<()>;
}

/// Commands that don't need metadata.
pub enum NoMetadataDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> NoMetadataDispatch<'a> {
    /// Try to create a no-metadata dispatch from the CLI command.
    /// Returns None if the command needs metadata.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl NoMetadataCommand for NoMetadataDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("fq - filter query validator");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that need metadata.
pub enum MetadataDispatch<'a> {
    Tokenize {
        query: &'a str,
        format: crate::cli::QueryFormat,
    },
    Check {
        query: &'a str,
        format: crate::cli::QueryFormat,
    },
    Filter {
        query: &'a str,
        format: crate::cli::QueryFormat,
        records: Option<&'a std::path::Path>,
        count: bool,
    },
    Fields,
}

impl<'a> MetadataDispatch<'a> {
    /// Create a metadata dispatch from the CLI command.
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Tokenize { query, format }) => Some(Self::Tokenize {
                query,
                format: *format,
            }),
            Some(Commands::Check { query, format }) => Some(Self::Check {
                query,
                format: *format,
            }),
            Some(Commands::Filter {
                query,
                format,
                records,
                count,
            }) => Some(Self::Filter {
                query,
                format: *format,
                records: records.as_deref(),
                count: *count,
            }),
            Some(Commands::Fields) => Some(Self::Fields),
            _ => None,
        }
    }
}

impl MetadataCommand for MetadataDispatch<'_> {
    fn execute(&self, ctx: &CommandContext, metadata: &Metadata) -> Result<()> {
        match self {
            Self::Tokenize { query, format } => {
                let opts = commands::tokenize::TokenizeOptions {
                    query,
                    format: *format,
                };
                commands::tokenize::execute(ctx, metadata, &opts)
            }
            Self::Check { query, format } => {
                let opts = commands::check::CheckOptions {
                    query,
                    format: *format,
                };
                commands::check::execute(ctx, metadata, &opts)
            }
            Self::Filter {
                query,
                format,
                records,
                count,
            } => {
                let opts = commands::filter::FilterOptions {
                    query,
                    format: *format,
                    records: *records,
                    count: *count,
                };
                commands::filter::execute(ctx, metadata, &opts)
            }
            Self::Fields => commands::fields::execute(ctx, metadata),
        }
    }
}
