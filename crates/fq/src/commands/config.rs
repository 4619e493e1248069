//! Config command implementation.
//!
//! The config file lives at `~/.config/fq/config.toml` and only remembers
//! defaults: which metadata file to load and whether to color output.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Keys accepted by `fq config set`.
const KEYS: [&str; 2] = ["metadata", "output.color"];

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Metadata file used when neither `--metadata` nor `FQ_METADATA` is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PathBuf>,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            metadata: None,
            output: OutputConfig::default(),
        }
    }
}

/// `[output]` table.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl Config {
    /// Updates one setting from its `fq config set` spelling.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "metadata" => self.metadata = Some(PathBuf::from(value)),
            "output.color" => self.output.color = Some(parse_bool(value)?),
            _ => {
                return Err(CommandError::Config(format!(
                    "Unknown config key '{key}'. Valid keys: {}",
                    KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Every known key with its current value, `None` when unset.
    fn settings(&self) -> [(&'static str, Option<String>); 2] {
        [
            (
                "metadata",
                self.metadata.as_ref().map(|p| p.display().to_string()),
            ),
            ("output.color", self.output.color.map(|c| c.to_string())),
        ]
    }
}

/// Gets the config file path: `FQ_CONFIG`, else `$XDG_CONFIG_HOME/fq`, else
/// `~/.config/fq`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("FQ_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let dir = match env::var("XDG_CONFIG_HOME") {
        Ok(xdg_config) => PathBuf::from(xdg_config),
        Err(_) => BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".config"))
            .ok_or_else(|| {
                CommandError::Config("Could not determine config directory".to_string())
            })?,
    };
    Ok(dir.join("fq").join("config.toml"))
}

fn config_error(action: &str, e: impl std::fmt::Display) -> CommandError {
    CommandError::Config(format!("Failed to {action} config: {e}"))
}

fn read_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path).map_err(|e| config_error("read", e))?;
    let mut config: Config = toml::from_str(&content).map_err(|e| config_error("parse", e))?;
    config.version = CONFIG_VERSION;
    Ok(config)
}

fn write_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| config_error("create directory for", e))?;
    }
    let content = toml::to_string_pretty(config).map_err(|e| config_error("serialize", e))?;
    fs::write(path, content).map_err(|e| config_error("write", e))
}

/// Loads the configuration from disk; a missing file is the default config.
pub fn load_config() -> Result<Config> {
    read_config(&get_config_path()?)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;
    let config = read_config(&path)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    if ctx.use_colors {
        println!("{} {}", "Config:".green().bold(), path.display());
    } else {
        println!("Config: {}", path.display());
    }
    if !path.exists() {
        println!("(not created yet; 'fq config set metadata <path>' creates it)");
    }
    for (key, value) in config.settings() {
        let value = value.unwrap_or_else(|| "(not set)".to_string());
        println!("  {key:<14} {value}");
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    pub key: String,
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let path = get_config_path()?;
    let mut config = read_config(&path)?;
    config.set(&opts.key, &opts.value)?;
    write_config(&path, &config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("{} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;
    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{s}'. Use true/false, yes/no, 1/0, or on/off"
        ))),
    }
}
