//! Error types for metadata loading.
//!
//! Tokenization and tree-assembly errors live next to the code that raises
//! them: [`crate::tokenizer::TokenizeError`] and [`crate::filter::FilterError`].

use std::path::PathBuf;

use thiserror::Error;

/// A specialized Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors that can occur while building or loading [`crate::Metadata`].
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Two fields share a name (compared case-insensitively).
    #[error("duplicate field name: {name}")]
    DuplicateField {
        /// The repeated name.
        name: String,
    },

    /// A field was declared without a name.
    #[error("field name must not be empty")]
    EmptyFieldName,

    /// An operator name did not match any known operator.
    #[error("unknown operator: {name}")]
    UnknownOperator {
        /// The unrecognized operator name.
        name: String,
    },

    /// The metadata file could not be read.
    #[error("failed to read metadata from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata file is not valid JSON.
    #[error("invalid metadata JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The metadata file is not valid TOML.
    #[error("invalid metadata TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl MetadataError {
    /// Creates a duplicate field error.
    pub fn duplicate_field(name: impl Into<String>) -> Self {
        MetadataError::DuplicateField { name: name.into() }
    }

    /// Creates an unknown operator error.
    pub fn unknown_operator(name: impl Into<String>) -> Self {
        MetadataError::UnknownOperator { name: name.into() }
    }
}
