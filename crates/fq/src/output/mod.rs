//! Output formatting utilities for the fq CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by what is being shown:
//!
//! - [`tokens`] - Token output formatting (text tables, JSON token trees, rejections)
//! - [`fields`] - Field metadata output formatting
//! - [`records`] - Query check and filtered record output formatting
//! - [`helpers`] - Common formatting utilities (truncation, token colors, carets)

mod fields;
pub mod helpers;
mod records;
mod tokens;

// Tokens
pub use tokens::{
    format_json_tokens_json, format_json_tokens_tree, format_text_tokens_json,
    format_text_tokens_table,
};

// Fields
pub use fields::{format_fields_json, format_fields_table};

// Records
pub use records::{
    format_check_json, format_check_text, format_count_json, format_records_json,
    format_records_lines, format_summary,
};
