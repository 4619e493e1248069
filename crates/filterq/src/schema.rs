//! Field metadata describing what a query may reference.
//!
//! A [`Metadata`] value is built once and shared read-only by the lexer,
//! the grammar and the tokenizers. Every lookup against it is
//! case-insensitive, mirroring how queries are matched.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MetadataError, MetadataResult};
use crate::token::TokenType;

/// The closed set of field types, each with an array form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Time,
    DateTime,
    StringArray,
    NumberArray,
    BooleanArray,
    DateArray,
    TimeArray,
    DateTimeArray,
}

impl FieldType {
    /// Every field type, scalars first.
    pub const ALL: [FieldType; 12] = [
        FieldType::String,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::Time,
        FieldType::DateTime,
        FieldType::StringArray,
        FieldType::NumberArray,
        FieldType::BooleanArray,
        FieldType::DateArray,
        FieldType::TimeArray,
        FieldType::DateTimeArray,
    ];

    /// Returns true for the `*Array` forms.
    pub fn is_array(self) -> bool {
        !matches!(
            self,
            FieldType::String
                | FieldType::Number
                | FieldType::Boolean
                | FieldType::Date
                | FieldType::Time
                | FieldType::DateTime
        )
    }

    /// Returns the scalar element type (identity for scalars).
    pub fn element(self) -> FieldType {
        match self {
            FieldType::StringArray => FieldType::String,
            FieldType::NumberArray => FieldType::Number,
            FieldType::BooleanArray => FieldType::Boolean,
            FieldType::DateArray => FieldType::Date,
            FieldType::TimeArray => FieldType::Time,
            FieldType::DateTimeArray => FieldType::DateTime,
            scalar => scalar,
        }
    }

    /// Returns the type name as written in metadata files.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Number => "Number",
            FieldType::Boolean => "Boolean",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
            FieldType::DateTime => "DateTime",
            FieldType::StringArray => "StringArray",
            FieldType::NumberArray => "NumberArray",
            FieldType::BooleanArray => "BooleanArray",
            FieldType::DateArray => "DateArray",
            FieldType::TimeArray => "TimeArray",
            FieldType::DateTimeArray => "DateTimeArray",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the sixteen comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OperatorKind {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Blank,
    NotBlank,
    Contain,
    NotContain,
    StartWith,
    NotStartWith,
    EndWith,
    NotEndWith,
    In,
    NotIn,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 16] = [
        OperatorKind::Equal,
        OperatorKind::NotEqual,
        OperatorKind::GreaterThan,
        OperatorKind::GreaterThanOrEqual,
        OperatorKind::LessThan,
        OperatorKind::LessThanOrEqual,
        OperatorKind::Blank,
        OperatorKind::NotBlank,
        OperatorKind::Contain,
        OperatorKind::NotContain,
        OperatorKind::StartWith,
        OperatorKind::NotStartWith,
        OperatorKind::EndWith,
        OperatorKind::NotEndWith,
        OperatorKind::In,
        OperatorKind::NotIn,
    ];

    /// Returns the canonical operator name.
    pub fn name(self) -> &'static str {
        match self {
            OperatorKind::Equal => "Equal",
            OperatorKind::NotEqual => "NotEqual",
            OperatorKind::GreaterThan => "GreaterThan",
            OperatorKind::GreaterThanOrEqual => "GreaterThanOrEqual",
            OperatorKind::LessThan => "LessThan",
            OperatorKind::LessThanOrEqual => "LessThanOrEqual",
            OperatorKind::Blank => "Blank",
            OperatorKind::NotBlank => "NotBlank",
            OperatorKind::Contain => "Contain",
            OperatorKind::NotContain => "NotContain",
            OperatorKind::StartWith => "StartWith",
            OperatorKind::NotStartWith => "NotStartWith",
            OperatorKind::EndWith => "EndWith",
            OperatorKind::NotEndWith => "NotEndWith",
            OperatorKind::In => "In",
            OperatorKind::NotIn => "NotIn",
        }
    }

    /// Returns false for `Blank`/`NotBlank`, the only operators without a value.
    pub fn takes_value(self) -> bool {
        !matches!(self, OperatorKind::Blank | OperatorKind::NotBlank)
    }

    /// Returns true for `In`/`NotIn`.
    pub fn is_multi_value(self) -> bool {
        matches!(self, OperatorKind::In | OperatorKind::NotIn)
    }

    /// Resolves a canonical name, ignoring case and `-`, `_` and whitespace.
    ///
    /// Symbolic and worded spellings (`>=`, `greater than or equal`) are
    /// handled by [`OperatorKind::parse`].
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = normalize_name(name);
        Self::ALL
            .into_iter()
            .find(|op| op.name().to_lowercase() == normalized)
    }

    /// Resolves any accepted operator spelling.
    pub fn parse(text: &str) -> Option<Self> {
        Self::from_name(text).or_else(|| {
            crate::lexer::operator_spelling(text).and_then(|token_type| token_type.operator())
        })
    }

    /// The token type emitted for this operator.
    pub fn token_type(self) -> TokenType {
        match self {
            OperatorKind::Equal => TokenType::Equal,
            OperatorKind::NotEqual => TokenType::NotEqual,
            OperatorKind::GreaterThan => TokenType::GreaterThan,
            OperatorKind::GreaterThanOrEqual => TokenType::GreaterThanOrEqual,
            OperatorKind::LessThan => TokenType::LessThan,
            OperatorKind::LessThanOrEqual => TokenType::LessThanOrEqual,
            OperatorKind::Blank => TokenType::Blank,
            OperatorKind::NotBlank => TokenType::NotBlank,
            OperatorKind::Contain => TokenType::Contain,
            OperatorKind::NotContain => TokenType::NotContain,
            OperatorKind::StartWith => TokenType::StartWith,
            OperatorKind::NotStartWith => TokenType::NotStartWith,
            OperatorKind::EndWith => TokenType::EndWith,
            OperatorKind::NotEndWith => TokenType::NotEndWith,
            OperatorKind::In => TokenType::In,
            OperatorKind::NotIn => TokenType::NotIn,
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperatorKind {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| MetadataError::unknown_operator(s))
    }
}

impl TryFrom<String> for OperatorKind {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OperatorKind> for String {
    fn from(op: OperatorKind) -> Self {
        op.name().to_string()
    }
}

/// An accepted literal spelling and the value it stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lookup {
    pub label: String,
    pub value: serde_json::Value,
}

impl Lookup {
    pub fn new(label: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A queryable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Display label; defaults to the name.
    #[serde(default)]
    pub label: String,

    /// Operators this field accepts.
    #[serde(default)]
    pub operators: Vec<OperatorKind>,

    /// When non-empty, the only accepted value spellings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lookups: Vec<Lookup>,
}

impl Field {
    /// Creates a field whose label equals its name and with no operators.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            field_type,
            operators: Vec::new(),
            lookups: Vec::new(),
        }
    }

    pub fn with_operators(mut self, operators: impl IntoIterator<Item = OperatorKind>) -> Self {
        self.operators = operators.into_iter().collect();
        self
    }

    pub fn with_lookups(mut self, lookups: impl IntoIterator<Item = Lookup>) -> Self {
        self.lookups = lookups.into_iter().collect();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns true if `operator` is listed for this field.
    pub fn allows(&self, operator: OperatorKind) -> bool {
        self.operators.contains(&operator)
    }
}

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(default)]
    fields: Vec<Field>,
}

/// The fields a query can reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMetadata")]
pub struct Metadata {
    fields: Vec<Field>,
}

impl TryFrom<RawMetadata> for Metadata {
    type Error = MetadataError;

    fn try_from(raw: RawMetadata) -> Result<Self, Self::Error> {
        Metadata::new(raw.fields)
    }
}

impl Metadata {
    /// Builds metadata, rejecting names that collide case-insensitively.
    ///
    /// Empty labels fall back to the field name.
    pub fn new(fields: Vec<Field>) -> MetadataResult<Self> {
        let mut seen: Vec<String> = Vec::with_capacity(fields.len());
        let mut fields = fields;
        for field in &mut fields {
            if field.name.trim().is_empty() {
                return Err(MetadataError::EmptyFieldName);
            }
            let lower = field.name.to_lowercase();
            if seen.contains(&lower) {
                return Err(MetadataError::duplicate_field(&field.name));
            }
            seen.push(lower);
            if field.label.is_empty() {
                field.label = field.name.clone();
            }
        }
        Ok(Self { fields })
    }

    /// Parses metadata from a JSON document.
    pub fn from_json_str(input: &str) -> MetadataResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parses metadata from a TOML document (`[[fields]]` tables).
    pub fn from_toml_str(input: &str) -> MetadataResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Loads metadata from disk; `.toml` files are TOML, everything else JSON.
    pub fn load(path: &Path) -> MetadataResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Finds a field by name, ignoring case.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.name.to_lowercase() == name.to_lowercase())
    }

    /// Returns true if a field with this name exists.
    pub fn validate_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns true if the field exists and lists the operator spelled by
    /// `operator_text`.
    pub fn validate_operator(&self, field_name: &str, operator_text: &str) -> bool {
        let Some(field) = self.field(field_name) else {
            return false;
        };
        OperatorKind::parse(operator_text).is_some_and(|op| field.allows(op))
    }

    /// Returns true if `text` is an acceptable value for the named field.
    pub fn validate_value(&self, field_name: &str, text: &str) -> bool {
        self.field(field_name)
            .is_some_and(|field| crate::value::validate_value(field, text))
    }

    /// Returns the closest field name to `name`, for error hints.
    pub fn suggest_field(&self, name: &str) -> Option<&str> {
        let lower = name.to_lowercase();
        self.fields
            .iter()
            .map(|field| {
                let score = strsim::jaro_winkler(&field.name.to_lowercase(), &lower);
                (field.name.as_str(), score)
            })
            .filter(|(_, score)| *score >= 0.8)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(name, _)| name)
    }
}
