//! Typed values, literal shape classification and casting.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::Serialize;

use crate::schema::{Field, FieldType, Lookup};
use crate::token::TokenType;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(?:'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*")$"#).unwrap());
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?$").unwrap());
static BOOLEAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(?:true|false)$").unwrap());
static DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static TIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").unwrap());
static DATETIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2}$").unwrap());
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(\d+)\s*h)?\s*(?:(\d+)\s*m)?\s*(?:(\d+)\s*s)?$").unwrap()
});
static CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").unwrap());

/// A typed value: a cast literal or a record's field value.
///
/// `Time` holds elapsed seconds. `List` is used for array-typed fields and
/// for multi-value comparisons (`In`/`NotIn`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    String(String),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    Time(i64),
    DateTime(NaiveDateTime),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts a JSON value into a value of `field_type`.
    ///
    /// Array types take JSON arrays (a lone scalar becomes a one-element
    /// list). Anything that cannot be represented becomes `Null`.
    pub fn from_json(field_type: FieldType, json: &serde_json::Value) -> Value {
        if json.is_null() {
            return Value::Null;
        }
        if field_type.is_array() {
            let element = field_type.element();
            return match json {
                serde_json::Value::Array(items) => Value::List(
                    items
                        .iter()
                        .map(|item| Value::from_json(element, item))
                        .collect(),
                ),
                scalar => Value::List(vec![Value::from_json(element, scalar)]),
            };
        }

        match (field_type, json) {
            (FieldType::String, serde_json::Value::String(s)) => Value::String(s.clone()),
            (FieldType::String, serde_json::Value::Number(n)) => Value::String(n.to_string()),
            (FieldType::String, serde_json::Value::Bool(b)) => Value::String(b.to_string()),
            (FieldType::Number, serde_json::Value::Number(n)) => {
                n.as_f64().map_or(Value::Null, Value::Number)
            }
            (FieldType::Boolean, serde_json::Value::Bool(b)) => Value::Boolean(*b),
            (FieldType::Time, serde_json::Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map_or(Value::Null, Value::Time),
            (scalar, serde_json::Value::String(s)) => {
                cast_scalar(scalar, s).unwrap_or(Value::Null)
            }
            _ => Value::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::String(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Time(secs) => write!(f, "{}s", secs),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Classifies the shape of a literal.
///
/// Tries quoted string, number, boolean, date, time and datetime in that
/// order; anything else is an ambiguous [`TokenType::Literal`].
pub fn classify_literal(text: &str) -> TokenType {
    if QUOTED.is_match(text) {
        TokenType::StringValue
    } else if NUMBER.is_match(text) {
        TokenType::NumberValue
    } else if BOOLEAN.is_match(text) {
        TokenType::BooleanValue
    } else if DATE.is_match(text) {
        TokenType::DateValue
    } else if TIME.is_match(text) {
        TokenType::TimeValue
    } else if DATETIME.is_match(text) {
        TokenType::DateTimeValue
    } else {
        TokenType::Literal
    }
}

/// Strips one level of matching quotes and resolves backslash escapes.
pub fn unquote(text: &str) -> Cow<'_, str> {
    if !QUOTED.is_match(text) {
        return Cow::Borrowed(text);
    }
    let inner = &text[1..text.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                result.push(escaped);
            }
        } else {
            result.push(c);
        }
    }
    Cow::Owned(result)
}

/// Casts `text` to a value of the field's type.
///
/// A field with lookups only accepts their labels (case-insensitively) and
/// yields the matching lookup value. Otherwise the text is parsed with the
/// field's element type. Returns `None` when the text is not acceptable.
pub fn cast_value(field: &Field, text: &str) -> Option<Value> {
    let text = unquote(text);
    let element = field.field_type.element();
    if !field.lookups.is_empty() {
        let lower = text.to_lowercase();
        return field
            .lookups
            .iter()
            .find(|lookup| lookup.label.to_lowercase() == lower)
            .map(|lookup| lookup_value(element, lookup));
    }
    cast_scalar(element, &text)
}

/// Returns true iff [`cast_value`] would succeed.
pub fn validate_value(field: &Field, text: &str) -> bool {
    cast_value(field, text).is_some()
}

fn lookup_value(element: FieldType, lookup: &Lookup) -> Value {
    match Value::from_json(element, &lookup.value) {
        Value::Null if !lookup.value.is_null() => match &lookup.value {
            serde_json::Value::String(s) => Value::String(s.clone()),
            other => Value::String(other.to_string()),
        },
        value => value,
    }
}

fn cast_scalar(element: FieldType, text: &str) -> Option<Value> {
    match element {
        FieldType::String => Some(Value::String(text.to_string())),
        FieldType::Number => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::Number),
        FieldType::Boolean => parse_bool(text).map(Value::Boolean),
        FieldType::Date => NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
            .ok()
            .map(Value::Date),
        FieldType::Time => parse_time(text).map(Value::Time),
        FieldType::DateTime => parse_datetime(text).map(Value::DateTime),
        array => cast_scalar(array.element(), text),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parses a duration such as `1h15m`, `90m` or `1h2m3s` into seconds.
pub fn parse_duration(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let caps = DURATION.captures(text)?;
    let part = |index: usize| -> Option<i64> {
        caps.get(index)
            .map_or(Some(0), |m| m.as_str().parse::<i64>().ok())
    };
    let hours = part(1)?;
    let minutes = part(2)?;
    let seconds = part(3)?;
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Parses a time value into seconds: a bare count of seconds, a duration or
/// a `HH:MM[:SS]` clock.
pub fn parse_time(text: &str) -> Option<i64> {
    let text = text.trim();
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse().ok();
    }
    if let Some(caps) = CLOCK.captures(text) {
        let hours: i64 = caps[1].parse().ok()?;
        let minutes: i64 = caps[2].parse().ok()?;
        let seconds: i64 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        return Some(hours * 3600 + minutes * 60 + seconds);
    }
    parse_duration(text)
}

/// Parses a datetime; a bare date is read as midnight.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}
