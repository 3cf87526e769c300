use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::fmt;

use crate::error::{DuneError, Result};

/// Wire format for parameter dates
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Named, typed value bound into a query's SQL at execution time.
///
/// Serialized as `{"key": name, "type": tag, "value": "..."}`; the value is
/// always a string on the wire.
///
/// ```rust
/// use dune_link::QueryParameter;
///
/// let p = QueryParameter::number("NumberField", 3.5);
/// assert_eq!(
///     serde_json::to_value(&p).unwrap(),
///     serde_json::json!({"key": "NumberField", "type": "number", "value": "3.5"})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameter", into = "RawParameter")]
pub enum QueryParameter {
    Text { name: String, value: String },
    Number { name: String, value: f64 },
    Date { name: String, value: NaiveDateTime },
    Enum { name: String, value: String },
}

/// Wire type tag of a [`QueryParameter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Text,
    Number,
    #[serde(rename = "datetime")]
    Date,
    Enum,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::Text => "text",
            ParameterType::Number => "number",
            ParameterType::Date => "datetime",
            ParameterType::Enum => "enum",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl QueryParameter {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self::Number {
            name: name.into(),
            value,
        }
    }

    pub fn date(name: impl Into<String>, value: NaiveDateTime) -> Self {
        Self::Date {
            name: name.into(),
            value,
        }
    }

    /// Date parameter from a `YYYY-MM-DD HH:MM:SS` string.
    ///
    /// A fractional-seconds suffix (`.500`) is accepted and preserved.
    pub fn date_str(name: impl Into<String>, value: &str) -> Result<Self> {
        let parsed = parse_date(value).map_err(DuneError::InvalidParameters)?;
        Ok(Self::date(name, parsed))
    }

    pub fn enum_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Enum {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. }
            | Self::Number { name, .. }
            | Self::Date { name, .. }
            | Self::Enum { name, .. } => name,
        }
    }

    pub fn kind(&self) -> ParameterType {
        match self {
            Self::Text { .. } => ParameterType::Text,
            Self::Number { .. } => ParameterType::Number,
            Self::Date { .. } => ParameterType::Date,
            Self::Enum { .. } => ParameterType::Enum,
        }
    }

    /// Value as it is sent on the wire
    pub fn value_string(&self) -> String {
        match self {
            Self::Text { value, .. } | Self::Enum { value, .. } => value.clone(),
            Self::Number { value, .. } => value.to_string(),
            Self::Date { value, .. } => format_date(value),
        }
    }
}

/// Reject parameter lists with repeated names.
pub fn validate_parameters(params: &[QueryParameter]) -> Result<()> {
    let mut seen = HashSet::with_capacity(params.len());
    for param in params {
        if !seen.insert(param.name()) {
            return Err(DuneError::InvalidParameters(format!(
                "duplicate parameter name '{}'",
                param.name()
            )));
        }
    }
    Ok(())
}

/// Whole-second dates use [`DATE_FORMAT`]; a sub-second part is kept so a
/// date read from the service is sent back unchanged.
fn format_date(value: &NaiveDateTime) -> String {
    if value.nanosecond() == 0 {
        value.format(DATE_FORMAT).to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}

fn parse_date(value: &str) -> std::result::Result<NaiveDateTime, String> {
    // Results echo dates with milliseconds
    NaiveDateTime::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|e| format!("invalid date '{}': {}", value, e))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawParameter {
    key: String,
    #[serde(rename = "type")]
    kind: ParameterType,
    /// Always written as a string; the service may return numbers.
    value: JsonValue,
}

fn wire_text(value: JsonValue) -> std::result::Result<String, String> {
    match value {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(format!("unsupported parameter value {}", other)),
    }
}

impl TryFrom<RawParameter> for QueryParameter {
    type Error = String;

    fn try_from(raw: RawParameter) -> std::result::Result<Self, Self::Error> {
        let RawParameter { key, kind, value } = raw;
        let value = wire_text(value)?;
        Ok(match kind {
            ParameterType::Text => QueryParameter::text(key, value),
            ParameterType::Enum => QueryParameter::enum_value(key, value),
            ParameterType::Number => {
                let number = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| format!("invalid number '{}': {}", value, e))?;
                QueryParameter::number(key, number)
            },
            ParameterType::Date => QueryParameter::date(key, parse_date(&value)?),
        })
    }
}

impl From<QueryParameter> for RawParameter {
    fn from(param: QueryParameter) -> Self {
        RawParameter {
            key: param.name().to_string(),
            kind: param.kind(),
            value: JsonValue::String(param.value_string()),
        }
    }
}
