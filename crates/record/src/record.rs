//! The structured log record
//!
//! A `Record` is an ordered mapping from field name to JSON value, decoded
//! from one line of input. Field order is preserved end-to-end so that a
//! record written to a sink round-trips byte-identically modulo whitespace.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{FieldError, Severity};

/// Timestamp format used by record producers: ISO-8601 with fractional
/// seconds, no timezone suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One structured log record
///
/// Wraps an ordered JSON object. Accessors for the well-known fields are
/// checked: a missing or mistyped field yields a [`FieldError`] rather
/// than a panic, so a single bad record never takes down a worker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Decode a record from one line of input
    ///
    /// The line must be a JSON object; anything else (including valid
    /// non-object JSON) is a decode failure.
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Synthesize an error record from raw input text
    ///
    /// Used wherever a line fails to decode: the raw text becomes the
    /// `data` payload and the record flows through the pipeline like any
    /// other, so malformed input is visible in every output.
    pub fn internal_error(raw: &str) -> Self {
        let mut record = Self::new();
        record.insert(
            "timestamp",
            Local::now().format(TIMESTAMP_FORMAT).to_string(),
        );
        record.insert("component", "INTERNAL");
        record.insert("type", "ERROR");
        record.insert("data", raw);
        record.insert("priority", u64::from(Severity::Error.value()));
        record
    }

    /// Number of fields in the record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw access to a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Insert or replace a field
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Checked access to a string field
    pub fn str_field(&self, field: &str) -> Result<&str, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(FieldError::wrong_type(field, "string")),
        }
    }

    /// The record's `timestamp` field
    pub fn timestamp(&self) -> Result<&str, FieldError> {
        self.str_field("timestamp")
    }

    /// The record's `component` field
    pub fn component(&self) -> Result<&str, FieldError> {
        self.str_field("component")
    }

    /// The record's `type` field
    pub fn message_type(&self) -> Result<&str, FieldError> {
        self.str_field("type")
    }

    /// The record's numeric `priority`, if present
    ///
    /// Producers are loose about number encoding, so both integer and
    /// float priorities are accepted. A non-numeric `priority` counts as
    /// absent, which downstream means "never filtered by threshold".
    pub fn priority(&self) -> Option<u64> {
        match self.fields.get("priority")? {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
            _ => None,
        }
    }

    /// The record's `priority` mapped onto a known severity level
    pub fn severity(&self) -> Option<Severity> {
        Severity::from_value(self.priority()?)
    }

    /// The display payload: `data` as a string, or a sequence of strings
    /// joined with single spaces
    ///
    /// Any other shape is a [`FieldError::WrongType`]; callers treat that
    /// as invalid data for the one record and carry on.
    pub fn data_text(&self) -> Result<String, FieldError> {
        const EXPECTED: &str = "string or sequence of strings";
        match self.fields.get("data") {
            None => Err(FieldError::missing("data")),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Array(items)) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => parts.push(s.as_str()),
                        _ => return Err(FieldError::wrong_type("data", EXPECTED)),
                    }
                }
                Ok(parts.join(" "))
            }
            Some(_) => Err(FieldError::wrong_type("data", EXPECTED)),
        }
    }

    /// The record's `line` field rendered for display, if present
    ///
    /// Producers emit either a string (`"main.c:42"`) or a bare number.
    pub fn line(&self) -> Option<String> {
        match self.fields.get("line")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// The record's `stacktrace` field, if present and a string
    pub fn stacktrace(&self) -> Option<&str> {
        match self.fields.get("stacktrace")? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Copy of this record containing only the named fields
    ///
    /// Field order of the original is preserved; names not present in the
    /// record are ignored.
    pub fn project(&self, fields: &[String]) -> Self {
        let mut out = Map::new();
        for (name, value) in &self.fields {
            if fields.iter().any(|f| f == name) {
                out.insert(name.clone(), value.clone());
            }
        }
        Self { fields: out }
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;
