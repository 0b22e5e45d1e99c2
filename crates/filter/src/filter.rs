//! Filter parsing and evaluation

use std::borrow::Cow;

use serde_json::Value;

use logtee_record::Record;

use crate::{Destination, FilterError, FilterParseError};

/// An immutable record predicate bound to one destination
///
/// Evaluation returns keep-as-is (`Cow::Borrowed`), keep-transformed
/// (`Cow::Owned`, when a projection is configured), or reject (`None`).
/// Filters carry no mutable state.
#[derive(Debug, Clone)]
pub struct Filter {
    /// Match groups compiled from the selector: field name to the set of
    /// accepted values. Groups AND together, values within a group OR.
    groups: Vec<(String, Vec<String>)>,

    /// Optional field subset applied to kept records
    projection: Option<Vec<String>>,

    destination: Destination,
}

impl Filter {
    /// Parse a filter spec (see the crate docs for the grammar)
    pub fn parse(spec: &str) -> Result<Self, FilterParseError> {
        let Some((head, dest)) = spec.split_once(':') else {
            return Err(FilterParseError::MissingDestination(spec.to_string()));
        };
        if dest.is_empty() {
            return Err(FilterParseError::MissingDestination(spec.to_string()));
        }
        let destination = Destination::from_spec(dest);

        let (selector, projection) = match head.split_once('%') {
            Some((selector, fields)) => (selector, Some(parse_projection(fields, spec)?)),
            None => (head, None),
        };

        Ok(Self {
            groups: parse_selector(selector, spec)?,
            projection,
            destination,
        })
    }

    /// The destination this filter feeds
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// True when this filter targets the terminal view
    pub fn is_stdout(&self) -> bool {
        self.destination == Destination::Stdout
    }

    /// Evaluate the filter against one record
    ///
    /// `Ok(None)` rejects the record. `Ok(Some(Cow::Borrowed))` keeps it
    /// as-is; `Ok(Some(Cow::Owned))` keeps a projected copy. An `Err`
    /// means the predicate could not be applied to this record; callers
    /// treat that as a rejection and continue.
    pub fn evaluate<'r>(&self, record: &'r Record) -> Result<Option<Cow<'r, Record>>, FilterError> {
        for (field, accepted) in &self.groups {
            let Some(value) = record.get(field) else {
                return Ok(None);
            };
            let actual = scalar_text(field, value)?;
            if !accepted.iter().any(|want| want == actual.as_ref()) {
                return Ok(None);
            }
        }

        Ok(Some(match &self.projection {
            Some(fields) => Cow::Owned(record.project(fields)),
            None => Cow::Borrowed(record),
        }))
    }
}

/// Canonical text of a scalar field value for matching
fn scalar_text<'v>(field: &str, value: &'v Value) -> Result<Cow<'v, str>, FilterError> {
    match value {
        Value::String(s) => Ok(Cow::Borrowed(s)),
        Value::Number(n) => Ok(Cow::Owned(n.to_string())),
        Value::Bool(b) => Ok(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            Err(FilterError::Unmatchable(field.to_string()))
        }
    }
}

fn parse_selector(
    selector: &str,
    spec: &str,
) -> Result<Vec<(String, Vec<String>)>, FilterParseError> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    if selector.is_empty() {
        return Ok(groups);
    }

    for token in selector.split(',') {
        let (field, value) = match token.split_once('=') {
            Some((field, value)) => (field, value),
            // Bare token is shorthand for a component match.
            None => ("component", token),
        };
        if field.is_empty() || value.is_empty() {
            return Err(FilterParseError::EmptyMatcher(spec.to_string()));
        }
        match groups.iter_mut().find(|(name, _)| name.as_str() == field) {
            Some((_, values)) => values.push(value.to_string()),
            None => groups.push((field.to_string(), vec![value.to_string()])),
        }
    }
    Ok(groups)
}

fn parse_projection(fields: &str, spec: &str) -> Result<Vec<String>, FilterParseError> {
    let fields: Vec<String> = fields.split(',').map(str::to_string).collect();
    if fields.is_empty() || fields.iter().any(String::is_empty) {
        return Err(FilterParseError::EmptyProjection(spec.to_string()));
    }
    Ok(fields)
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;
