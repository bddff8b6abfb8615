//! Built-in transformers for common field shapes
//!
//! This module provides concrete [`Transformer`] implementations for common
//! cases: numbers, checkboxes, delimited collections, entity references, and
//! date-times. Each transformer documents its canonical empty value for the
//! outbound direction and any intentional normalization loss.
//!
//! Copyright (c) 2025 Formbridge Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use super::failure::TransformationFailure;
use super::lookup::EntityLookup;
use super::transformer::{ReverseResult, Transformer};
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;
use std::sync::Arc;

fn contract_violation(transformer: &dyn Transformer, message: impl Into<String>) -> Error {
    Error::Contract {
        transformer: transformer.name().to_string(),
        message: message.into(),
    }
}

/// Stringify a scalar JSON value for display
fn scalar_display(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Number <-> display string
///
/// Empty value: `""`. Backward maps empty input to null and parses integers
/// before falling back to floats, so `42` round-trips as an integer.
#[derive(Debug, Clone, Default)]
pub struct NumberToString;

impl NumberToString {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for NumberToString {
    fn transform(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::String(String::new())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            other => Err(contract_violation(
                self,
                format!("expected a number or null, got {other}"),
            )),
        }
    }

    fn reverse_transform(&self, value: &Value) -> ReverseResult {
        let text = match value {
            Value::Null => return Ok(Value::Null),
            Value::Number(_) => return Ok(value.clone()),
            Value::String(s) => s.trim(),
            other => {
                return Err(TransformationFailure::new(format!(
                    "number_to_string: unexpected inbound value {other}"
                )))
            }
        };

        if text.is_empty() {
            return Ok(Value::Null);
        }

        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Number(i.into()));
        }

        let invalid = || {
            TransformationFailure::new(format!("number_to_string: cannot parse '{text}'"))
                .with_public_message("\"{{ value }}\" is not a valid number.")
                .with_parameter("value", Value::String(text.to_string()))
        };

        let parsed: f64 = text.parse().map_err(|_| invalid())?;
        serde_json::Number::from_f64(parsed)
            .map(Value::Number)
            .ok_or_else(invalid)
    }

    fn name(&self) -> &str {
        "number_to_string"
    }
}

/// Boolean <-> checkbox token
///
/// Empty value: `""` (unchecked). Backward treats any non-empty submission
/// as checked; this is an intentional, lossy normalization that matches
/// checkbox submission semantics.
#[derive(Debug, Clone)]
pub struct BooleanToString {
    true_token: String,
}

impl BooleanToString {
    pub fn new(true_token: impl Into<String>) -> Self {
        Self {
            true_token: true_token.into(),
        }
    }
}

impl Default for BooleanToString {
    fn default() -> Self {
        Self::new("1")
    }
}

impl Transformer for BooleanToString {
    fn transform(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::String(String::new())),
            Value::Bool(true) => Ok(Value::String(self.true_token.clone())),
            Value::Bool(false) => Ok(Value::String(String::new())),
            other => Err(contract_violation(
                self,
                format!("expected a boolean or null, got {other}"),
            )),
        }
    }

    fn reverse_transform(&self, value: &Value) -> ReverseResult {
        match value {
            Value::Null => Ok(Value::Bool(false)),
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::String(s) => Ok(Value::Bool(!s.is_empty())),
            other => Err(TransformationFailure::new(format!(
                "boolean_to_string: unexpected inbound value {other}"
            ))),
        }
    }

    fn name(&self) -> &str {
        "boolean_to_string"
    }
}

/// Array of scalars <-> delimited string (the tags-field shape)
///
/// Empty value: `""`. Backward splits on the delimiter, trims each segment,
/// and drops empty segments; an empty submission yields an empty array
/// rather than null, so the model keeps its collection shape.
#[derive(Debug, Clone)]
pub struct CollectionToDelimitedString {
    delimiter: String,
}

impl CollectionToDelimitedString {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    fn split_token(&self) -> &str {
        // Joined with ", " but split on ","; surrounding whitespace is
        // handled by trimming each segment.
        let trimmed = self.delimiter.trim();
        if trimmed.is_empty() {
            &self.delimiter
        } else {
            trimmed
        }
    }
}

impl Default for CollectionToDelimitedString {
    fn default() -> Self {
        Self::new(", ")
    }
}

impl Transformer for CollectionToDelimitedString {
    fn transform(&self, value: &Value) -> Result<Value> {
        let items = match value {
            Value::Null => return Ok(Value::String(String::new())),
            Value::Array(items) => items,
            other => {
                return Err(contract_violation(
                    self,
                    format!("expected an array or null, got {other}"),
                ))
            }
        };

        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            let part = scalar_display(item).ok_or_else(|| {
                contract_violation(self, format!("collection item is not a scalar: {item}"))
            })?;
            parts.push(part);
        }
        Ok(Value::String(parts.join(&self.delimiter)))
    }

    fn reverse_transform(&self, value: &Value) -> ReverseResult {
        let text = match value {
            Value::Null => return Ok(Value::Array(Vec::new())),
            Value::Array(_) => return Ok(value.clone()),
            Value::String(s) => s,
            other => {
                return Err(TransformationFailure::new(format!(
                    "collection_to_delimited_string: unexpected inbound value {other}"
                )))
            }
        };

        let items: Vec<Value> = text
            .split(self.split_token())
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| Value::String(segment.to_string()))
            .collect();
        Ok(Value::Array(items))
    }

    fn name(&self) -> &str {
        "collection_to_delimited_string"
    }
}

/// Entity object <-> identifier string, resolved through an injected lookup
///
/// Empty value: `""`. Backward maps empty input to null (optional field) and
/// otherwise resolves the identifier through the [`EntityLookup`]; both
/// not-found and backend failures surface as transformation failures, never
/// as a foreign error kind.
#[derive(Debug, Clone)]
pub struct EntityToId {
    id_property: String,
    lookup: Arc<dyn EntityLookup>,
}

impl EntityToId {
    pub fn new(lookup: Arc<dyn EntityLookup>) -> Self {
        Self::with_id_property(lookup, "id")
    }

    pub fn with_id_property(lookup: Arc<dyn EntityLookup>, id_property: impl Into<String>) -> Self {
        Self {
            id_property: id_property.into(),
            lookup,
        }
    }
}

impl Transformer for EntityToId {
    fn transform(&self, value: &Value) -> Result<Value> {
        let entity = match value {
            Value::Null => return Ok(Value::String(String::new())),
            Value::Object(entity) => entity,
            other => {
                return Err(contract_violation(
                    self,
                    format!("expected an entity object or null, got {other}"),
                ))
            }
        };

        let id = entity.get(&self.id_property).ok_or_else(|| {
            contract_violation(
                self,
                format!("entity has no '{}' property", self.id_property),
            )
        })?;
        scalar_display(id).map(Value::String).ok_or_else(|| {
            contract_violation(
                self,
                format!("entity property '{}' is not a scalar", self.id_property),
            )
        })
    }

    fn reverse_transform(&self, value: &Value) -> ReverseResult {
        let key = match value {
            Value::Null => return Ok(Value::Null),
            Value::String(s) if s.trim().is_empty() => return Ok(Value::Null),
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(TransformationFailure::new(format!(
                    "entity_to_id: unexpected inbound value {other}"
                )))
            }
        };

        self.lookup.resolve(&key).map_err(Into::into)
    }

    fn name(&self) -> &str {
        "entity_to_id"
    }
}

/// Whitespace trimming on the view side
///
/// Empty value: `""`. Outbound is a passthrough; backward trims string input
/// (an intentional, lossy normalization) and leaves other values untouched.
#[derive(Debug, Clone, Default)]
pub struct Trim;

impl Trim {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for Trim {
    fn transform(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::String(String::new())),
            other => Ok(other.clone()),
        }
    }

    fn reverse_transform(&self, value: &Value) -> ReverseResult {
        match value {
            Value::String(s) => Ok(Value::String(s.trim().to_string())),
            other => Ok(other.clone()),
        }
    }

    fn name(&self) -> &str {
        "trim"
    }
}

/// RFC 3339 date-time <-> formatted display string
///
/// The model representation is an RFC 3339 string (JSON has no native
/// date-time). Empty value: `""`. Backward parses the configured display
/// format as a naive UTC timestamp, so any offset carried by the original
/// model value is normalized to UTC (documented loss).
#[derive(Debug, Clone)]
pub struct DateTimeToString {
    format: String,
}

impl DateTimeToString {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Default for DateTimeToString {
    fn default() -> Self {
        Self::new("%Y-%m-%d %H:%M")
    }
}

impl Transformer for DateTimeToString {
    fn transform(&self, value: &Value) -> Result<Value> {
        let text = match value {
            Value::Null => return Ok(Value::String(String::new())),
            Value::String(s) if s.is_empty() => return Ok(Value::String(String::new())),
            Value::String(s) => s,
            other => {
                return Err(contract_violation(
                    self,
                    format!("expected an RFC 3339 string or null, got {other}"),
                ))
            }
        };

        let parsed = DateTime::parse_from_rfc3339(text).map_err(|e| {
            contract_violation(self, format!("model value '{text}' is not RFC 3339: {e}"))
        })?;
        Ok(Value::String(parsed.format(&self.format).to_string()))
    }

    fn reverse_transform(&self, value: &Value) -> ReverseResult {
        let text = match value {
            Value::Null => return Ok(Value::Null),
            Value::String(s) if s.trim().is_empty() => return Ok(Value::Null),
            Value::String(s) => s.trim(),
            other => {
                return Err(TransformationFailure::new(format!(
                    "datetime_to_string: unexpected inbound value {other}"
                )))
            }
        };

        let parsed = NaiveDateTime::parse_from_str(text, &self.format).map_err(|e| {
            TransformationFailure::new(format!(
                "datetime_to_string: cannot parse '{text}' with format '{}': {e}",
                self.format
            ))
            .with_public_message("\"{{ value }}\" is not a valid date and time.")
            .with_parameter("value", Value::String(text.to_string()))
        })?;
        Ok(Value::String(parsed.and_utc().to_rfc3339()))
    }

    fn name(&self) -> &str {
        "datetime_to_string"
    }
}

/// Create a number/string transformer
pub fn number_to_string() -> Box<dyn Transformer> {
    Box::new(NumberToString::new())
}

/// Create a checkbox transformer with the conventional `"1"` token
pub fn checkbox() -> Box<dyn Transformer> {
    Box::new(BooleanToString::default())
}

/// Create a tags-style collection transformer joined with `", "`
pub fn tags() -> Box<dyn Transformer> {
    Box::new(CollectionToDelimitedString::default())
}

/// Create an entity/id transformer over the given lookup
pub fn entity_by_id(lookup: Arc<dyn EntityLookup>) -> Box<dyn Transformer> {
    Box::new(EntityToId::new(lookup))
}

/// Create a view-side trim transformer
pub fn trim() -> Box<dyn Transformer> {
    Box::new(Trim::new())
}

/// Create a date-time transformer with the given display format
pub fn datetime(format: impl Into<String>) -> Box<dyn Transformer> {
    Box::new(DateTimeToString::new(format))
}
