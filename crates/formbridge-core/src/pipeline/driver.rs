//! Pipeline driver
//!
//! The [`FormPipeline`] orchestrates the outbound pass (model to norm to
//! view, for rendering) and the inbound pass (view to norm to model, for
//! submission) across all bound fields. Inbound failures are field-scoped:
//! a failing field never aborts its siblings, and the caller receives one
//! outcome per field after the full pass.
//!
//! Copyright (c) 2025 Formbridge Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use super::failure::TransformationFailure;
use super::field::FieldBinding;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// Per-field, per-pass processing state
///
/// `Pending` and `Transformed` are transient; every pass ends each field in
/// `Bound` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldState {
    Pending,
    Transformed,
    Bound,
    Failed,
}

/// Terminal outcome of one field in an inbound pass
#[derive(Debug, Clone, Serialize)]
pub struct FieldOutcome {
    state: FieldState,
    /// Bound model value, present when `state` is `Bound`
    value: Option<Value>,
    /// Resolved user-visible message, present when `state` is `Failed`
    message: Option<String>,
    /// Diagnostic detail for logs; excluded from serialized output
    #[serde(skip_serializing)]
    internal_message: Option<String>,
}

impl FieldOutcome {
    fn bound(value: Value) -> Self {
        Self {
            state: FieldState::Bound,
            value: Some(value),
            message: None,
            internal_message: None,
        }
    }

    fn failed(failure: &TransformationFailure, invalid_message: Option<&str>) -> Self {
        Self {
            state: FieldState::Failed,
            value: None,
            message: Some(failure.resolve_public_message(invalid_message)),
            internal_message: Some(failure.internal_message().to_string()),
        }
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn is_bound(&self) -> bool {
        self.state == FieldState::Bound
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Resolved public message for a failed field
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Internal diagnostic for a failed field; never shown to end users
    pub fn internal_message(&self) -> Option<&str> {
        self.internal_message.as_deref()
    }
}

/// Aggregated result of a full inbound pass
#[derive(Debug, Clone, Serialize, Default)]
pub struct SubmissionReport {
    outcomes: BTreeMap<String, FieldOutcome>,
}

impl SubmissionReport {
    /// True when every field reached `Bound`
    pub fn is_valid(&self) -> bool {
        self.outcomes.values().all(FieldOutcome::is_bound)
    }

    pub fn outcome(&self, field: &str) -> Option<&FieldOutcome> {
        self.outcomes.get(field)
    }

    pub fn outcomes(&self) -> &BTreeMap<String, FieldOutcome> {
        &self.outcomes
    }

    /// Failed fields with their resolved user-visible messages
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(name, outcome)| {
            outcome.message().map(|message| (name.as_str(), message))
        })
    }

    /// Failed fields with their internal diagnostics, for logging
    pub fn internal_failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(name, outcome)| {
            outcome
                .internal_message()
                .map(|message| (name.as_str(), message))
        })
    }
}

/// Driver for the outbound and inbound passes over a set of field bindings
#[derive(Debug)]
pub struct FormPipeline {
    fields: Vec<FieldBinding>,
}

impl FormPipeline {
    pub fn builder() -> FormPipelineBuilder {
        FormPipelineBuilder::new()
    }

    pub fn fields(&self) -> &[FieldBinding] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a binding by field name
    pub fn field(&self, name: &str) -> Result<&FieldBinding> {
        self.fields
            .iter()
            .find(|binding| binding.name() == name)
            .ok_or_else(|| Error::UnknownField {
                field: name.to_string(),
            })
    }

    /// Outbound pass: produce the view value for every field
    ///
    /// Each field's model attribute flows through the model-chain and then
    /// the view-chain, both in declaration order. A missing attribute reads
    /// as null and yields the field's canonical empty view value. Only the
    /// fatal programmer-error channel can fail here.
    pub fn render(&self, model_data: &Value) -> Result<BTreeMap<String, Value>> {
        let mut view_values = BTreeMap::new();
        for binding in &self.fields {
            let attribute = model_data.get(binding.name()).cloned().unwrap_or(Value::Null);
            let norm = binding.model_chain().apply_forward(&attribute)?;
            let view = binding.view_chain().apply_forward(&norm)?;
            debug!(field = binding.name(), "rendered field");
            view_values.insert(binding.name().to_string(), view);
        }
        Ok(view_values)
    }

    /// Inbound pass: bind submitted view values back onto the model object
    ///
    /// Each field's raw view value flows through the view-chain and then the
    /// model-chain, both in reverse declaration order. On failure the field
    /// ends `Failed` with a resolved public message and its model attribute
    /// is left untouched; sibling fields are processed regardless. A missing
    /// view value reads as null.
    pub fn submit(
        &self,
        view_values: &BTreeMap<String, Value>,
        model_data: &mut Value,
    ) -> Result<SubmissionReport> {
        if model_data.is_null() {
            *model_data = Value::Object(Map::new());
        }
        let attributes = match model_data {
            Value::Object(attributes) => attributes,
            other => {
                return Err(Error::Configuration {
                    message: format!("model data must be a JSON object, got {other}"),
                    field: None,
                })
            }
        };

        let mut report = SubmissionReport::default();
        for binding in &self.fields {
            let raw = view_values
                .get(binding.name())
                .cloned()
                .unwrap_or(Value::Null);
            trace!(field = binding.name(), state = ?FieldState::Pending, "processing field");

            let outcome = match self.bind_field(binding, &raw) {
                Ok(model_value) => {
                    trace!(field = binding.name(), state = ?FieldState::Transformed, "chains applied");
                    attributes.insert(binding.name().to_string(), model_value.clone());
                    debug!(field = binding.name(), "bound field");
                    FieldOutcome::bound(model_value)
                }
                Err(failure) => {
                    warn!(
                        field = binding.name(),
                        internal = failure.internal_message(),
                        "field transformation failed"
                    );
                    FieldOutcome::failed(&failure, binding.invalid_message())
                }
            };
            report.outcomes.insert(binding.name().to_string(), outcome);
        }
        Ok(report)
    }

    fn bind_field(
        &self,
        binding: &FieldBinding,
        raw: &Value,
    ) -> std::result::Result<Value, TransformationFailure> {
        let norm = binding.view_chain().apply_backward(raw)?;
        binding.model_chain().apply_backward(&norm)
    }
}

/// Builder for [`FormPipeline`]
#[derive(Debug, Default)]
pub struct FormPipelineBuilder {
    fields: Vec<FieldBinding>,
}

impl FormPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field binding
    pub fn field(mut self, binding: FieldBinding) -> Self {
        self.fields.push(binding);
        self
    }

    /// Build the pipeline, rejecting duplicate field names
    pub fn build(self) -> Result<FormPipeline> {
        let mut seen = std::collections::HashSet::new();
        for binding in &self.fields {
            if !seen.insert(binding.name()) {
                return Err(Error::Configuration {
                    message: format!("duplicate field name '{}'", binding.name()),
                    field: Some(binding.name().to_string()),
                });
            }
        }
        Ok(FormPipeline {
            fields: self.fields,
        })
    }
}
