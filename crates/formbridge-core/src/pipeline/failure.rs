//! Transformation failure type and user-facing message resolution
//!
//! A [`TransformationFailure`] is the recoverable, field-scoped error
//! produced by the inbound (view to model) direction of a transformer chain.
//! It always carries an internal diagnostic message for logs, and optionally
//! a public message template with substitution parameters. The internal
//! message is never shown to end users under any resolution branch.
//!
//! Copyright (c) 2025 Formbridge Team
//! Licensed under the Apache-2.0 license

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Fallback shown when neither the failure nor the field supplies a message
pub const GENERIC_INVALID_MESSAGE: &str = "This value is not valid.";

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// A user-facing message template with substitution parameters
///
/// Placeholders use `{{ name }}` syntax; whitespace inside the braces is
/// tolerated. Unknown placeholders are left intact rather than erased so a
/// misconfigured template remains visible during development.
#[derive(Debug, Clone, Serialize)]
pub struct PublicMessage {
    template: String,
    parameters: HashMap<String, Value>,
}

impl PublicMessage {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            parameters: HashMap::new(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn parameters(&self) -> &HashMap<String, Value> {
        &self.parameters
    }

    /// Render the template, substituting `{{ name }}` placeholders
    pub fn render(&self) -> String {
        render_template(&self.template, &self.parameters)
    }
}

/// Substitute `{{ name }}` placeholders in a template
///
/// String parameters substitute as-is; other JSON values substitute in their
/// compact JSON form. Placeholders without a matching parameter are kept
/// verbatim.
pub fn render_template(template: &str, parameters: &HashMap<String, Value>) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &regex::Captures<'_>| {
            match parameters.get(&caps[1]) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Recoverable failure raised by the inbound direction of a transformer
///
/// Constructed at the point `reverse_transform` detects an unrecoverable
/// condition and consumed by the pipeline driver, which resolves it into a
/// user-visible message and records it against the field.
#[derive(Debug, Clone, Serialize)]
pub struct TransformationFailure {
    internal_message: String,
    public_message: Option<PublicMessage>,
}

impl TransformationFailure {
    /// Create a failure with a diagnostic message only
    pub fn new(internal_message: impl Into<String>) -> Self {
        Self {
            internal_message: internal_message.into(),
            public_message: None,
        }
    }

    /// Attach a user-facing message template
    pub fn with_public_message(mut self, template: impl Into<String>) -> Self {
        self.public_message = Some(PublicMessage::new(template));
        self
    }

    /// Add a substitution parameter to the public message template
    ///
    /// A no-op when no public message template has been set.
    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        if let Some(public) = &mut self.public_message {
            public.parameters.insert(name.into(), value);
        }
        self
    }

    /// Diagnostic message for logs; never surfaced to end users
    pub fn internal_message(&self) -> &str {
        &self.internal_message
    }

    pub fn public_message(&self) -> Option<&PublicMessage> {
        self.public_message.as_ref()
    }

    /// Resolve the user-visible message for this failure
    ///
    /// Precedence: the failure's own rendered template, then the field's
    /// configured invalid message, then [`GENERIC_INVALID_MESSAGE`].
    pub fn resolve_public_message(&self, field_invalid_message: Option<&str>) -> String {
        match (&self.public_message, field_invalid_message) {
            (Some(public), _) => public.render(),
            (None, Some(configured)) => configured.to_string(),
            (None, None) => GENERIC_INVALID_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for TransformationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transformation failed: {}", self.internal_message)
    }
}

impl std::error::Error for TransformationFailure {}
