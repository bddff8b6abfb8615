//! Injected entity resolution collaborator
//!
//! Transformers that map identifiers to entities depend on an
//! [`EntityLookup`] supplied at construction time, not on a global service.
//! Lookup failures never escape a chain as their own error kind: the
//! transformer boundary converts them into a
//! [`TransformationFailure`](super::failure::TransformationFailure).
//!
//! Copyright (c) 2025 Formbridge Team
//! Licensed under the Apache-2.0 license

use super::failure::TransformationFailure;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Errors raised by an entity lookup collaborator
#[derive(Error, Debug, Clone)]
pub enum LookupError {
    /// No entity exists for the given key
    #[error("no entity found for key '{key}'")]
    NotFound { key: String },

    /// The backing store failed
    #[error("lookup backend error: {message}")]
    Backend { message: String },
}

/// Read-only resolution of an identifier to an entity value
///
/// The pipeline treats `resolve` as a synchronous call boundary; a blocking
/// or async store is wrapped by the caller before injection. Implementations
/// must not perform writes.
pub trait EntityLookup: fmt::Debug {
    fn resolve(&self, key: &str) -> std::result::Result<Value, LookupError>;
}

impl From<LookupError> for TransformationFailure {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound { key } => {
                TransformationFailure::new(format!("entity lookup found nothing for key '{key}'"))
                    .with_public_message(
                        "The referenced item \"{{ value }}\" could not be found.",
                    )
                    .with_parameter("value", Value::String(key))
            }
            LookupError::Backend { message } => {
                TransformationFailure::new(format!("entity lookup backend error: {message}"))
            }
        }
    }
}

/// HashMap-backed lookup for tests and small in-process stores
#[derive(Debug, Default, Clone)]
pub struct InMemoryLookup {
    entities: HashMap<String, Value>,
}

impl InMemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, entity: Value) -> Self {
        self.entities.insert(key.into(), entity);
        self
    }
}

impl EntityLookup for InMemoryLookup {
    fn resolve(&self, key: &str) -> std::result::Result<Value, LookupError> {
        self.entities
            .get(key)
            .cloned()
            .ok_or_else(|| LookupError::NotFound {
                key: key.to_string(),
            })
    }
}
