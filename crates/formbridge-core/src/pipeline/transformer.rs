//! The bidirectional transformer contract
//!
//! A [`Transformer`] converts a value between two adjacent representations:
//! model to norm for model transformers, norm to view for view transformers.
//! The outbound direction (`transform`) must succeed for every well-typed
//! input including null; the inbound direction (`reverse_transform`) may
//! fail with a field-scoped [`TransformationFailure`].
//!
//! Copyright (c) 2025 Formbridge Team
//! Licensed under the Apache-2.0 license

use crate::Result;
use super::failure::TransformationFailure;
use serde_json::Value;
use std::fmt;

/// Result of the inbound direction of a transformer or chain
pub type ReverseResult = std::result::Result<Value, TransformationFailure>;

/// A single bidirectional conversion unit between two representations
///
/// Implementations must be stateless with respect to the pipeline: any
/// external lookup is an injected collaborator, inputs are never mutated,
/// and no writes are performed.
pub trait Transformer: fmt::Debug {
    /// Convert outbound (model to norm, or norm to view)
    ///
    /// Must not fail for well-typed input. Null input maps to the
    /// representation's canonical empty value (empty string for text, and
    /// so on), never to a language-level absence, unless the target
    /// representation itself supports absence. An `Err` here is the
    /// programmer-error channel ([`crate::Error::Contract`]) and aborts the
    /// whole pass.
    fn transform(&self, value: &Value) -> Result<Value>;

    /// Convert inbound (view to norm, or norm to model)
    ///
    /// Must accept the canonical empty input and map it to null
    /// (model-absence); required-ness is enforced by a collaborator outside
    /// this core. Well-typed but invalid input yields a
    /// [`TransformationFailure`].
    fn reverse_transform(&self, value: &Value) -> ReverseResult;

    /// Short name used in diagnostics and contract-violation messages
    fn name(&self) -> &str;
}

impl<T: Transformer + ?Sized> Transformer for Box<T> {
    fn transform(&self, value: &Value) -> Result<Value> {
        (**self).transform(value)
    }

    fn reverse_transform(&self, value: &Value) -> ReverseResult {
        (**self).reverse_transform(value)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
