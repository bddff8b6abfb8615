//! Ordered transformer chains
//!
//! A [`TransformerChain`] is the ordered composition of transformers for one
//! direction-role on one field. Forward application runs in declaration
//! order; backward application runs in exact reverse declaration order and
//! short-circuits on the first failure.
//!
//! Copyright (c) 2025 Formbridge Team
//! Licensed under the Apache-2.0 license

use crate::Result;
use super::transformer::{ReverseResult, Transformer};
use serde_json::Value;

/// An ordered sequence of transformers attached to one field role
///
/// Declaration order is semantically significant and is never reordered by
/// the pipeline. An empty chain is the identity in both directions.
#[derive(Debug, Default)]
pub struct TransformerChain {
    transformers: Vec<Box<dyn Transformer>>,
}

impl TransformerChain {
    /// Create an empty (identity) chain
    pub fn new() -> Self {
        Self {
            transformers: Vec::new(),
        }
    }

    /// Append a transformer to the chain
    pub fn push(mut self, transformer: Box<dyn Transformer>) -> Self {
        self.transformers.push(transformer);
        self
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Apply the chain outbound, in declaration order
    ///
    /// Each transformer's output feeds the next transformer's input. Never
    /// fails for contract-respecting transformers; an error here is the
    /// fatal programmer-error channel.
    pub fn apply_forward(&self, value: &Value) -> Result<Value> {
        let mut current = value.clone();
        for transformer in &self.transformers {
            current = transformer.transform(&current)?;
        }
        Ok(current)
    }

    /// Apply the chain inbound, in exact reverse declaration order
    ///
    /// The first failing step short-circuits the rest of the chain; no
    /// partial or best-effort value is produced.
    pub fn apply_backward(&self, value: &Value) -> ReverseResult {
        let mut current = value.clone();
        for transformer in self.transformers.iter().rev() {
            current = transformer.reverse_transform(&current)?;
        }
        Ok(current)
    }
}

impl FromIterator<Box<dyn Transformer>> for TransformerChain {
    fn from_iter<I: IntoIterator<Item = Box<dyn Transformer>>>(iter: I) -> Self {
        Self {
            transformers: iter.into_iter().collect(),
        }
    }
}
