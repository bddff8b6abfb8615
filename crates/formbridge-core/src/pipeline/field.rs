//! Field bindings
//!
//! A [`FieldBinding`] associates a field identifier with its model-chain,
//! view-chain, and the statically configured invalid message used when an
//! inbound chain fails without supplying its own public message. Bindings
//! are immutable once built.
//!
//! Copyright (c) 2025 Formbridge Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use super::chain::TransformerChain;
use super::transformer::Transformer;

/// One field of a form: identifier, chains, and error-message configuration
#[derive(Debug)]
pub struct FieldBinding {
    name: String,
    model_chain: TransformerChain,
    view_chain: TransformerChain,
    invalid_message: Option<String>,
}

impl FieldBinding {
    /// Start building a binding for the named field
    pub fn builder(name: impl Into<String>) -> FieldBindingBuilder {
        FieldBindingBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transformers between the model and norm representations
    pub fn model_chain(&self) -> &TransformerChain {
        &self.model_chain
    }

    /// Transformers between the norm and view representations
    pub fn view_chain(&self) -> &TransformerChain {
        &self.view_chain
    }

    /// Configured message shown when an inbound chain fails without its own
    pub fn invalid_message(&self) -> Option<&str> {
        self.invalid_message.as_deref()
    }
}

/// Fluent builder for [`FieldBinding`]
pub struct FieldBindingBuilder {
    name: String,
    model_chain: TransformerChain,
    view_chain: TransformerChain,
    invalid_message: Option<String>,
}

impl FieldBindingBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_chain: TransformerChain::new(),
            view_chain: TransformerChain::new(),
            invalid_message: None,
        }
    }

    /// Append a transformer to the model-chain (model to norm)
    pub fn model_transformer(mut self, transformer: Box<dyn Transformer>) -> Self {
        self.model_chain = self.model_chain.push(transformer);
        self
    }

    /// Append a transformer to the view-chain (norm to view)
    pub fn view_transformer(mut self, transformer: Box<dyn Transformer>) -> Self {
        self.view_chain = self.view_chain.push(transformer);
        self
    }

    /// Set the fallback message for inbound failures on this field
    pub fn invalid_message(mut self, message: impl Into<String>) -> Self {
        self.invalid_message = Some(message.into());
        self
    }

    /// Build the binding
    pub fn build(self) -> Result<FieldBinding> {
        if self.name.trim().is_empty() {
            return Err(Error::Configuration {
                message: "field name must not be empty".to_string(),
                field: None,
            });
        }

        Ok(FieldBinding {
            name: self.name,
            model_chain: self.model_chain,
            view_chain: self.view_chain,
            invalid_message: self.invalid_message,
        })
    }
}
