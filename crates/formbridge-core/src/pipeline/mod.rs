//! Bidirectional model/norm/view transformation pipeline
//!
//! This module contains the whole transformation core: the transformer
//! contract, ordered chains, field bindings, the injected lookup boundary,
//! and the driver that runs the outbound and inbound passes.
//!
//! # Module Organization
//!
//! - [`transformer`] - The bidirectional [`Transformer`] contract
//! - [`chain`] - Ordered composition of transformers per field role
//! - [`failure`] - Field-scoped failures and public message resolution
//! - [`lookup`] - Injected entity-resolution collaborator
//! - [`field`] - Field bindings and their builder
//! - [`driver`] - The outbound/inbound pass driver and submission report
//! - [`built_in`] - Concrete transformers for common field shapes
//!
//! Copyright (c) 2025 Formbridge Team
//! Licensed under the Apache-2.0 license

pub mod built_in;
pub mod chain;
pub mod driver;
pub mod failure;
pub mod field;
pub mod lookup;
pub mod transformer;

#[cfg(test)]
mod tests;

pub use chain::TransformerChain;
pub use driver::{FieldOutcome, FieldState, FormPipeline, FormPipelineBuilder, SubmissionReport};
pub use failure::{PublicMessage, TransformationFailure, GENERIC_INVALID_MESSAGE};
pub use field::{FieldBinding, FieldBindingBuilder};
pub use lookup::{EntityLookup, InMemoryLookup, LookupError};
pub use transformer::{ReverseResult, Transformer};
