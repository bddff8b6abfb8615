//! Formbridge Core - model/norm/view transformation pipeline for forms
//!
//! This crate converts a field's value between three representations: an
//! application-internal model representation, a normalized intermediate
//! representation, and a view representation used for rendering and raw
//! submission. Inbound conversion failures are collected per field as
//! user-presentable validation messages.
//!
//! # Main Components
//!
//! - **Error Handling**: fatal programmer/configuration errors via `thiserror`,
//!   field-scoped recoverable failures as an explicit result type
//! - **Transformer**: a bidirectional conversion unit between two adjacent
//!   representations
//! - **TransformerChain**: ordered composition with direction-dependent
//!   iteration order
//! - **FormPipeline**: the driver for outbound (render) and inbound (submit)
//!   passes across all bound fields
//!
//! # Example
//!
//! ```
//! use formbridge_core::pipeline::{built_in, FieldBinding, FormPipeline};
//! use serde_json::json;
//!
//! # fn main() -> formbridge_core::Result<()> {
//! let pipeline = FormPipeline::builder()
//!     .field(
//!         FieldBinding::builder("tags")
//!             .model_transformer(built_in::tags())
//!             .build()?,
//!     )
//!     .build()?;
//!
//! let view = pipeline.render(&json!({"tags": ["a", "b", "c"]}))?;
//! assert_eq!(view["tags"], json!("a, b, c"));
//!
//! let mut model = json!({});
//! let report = pipeline.submit(&view, &mut model)?;
//! assert!(report.is_valid());
//! assert_eq!(model["tags"], json!(["a", "b", "c"]));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod pipeline;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use pipeline::{
    // Transformation contract
    ReverseResult, Transformer, TransformerChain,

    // Failures and message resolution
    PublicMessage, TransformationFailure, GENERIC_INVALID_MESSAGE,

    // Field configuration
    FieldBinding, FieldBindingBuilder,

    // Driver
    FieldOutcome, FieldState, FormPipeline, FormPipelineBuilder, SubmissionReport,

    // Lookup collaborator
    EntityLookup, InMemoryLookup, LookupError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
