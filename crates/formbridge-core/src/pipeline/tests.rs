//! Tests for the transformation pipeline core
//!
//! Covers chain composition order, short-circuit semantics, null/empty
//! conventions for every built-in transformer, message resolution
//! precedence, and driver behavior.
//!
//! Copyright (c) 2025 Formbridge Team
//! Licensed under the Apache-2.0 license

#[cfg(test)]
mod tests {
    use crate::pipeline::built_in::{
        self, BooleanToString, CollectionToDelimitedString, DateTimeToString, EntityToId,
        NumberToString, Trim,
    };
    use crate::pipeline::chain::TransformerChain;
    use crate::pipeline::failure::TransformationFailure;
    use crate::pipeline::field::FieldBinding;
    use crate::pipeline::lookup::{EntityLookup, InMemoryLookup, LookupError};
    use crate::pipeline::transformer::{ReverseResult, Transformer};
    use crate::pipeline::FormPipeline;
    use crate::Error;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Appends its tag on both directions so composition order is observable
    #[derive(Debug)]
    struct Tagging {
        tag: &'static str,
    }

    impl Tagging {
        fn boxed(tag: &'static str) -> Box<dyn Transformer> {
            Box::new(Self { tag })
        }
    }

    impl Transformer for Tagging {
        fn transform(&self, value: &Value) -> crate::Result<Value> {
            let text = value.as_str().unwrap_or_default();
            Ok(Value::String(format!("{text}>{}", self.tag)))
        }

        fn reverse_transform(&self, value: &Value) -> ReverseResult {
            let text = value.as_str().unwrap_or_default();
            Ok(Value::String(format!("{text}<{}", self.tag)))
        }

        fn name(&self) -> &str {
            self.tag
        }
    }

    /// Counts inbound invocations, optionally failing
    #[derive(Debug)]
    struct Counting {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Counting {
        fn boxed(calls: Arc<AtomicUsize>, fail: bool) -> Box<dyn Transformer> {
            Box::new(Self { calls, fail })
        }
    }

    impl Transformer for Counting {
        fn transform(&self, value: &Value) -> crate::Result<Value> {
            Ok(value.clone())
        }

        fn reverse_transform(&self, value: &Value) -> ReverseResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(TransformationFailure::new("counting transformer failed"))
            } else {
                Ok(value.clone())
            }
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    // --- Chain composition -------------------------------------------------

    #[test]
    fn test_forward_runs_in_declaration_order() {
        let chain = TransformerChain::new()
            .push(Tagging::boxed("t1"))
            .push(Tagging::boxed("t2"))
            .push(Tagging::boxed("t3"));

        let result = chain.apply_forward(&json!("v")).unwrap();
        assert_eq!(result, json!("v>t1>t2>t3"));
    }

    #[test]
    fn test_backward_runs_in_exact_reverse_order() {
        let chain = TransformerChain::new()
            .push(Tagging::boxed("t1"))
            .push(Tagging::boxed("t2"))
            .push(Tagging::boxed("t3"));

        let result = chain.apply_backward(&json!("v")).unwrap();
        assert_eq!(result, json!("v<t3<t2<t1"));
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = TransformerChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.apply_forward(&json!({"a": 1})).unwrap(), json!({"a": 1}));
        assert_eq!(chain.apply_backward(&json!("raw")).unwrap(), json!("raw"));
    }

    #[test]
    fn test_backward_short_circuits_on_first_failure() {
        let c1 = Arc::new(AtomicUsize::new(0));
        let c2 = Arc::new(AtomicUsize::new(0));
        let c3 = Arc::new(AtomicUsize::new(0));

        // Backward order is t3, t2, t1; t2 fails, so t1 must never run.
        let chain = TransformerChain::new()
            .push(Counting::boxed(c1.clone(), false))
            .push(Counting::boxed(c2.clone(), true))
            .push(Counting::boxed(c3.clone(), false));

        let result = chain.apply_backward(&json!("v"));
        assert!(result.is_err());
        assert_eq!(c3.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 1);
        assert_eq!(c1.load(Ordering::SeqCst), 0);
    }

    // --- Null/empty conventions --------------------------------------------

    #[test]
    fn test_transform_null_never_fails_for_built_ins() {
        let lookup: Arc<dyn EntityLookup> = Arc::new(InMemoryLookup::new());
        let transformers: Vec<Box<dyn Transformer>> = vec![
            Box::new(NumberToString::new()),
            Box::new(BooleanToString::default()),
            Box::new(CollectionToDelimitedString::default()),
            Box::new(EntityToId::new(lookup)),
            Box::new(Trim::new()),
            Box::new(DateTimeToString::default()),
        ];

        for transformer in &transformers {
            let result = transformer.transform(&Value::Null);
            assert!(
                result.is_ok(),
                "{} failed on null input",
                transformer.name()
            );
            // Every built-in here renders into a string representation whose
            // canonical empty value is the empty string.
            assert_eq!(
                result.unwrap(),
                json!(""),
                "{} empty value mismatch",
                transformer.name()
            );
        }
    }

    // --- Built-in transformers ---------------------------------------------

    #[test]
    fn test_number_round_trip() {
        let t = NumberToString::new();
        assert_eq!(t.transform(&json!(42)).unwrap(), json!("42"));
        assert_eq!(t.reverse_transform(&json!("42")).unwrap(), json!(42));
        assert_eq!(t.reverse_transform(&json!("3.5")).unwrap(), json!(3.5));
    }

    #[test]
    fn test_number_empty_input_is_model_absence() {
        let t = NumberToString::new();
        assert_eq!(t.reverse_transform(&json!("")).unwrap(), Value::Null);
        assert_eq!(t.reverse_transform(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_number_parse_failure_carries_raw_value() {
        let t = NumberToString::new();
        let failure = t.reverse_transform(&json!("abc")).unwrap_err();
        assert!(failure.internal_message().contains("abc"));
        assert!(failure.resolve_public_message(None).contains("\"abc\""));
    }

    #[test]
    fn test_number_rejects_non_finite() {
        let t = NumberToString::new();
        assert!(t.reverse_transform(&json!("NaN")).is_err());
        assert!(t.reverse_transform(&json!("inf")).is_err());
    }

    #[test]
    fn test_checkbox_conventions() {
        let t = BooleanToString::default();
        assert_eq!(t.transform(&json!(true)).unwrap(), json!("1"));
        assert_eq!(t.transform(&json!(false)).unwrap(), json!(""));
        assert_eq!(t.reverse_transform(&json!("1")).unwrap(), json!(true));
        assert_eq!(t.reverse_transform(&json!("")).unwrap(), json!(false));
        // Any non-empty submission counts as checked.
        assert_eq!(t.reverse_transform(&json!("on")).unwrap(), json!(true));
        assert_eq!(t.reverse_transform(&Value::Null).unwrap(), json!(false));
    }

    #[test]
    fn test_collection_joins_and_splits() {
        let t = CollectionToDelimitedString::default();
        assert_eq!(
            t.transform(&json!(["a", "b", "c"])).unwrap(),
            json!("a, b, c")
        );
        assert_eq!(
            t.reverse_transform(&json!("a, b, c")).unwrap(),
            json!(["a", "b", "c"])
        );
    }

    #[test]
    fn test_collection_backward_trims_and_drops_empty_segments() {
        let t = CollectionToDelimitedString::default();
        assert_eq!(
            t.reverse_transform(&json!(" a ,b,, c ")).unwrap(),
            json!(["a", "b", "c"])
        );
        assert_eq!(t.reverse_transform(&json!("")).unwrap(), json!([]));
    }

    #[test]
    fn test_collection_forward_rejects_nested_values() {
        let t = CollectionToDelimitedString::default();
        let err = t.transform(&json!([["nested"]])).unwrap_err();
        assert!(matches!(err, Error::Contract { .. }));
    }

    #[test]
    fn test_entity_forward_extracts_id() {
        let lookup: Arc<dyn EntityLookup> = Arc::new(InMemoryLookup::new());
        let t = EntityToId::new(lookup);
        assert_eq!(
            t.transform(&json!({"id": 55, "title": "Bug"})).unwrap(),
            json!("55")
        );
        assert_eq!(t.transform(&Value::Null).unwrap(), json!(""));
    }

    #[test]
    fn test_entity_backward_resolves_through_lookup() {
        let lookup: Arc<dyn EntityLookup> =
            Arc::new(InMemoryLookup::new().insert("55", json!({"id": 55, "title": "Bug"})));
        let t = EntityToId::new(lookup);
        assert_eq!(
            t.reverse_transform(&json!("55")).unwrap(),
            json!({"id": 55, "title": "Bug"})
        );
        // Optional field: empty input is model-absence, not a failure.
        assert_eq!(t.reverse_transform(&json!("")).unwrap(), Value::Null);
    }

    #[test]
    fn test_entity_backward_not_found_is_a_failure() {
        let lookup: Arc<dyn EntityLookup> = Arc::new(InMemoryLookup::new());
        let t = EntityToId::new(lookup);
        let failure = t.reverse_transform(&json!("99")).unwrap_err();
        assert!(failure.resolve_public_message(None).contains("\"99\""));
    }

    #[test]
    fn test_entity_backend_error_stays_internal() {
        #[derive(Debug)]
        struct Broken;
        impl EntityLookup for Broken {
            fn resolve(&self, _key: &str) -> std::result::Result<Value, LookupError> {
                Err(LookupError::Backend {
                    message: "store offline".to_string(),
                })
            }
        }

        let t = EntityToId::new(Arc::new(Broken));
        let failure = t.reverse_transform(&json!("55")).unwrap_err();
        assert!(failure.internal_message().contains("store offline"));
        assert!(!failure.resolve_public_message(None).contains("store offline"));
    }

    #[test]
    fn test_trim_backward() {
        let t = Trim::new();
        assert_eq!(t.reverse_transform(&json!("  x  ")).unwrap(), json!("x"));
        assert_eq!(t.transform(&Value::Null).unwrap(), json!(""));
    }

    #[test]
    fn test_datetime_round_trip() {
        let t = DateTimeToString::default();
        assert_eq!(
            t.transform(&json!("2024-03-01T12:30:00+00:00")).unwrap(),
            json!("2024-03-01 12:30")
        );
        assert_eq!(
            t.reverse_transform(&json!("2024-03-01 12:30")).unwrap(),
            json!("2024-03-01T12:30:00+00:00")
        );
    }

    #[test]
    fn test_datetime_parse_failure() {
        let t = DateTimeToString::default();
        let failure = t.reverse_transform(&json!("not a date")).unwrap_err();
        assert!(failure.resolve_public_message(None).contains("not a date"));
    }

    // --- Field bindings and pipeline construction --------------------------

    #[test]
    fn test_field_binding_rejects_empty_name() {
        let err = FieldBinding::builder("  ").build().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_pipeline_rejects_duplicate_fields() {
        let result = FormPipeline::builder()
            .field(FieldBinding::builder("tags").build().unwrap())
            .field(FieldBinding::builder("tags").build().unwrap())
            .build();
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_unknown_field_lookup() {
        let pipeline = FormPipeline::builder().build().unwrap();
        assert!(matches!(
            pipeline.field("missing"),
            Err(Error::UnknownField { .. })
        ));
    }

    // --- Driver behavior ----------------------------------------------------

    /// Always fails inbound, optionally with a public template
    #[derive(Debug)]
    struct AlwaysFailing {
        public: bool,
    }

    impl Transformer for AlwaysFailing {
        fn transform(&self, value: &Value) -> crate::Result<Value> {
            Ok(value.clone())
        }

        fn reverse_transform(&self, _value: &Value) -> ReverseResult {
            let failure = TransformationFailure::new("inbound always fails");
            if self.public {
                Err(failure
                    .with_public_message("Custom: {{ value }}")
                    .with_parameter("value", json!("detail")))
            } else {
                Err(failure)
            }
        }

        fn name(&self) -> &str {
            "always_failing"
        }
    }

    #[test]
    fn test_failure_template_beats_field_invalid_message() {
        let pipeline = FormPipeline::builder()
            .field(
                FieldBinding::builder("f")
                    .model_transformer(Box::new(AlwaysFailing { public: true }))
                    .invalid_message("Field message.")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let mut model = json!({});
        let report = pipeline
            .submit(&BTreeMap::from([("f".to_string(), json!("x"))]), &mut model)
            .unwrap();
        assert_eq!(report.outcome("f").unwrap().message(), Some("Custom: detail"));
    }

    #[test]
    fn test_field_invalid_message_used_when_no_template() {
        let pipeline = FormPipeline::builder()
            .field(
                FieldBinding::builder("f")
                    .model_transformer(Box::new(AlwaysFailing { public: false }))
                    .invalid_message("Field message.")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let mut model = json!({});
        let report = pipeline
            .submit(&BTreeMap::from([("f".to_string(), json!("x"))]), &mut model)
            .unwrap();
        assert_eq!(report.outcome("f").unwrap().message(), Some("Field message."));
    }

    #[test]
    fn test_generic_fallback_message() {
        let pipeline = FormPipeline::builder()
            .field(
                FieldBinding::builder("f")
                    .model_transformer(Box::new(AlwaysFailing { public: false }))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let mut model = json!({});
        let report = pipeline
            .submit(&BTreeMap::from([("f".to_string(), json!("x"))]), &mut model)
            .unwrap();
        assert_eq!(
            report.outcome("f").unwrap().message(),
            Some(crate::pipeline::GENERIC_INVALID_MESSAGE)
        );
    }

    #[test]
    fn test_submit_initializes_null_model() {
        let pipeline = FormPipeline::builder()
            .field(
                FieldBinding::builder("n")
                    .model_transformer(built_in::number_to_string())
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let mut model = Value::Null;
        let report = pipeline
            .submit(&BTreeMap::from([("n".to_string(), json!("7"))]), &mut model)
            .unwrap();
        assert!(report.is_valid());
        assert_eq!(model, json!({"n": 7}));
    }

    #[test]
    fn test_submit_rejects_non_object_model() {
        let pipeline = FormPipeline::builder().build().unwrap();
        let mut model = json!([1, 2, 3]);
        let result = pipeline.submit(&BTreeMap::new(), &mut model);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_render_surfaces_contract_violations() {
        #[derive(Debug)]
        struct BrokenOutbound;
        impl Transformer for BrokenOutbound {
            fn transform(&self, _value: &Value) -> crate::Result<Value> {
                Err(Error::Contract {
                    transformer: "broken_outbound".to_string(),
                    message: "always broken".to_string(),
                })
            }
            fn reverse_transform(&self, value: &Value) -> ReverseResult {
                Ok(value.clone())
            }
            fn name(&self) -> &str {
                "broken_outbound"
            }
        }

        let pipeline = FormPipeline::builder()
            .field(
                FieldBinding::builder("f")
                    .model_transformer(Box::new(BrokenOutbound))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let result = pipeline.render(&json!({"f": 1}));
        assert!(matches!(result, Err(Error::Contract { .. })));
    }

    #[test]
    fn test_missing_view_value_reads_as_empty() {
        let pipeline = FormPipeline::builder()
            .field(
                FieldBinding::builder("n")
                    .model_transformer(built_in::number_to_string())
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let mut model = json!({});
        let report = pipeline.submit(&BTreeMap::new(), &mut model).unwrap();
        assert!(report.is_valid());
        assert_eq!(model["n"], Value::Null);
    }
}
