//! Spec canonicalization.
//!
//! Normalization migrates the legacy `mapping.fields` location to the top
//! level and expands mini-language source into fields and actions. It is
//! pure: the input spec is never modified, caller-supplied `fields` and
//! `actions` are never overwritten, and parse failures degrade to "no
//! fields produced" with a logged warning.

use log::{debug, warn};

use widgetry_core::{
    form::FieldDef,
    mapping::{Mapping, NormalizedMapping},
    spec::{Data, Spec},
};
use widgetry_parser::FormParser;

use crate::registry;

/// The legacy mapping key that held field definitions.
const LEGACY_FIELDS_KEY: &str = "fields";

/// Normalize `spec` using the currently active mini-language parser.
pub fn normalize(spec: &Spec) -> Spec {
    let parser = registry::active_parser();
    normalize_with(spec, parser.as_ref())
}

/// Normalize `spec` using `parser` for mini-language expansion.
///
/// Children of a composite spec are normalized recursively.
pub fn normalize_with(spec: &Spec, parser: &dyn FormParser) -> Spec {
    let mut normalized = spec.clone();

    if normalized.fields.is_none() {
        migrate_legacy_fields(&mut normalized);
    }
    if normalized.fields.is_none() {
        expand_mini_language(&mut normalized, parser);
    }

    if let Some(children) = normalized.children.as_mut() {
        for child in children.iter_mut() {
            *child = normalize_with(child, parser);
        }
    }

    normalized
}

/// Widen the multi-capable channel of `mapping` to list form.
pub fn normalize_mapping(mapping: Mapping) -> NormalizedMapping {
    NormalizedMapping::new(mapping)
}

fn migrate_legacy_fields(spec: &mut Spec) {
    let Some(mapping) = spec.mapping.as_mut() else {
        return;
    };
    let Some(legacy) = mapping.extra.get(LEGACY_FIELDS_KEY) else {
        return;
    };

    match serde_json::from_value::<Vec<FieldDef>>(legacy.clone()) {
        Ok(fields) => {
            mapping.extra.shift_remove(LEGACY_FIELDS_KEY);
            debug!(kind = spec.kind, count = fields.len(); "Moved legacy mapping.fields to top level");
            spec.fields = Some(fields);
            if mapping.is_empty() {
                spec.mapping = None;
            }
        }
        Err(err) => {
            warn!(kind = spec.kind, err:% = err; "Ignoring unreadable legacy mapping.fields");
        }
    }
}

fn expand_mini_language(spec: &mut Spec, parser: &dyn FormParser) {
    let Some(text) = spec.mini_language_text.as_deref() else {
        return;
    };

    let context = spec.data.as_ref().and_then(Data::sample);
    match parser.parse(text, context) {
        Ok(form) => {
            debug!(
                kind = spec.kind,
                fields = form.fields.len(),
                actions = form.actions.len();
                "Expanded mini-language source"
            );
            spec.fields = Some(form.fields);
            if spec.actions.is_none() {
                spec.actions = Some(form.actions);
            }
        }
        Err(err) => {
            warn!(kind = spec.kind, err:% = err; "Mini-language source failed to parse; no fields produced");
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::{Value, json};

    use widgetry_core::{
        form::{Action, ActionStyle, FieldType, Form},
        mapping::Channel,
        spec::Record,
    };
    use widgetry_parser::{BuiltinParser, ParseError};

    use super::*;

    fn spec(value: Value) -> Spec {
        Spec::from_value(value).unwrap()
    }

    fn normalize(spec: &Spec) -> Spec {
        normalize_with(spec, &BuiltinParser)
    }

    struct FailingParser;

    impl FormParser for FailingParser {
        fn parse(&self, _text: &str, _context: Option<&Record>) -> Result<Form, ParseError> {
            Err(ParseError::custom("unsupported syntax"))
        }
    }

    struct ContextEcho;

    impl FormParser for ContextEcho {
        fn parse(&self, _text: &str, context: Option<&Record>) -> Result<Form, ParseError> {
            let fields = context
                .into_iter()
                .flat_map(|record| record.keys())
                .map(FieldDef::new)
                .collect();
            Ok(Form {
                fields,
                actions: Vec::new(),
            })
        }
    }

    #[test]
    fn test_legacy_fields_moved_and_empty_mapping_dropped() {
        let input = spec(json!({
            "kind": "form",
            "mapping": {"fields": [{"id": "name", "label": "Name"}]}
        }));

        let output = normalize(&input);

        assert_eq!(output.fields.as_ref().map(Vec::len), Some(1));
        assert!(output.mapping.is_none());
        assert!(input.mapping.is_some(), "input must be left untouched");
    }

    #[test]
    fn test_legacy_fields_keep_remaining_mapping_keys() {
        let output = normalize(&spec(json!({
            "kind": "form",
            "mapping": {"fields": [{"id": "name"}], "label": "name", "custom": 1}
        })));

        let mapping = output.mapping.unwrap();
        assert_eq!(mapping.label.as_deref(), Some("name"));
        assert_eq!(mapping.extra.get("custom"), Some(&json!(1)));
        assert!(!mapping.extra.contains_key("fields"));
    }

    #[test]
    fn test_legacy_fields_ignored_when_top_level_present() {
        let input = spec(json!({
            "kind": "form",
            "fields": [{"id": "email"}],
            "mapping": {"fields": [{"id": "name"}]}
        }));

        let output = normalize(&input);

        assert_eq!(output.fields, input.fields);
        assert_eq!(output.mapping, input.mapping);
    }

    #[test]
    fn test_unreadable_legacy_fields_left_in_place() {
        let input = spec(json!({"kind": "form", "mapping": {"fields": "name,email"}}));

        let output = normalize(&input);

        assert!(output.fields.is_none());
        assert_eq!(output.mapping, input.mapping);
    }

    #[test]
    fn test_mini_language_expanded() {
        let output = normalize(&spec(json!({
            "kind": "form",
            "miniLanguageText": "@name*(Name): []\n@[submit \"Save\"]"
        })));

        let fields = output.fields.unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type, FieldType::Text);
        assert!(fields[0].required);
        assert_eq!(output.actions.unwrap()[0].style, Some(ActionStyle::Primary));
        assert!(output.mini_language_text.is_some());
    }

    #[test]
    fn test_mini_language_keeps_caller_actions() {
        let input = spec(json!({
            "kind": "form",
            "miniLanguageText": "@name: \n@[submit]",
            "actions": [{"id": "go", "label": "Go"}]
        }));

        let output = normalize(&input);

        assert_eq!(output.fields.map(|f| f.len()), Some(1));
        assert_eq!(output.actions, Some(vec![Action::new("go", "Go")]));
    }

    #[test]
    fn test_parse_failure_is_fail_soft() {
        let input = spec(json!({"kind": "form", "miniLanguageText": "@age: #[min=old]"}));

        let builtin = normalize(&input);
        let replaced = normalize_with(&input, &FailingParser);

        for output in [builtin, replaced] {
            assert!(output.fields.is_none());
            assert!(output.actions.is_none());
        }
    }

    #[test]
    fn test_parser_receives_data_sample() {
        let output = normalize_with(
            &spec(json!({
                "kind": "form",
                "miniLanguageText": "anything",
                "data": [{"user": "ada", "plan": "pro"}]
            })),
            &ContextEcho,
        );

        let ids: Vec<_> = output.fields.unwrap().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["user", "plan"]);
    }

    #[test]
    fn test_children_normalized() {
        let output = normalize(&spec(json!({
            "kind": "compose",
            "children": [{"kind": "form", "miniLanguageText": "@q: "}]
        })));

        let children = output.children.unwrap();
        assert_eq!(children[0].fields.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let input = spec(json!({"kind": "chart.bar", "theme": "dark", "mapping": {"stack": "a"}}));

        let output = normalize(&input);

        assert_eq!(output.extra.get("theme"), Some(&json!("dark")));
        assert_eq!(output, input);
    }

    #[test]
    fn test_normalize_mapping_widens_value() {
        let single: Mapping = serde_json::from_value(json!({"category": "c", "value": "v"})).unwrap();
        let absent: Mapping = serde_json::from_value(json!({"category": "c"})).unwrap();

        let widened = normalize_mapping(single);
        assert_eq!(widened.value(), Some(&["v".to_string()][..]));
        assert_eq!(widened.mapping().category.as_deref(), Some("c"));
        assert_eq!(normalize_mapping(absent).value(), None);
    }

    // =============================================================================
    // Property-based Tests
    // =============================================================================

    fn arb_spec() -> impl Strategy<Value = Spec> {
        let field = "[a-z]{1,8}".prop_map(FieldDef::new);
        (
            prop::option::of(prop::collection::vec(field.clone(), 0..4)),
            prop::option::of(prop::collection::vec(field, 0..4)),
            prop::option::of(prop_oneof![
                Just("@name*(Name): []\n@[submit \"Save\"]".to_string()),
                Just("@age: #[min=x]".to_string()),
                "[@a-z:\\[\\]\n ]{0,30}",
            ]),
            prop::option::of(prop_oneof![Just("v".to_string()), Just("w".to_string())]),
        )
            .prop_map(|(fields, legacy, text, value)| {
                let mut spec = Spec::new("form");
                spec.fields = fields;
                spec.mini_language_text = text;
                if legacy.is_some() || value.is_some() {
                    let mut mapping = Mapping {
                        value: value.map(Channel::Field),
                        ..Mapping::default()
                    };
                    if let Some(legacy) = legacy {
                        mapping
                            .extra
                            .insert("fields".to_string(), serde_json::to_value(legacy).unwrap());
                    }
                    spec.mapping = Some(mapping);
                }
                spec
            })
    }

    /// `normalize(normalize(x)) == normalize(x)`.
    fn check_idempotent(spec: &Spec) {
        let once = normalize(spec);
        let twice = normalize(&once);

        assert_eq!(once, twice);
    }

    /// Caller-supplied fields survive normalization unchanged.
    fn check_non_destructive(spec: &Spec) {
        let output = normalize(spec);

        if spec.fields.is_some() {
            assert_eq!(output.fields, spec.fields);
        }
        if spec.actions.is_some() {
            assert_eq!(output.actions, spec.actions);
        }
        assert_eq!(output.mini_language_text, spec.mini_language_text);
    }

    /// The value channel of a normalized mapping is always a list.
    fn check_widening(value: Option<Channel>) {
        let was_present = value.is_some();
        let normalized = normalize_mapping(Mapping {
            value,
            ..Mapping::default()
        });

        assert_eq!(normalized.value().is_some(), was_present);
        assert!(!matches!(normalized.mapping().value, Some(Channel::Field(_))));
    }

    // =============================================================================
    // Proptest Wrappers
    // =============================================================================

    proptest! {
        #[test]
        fn normalize_idempotent(spec in arb_spec()) {
            check_idempotent(&spec);
        }

        #[test]
        fn normalize_non_destructive(spec in arb_spec()) {
            check_non_destructive(&spec);
        }

        #[test]
        fn mapping_widening(value in prop::option::of(prop_oneof![
            "[a-z]{1,6}".prop_map(Channel::Field),
            prop::collection::vec("[a-z]{1,6}", 0..4).prop_map(Channel::Fields),
        ])) {
            check_widening(value);
        }
    }
}
