//! Structural validation of loosely-typed specs.
//!
//! The validator works on raw JSON so that it can report problems a typed
//! read would reject outright (non-object specs, a missing `kind`,
//! malformed field entries). Findings accumulate in a
//! [`DiagnosticCollector`]: errors block rendering, warnings are advisory.
//! Diagnostics from composite children are prefixed with `children[i]: `.

use std::str::FromStr;

use log::{debug, trace};
use serde_json::{Map, Value};

use widgetry_core::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    form::{Action, FieldDef, FieldType},
    format::ValueFormat,
    mapping::Mapping,
    shape::DataShape,
    spec::Spec,
    validation::ValidationResult,
};

use crate::{
    catalog::{self, DataExpectation},
    config::AppConfig,
    registry, suggest,
};

/// Layout values accepted by the composite kind.
pub const LAYOUTS: [&str; 4] = ["stack", "grid", "row", "tabs"];

/// The composite kind.
pub const COMPOSE: &str = "compose";

/// Kinds whose `options.format` names a value format.
const FORMATTED_KINDS: [&str; 3] = ["metric", "gauge", "progress"];

/// Validate `spec` at nesting `depth` (0 for a top-level spec).
///
/// # Example
///
/// ```
/// # use widgetry::{config::AppConfig, validate::validate};
/// let result = validate(
///     &serde_json::json!({"kind": "table", "data": {"not": "array"}}),
///     0,
///     &AppConfig::default(),
/// );
///
/// assert!(!result.valid);
/// assert!(result.errors[0].contains("array"));
/// ```
pub fn validate(spec: &Value, depth: usize, config: &AppConfig) -> ValidationResult {
    let result = check_spec(spec, depth, config).finish();
    debug!(
        valid = result.valid,
        errors = result.errors.len(),
        warnings = result.warnings.len();
        "Validated spec"
    );
    result
}

fn check_spec(spec: &Value, depth: usize, config: &AppConfig) -> DiagnosticCollector {
    let mut out = DiagnosticCollector::new();

    let max_depth = config.validation().max_depth();
    if depth > max_depth {
        out.emit(
            Diagnostic::error(format!(
                "composite nesting exceeds the maximum depth of {max_depth}"
            ))
            .with_code(ErrorCode::V001),
        );
        return out;
    }

    let Some(object) = spec.as_object() else {
        out.emit(Diagnostic::error("spec must be an object").with_code(ErrorCode::V002));
        return out;
    };

    let Some(kind) = object
        .get("kind")
        .and_then(Value::as_str)
        .filter(|kind| !kind.trim().is_empty())
    else {
        out.emit(
            Diagnostic::error("spec is missing a non-empty `kind` string")
                .with_code(ErrorCode::V003),
        );
        return out;
    };
    trace!(kind, depth; "Validating spec");

    check_kind(kind, config, &mut out);

    let fields = present(object, "fields");
    let mini_language = present(object, "miniLanguageText");
    if fields.is_some() && mini_language.is_some() {
        out.emit(
            Diagnostic::error("`fields` and `miniLanguageText` are mutually exclusive")
                .with_code(ErrorCode::V004),
        );
    }

    if let Some(data) = present(object, "data") {
        check_data(kind, data, &mut out);
    }
    if kind == COMPOSE {
        check_composite(object, depth, config, &mut out);
    }
    if let Some(fields) = fields {
        check_fields(fields, &mut out);
    }
    if let Some(actions) = present(object, "actions") {
        check_actions(actions, &mut out);
    }
    if let (Some(text), None) = (mini_language, fields) {
        check_mini_language(text, object, &mut out);
    }
    if let Some(mapping) = present(object, "mapping") {
        check_mapping(mapping, present(object, "data"), &mut out);
    }
    if FORMATTED_KINDS.contains(&kind) {
        check_format_option(object, &mut out);
    }

    // Catch wrongly typed keys not covered above, once the targeted
    // checks found nothing.
    if !out.has_errors() {
        if let Err(err) = Spec::from_value(spec.clone()) {
            out.emit(Diagnostic::error(err.to_string()).with_code(ErrorCode::V012));
        }
    }

    out
}

/// A key's value, treating `null` as absent.
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn check_kind(kind: &str, config: &AppConfig, out: &mut DiagnosticCollector) {
    if catalog::is_known(kind) {
        return;
    }
    let mut message = format!("unknown kind '{kind}'");
    if let Some(candidate) = suggest::fuzzy_kind(kind, config.suggest()) {
        message.push_str(&format!("; did you mean '{candidate}'?"));
    }
    out.emit(Diagnostic::warning(message).with_code(ErrorCode::W004));
}

fn check_data(kind: &str, data: &Value, out: &mut DiagnosticCollector) {
    let expectation = catalog::lookup(kind).map_or(DataExpectation::Any, |info| info.data);

    match (expectation, data) {
        (DataExpectation::Sequence, Value::Array(items)) => check_records(items, out),
        (DataExpectation::Sequence, _) => out.emit(
            Diagnostic::error(format!(
                "kind '{kind}' expects `data` to be an array of records"
            ))
            .with_code(ErrorCode::V005),
        ),
        (DataExpectation::Record, Value::Object(_)) => {}
        (DataExpectation::Record, _) => out.emit(
            Diagnostic::error(format!(
                "kind '{kind}' expects `data` to be a single record object"
            ))
            .with_code(ErrorCode::V005),
        ),
        (DataExpectation::Any, Value::Object(_)) => {}
        (DataExpectation::Any, Value::Array(items)) => check_records(items, out),
        (DataExpectation::Any, _) => out.emit(
            Diagnostic::error("`data` must be a record object or an array of records")
                .with_code(ErrorCode::V006),
        ),
    }
}

fn check_records(items: &[Value], out: &mut DiagnosticCollector) {
    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            out.emit(
                Diagnostic::error(format!("data[{index}] is not a record object"))
                    .with_code(ErrorCode::V006),
            );
        }
    }
}

fn check_composite(
    object: &Map<String, Value>,
    depth: usize,
    config: &AppConfig,
    out: &mut DiagnosticCollector,
) {
    match present(object, "children").and_then(Value::as_array) {
        Some(children) if !children.is_empty() => {
            for (index, child) in children.iter().enumerate() {
                let prefix = format!("children[{index}]: ");
                let nested = check_spec(child, depth + 1, config);
                out.extend(
                    nested
                        .into_diagnostics()
                        .into_iter()
                        .map(|diagnostic| diagnostic.with_prefix(&prefix)),
                );
            }
        }
        _ => out.emit(
            Diagnostic::error("kind 'compose' requires a non-empty `children` array")
                .with_code(ErrorCode::V007),
        ),
    }

    if let Some(layout) = present(object, "layout") {
        let known = layout.as_str().is_some_and(|l| LAYOUTS.contains(&l));
        if !known {
            out.emit(
                Diagnostic::error(format!(
                    "invalid layout {layout}; expected one of: {}",
                    LAYOUTS.join(", ")
                ))
                .with_code(ErrorCode::V008),
            );
        }
    }

    if let Some(columns) = present(object, "columns") {
        if !columns.as_u64().is_some_and(|n| n > 0) {
            out.emit(
                Diagnostic::warning(format!(
                    "`columns` should be a positive integer, got {columns}"
                ))
                .with_code(ErrorCode::W005),
            );
        }
    }
}

fn check_fields(fields: &Value, out: &mut DiagnosticCollector) {
    let Some(items) = fields.as_array() else {
        out.emit(Diagnostic::error("`fields` must be an array").with_code(ErrorCode::V009));
        return;
    };

    for (index, item) in items.iter().enumerate() {
        let Some(field) = item.as_object() else {
            out.emit(
                Diagnostic::error(format!("fields[{index}] must be an object"))
                    .with_code(ErrorCode::V009),
            );
            continue;
        };
        if !has_text(field, "id") {
            out.emit(
                Diagnostic::error(format!("fields[{index}] is missing an `id`"))
                    .with_code(ErrorCode::V009),
            );
            continue;
        }
        if let Err(err) = serde_json::from_value::<FieldDef>(item.clone()) {
            out.emit(
                Diagnostic::error(format!("fields[{index}] is malformed: {err}"))
                    .with_code(ErrorCode::V009),
            );
            continue;
        }
        if let Some(tag) = field.get("type").and_then(Value::as_str) {
            if !FieldType::from(tag.to_string()).is_known() {
                out.emit(
                    Diagnostic::warning(format!("fields[{index}] has unknown type '{tag}'"))
                        .with_code(ErrorCode::W001),
                );
            }
        }
    }
}

fn check_actions(actions: &Value, out: &mut DiagnosticCollector) {
    let Some(items) = actions.as_array() else {
        out.emit(Diagnostic::error("`actions` must be an array").with_code(ErrorCode::V010));
        return;
    };

    for (index, item) in items.iter().enumerate() {
        let Some(action) = item.as_object() else {
            out.emit(
                Diagnostic::error(format!("actions[{index}] must be an object"))
                    .with_code(ErrorCode::V010),
            );
            continue;
        };
        let missing: Vec<_> = ["id", "label"]
            .into_iter()
            .filter(|key| !has_text(action, key))
            .map(|key| format!("`{key}`"))
            .collect();
        if !missing.is_empty() {
            out.emit(
                Diagnostic::error(format!(
                    "actions[{index}] is missing {}",
                    missing.join(" and ")
                ))
                .with_code(ErrorCode::V010),
            );
            continue;
        }
        if let Err(err) = serde_json::from_value::<Action>(item.clone()) {
            out.emit(
                Diagnostic::error(format!("actions[{index}] is malformed: {err}"))
                    .with_code(ErrorCode::V010),
            );
        }
    }
}

fn has_text(object: &Map<String, Value>, key: &str) -> bool {
    object
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|text| !text.trim().is_empty())
}

fn check_mini_language(text: &Value, object: &Map<String, Value>, out: &mut DiagnosticCollector) {
    let Some(text) = text.as_str() else {
        out.emit(
            Diagnostic::error("`miniLanguageText` must be a string").with_code(ErrorCode::V012),
        );
        return;
    };

    let context = present(object, "data").and_then(|data| match data {
        Value::Object(record) => Some(record),
        Value::Array(items) => items.first().and_then(Value::as_object),
        _ => None,
    });
    if let Err(err) = registry::active_parser().parse(text, context) {
        out.emit(
            Diagnostic::warning(format!("miniLanguageText failed to parse: {err}"))
                .with_code(ErrorCode::W002),
        );
    }
}

fn check_mapping(mapping: &Value, data: Option<&Value>, out: &mut DiagnosticCollector) {
    if !mapping.is_object() {
        out.emit(Diagnostic::error("`mapping` must be an object").with_code(ErrorCode::V011));
        return;
    }
    let typed = match serde_json::from_value::<Mapping>(mapping.clone()) {
        Ok(typed) => typed,
        Err(err) => {
            out.emit(
                Diagnostic::error(format!("`mapping` is malformed: {err}"))
                    .with_code(ErrorCode::V011),
            );
            return;
        }
    };

    let Some(shape) = data.and_then(DataShape::of_value) else {
        return;
    };
    for (channel, names) in typed.field_references() {
        for name in names {
            if !shape.has_key(name) {
                out.emit(
                    Diagnostic::warning(format!(
                        "mapping.{channel} references unknown field '{name}'; available fields: {}",
                        shape.keys().join(", ")
                    ))
                    .with_code(ErrorCode::W003),
                );
            }
        }
    }
}

fn check_format_option(object: &Map<String, Value>, out: &mut DiagnosticCollector) {
    let format = present(object, "options")
        .and_then(|options| options.get("format"))
        .and_then(Value::as_str);
    if let Some(format) = format {
        if let Err(err) = ValueFormat::from_str(format) {
            out.emit(
                Diagnostic::warning(format!("options.format: {err}")).with_code(ErrorCode::W006),
            );
        }
    }
}
