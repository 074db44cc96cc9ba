//! Elaboration of raw parsed lines into typed fields and actions.
//!
//! Type markers and attribute text are interpreted here. Problems are
//! reported as diagnostics carrying the 1-based source line.

use log::trace;

use widgetry_core::{
    error::{Diagnostic, ErrorCode},
    form::{Action, ActionStyle, FieldDef, FieldType},
};

use crate::{
    parser::attribute_entries,
    parser_types::{RawAction, RawField},
};

/// Resolve a type marker to a field type and, for multi-line areas, a row count.
fn resolve_marker(marker: &str) -> Option<(FieldType, Option<u32>)> {
    let field_type = match marker {
        "" => FieldType::Text,
        "@" => FieldType::Email,
        "#" => FieldType::Number,
        "*" => FieldType::Password,
        "p" => FieldType::Phone,
        "u" => FieldType::Url,
        "d" => FieldType::Date,
        "D" => FieldType::Datetime,
        "t" => FieldType::Time,
        "s" => FieldType::Select,
        "r" => FieldType::Radio,
        "c" => FieldType::Checkbox,
        "b" => FieldType::Toggle,
        "~" => FieldType::Range,
        "m" => FieldType::Multiselect,
        _ => return multiline_marker(marker).map(|rows| (FieldType::Multiline, Some(rows))),
    };
    Some((field_type, None))
}

/// `T4`, `A12`, ...: one capital letter followed by the row count.
fn multiline_marker(marker: &str) -> Option<u32> {
    let mut chars = marker.chars();
    let first = chars.next()?;
    let digits = chars.as_str();
    if !first.is_ascii_uppercase()
        || digits.is_empty()
        || !digits.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok()
}

/// Turn an identifier into a display label: `first_name` becomes `First name`.
pub(crate) fn humanize(id: &str) -> String {
    let spaced: String = id
        .chars()
        .map(|c| if matches!(c, '_' | '-' | '.') { ' ' } else { c })
        .collect();
    let mut words = spaced.split_whitespace();
    let mut label = String::with_capacity(id.len());
    if let Some(first) = words.next() {
        let mut chars = first.chars();
        if let Some(head) = chars.next() {
            label.extend(head.to_uppercase());
            label.push_str(chars.as_str());
        }
    }
    for word in words {
        label.push(' ');
        label.push_str(word);
    }
    label
}

fn parse_number(key: &str, value: &str, line: usize) -> Result<f64, Diagnostic> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| {
            Diagnostic::error(format!("attribute `{key}` expects a number, got `{value}`"))
                .with_code(ErrorCode::M001)
                .with_line(line)
        })
}

fn parse_count(key: &str, value: &str, line: usize) -> Result<u32, Diagnostic> {
    value.parse::<u32>().map_err(|_| {
        Diagnostic::error(format!(
            "attribute `{key}` expects a non-negative integer, got `{value}`"
        ))
        .with_code(ErrorCode::M001)
        .with_line(line)
    })
}

/// Apply `key=value` attribute text to a field.
///
/// Unrecognized keys and entries without `=` are ignored.
fn apply_attributes(field: &mut FieldDef, text: &str, line: usize) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (key, value) in attribute_entries(text) {
        let result = match key {
            "min" => parse_number(key, value, line).map(|n| field.min = Some(n)),
            "max" => parse_number(key, value, line).map(|n| field.max = Some(n)),
            "step" => parse_number(key, value, line).map(|n| field.step = Some(n)),
            "minLength" => parse_count(key, value, line).map(|n| field.min_length = Some(n)),
            "maxLength" => parse_count(key, value, line).map(|n| field.max_length = Some(n)),
            "rows" => parse_count(key, value, line).map(|n| field.rows = Some(n)),
            "placeholder" => {
                field.placeholder = Some(value.to_string());
                Ok(())
            }
            _ => {
                trace!(key, line; "Ignoring unrecognized attribute");
                Ok(())
            }
        };

        if let Err(diagnostic) = result {
            diagnostics.push(diagnostic);
        }
    }

    diagnostics
}

/// Build a typed field from a raw field line.
///
/// # Errors
///
/// Returns every diagnostic found on the line: an unknown marker (M002)
/// and any attribute with an invalid value (M001).
pub(crate) fn field(raw: RawField<'_>, line: usize) -> Result<FieldDef, Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();

    let (field_type, rows) = resolve_marker(raw.marker).unwrap_or_else(|| {
        diagnostics.push(
            Diagnostic::error(format!(
                "unknown type marker `{}` on field `{}`",
                raw.marker, raw.id
            ))
            .with_code(ErrorCode::M002)
            .with_line(line)
            .with_help("use one of: (empty), @ # * p u d D t s r c b ~ m, or T<rows>"),
        );
        (FieldType::Text, None)
    });

    let mut field = FieldDef {
        label: Some(raw.label.map_or_else(|| humanize(raw.id), str::to_string)),
        field_type,
        required: raw.required,
        options: raw
            .options
            .map(|options| options.into_iter().map(str::to_string).collect()),
        rows,
        ..FieldDef::new(raw.id)
    };

    if let Some(text) = raw.attributes {
        diagnostics.extend(apply_attributes(&mut field, text, line));
    }

    if diagnostics.is_empty() {
        Ok(field)
    } else {
        Err(diagnostics)
    }
}

/// Build a typed action from a raw action line.
///
/// A missing label falls back to the humanized identifier; a missing style
/// falls back to [`Action::default_style`].
pub(crate) fn action(raw: RawAction<'_>) -> Action {
    Action {
        style: raw
            .style
            .map(|style| ActionStyle::from(style.to_string()))
            .or_else(|| Action::default_style(raw.id)),
        ..Action::new(
            raw.id,
            raw.label.map_or_else(|| humanize(raw.id), str::to_string),
        )
    }
}
