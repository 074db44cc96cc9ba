//! Line parsers for the form mini-language.
//!
//! Each non-blank source line is matched against the action pattern and
//! then the field pattern. The public entry point is [`parse_line`]; a
//! line matching neither pattern yields `None` and is skipped by the caller.
//!
//! ```text
//! @email*(Email address): @[placeholder=you@example.com]
//! @plan{free,pro,team}(Plan): s[]
//! @[submit "Sign up"] primary
//! ```

use winnow::{
    Parser as _,
    ascii::{space0, space1},
    combinator::{alt, delimited, eof, opt, preceded, separated, terminated},
    error::ModalResult,
    token::{take_till, take_while},
};

use crate::parser_types::{Line, RawAction, RawField};

type Input<'src> = &'src str;
type IResult<O> = ModalResult<O>;

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Parse a field or action identifier
fn identifier<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(1.., is_identifier_char).parse_next(input)
}

/// Parse a double-quoted string without escapes
fn quoted<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    delimited('"', take_till(0.., '"'), '"').parse_next(input)
}

/// Parse an option list: `{opt1, opt2, ...}`
///
/// Entries are trimmed; empty entries are dropped.
fn option_list<'src>(input: &mut Input<'src>) -> IResult<Vec<&'src str>> {
    delimited('{', take_till(0.., '}'), '}')
        .map(|body: &'src str| {
            body.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .collect()
        })
        .parse_next(input)
}

/// Parse a display label: `(Label)`
fn display_label<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    delimited('(', take_till(0.., ')'), ')')
        .map(str::trim)
        .parse_next(input)
}

/// Parse raw attribute text: `[key=value, ...]`
fn attribute_block<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    delimited('[', take_till(0.., ']'), ']').parse_next(input)
}

/// Parse an attribute value: a quoted string, or bare text up to the next comma
///
/// Anything between a closing quote and the next comma is discarded.
fn attribute_value<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    alt((
        terminated(quoted, take_till(0.., ',')),
        take_till(0.., ',').map(str::trim),
    ))
    .parse_next(input)
}

/// Parse one attribute entry; entries without `=` yield `None`
fn attribute_entry<'src>(input: &mut Input<'src>) -> IResult<Option<(&'src str, &'src str)>> {
    (
        take_till(0.., ('=', ',')),
        opt(preceded(('=', space0), attribute_value)),
    )
        .map(|(key, value): (&'src str, Option<&'src str>)| {
            value.map(|value| (key.trim(), value))
        })
        .parse_next(input)
}

/// Parse attribute text: `key=value` entries separated by commas outside quotes
fn attribute_list<'src>(input: &mut Input<'src>) -> IResult<Vec<(&'src str, &'src str)>> {
    terminated(separated(0.., attribute_entry, ','), eof)
        .map(|entries: Vec<Option<(&'src str, &'src str)>>| entries.into_iter().flatten().collect())
        .parse_next(input)
}

/// Parse the `:` between a field head and its type marker
fn separator<'src>(input: &mut Input<'src>) -> IResult<()> {
    (space0, ':', space0).void().parse_next(input)
}

/// Parse optional trailing whitespace and the end of the line
fn line_end<'src>(input: &mut Input<'src>) -> IResult<()> {
    (space0, eof).void().parse_next(input)
}

/// Parse a field line: `@name[*][{opts}][(Label)]: <marker>[attrs]`
fn field_line<'src>(input: &mut Input<'src>) -> IResult<RawField<'src>> {
    (
        preceded('@', identifier),
        opt('*'),
        opt(option_list),
        opt(display_label),
        separator,
        take_till(0.., '['),
        opt(attribute_block),
        line_end,
    )
        .map(
            |(id, required, options, label, (), marker, attributes, ())| RawField {
                id,
                required: required.is_some(),
                options,
                label,
                marker: marker.trim(),
                attributes,
            },
        )
        .parse_next(input)
}

/// Parse an action line: `@[actionId "Label"][ style]`
fn action_line<'src>(input: &mut Input<'src>) -> IResult<RawAction<'src>> {
    (
        ("@[", space0),
        identifier,
        opt(preceded(space1, quoted)),
        (space0, ']'),
        opt(preceded(space1, identifier)),
        line_end,
    )
        .map(|(_, id, label, _, style, ())| RawAction { id, label, style })
        .parse_next(input)
}

/// Parse one trimmed, non-blank source line
fn source_line<'src>(input: &mut Input<'src>) -> IResult<Line<'src>> {
    alt((action_line.map(Line::Action), field_line.map(Line::Field))).parse_next(input)
}

/// Classify a trimmed source line.
///
/// Returns `None` when the line matches neither the action nor the field
/// pattern.
pub(crate) fn parse_line(line: &str) -> Option<Line<'_>> {
    let mut input = line;
    source_line.parse_next(&mut input).ok()
}

/// Split the text of an attribute block into `(key, value)` pairs.
///
/// Keys are trimmed; quoted values lose their quotes and may contain
/// commas. Entries without `=` are dropped.
pub(crate) fn attribute_entries(text: &str) -> Vec<(&str, &str)> {
    let mut input = text;
    attribute_list.parse_next(&mut input).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(line: &str) -> RawField<'_> {
        match parse_line(line) {
            Some(Line::Field(field)) => field,
            other => panic!("Expected field line, got {other:?}"),
        }
    }

    fn action(line: &str) -> RawAction<'_> {
        match parse_line(line) {
            Some(Line::Action(action)) => action,
            other => panic!("Expected action line, got {other:?}"),
        }
    }

    #[test]
    fn test_field_minimal() {
        let raw = field("@name: ");

        assert_eq!(raw.id, "name");
        assert!(!raw.required);
        assert!(raw.options.is_none());
        assert!(raw.label.is_none());
        assert_eq!(raw.marker, "");
        assert!(raw.attributes.is_none());
    }

    #[test]
    fn test_field_all_parts() {
        let raw = field("@plan*{free, pro ,team}(Pricing plan): s[placeholder=Pick one]");

        assert_eq!(raw.id, "plan");
        assert!(raw.required);
        assert_eq!(raw.options, Some(vec!["free", "pro", "team"]));
        assert_eq!(raw.label, Some("Pricing plan"));
        assert_eq!(raw.marker, "s");
        assert_eq!(raw.attributes, Some("placeholder=Pick one"));
    }

    #[test]
    fn test_field_empty_attributes() {
        let raw = field("@name*(Name): []");

        assert_eq!(raw.marker, "");
        assert_eq!(raw.attributes, Some(""));
    }

    #[test]
    fn test_field_multiline_marker() {
        let raw = field("@bio(Biography): T4[maxLength=500]");

        assert_eq!(raw.marker, "T4");
        assert_eq!(raw.attributes, Some("maxLength=500"));
    }

    #[test]
    fn test_action_with_label() {
        let raw = action(r#"@[submit "Save"]"#);

        assert_eq!(raw.id, "submit");
        assert_eq!(raw.label, Some("Save"));
        assert!(raw.style.is_none());
    }

    #[test]
    fn test_action_with_style() {
        let raw = action(r#"@[delete "Delete account"] danger"#);

        assert_eq!(raw.id, "delete");
        assert_eq!(raw.label, Some("Delete account"));
        assert_eq!(raw.style, Some("danger"));
    }

    #[test]
    fn test_action_without_label() {
        let raw = action("@[ cancel ]");

        assert_eq!(raw.id, "cancel");
        assert!(raw.label.is_none());
    }

    #[test]
    fn test_attribute_entries_quoted_comma() {
        let entries = attribute_entries(r#"placeholder="Doe, Jane", maxLength=5"#);

        assert_eq!(entries, vec![("placeholder", "Doe, Jane"), ("maxLength", "5")]);
    }

    #[test]
    fn test_attribute_entries_bare_values() {
        let entries = attribute_entries(" min = 1 ,flag, placeholder=Pick one,");

        assert_eq!(entries, vec![("min", "1"), ("placeholder", "Pick one")]);
    }

    #[test]
    fn test_attribute_entries_unterminated_quote() {
        let entries = attribute_entries(r#"placeholder="Doe, rows=2"#);

        assert_eq!(entries, vec![("placeholder", "\"Doe"), ("rows", "2")]);
    }

    #[test]
    fn test_attribute_entries_empty() {
        assert!(attribute_entries("").is_empty());
    }

    #[test]
    fn test_unrecognized_lines() {
        for line in [
            "# a comment",
            "name: text",
            "@",
            "@name",
            "@name(Unclosed: text",
            "@[submit \"Save\"",
            "@name: [min=1] trailing",
        ] {
            assert!(parse_line(line).is_none(), "{line} should not parse");
        }
    }
}
