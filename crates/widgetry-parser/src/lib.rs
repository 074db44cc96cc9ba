//! # Widgetry Parser
//!
//! Parser for the Widgetry form mini-language: a compact, line-oriented
//! shorthand that expands into form fields and actions.
//!
//! ## Usage
//!
//! ```
//! # use widgetry_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let form = parse(r#"
//!         @name*(Name): []
//!         @email: @[placeholder=you@example.com]
//!         @[submit "Save"]
//!     "#)?;
//!     assert_eq!(form.fields.len(), 2);
//!     Ok(())
//! }
//! ```

mod elaborate;
mod error;
mod parser;
mod parser_types;

pub use error::ParseError;

use log::{debug, trace};

use widgetry_core::{form::Form, spec::Record};

use parser_types::Line;

/// A mini-language parser.
///
/// Replacement parsers implement this trait and may use the optional
/// context record; the built-in parser ignores it.
pub trait FormParser: Send + Sync {
    /// Parse source text into fields and actions.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the source cannot be expanded.
    fn parse(&self, text: &str, context: Option<&Record>) -> Result<Form, ParseError>;
}

/// The built-in line-oriented parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinParser;

impl FormParser for BuiltinParser {
    fn parse(&self, text: &str, _context: Option<&Record>) -> Result<Form, ParseError> {
        parse(text)
    }
}

/// Parse mini-language source text into a form.
///
/// Blank lines and lines matching neither the field nor the action pattern
/// are skipped. Fields and actions keep their source order.
///
/// # Errors
///
/// Returns a [`ParseError`] collecting a diagnostic for every unknown type
/// marker and every attribute with an invalid value.
///
/// # Example
///
/// ```
/// # use widgetry_parser::parse;
/// use widgetry_core::form::{ActionStyle, FieldType};
///
/// let form = parse("@age(Age): #[min=0]\n@[submit]").unwrap();
/// assert_eq!(form.fields[0].field_type, FieldType::Number);
/// assert_eq!(form.actions[0].style, Some(ActionStyle::Primary));
/// ```
pub fn parse(text: &str) -> Result<Form, ParseError> {
    let mut form = Form::default();
    let mut diagnostics = Vec::new();

    for (index, source_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = source_line.trim();
        if line.is_empty() {
            continue;
        }

        match parser::parse_line(line) {
            Some(Line::Field(raw)) => match elaborate::field(raw, line_number) {
                Ok(field) => form.fields.push(field),
                Err(errors) => diagnostics.extend(errors),
            },
            Some(Line::Action(raw)) => form.actions.push(elaborate::action(raw)),
            None => trace!(line_number; "Skipping unrecognized line"),
        }
    }

    if !diagnostics.is_empty() {
        debug!(errors = diagnostics.len(); "Mini-language source rejected");
        return Err(ParseError::new(diagnostics));
    }

    debug!(
        fields = form.fields.len(),
        actions = form.actions.len();
        "Mini-language source parsed"
    );
    Ok(form)
}
