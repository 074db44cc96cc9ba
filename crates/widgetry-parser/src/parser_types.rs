//! Raw line shapes produced by the line parsers.
//!
//! These borrow from the source text and carry attribute text unparsed;
//! [`elaborate`](crate::elaborate) turns them into typed fields and actions.

/// A field line: `@name*{a,b}(Label): marker[attrs]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField<'src> {
    pub id: &'src str,
    pub required: bool,
    pub options: Option<Vec<&'src str>>,
    pub label: Option<&'src str>,
    pub marker: &'src str,
    pub attributes: Option<&'src str>,
}

/// An action line: `@[id "Label"] style`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAction<'src> {
    pub id: &'src str,
    pub label: Option<&'src str>,
    pub style: Option<&'src str>,
}

/// One recognized source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'src> {
    Field(RawField<'src>),
    Action(RawAction<'src>),
}
