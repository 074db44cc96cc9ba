//! The root spec model.
//!
//! A [`Spec`] is the declarative description of one widget: its `kind`, the
//! data feeding it, an optional visual-channel [`Mapping`], input
//! [`FieldDef`]s and [`Action`]s, and, for the composite kind, child specs.
//!
//! Specs arrive as loosely-typed JSON. [`Spec::from_value`] reads a JSON
//! object into the typed model; keys the model does not know about are kept
//! in [`Spec::extra`] so that a round trip never drops caller data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::SpecError,
    form::{Action, FieldDef},
    mapping::Mapping,
};

/// A single data record: an ordered, string-keyed map of JSON values.
pub type Record = Map<String, Value>;

/// The data feeding a widget.
///
/// Either one record (single-value displays such as a metric) or an ordered
/// sequence of records (charts, tables, lists).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Data {
    Records(Vec<Record>),
    Record(Record),
}

impl Data {
    /// The record inspected by shape-based heuristics: the record itself, or
    /// the first element of a sequence.
    pub fn sample(&self) -> Option<&Record> {
        match self {
            Data::Record(record) => Some(record),
            Data::Records(records) => records.first(),
        }
    }

    /// Returns `true` for the sequence form.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Data::Records(_))
    }

    /// Number of records (1 for the single-record form).
    pub fn len(&self) -> usize {
        match self {
            Data::Record(_) => 1,
            Data::Records(records) => records.len(),
        }
    }

    /// Returns `true` for an empty sequence.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A widget spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<Mapping>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,

    /// Mini-language source that expands into `fields` and `actions`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mini_language_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,

    /// Child specs of a composite (`compose`) spec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Spec>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    /// Column-count hint for composite layouts, kept as authored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Value>,

    /// Keys this model does not recognize, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Spec {
    /// Create a bare spec of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: None,
            description: None,
            data: None,
            mapping: None,
            fields: None,
            actions: None,
            mini_language_text: None,
            options: None,
            children: None,
            layout: None,
            columns: None,
            extra: Map::new(),
        }
    }

    /// Attach data to this spec.
    pub fn with_data(mut self, data: Data) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach a mapping to this spec.
    pub fn with_mapping(mut self, mapping: Mapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Read a typed spec from loosely-typed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::NotAnObject`] for non-object input and
    /// [`SpecError::Json`] when a known key carries a value of the wrong shape.
    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        if !value.is_object() {
            return Err(SpecError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Convert this spec back to JSON.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// The column-count hint as a positive integer, if it is one.
    pub fn columns_hint(&self) -> Option<u32> {
        self.columns
            .as_ref()
            .and_then(Value::as_u64)
            .filter(|&n| n > 0)
            .and_then(|n| u32::try_from(n).ok())
    }
}
