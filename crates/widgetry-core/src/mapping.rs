//! Visual-channel mappings.
//!
//! A [`Mapping`] associates named channels (category axis, value axis,
//! label, color, ...) with field names found in a spec's data. The `value`
//! channel is the multi-capable one: authors may give a single field name
//! or an ordered list for multi-series widgets. A [`NormalizedMapping`]
//! always carries `value` in list form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A channel value: one field name or an ordered list of field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Channel {
    Field(String),
    Fields(Vec<String>),
}

impl Channel {
    /// The referenced field names in order.
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Channel::Field(name) => vec![name.as_str()],
            Channel::Fields(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Widen to the list form. A list stays as it is.
    pub fn into_fields(self) -> Vec<String> {
        match self {
            Channel::Field(name) => vec![name],
            Channel::Fields(names) => names,
        }
    }
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self {
        Channel::Field(name.to_string())
    }
}

impl From<Vec<String>> for Channel {
    fn from(names: Vec<String>) -> Self {
        Channel::Fields(names)
    }
}

/// A table column definition.
///
/// Authors may write a bare key string; it reads as a column with no label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ColumnRepr")]
pub struct Column {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Column {
    /// A column labelled with its own key.
    pub fn keyed(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: Some(key.clone()),
            key,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnRepr {
    Key(String),
    Def {
        key: String,
        #[serde(default)]
        label: Option<String>,
    },
}

impl From<ColumnRepr> for Column {
    fn from(repr: ColumnRepr) -> Self {
        match repr {
            ColumnRepr::Key(key) => Column { key, label: None },
            ColumnRepr::Def { key, label } => Column { key, label },
        }
    }
}

/// Associates visual channels with data field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// The multi-capable channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Channel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q1: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q3: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Column>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,

    /// Channels this model does not recognize, including the legacy
    /// `fields` location, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Mapping {
    /// Returns `true` when no channel is set.
    pub fn is_empty(&self) -> bool {
        *self == Mapping::default()
    }

    /// Every named channel with the field names it references, in
    /// declaration order. Columns contribute their keys; unknown channels
    /// contribute string or string-list values.
    pub fn field_references(&self) -> Vec<(&str, Vec<&str>)> {
        let singles = [
            ("category", &self.category),
            ("x", &self.x),
            ("y", &self.y),
            ("label", &self.label),
            ("color", &self.color),
            ("size", &self.size),
            ("axis", &self.axis),
            ("min", &self.min),
            ("q1", &self.q1),
            ("median", &self.median),
            ("q3", &self.q3),
            ("max", &self.max),
            ("primary", &self.primary),
            ("secondary", &self.secondary),
        ];

        let mut refs: Vec<(&str, Vec<&str>)> = singles
            .into_iter()
            .filter_map(|(name, field)| field.as_deref().map(|f| (name, vec![f])))
            .collect();

        if let Some(value) = &self.value {
            refs.push(("value", value.field_names()));
        }
        if let Some(columns) = &self.columns {
            refs.push(("columns", columns.iter().map(|c| c.key.as_str()).collect()));
        }
        for (name, value) in &self.extra {
            match value {
                Value::String(field) => refs.push((name.as_str(), vec![field.as_str()])),
                Value::Array(items) if items.iter().all(Value::is_string) => refs.push((
                    name.as_str(),
                    items.iter().filter_map(Value::as_str).collect(),
                )),
                _ => {}
            }
        }
        refs
    }
}

/// A mapping whose multi-capable `value` channel is always in list form.
///
/// Built by the normalizer; downstream consumers read [`value`](Self::value)
/// and never see the single-name form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedMapping {
    inner: Mapping,
}

impl NormalizedMapping {
    /// Widen the multi-capable channel of `mapping`. All other channels pass
    /// through unchanged; an absent `value` stays absent.
    pub fn new(mut mapping: Mapping) -> Self {
        mapping.value = mapping.value.map(|v| Channel::Fields(v.into_fields()));
        Self { inner: mapping }
    }

    /// The value channel, always as an ordered list.
    pub fn value(&self) -> Option<&[String]> {
        match &self.inner.value {
            Some(Channel::Fields(names)) => Some(names.as_slice()),
            // Unreachable by construction
            Some(Channel::Field(name)) => Some(std::slice::from_ref(name)),
            None => None,
        }
    }

    /// Borrow the underlying mapping.
    pub fn mapping(&self) -> &Mapping {
        &self.inner
    }

    /// Consume and return the underlying mapping.
    pub fn into_inner(self) -> Mapping {
        self.inner
    }
}
