//! Input-widget definitions: fields and actions.
//!
//! These are produced either directly by the spec author or by expanding
//! mini-language source text.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The input type of a form field.
///
/// Unrecognized tags are kept verbatim in [`FieldType::Other`] so that
/// newer renderers can understand types this crate does not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Password,
    Phone,
    Url,
    Multiline,
    Number,
    Select,
    Multiselect,
    Date,
    Datetime,
    Time,
    Toggle,
    Range,
    Radio,
    Checkbox,
    Other(String),
}

impl FieldType {
    /// Every recognized type tag, in declaration order.
    pub const KNOWN: [&'static str; 16] = [
        "text",
        "email",
        "password",
        "phone",
        "url",
        "multiline",
        "number",
        "select",
        "multiselect",
        "date",
        "datetime",
        "time",
        "toggle",
        "range",
        "radio",
        "checkbox",
    ];

    /// The wire tag for this type.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Phone => "phone",
            FieldType::Url => "url",
            FieldType::Multiline => "multiline",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Time => "time",
            FieldType::Toggle => "toggle",
            FieldType::Range => "range",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Other(tag) => tag,
        }
    }

    /// Returns `false` only for [`FieldType::Other`].
    pub fn is_known(&self) -> bool {
        !matches!(self, FieldType::Other(_))
    }

    /// Returns `true` for types that pick from an option list.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Multiselect | FieldType::Radio | FieldType::Checkbox
        )
    }
}

impl FromStr for FieldType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "password" => FieldType::Password,
            "phone" => FieldType::Phone,
            "url" => FieldType::Url,
            "multiline" => FieldType::Multiline,
            "number" => FieldType::Number,
            "select" => FieldType::Select,
            "multiselect" => FieldType::Multiselect,
            "date" => FieldType::Date,
            "datetime" => FieldType::Datetime,
            "time" => FieldType::Time,
            "toggle" => FieldType::Toggle,
            "range" => FieldType::Range,
            "radio" => FieldType::Radio,
            "checkbox" => FieldType::Checkbox,
            other => FieldType::Other(other.to_string()),
        })
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match tag.parse() {
            Ok(field_type) => field_type,
            Err(never) => match never {},
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single input field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    /// Visible rows for multi-line text areas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,

    /// Overrides the renderer's default validation message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_message: Option<String>,

    /// Keys this model does not recognize, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldDef {
    /// A text field with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// The visual style hint of an action button.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionStyle {
    Primary,
    Secondary,
    Default,
    Danger,
    Link,
    Other(String),
}

impl ActionStyle {
    /// The wire tag for this style.
    pub fn as_str(&self) -> &str {
        match self {
            ActionStyle::Primary => "primary",
            ActionStyle::Secondary => "secondary",
            ActionStyle::Default => "default",
            ActionStyle::Danger => "danger",
            ActionStyle::Link => "link",
            ActionStyle::Other(tag) => tag,
        }
    }
}

impl From<String> for ActionStyle {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "primary" => ActionStyle::Primary,
            "secondary" => ActionStyle::Secondary,
            "default" => ActionStyle::Default,
            "danger" => ActionStyle::Danger,
            "link" => ActionStyle::Link,
            _ => ActionStyle::Other(tag),
        }
    }
}

impl From<ActionStyle> for String {
    fn from(style: ActionStyle) -> Self {
        style.as_str().to_string()
    }
}

/// An action button.
///
/// The identifiers [`Action::SUBMIT`] and [`Action::CANCEL`] are reserved
/// by convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,

    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ActionStyle>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,

    /// Navigation target for link-like actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Action {
    pub const SUBMIT: &'static str = "submit";
    pub const CANCEL: &'static str = "cancel";

    /// Create an action with no style.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            style: None,
            disabled: false,
            url: None,
            extra: Map::new(),
        }
    }

    /// The style an action gets when its source does not name one:
    /// `submit` is primary, `cancel` is default, anything else has none.
    pub fn default_style(id: &str) -> Option<ActionStyle> {
        match id {
            Self::SUBMIT => Some(ActionStyle::Primary),
            Self::CANCEL => Some(ActionStyle::Default),
            _ => None,
        }
    }
}

/// The fields and actions a mini-language source expands into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub fields: Vec<FieldDef>,
    pub actions: Vec<Action>,
}

fn is_false(value: &bool) -> bool {
    !*value
}
