//! Widgetry - resolution of declarative widget specs.
//!
//! A widget spec is a small, loosely-typed JSON description of what to
//! render (a chart, table, form, metric, ...) and the data feeding it.
//! This crate turns such a spec into a fully resolved, internally
//! consistent description: structural validation, canonicalization,
//! shape-driven mapping inference, widget-kind suggestion from raw data,
//! and expansion of the form mini-language.
//!
//! Rendering is left to the host.

pub mod catalog;
pub mod config;
pub mod help;
pub mod infer;
pub mod normalize;
pub mod registry;
pub mod strings;
pub mod suggest;
pub mod validate;

mod error;

pub use widgetry_core::{form, format, mapping, shape, spec, suggestion, validation};
pub use widgetry_parser::{BuiltinParser, FormParser, ParseError};

pub use error::WidgetryError;

use std::sync::Arc;

use log::{debug, info, trace};
use serde::Serialize;
use serde_json::Value;

use config::AppConfig;
use help::Help;
use mapping::{Mapping, NormalizedMapping};
use spec::{Data, Spec};
use strings::{BuiltinStrings, StringSource};
use suggestion::Suggestion;
use validation::ValidationResult;

/// A spec ready for rendering.
///
/// `spec` is the normalized spec; `mapping` is the caller's mapping or, when
/// none was given, the inferred one, with its multi-capable channel widened
/// to list form. Children of a composite spec are resolved recursively into
/// `children` and removed from `spec`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSpec {
    pub spec: Spec,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<NormalizedMapping>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResolvedSpec>,
}

/// Entry point for spec resolution.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use widgetry::Widgetry;
///
/// let widgetry = Widgetry::default();
///
/// let resolved = widgetry
///     .resolve(&json!({
///         "kind": "chart.bar",
///         "data": [{"name": "A", "value": 30}, {"name": "B", "value": 70}]
///     }))
///     .expect("valid spec");
///
/// let mapping = resolved.mapping.expect("inferred mapping");
/// assert_eq!(mapping.mapping().category.as_deref(), Some("name"));
/// assert_eq!(mapping.value(), Some(&["value".to_string()][..]));
/// ```
#[derive(Clone)]
pub struct Widgetry {
    config: AppConfig,
    strings: Arc<dyn StringSource>,
}

impl Default for Widgetry {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Widgetry {
    /// Create a new instance with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            strings: Arc::new(BuiltinStrings),
        }
    }

    /// Use `source` for user-facing chrome text.
    pub fn with_string_source(mut self, source: impl StringSource + 'static) -> Self {
        self.strings = Arc::new(source);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Help for `kind`, or an overview of every kind when `kind` is `None`.
    pub fn help(&self, kind: Option<&str>) -> Help {
        info!(kind:?; "Building help");
        let strings = strings::resolve_strings(self.strings.as_ref(), self.config.locale());
        help::help(kind, &strings, self.config.suggest())
    }

    /// A fresh copy of the canned example spec for `kind`.
    pub fn template(&self, kind: &str) -> Option<Spec> {
        info!(kind; "Fetching template");
        catalog::template(kind)
    }

    /// Structurally validate a loosely-typed spec.
    pub fn validate(&self, spec: &Value) -> ValidationResult {
        info!("Validating spec");
        validate::validate(spec, 0, &self.config)
    }

    /// Canonicalize a typed spec with the active mini-language parser.
    pub fn normalize(&self, spec: &Spec) -> Spec {
        normalize::normalize(spec)
    }

    /// Infer a mapping for `kind` from the shape of `data`.
    pub fn infer(&self, kind: &str, data: &Data) -> Option<Mapping> {
        infer::infer(kind, data)
    }

    /// Suggest widget kinds for raw data, optionally for an explicit kind.
    pub fn suggest(&self, data: &Value, kind: Option<&str>) -> Vec<Suggestion> {
        info!(kind:?; "Suggesting kinds");
        suggest::suggest(data, kind, self.config.suggest())
    }

    /// Materialize the top suggestion for `data` into a spec.
    pub fn auto_spec(&self, data: &Value) -> Option<Spec> {
        info!("Building spec from data");
        suggest::auto_spec(data, self.config.suggest())
    }

    /// The registered kind closest to a possibly misspelled `name`.
    pub fn fuzzy_kind(&self, name: &str) -> Option<&'static str> {
        suggest::fuzzy_kind(name, self.config.suggest())
    }

    /// Run the full pipeline: validate, read, normalize, and infer.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetryError::Invalid`] when validation reports errors.
    /// Validation warnings are carried in [`ResolvedSpec::warnings`].
    pub fn resolve(&self, value: &Value) -> Result<ResolvedSpec, WidgetryError> {
        info!("Resolving spec");

        let validation = self.validate(value);
        if !validation.valid {
            debug!(errors:? = validation.errors; "Spec rejected");
            return Err(WidgetryError::Invalid(validation));
        }

        let spec = Spec::from_value(value.clone())?;
        let normalized = self.normalize(&spec);
        let mut resolved = resolve_spec(normalized);
        resolved.warnings = validation.warnings;

        trace!(resolved:?; "Resolved spec");
        Ok(resolved)
    }

    /// Format a value with the configured formatter defaults.
    pub fn format_value(&self, value: &Value, format: format::ValueFormat) -> String {
        format::format_value(value, format, self.config.format())
    }
}

fn resolve_spec(mut spec: Spec) -> ResolvedSpec {
    let mapping = match spec.mapping.clone() {
        Some(mapping) => Some(mapping),
        None => spec
            .data
            .as_ref()
            .and_then(|data| infer::infer(&spec.kind, data)),
    };
    let children = spec
        .children
        .take()
        .unwrap_or_default()
        .into_iter()
        .map(resolve_spec)
        .collect();

    ResolvedSpec {
        spec,
        mapping: mapping.map(normalize::normalize_mapping),
        warnings: Vec::new(),
        children,
    }
}
