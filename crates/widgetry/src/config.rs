//! Configuration for spec resolution.
//!
//! [`AppConfig`] groups the tunable constants of the pipeline: the
//! composite nesting limit, the fuzzy-correction threshold, suggestion
//! confidences, formatter defaults and the chrome-text locale. All types
//! implement [`serde::Deserialize`] and every section falls back to its
//! defaults when omitted.
//!
//! # Example
//!
//! ```
//! # use widgetry::config::AppConfig;
//! let config: AppConfig = toml::from_str(r#"
//!     locale = "de-AT"
//!
//!     [suggest]
//!     limit = 3
//! "#).unwrap();
//!
//! assert_eq!(config.suggest().limit(), Some(3));
//! assert_eq!(config.validation().max_depth(), 10);
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use widgetry_core::format::FormatOptions;

use crate::WidgetryError;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level configuration root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Validator settings.
    #[serde(default)]
    validation: ValidationConfig,

    /// Suggestion Engine settings.
    #[serde(default)]
    suggest: SuggestConfig,

    /// Formatter defaults.
    #[serde(default)]
    format: FormatOptions,

    /// Language tag for user-facing chrome text, e.g. `en-US`.
    #[serde(default)]
    locale: Option<String>,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        validation: ValidationConfig,
        suggest: SuggestConfig,
        format: FormatOptions,
        locale: Option<String>,
    ) -> Self {
        Self {
            validation,
            suggest,
            format,
            locale,
        }
    }

    /// Returns the validation configuration.
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    /// Returns the suggestion configuration.
    pub fn suggest(&self) -> &SuggestConfig {
        &self.suggest
    }

    /// Returns the formatter defaults.
    pub fn format(&self) -> &FormatOptions {
        &self.format
    }

    /// Returns the chrome-text locale, if one is configured.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Check that every value is within its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending key.
    pub fn check(&self) -> Result<(), ConfigError> {
        let ratios = [
            ("suggest.max_edit_ratio", self.suggest.max_edit_ratio),
            (
                "suggest.explicit_kind_confidence",
                self.suggest.explicit_kind_confidence,
            ),
            (
                "suggest.explicit_kind_fallback_confidence",
                self.suggest.explicit_kind_fallback_confidence,
            ),
        ];
        for (key, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "`{key}` must be between 0 and 1, got {value}"
                )));
            }
        }
        if self.validation.max_depth == 0 {
            return Err(ConfigError::Validation(
                "`validation.max_depth` must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Validator settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum composite nesting depth.
    max_depth: usize,
}

impl ValidationConfig {
    /// Creates a new [`ValidationConfig`] with the given nesting limit.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Returns the maximum composite nesting depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { max_depth: 10 }
    }
}

/// Suggestion Engine settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Fuzzy-correction threshold as a fraction of the input length.
    max_edit_ratio: f64,

    /// Confidence for an explicitly requested kind with an inferred mapping.
    explicit_kind_confidence: f64,

    /// Confidence for an explicitly requested kind without a mapping.
    explicit_kind_fallback_confidence: f64,

    /// Truncate ranked suggestion lists to this many entries.
    limit: Option<usize>,
}

impl SuggestConfig {
    /// Returns the fuzzy-correction ratio.
    pub fn max_edit_ratio(&self) -> f64 {
        self.max_edit_ratio
    }

    /// The largest edit distance accepted for an input of `len` characters.
    ///
    /// Always at least 1.
    pub fn max_edit_distance(&self, len: usize) -> usize {
        // Truncation is the intended floor.
        ((len as f64 * self.max_edit_ratio) as usize).max(1)
    }

    /// Returns the explicit-kind confidence.
    pub fn explicit_kind_confidence(&self) -> f64 {
        self.explicit_kind_confidence
    }

    /// Returns the explicit-kind fallback confidence.
    pub fn explicit_kind_fallback_confidence(&self) -> f64 {
        self.explicit_kind_fallback_confidence
    }

    /// Returns the suggestion limit, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Set the suggestion limit.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_edit_ratio: 0.34,
            explicit_kind_confidence: 0.8,
            explicit_kind_fallback_confidence: 0.3,
            limit: None,
        }
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (widgetry/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or holds out-of-range values
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, WidgetryError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("widgetry/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "widgetry", "widgetry") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
/// - A value is out of range
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, WidgetryError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.check()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use widgetry_core::format::DateStyle;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.validation().max_depth(), 10);
        assert_eq!(config.suggest().max_edit_ratio(), 0.34);
        assert_eq!(config.suggest().explicit_kind_confidence(), 0.8);
        assert_eq!(config.suggest().explicit_kind_fallback_confidence(), 0.3);
        assert_eq!(config.suggest().limit(), None);
        assert_eq!(config.format().currency, "USD");
        assert_eq!(config.format().decimals, 2);
        assert_eq!(config.locale(), None);
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [suggest]
            max_edit_ratio = 0.5

            [format]
            currency = "EUR"
            date_style = "long"
            "#,
        )
        .unwrap();

        assert_eq!(config.suggest().max_edit_ratio(), 0.5);
        assert_eq!(config.suggest().explicit_kind_confidence(), 0.8);
        assert_eq!(config.format().currency, "EUR");
        assert_eq!(config.format().decimals, 2);
        assert_eq!(config.format().date_style, DateStyle::Long);
        assert_eq!(config.validation().max_depth(), 10);
    }

    #[test]
    fn test_max_edit_distance() {
        let suggest = SuggestConfig::default();

        assert_eq!(suggest.max_edit_distance(10), 3);
        assert_eq!(suggest.max_edit_distance(9), 3);
        assert_eq!(suggest.max_edit_distance(5), 1);
        assert_eq!(suggest.max_edit_distance(0), 1);
    }

    #[test]
    fn test_check_rejects_out_of_range() {
        let config: AppConfig = toml::from_str("[suggest]\nexplicit_kind_confidence = 1.5").unwrap();

        let err = config.check().unwrap_err();
        assert!(err.to_string().contains("explicit_kind_confidence"));
    }

    #[test]
    fn test_check_rejects_zero_depth() {
        let config: AppConfig = toml::from_str("[validation]\nmax_depth = 0").unwrap();

        assert!(matches!(config.check(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("/nonexistent/widgetry/config.toml")).unwrap_err();

        assert!(matches!(
            err,
            WidgetryError::Config(ConfigError::MissingFile(_))
        ));
    }
}
