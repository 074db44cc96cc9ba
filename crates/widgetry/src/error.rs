//! Error types for Widgetry operations.
//!
//! This module provides the main error type [`WidgetryError`] which wraps
//! the error conditions that can occur while loading configuration or
//! resolving a spec.

use std::io;

use thiserror::Error;

use widgetry_core::{error::SpecError, validation::ValidationResult};

use crate::config::ConfigError;

/// The main error type for Widgetry operations.
///
/// Validation findings are not errors on their own; they surface here only
/// when an operation that requires a valid spec receives an invalid one.
#[derive(Debug, Error)]
pub enum WidgetryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Spec(#[from] SpecError),

    #[error("Invalid spec: {}", .0.errors.join("; "))]
    Invalid(ValidationResult),
}

impl WidgetryError {
    /// The validation result carried by an [`WidgetryError::Invalid`] error.
    pub fn validation(&self) -> Option<&ValidationResult> {
        match self {
            Self::Invalid(result) => Some(result),
            _ => None,
        }
    }
}
