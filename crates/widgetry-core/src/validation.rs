//! The outcome of validating a spec.

use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;

/// Result of structurally checking a spec.
///
/// `errors` block rendering; `warnings` are advisory only. `valid` is
/// `true` exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// A passing result with no findings.
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Split diagnostics into errors and warnings, keeping their relative order.
    pub fn from_diagnostics(diagnostics: impl IntoIterator<Item = Diagnostic>) -> Self {
        let mut result = Self::ok();
        for diagnostic in diagnostics {
            if diagnostic.severity().is_error() {
                result.errors.push(diagnostic.message().to_string());
            } else {
                result.warnings.push(diagnostic.message().to_string());
            }
        }
        result.valid = result.errors.is_empty();
        result
    }
}
