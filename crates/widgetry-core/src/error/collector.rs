//! Collector for accumulating diagnostics during a validation pass.
//!
//! The [`DiagnosticCollector`] lets a pass report every error and warning
//! it finds instead of stopping at the first one.

use crate::{error::Diagnostic, validation::ValidationResult};

/// A collector for accumulating diagnostics during a processing phase.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    ///
    /// If the diagnostic is an error, the collector is marked as having errors.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Emit every diagnostic in `diagnostics`, preserving order.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    /// Returns `true` if at least one error was emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Borrow the diagnostics collected so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the collector and return the raw diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Finish collection and split the diagnostics into a [`ValidationResult`].
    ///
    /// Errors and warnings keep their emission order within each list.
    pub fn finish(self) -> ValidationResult {
        ValidationResult::from_diagnostics(self.diagnostics)
    }
}
