//! Error and diagnostic system shared by every Widgetry crate.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Severity levels that separate blocking errors from advisory warnings
//! - A diagnostic collector for accumulating findings in a single pass
//! - [`SpecError`] for values that cannot be read as a typed [`Spec`](crate::spec::Spec)
//!
//! # Example
//!
//! ```
//! # use widgetry_core::error::{Diagnostic, DiagnosticCollector, ErrorCode};
//! let mut collector = DiagnosticCollector::new();
//!
//! collector.emit(
//!     Diagnostic::error("kind 'table' expects `data` to be an array of records")
//!         .with_code(ErrorCode::V005),
//! );
//! collector.emit(Diagnostic::warning("mapping.category references unknown field 'nme'"));
//!
//! let result = collector.finish();
//! assert!(!result.valid);
//! assert_eq!(result.errors.len(), 1);
//! assert_eq!(result.warnings.len(), 1);
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod severity;
mod spec_error;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use severity::Severity;
pub use spec_error::SpecError;
