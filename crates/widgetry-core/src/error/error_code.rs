//! Error codes for the Widgetry diagnostic system.
//!
//! Error codes are organized by phase:
//! - `M0xx` - Mini-language errors
//! - `V0xx` - Validation errors (block rendering)
//! - `W0xx` - Validation warnings (advisory)

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Mini-language Errors (M0xx)
    // =========================================================================
    /// Invalid attribute value.
    ///
    /// A recognized attribute such as `min` or `maxLength` carried a value
    /// that is not a number.
    M001,

    /// Unknown type marker.
    ///
    /// The text after `:` on a field line is not one of the known markers.
    M002,

    /// Replacement parser failure.
    ///
    /// A registered replacement parser rejected the source text.
    M100,

    // =========================================================================
    // Validation Errors (V0xx)
    // =========================================================================
    /// Composite nesting exceeds the maximum depth.
    V001,

    /// Spec is not an object.
    V002,

    /// Missing or empty `kind`.
    V003,

    /// Mutually exclusive keys are both present.
    ///
    /// `fields` and `miniLanguageText` cannot be supplied together.
    V004,

    /// Data shape does not match the kind.
    ///
    /// The kind expects an array of records but got a single record, or
    /// the other way around.
    V005,

    /// Malformed data.
    ///
    /// `data` is neither a record nor an array of records.
    V006,

    /// Invalid composite structure.
    ///
    /// A `compose` spec has no children, or a child lacks a `kind`.
    V007,

    /// Invalid composite layout.
    V008,

    /// Malformed field definition.
    V009,

    /// Malformed action definition.
    V010,

    /// Malformed mapping.
    V011,

    /// Malformed spec.
    ///
    /// A top-level key carries a value of the wrong JSON type.
    V012,

    // =========================================================================
    // Validation Warnings (W0xx)
    // =========================================================================
    /// Unrecognized field type tag.
    W001,

    /// Mini-language source failed to parse.
    W002,

    /// Mapping references a field absent from the data sample.
    W003,

    /// Unknown widget kind.
    W004,

    /// Invalid composite columns hint.
    W005,

    /// Unknown value format.
    W006,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "V005").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Mini-language errors
            ErrorCode::M001 => "M001",
            ErrorCode::M002 => "M002",
            ErrorCode::M100 => "M100",
            // Validation errors
            ErrorCode::V001 => "V001",
            ErrorCode::V002 => "V002",
            ErrorCode::V003 => "V003",
            ErrorCode::V004 => "V004",
            ErrorCode::V005 => "V005",
            ErrorCode::V006 => "V006",
            ErrorCode::V007 => "V007",
            ErrorCode::V008 => "V008",
            ErrorCode::V009 => "V009",
            ErrorCode::V010 => "V010",
            ErrorCode::V011 => "V011",
            ErrorCode::V012 => "V012",
            // Validation warnings
            ErrorCode::W001 => "W001",
            ErrorCode::W002 => "W002",
            ErrorCode::W003 => "W003",
            ErrorCode::W004 => "W004",
            ErrorCode::W005 => "W005",
            ErrorCode::W006 => "W006",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Mini-language errors
            ErrorCode::M001 => "invalid attribute value",
            ErrorCode::M002 => "unknown type marker",
            ErrorCode::M100 => "replacement parser failure",
            // Validation errors
            ErrorCode::V001 => "nesting too deep",
            ErrorCode::V002 => "spec is not an object",
            ErrorCode::V003 => "missing kind",
            ErrorCode::V004 => "mutually exclusive keys",
            ErrorCode::V005 => "data shape mismatch",
            ErrorCode::V006 => "malformed data",
            ErrorCode::V007 => "invalid composite",
            ErrorCode::V008 => "invalid layout",
            ErrorCode::V009 => "malformed field",
            ErrorCode::V010 => "malformed action",
            ErrorCode::V011 => "malformed mapping",
            ErrorCode::V012 => "malformed spec",
            // Validation warnings
            ErrorCode::W001 => "unknown field type",
            ErrorCode::W002 => "mini-language parse failure",
            ErrorCode::W003 => "unknown mapping field",
            ErrorCode::W004 => "unknown kind",
            ErrorCode::W005 => "invalid columns hint",
            ErrorCode::W006 => "unknown value format",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
