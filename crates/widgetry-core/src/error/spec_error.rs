//! Error type for reading loosely-typed JSON into a typed spec.

use thiserror::Error;

/// Errors raised when a JSON value cannot be read as a [`Spec`](crate::spec::Spec).
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("spec must be a JSON object")]
    NotAnObject,

    #[error("malformed spec: {0}")]
    Json(#[from] serde_json::Error),
}
