//! Widgetry Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Widgetry
//! crates. It includes:
//!
//! - **Spec model**: [`spec::Spec`], [`spec::Data`] and [`spec::Record`]
//! - **Mappings**: visual-channel associations ([`mapping`] module)
//! - **Forms**: field and action definitions ([`form`] module)
//! - **Shape detection**: the one place data records are classified ([`shape`] module)
//! - **Formatting**: value-to-display-string conversion ([`format`] module)
//! - **Diagnostics**: severities, codes and the collector ([`error`] module)
//! - **Results**: [`validation::ValidationResult`] and [`suggestion::Suggestion`]

pub mod error;
pub mod form;
pub mod format;
pub mod mapping;
pub mod shape;
pub mod spec;
pub mod suggestion;
pub mod validation;
