//! The process-wide mini-language parser slot.
//!
//! Exactly one parser is active at a time. Registering a replacement swaps
//! it in for every later call; resetting the slot restores the built-in
//! [`BuiltinParser`]. Registration is meant to happen once at startup.
//!
//! ```
//! use widgetry::registry;
//! use widgetry_core::{form::Form, spec::Record};
//! use widgetry_parser::{FormParser, ParseError};
//!
//! struct Uppercase;
//!
//! impl FormParser for Uppercase {
//!     fn parse(&self, text: &str, _context: Option<&Record>) -> Result<Form, ParseError> {
//!         widgetry_parser::parse(&text.to_uppercase())
//!     }
//! }
//!
//! registry::register_parser(Uppercase);
//! assert!(registry::has_replacement());
//! registry::reset_parser();
//! assert!(!registry::has_replacement());
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, warn};

use widgetry_parser::{BuiltinParser, FormParser};

static REPLACEMENT: RwLock<Option<Arc<dyn FormParser>>> = RwLock::new(None);

/// Replace the active parser.
pub fn register_parser(parser: impl FormParser + 'static) {
    register_shared(Arc::new(parser));
}

/// Replace the active parser with a shared instance.
pub fn register_shared(parser: Arc<dyn FormParser>) {
    let mut slot = REPLACEMENT.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        warn!("Replacing a previously registered mini-language parser");
    }
    *slot = Some(parser);
    debug!("Registered replacement mini-language parser");
}

/// Clear the slot, restoring the built-in parser.
pub fn reset_parser() {
    let mut slot = REPLACEMENT.write().unwrap_or_else(PoisonError::into_inner);
    *slot = None;
    debug!("Restored built-in mini-language parser");
}

/// Returns `true` while a replacement parser is registered.
pub fn has_replacement() -> bool {
    REPLACEMENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// The parser currently in effect.
pub fn active_parser() -> Arc<dyn FormParser> {
    REPLACEMENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .unwrap_or_else(|| Arc::new(BuiltinParser))
}
