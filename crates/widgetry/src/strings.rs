//! User-facing chrome text.
//!
//! Locale string tables live outside this crate; a host supplies them
//! through [`StringSource`]. [`resolve_strings`] picks a table for a
//! language tag by exact match, then base language, then the built-in
//! English table, and fills any keys the chosen table lacks from the
//! built-in one.

use indexmap::IndexMap;
use log::debug;

/// Key to text.
pub type StringTable = IndexMap<String, String>;

/// A provider of locale string tables.
pub trait StringSource: Send + Sync {
    /// The table for exactly `tag` (for example `de` or `pt-BR`), if any.
    fn table(&self, tag: &str) -> Option<StringTable>;
}

/// The built-in source: English only.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinStrings;

impl StringSource for BuiltinStrings {
    fn table(&self, tag: &str) -> Option<StringTable> {
        (tag == "en").then(default_strings)
    }
}

const ENGLISH: &[(&str, &str)] = &[
    ("help.title", "Available widget kinds"),
    ("help.unknown_kind", "Unknown kind '{kind}'."),
    ("help.did_you_mean", "Did you mean '{suggestion}'?"),
    ("help.no_suggestion", "Call help without a kind to list every kind."),
    ("category.chart", "Charts"),
    ("category.data", "Data"),
    ("category.display", "Display"),
    ("category.input", "Input"),
    ("category.layout", "Layout"),
    ("data.sequence", "an array of records"),
    ("data.record", "a single record"),
    ("data.any", "optional"),
];

/// The built-in English table.
pub fn default_strings() -> StringTable {
    ENGLISH
        .iter()
        .map(|(key, text)| (key.to_string(), text.to_string()))
        .collect()
}

/// Resolve the table for `tag`.
///
/// Resolution order: exact tag, base language (`de-AT` falls back to `de`),
/// built-in English. Keys missing from the resolved table are filled from
/// the built-in table.
pub fn resolve_strings(source: &dyn StringSource, tag: Option<&str>) -> StringTable {
    let resolved = tag.and_then(|tag| {
        source.table(tag).or_else(|| {
            let base = tag.split(['-', '_']).next().unwrap_or(tag);
            (base != tag).then(|| source.table(base)).flatten()
        })
    });

    let Some(mut table) = resolved else {
        debug!(tag:?; "Using built-in strings");
        return default_strings();
    };
    for (key, text) in default_strings() {
        table.entry(key).or_insert(text);
    }
    table
}

/// Look up `key` in `table`, falling back to the key itself.
pub fn text<'a>(table: &'a StringTable, key: &'a str) -> &'a str {
    table.get(key).map_or(key, String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tables(Vec<(&'static str, StringTable)>);

    impl StringSource for Tables {
        fn table(&self, tag: &str) -> Option<StringTable> {
            self.0
                .iter()
                .find(|(t, _)| *t == tag)
                .map(|(_, table)| table.clone())
        }
    }

    fn german() -> StringTable {
        StringTable::from_iter([("help.title".to_string(), "Verfügbare Widgets".to_string())])
    }

    #[test]
    fn test_exact_match() {
        let source = Tables(vec![("de-AT", german())]);

        let table = resolve_strings(&source, Some("de-AT"));

        assert_eq!(text(&table, "help.title"), "Verfügbare Widgets");
    }

    #[test]
    fn test_base_language_fallback() {
        let source = Tables(vec![("de", german())]);

        let table = resolve_strings(&source, Some("de_CH"));

        assert_eq!(text(&table, "help.title"), "Verfügbare Widgets");
        // Missing keys come from the built-in table.
        assert_eq!(text(&table, "category.chart"), "Charts");
    }

    #[test]
    fn test_builtin_default() {
        let source = Tables(vec![]);

        assert_eq!(resolve_strings(&source, Some("fr")), default_strings());
        assert_eq!(resolve_strings(&source, None), default_strings());
        assert_eq!(resolve_strings(&BuiltinStrings, Some("en-GB")), default_strings());
    }

    #[test]
    fn test_text_falls_back_to_key() {
        assert_eq!(text(&default_strings(), "no.such.key"), "no.such.key");
    }
}
