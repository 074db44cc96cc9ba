//! Widget-kind suggestion from raw data.
//!
//! Suggestions come from a flat rule table: each [`Rule`] pairs a shape
//! test with a kind, a fixed confidence and a fixed reason. Rules are
//! evaluated independently against the data sample; matches are ranked by
//! descending confidence (stable for ties) and deduplicated by kind.

use log::{debug, info};
use serde_json::Value;

use widgetry_core::{
    shape::DataShape,
    spec::Spec,
    suggestion::{Suggestion, rank},
};

use crate::{
    catalog,
    config::SuggestConfig,
    infer::{FIVE_NUMBER_SUMMARY, infer_from_shape},
};

/// One shape test and the suggestion it produces.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub kind: &'static str,
    pub confidence: f64,
    pub reason: &'static str,
    applies: fn(&DataShape<'_>) -> bool,
}

impl Rule {
    /// Returns `true` if this rule matches `shape`.
    pub fn applies(&self, shape: &DataShape<'_>) -> bool {
        (self.applies)(shape)
    }
}

/// Rules for single-record data.
pub const RECORD_RULES: &[Rule] = &[
    Rule {
        kind: "progress",
        confidence: 0.97,
        reason: "record has numeric `value` and `max` fields",
        applies: value_with_max,
    },
    Rule {
        kind: "metric",
        confidence: 0.95,
        reason: "record has a numeric `value` field",
        applies: numeric_value,
    },
    Rule {
        kind: "gauge",
        confidence: 0.9,
        reason: "record has numeric `value`, `min` and `max` fields",
        applies: value_in_range,
    },
    Rule {
        kind: "markdown",
        confidence: 0.8,
        reason: "record has a text `content` field",
        applies: text_content,
    },
    Rule {
        kind: "card",
        confidence: 0.7,
        reason: "record has a `title` with `content` or `body` text",
        applies: titled_text,
    },
    Rule {
        kind: "keyvalue",
        confidence: 0.6,
        reason: "record has several fields to show as pairs",
        applies: several_fields,
    },
];

/// Rules for sequence data.
pub const SEQUENCE_RULES: &[Rule] = &[
    Rule {
        kind: "chart.line",
        confidence: 0.9,
        reason: "date-like field with numeric values suggests a time series",
        applies: dated_series,
    },
    Rule {
        kind: "chart.boxplot",
        confidence: 0.9,
        reason: "records carry min, q1, median, q3 and max",
        applies: five_number_summary,
    },
    Rule {
        kind: "chart.bar",
        confidence: 0.85,
        reason: "one text category with one numeric value",
        applies: category_single_value,
    },
    Rule {
        kind: "timeline",
        confidence: 0.85,
        reason: "records have a date or time with a title or event",
        applies: dated_events,
    },
    Rule {
        kind: "chart.bar",
        confidence: 0.8,
        reason: "one text category with several numeric series",
        applies: category_multi_value,
    },
    Rule {
        kind: "chart.scatter",
        confidence: 0.8,
        reason: "only numeric fields, suitable for x/y plotting",
        applies: numeric_pairs,
    },
    Rule {
        kind: "chart.funnel",
        confidence: 0.8,
        reason: "records describe stages with a numeric count",
        applies: staged_counts,
    },
    Rule {
        kind: "chart.line",
        confidence: 0.75,
        reason: "several numeric series over a category",
        applies: category_multi_value,
    },
    Rule {
        kind: "chart.heatmap",
        confidence: 0.75,
        reason: "two text dimensions with a numeric value",
        applies: two_categories,
    },
    Rule {
        kind: "chart.pie",
        confidence: 0.7,
        reason: "few categories with a single numeric value",
        applies: few_categories,
    },
    Rule {
        kind: "chart.radar",
        confidence: 0.6,
        reason: "a text axis with three or more numeric measures",
        applies: radar_profile,
    },
    Rule {
        kind: "table",
        confidence: 0.5,
        reason: "records with several fields can always be tabulated",
        applies: several_fields,
    },
    Rule {
        kind: "list",
        confidence: 0.4,
        reason: "records have text to list",
        applies: has_text,
    },
];

const PIE_MAX_SLICES: usize = 8;

fn numeric_value(shape: &DataShape<'_>) -> bool {
    shape.has_numeric("value")
}

fn value_with_max(shape: &DataShape<'_>) -> bool {
    numeric_value(shape) && shape.has_numeric("max")
}

fn value_in_range(shape: &DataShape<'_>) -> bool {
    value_with_max(shape) && shape.has_numeric("min")
}

fn text_content(shape: &DataShape<'_>) -> bool {
    shape.has_string("content")
}

fn titled_text(shape: &DataShape<'_>) -> bool {
    shape.has_string("title") && (shape.has_string("content") || shape.has_string("body"))
}

fn several_fields(shape: &DataShape<'_>) -> bool {
    shape.keys().len() >= 2
}

fn has_text(shape: &DataShape<'_>) -> bool {
    !shape.string_fields().is_empty()
}

fn dated_series(shape: &DataShape<'_>) -> bool {
    !shape.date_fields().is_empty() && !shape.numeric_fields().is_empty()
}

fn five_number_summary(shape: &DataShape<'_>) -> bool {
    FIVE_NUMBER_SUMMARY.iter().all(|name| shape.has_numeric(name))
}

fn category_single_value(shape: &DataShape<'_>) -> bool {
    has_text(shape) && shape.numeric_fields().len() == 1
}

fn category_multi_value(shape: &DataShape<'_>) -> bool {
    has_text(shape) && shape.numeric_fields().len() >= 2
}

fn dated_events(shape: &DataShape<'_>) -> bool {
    shape
        .first_present(&["date", "time", "timestamp", "when"])
        .is_some()
        && shape
            .first_present(&["title", "event", "label"])
            .is_some_and(|key| shape.has_string(key))
}

fn numeric_pairs(shape: &DataShape<'_>) -> bool {
    !has_text(shape) && shape.numeric_fields().len() >= 2
}

fn staged_counts(shape: &DataShape<'_>) -> bool {
    shape
        .first_present(&["stage", "step"])
        .is_some_and(|key| shape.has_string(key))
        && !shape.numeric_fields().is_empty()
}

fn two_categories(shape: &DataShape<'_>) -> bool {
    shape.string_fields().len() >= 2 && !shape.numeric_fields().is_empty()
}

fn few_categories(shape: &DataShape<'_>) -> bool {
    category_single_value(shape) && shape.len() <= PIE_MAX_SLICES
}

fn radar_profile(shape: &DataShape<'_>) -> bool {
    has_text(shape) && shape.numeric_fields().len() >= 3
}

/// Suggest widget kinds for `data`.
///
/// With an explicit `kind`, returns exactly one suggestion for that kind:
/// its confidence is the configured explicit-kind confidence when a mapping
/// could be inferred and the fallback confidence otherwise. Without a
/// kind, returns every matching rule ranked by confidence; data with no
/// shape (null, scalars, empty arrays) yields an empty list.
pub fn suggest(data: &Value, kind: Option<&str>, config: &SuggestConfig) -> Vec<Suggestion> {
    let shape = DataShape::of_value(data);

    if let Some(kind) = kind {
        let mapping = shape
            .as_ref()
            .and_then(|shape| infer_from_shape(kind, shape));
        let suggestion = if mapping.is_some() {
            Suggestion::new(
                kind,
                mapping,
                config.explicit_kind_confidence(),
                "requested kind; mapping inferred from the data shape",
            )
        } else {
            Suggestion::new(
                kind,
                None,
                config.explicit_kind_fallback_confidence(),
                "requested kind; no mapping could be inferred from the data",
            )
        };
        return vec![suggestion];
    }

    let Some(shape) = shape else {
        debug!("Data has no shape; no suggestions");
        return Vec::new();
    };

    let rules = if shape.is_sequence() {
        SEQUENCE_RULES
    } else {
        RECORD_RULES
    };
    let matched = rules
        .iter()
        .filter(|rule| rule.applies(&shape))
        .map(|rule| {
            Suggestion::new(
                rule.kind,
                infer_from_shape(rule.kind, &shape),
                rule.confidence,
                rule.reason,
            )
        })
        .collect();

    let mut ranked = rank(matched);
    let mut seen = Vec::with_capacity(ranked.len());
    ranked.retain(|suggestion| {
        if seen.contains(&suggestion.kind) {
            false
        } else {
            seen.push(suggestion.kind.clone());
            true
        }
    });
    if let Some(limit) = config.limit() {
        ranked.truncate(limit);
    }

    debug!(
        count = ranked.len(),
        top:? = ranked.first().map(|s| s.kind.as_str());
        "Computed suggestions"
    );
    ranked
}

/// Materialize the top suggestion for `data` into a ready spec.
///
/// The spec carries the suggested kind, the original data and the inferred
/// mapping, if any. Returns `None` when nothing can be suggested.
pub fn auto_spec(data: &Value, config: &SuggestConfig) -> Option<Spec> {
    let top = suggest(data, None, config).into_iter().next()?;
    info!(kind = top.kind, confidence = top.confidence; "Building spec from top suggestion");

    let mut spec = Spec::new(top.kind);
    spec.data = serde_json::from_value(data.clone()).ok();
    spec.mapping = top.mapping;
    Some(spec)
}

/// The registered kind closest to `name` by edit distance.
///
/// Comparison is case-insensitive. Returns `None` when the closest kind is
/// farther than [`SuggestConfig::max_edit_distance`] allows for the input
/// length; ties go to the kind registered first.
pub fn fuzzy_kind(name: &str, config: &SuggestConfig) -> Option<&'static str> {
    let needle = name.trim().to_lowercase();
    let allowed = config.max_edit_distance(needle.chars().count());

    catalog::kinds()
        .map(|info| (info.kind, strsim::levenshtein(&needle, info.kind)))
        .min_by_key(|&(_, distance)| distance)
        .filter(|&(_, distance)| distance <= allowed)
        .map(|(kind, _)| kind)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use widgetry_core::mapping::Channel;

    use super::*;

    fn kinds(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.kind.as_str()).collect()
    }

    fn config() -> SuggestConfig {
        SuggestConfig::default()
    }

    #[test]
    fn test_metric_from_value_record() {
        let suggestions = suggest(&json!({"value": 42, "unit": "users"}), None, &config());

        assert_eq!(suggestions[0].kind, "metric");
        assert!(suggestions[0].confidence >= 0.9);
        assert_eq!(kinds(&suggestions), vec!["metric", "keyvalue"]);
    }

    #[test]
    fn test_progress_outranks_metric() {
        let suggestions = suggest(&json!({"value": 3, "min": 0, "max": 10}), None, &config());

        assert_eq!(kinds(&suggestions), vec!["progress", "metric", "gauge", "keyvalue"]);
    }

    #[test]
    fn test_empty_inputs() {
        for data in [json!([]), json!(null), json!({}), json!(42), json!(["a", "b"])] {
            assert!(suggest(&data, None, &config()).is_empty(), "{data}");
            assert!(auto_spec(&data, &config()).is_none(), "{data}");
        }
    }

    #[test]
    fn test_category_value_sequence() {
        let data = json!([
            {"name": "A", "value": 30},
            {"name": "B", "value": 70}
        ]);

        let suggestions = suggest(&data, None, &config());

        assert_eq!(kinds(&suggestions), vec!["chart.bar", "chart.pie", "table", "list"]);
        assert_eq!(suggestions[0].confidence, 0.85);
        assert_eq!(
            suggestions[0].mapping.as_ref().and_then(|m| m.category.as_deref()),
            Some("name")
        );
    }

    #[test]
    fn test_many_categories_skip_pie() {
        let data: Vec<_> = (0..9).map(|i| json!({"name": format!("n{i}"), "v": i})).collect();

        let suggestions = suggest(&json!(data), None, &config());

        assert!(!kinds(&suggestions).contains(&"chart.pie"));
    }

    #[test]
    fn test_time_series_prefers_line() {
        let data = json!([{"month": "2024-01", "revenue": 10, "costs": 4}]);

        let suggestions = suggest(&data, None, &config());

        assert_eq!(suggestions[0].kind, "chart.line");
        assert_eq!(suggestions[0].confidence, 0.9);
        // The lower-confidence duplicate for chart.line is dropped.
        assert_eq!(
            kinds(&suggestions).iter().filter(|k| **k == "chart.line").count(),
            1
        );
    }

    #[test]
    fn test_numeric_only_sequence() {
        let suggestions = suggest(&json!([{"x": 1.5, "y": 2}]), None, &config());

        assert_eq!(kinds(&suggestions), vec!["chart.scatter", "table"]);
    }

    #[test]
    fn test_timeline_and_funnel() {
        let events = suggest(
            &json!([{"date": "2024-01-05", "title": "Kickoff"}]),
            None,
            &config(),
        );
        assert_eq!(events[0].kind, "timeline");

        let stages = suggest(&json!([{"stage": "Visit", "count": 10}]), None, &config());
        assert!(kinds(&stages).contains(&"chart.funnel"));
    }

    #[test]
    fn test_explicit_kind_confidence() {
        let data = json!([{"name": "A", "value": 30}]);

        let inferred = suggest(&data, Some("chart.bar"), &config());
        assert_eq!(inferred.len(), 1);
        assert_eq!(inferred[0].confidence, 0.8);
        assert_eq!(
            inferred[0].mapping.as_ref().and_then(|m| m.value.clone()),
            Some(Channel::Fields(vec!["value".to_string()]))
        );

        let fallback = suggest(&data, Some("metric"), &config());
        assert_eq!(fallback[0].confidence, 0.3);
        assert!(fallback[0].mapping.is_none());

        let empty = suggest(&json!([]), Some("table"), &config());
        assert_eq!(empty[0].confidence, 0.3);
    }

    #[test]
    fn test_limit() {
        let config = SuggestConfig::default().with_limit(Some(1));

        let suggestions = suggest(&json!({"value": 1, "max": 2}), None, &config);

        assert_eq!(kinds(&suggestions), vec!["progress"]);
    }

    #[test]
    fn test_auto_spec() {
        let data = json!([{"name": "A", "value": 30}, {"name": "B", "value": 70}]);

        let spec = auto_spec(&data, &config()).unwrap();

        assert_eq!(spec.kind, "chart.bar");
        assert_eq!(spec.data.as_ref().map(|d| d.len()), Some(2));
        assert_eq!(
            spec.mapping.and_then(|m| m.category),
            Some("name".to_string())
        );
    }

    #[test]
    fn test_fuzzy_kind() {
        assert_eq!(fuzzy_kind("chart.barr", &config()), Some("chart.bar"));
        assert_eq!(fuzzy_kind("Chart.Line", &config()), Some("chart.line"));
        assert_eq!(fuzzy_kind("tble", &config()), Some("table"));
        assert_eq!(fuzzy_kind("tabel", &config()), None);
        assert_eq!(fuzzy_kind("metric", &config()), Some("metric"));
        assert_eq!(fuzzy_kind("xyzabcdef", &config()), None);
        assert_eq!(fuzzy_kind("", &config()), None);
    }

    #[test]
    fn test_rule_tables_are_sorted() {
        for rules in [RECORD_RULES, SEQUENCE_RULES] {
            assert!(rules.windows(2).all(|w| w[0].confidence >= w[1].confidence));
            for rule in rules {
                assert!(catalog::is_known(rule.kind), "{} not registered", rule.kind);
            }
        }
    }

    // =============================================================================
    // Property-based Tests
    // =============================================================================

    /// Suggestion lists are sorted by non-increasing confidence.
    fn check_suggestions_sorted(data: &Value) {
        let suggestions = suggest(data, None, &config());

        assert!(
            suggestions
                .windows(2)
                .all(|w| w[0].confidence >= w[1].confidence)
        );
        for suggestion in &suggestions {
            assert!((0.0..=1.0).contains(&suggestion.confidence));
        }
    }

    /// Fuzzy correction never returns a kind beyond the allowed distance.
    fn check_fuzzy_within_threshold(name: &str) {
        let config = config();
        if let Some(kind) = fuzzy_kind(name, &config) {
            let needle = name.trim().to_lowercase();
            let allowed = config.max_edit_distance(needle.chars().count());
            assert!(strsim::levenshtein(&needle, kind) <= allowed);
        }
    }

    fn arb_data() -> impl Strategy<Value = Value> {
        let scalar = prop_oneof![
            any::<i16>().prop_map(|n| json!(n)),
            "[a-z]{0,6}".prop_map(|s| json!(s)),
            Just(json!("2024-03-01")),
            any::<bool>().prop_map(|b| json!(b)),
        ];
        let record = prop::collection::vec(
            (
                prop_oneof![
                    Just("value".to_string()),
                    Just("max".to_string()),
                    Just("title".to_string()),
                    Just("date".to_string()),
                    "[a-z]{1,5}",
                ],
                scalar,
            ),
            0..6,
        )
        .prop_map(|pairs| Value::Object(pairs.into_iter().collect()));
        prop_oneof![
            record.clone(),
            prop::collection::vec(record, 0..10).prop_map(Value::Array),
        ]
    }

    // =============================================================================
    // Proptest Wrappers
    // =============================================================================

    proptest! {
        #[test]
        fn suggestions_sorted(data in arb_data()) {
            check_suggestions_sorted(&data);
        }

        #[test]
        fn fuzzy_within_threshold(name in "[a-zA-Z.]{0,14}") {
            check_fuzzy_within_threshold(&name);
        }
    }
}
