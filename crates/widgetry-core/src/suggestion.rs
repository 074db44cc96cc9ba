//! Ranked widget-kind suggestions.

use serde::Serialize;

use crate::mapping::Mapping;

/// A candidate widget kind for some data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<Mapping>,

    /// Heuristic score in `[0, 1]`.
    pub confidence: f64,

    /// Human-readable justification.
    pub reason: String,
}

impl Suggestion {
    pub fn new(
        kind: impl Into<String>,
        mapping: Option<Mapping>,
        confidence: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            mapping,
            confidence: confidence.clamp(0.0, 1.0),
            reason: reason.into(),
        }
    }
}

/// Sort suggestions by descending confidence.
///
/// The sort is stable: suggestions with equal confidence keep the order in
/// which they were computed.
pub fn rank(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_descending_and_stable() {
        let ranked = rank(vec![
            Suggestion::new("table", None, 0.5, "generic"),
            Suggestion::new("chart.bar", None, 0.85, "category + value"),
            Suggestion::new("list", None, 0.5, "strings"),
            Suggestion::new("metric", None, 0.95, "value key"),
        ]);

        let kinds: Vec<_> = ranked.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds, vec!["metric", "chart.bar", "table", "list"]);
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(Suggestion::new("x", None, 1.7, "").confidence, 1.0);
        assert_eq!(Suggestion::new("x", None, -0.2, "").confidence, 0.0);
    }
}
