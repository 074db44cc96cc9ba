//! The static registry of known widget kinds.
//!
//! Each entry records the kind's category, a description, the data shape it
//! expects, the mapping and option keys it documents, and one or more
//! canned example specs. Examples are stored once as canonical JSON;
//! [`template`] and [`examples`] hand out fresh copies.

use std::sync::LazyLock;

use indexmap::IndexMap;
use log::warn;
use serde::Serialize;
use serde_json::{Value, json};

use widgetry_core::spec::Spec;

/// Grouping used by the help overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Chart,
    Data,
    Display,
    Input,
    Layout,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 5] = [
        Category::Chart,
        Category::Data,
        Category::Display,
        Category::Input,
        Category::Layout,
    ];

    /// The wire name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Chart => "chart",
            Category::Data => "data",
            Category::Display => "display",
            Category::Input => "input",
            Category::Layout => "layout",
        }
    }
}

/// The data shape a kind requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataExpectation {
    /// An array of records.
    Sequence,
    /// A single record object.
    Record,
    /// No requirement; data is optional.
    Any,
}

/// A catalog entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindInfo {
    pub kind: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub data: DataExpectation,
    pub mapping_keys: &'static [&'static str],
    pub option_keys: &'static [&'static str],
    #[serde(skip)]
    examples: Vec<Value>,
}

impl KindInfo {
    /// The canonical example specs. Clone before handing out.
    pub fn example_values(&self) -> &[Value] {
        &self.examples
    }
}

static CATALOG: LazyLock<IndexMap<&'static str, KindInfo>> = LazyLock::new(build_catalog);

/// Look up a kind by its exact identifier.
pub fn lookup(kind: &str) -> Option<&'static KindInfo> {
    CATALOG.get(kind)
}

/// Returns `true` if `kind` is registered.
pub fn is_known(kind: &str) -> bool {
    CATALOG.contains_key(kind)
}

/// Every registered kind in registry order.
pub fn kinds() -> impl Iterator<Item = &'static KindInfo> {
    CATALOG.values()
}

/// A fresh copy of the first example spec for `kind`.
///
/// Returns `None` for an unknown kind. Mutating the result never affects
/// the registry or later calls.
pub fn template(kind: &str) -> Option<Spec> {
    let example = lookup(kind)?.examples.first()?;
    to_spec(kind, example)
}

/// Fresh copies of every example spec for `kind`; empty for an unknown kind.
pub fn examples(kind: &str) -> Vec<Spec> {
    lookup(kind)
        .map(|info| {
            info.examples
                .iter()
                .filter_map(|example| to_spec(kind, example))
                .collect()
        })
        .unwrap_or_default()
}

fn to_spec(kind: &str, example: &Value) -> Option<Spec> {
    match Spec::from_value(example.clone()) {
        Ok(spec) => Some(spec),
        Err(err) => {
            warn!(kind, err:% = err; "Catalog example is not a readable spec");
            None
        }
    }
}

fn entry(
    kind: &'static str,
    category: Category,
    data: DataExpectation,
    description: &'static str,
    mapping_keys: &'static [&'static str],
    option_keys: &'static [&'static str],
    examples: Vec<Value>,
) -> (&'static str, KindInfo) {
    (
        kind,
        KindInfo {
            kind,
            category,
            description,
            data,
            mapping_keys,
            option_keys,
            examples,
        },
    )
}

fn build_catalog() -> IndexMap<&'static str, KindInfo> {
    use Category::*;
    use DataExpectation::*;

    IndexMap::from_iter([
        // Charts
        entry(
            "chart.bar",
            Chart,
            Sequence,
            "Compare values across categories with vertical bars.",
            &["category", "value", "color"],
            &["stacked", "horizontal", "format"],
            vec![json!({
                "kind": "chart.bar",
                "title": "Revenue by region",
                "data": [
                    {"region": "North", "revenue": 120},
                    {"region": "South", "revenue": 95},
                    {"region": "West", "revenue": 143}
                ],
                "mapping": {"category": "region", "value": "revenue"}
            })],
        ),
        entry(
            "chart.line",
            Chart,
            Sequence,
            "Show a trend over an ordered or time-based axis.",
            &["category", "value", "color"],
            &["smooth", "format"],
            vec![json!({
                "kind": "chart.line",
                "title": "Monthly revenue and costs",
                "data": [
                    {"month": "2024-01", "revenue": 410, "costs": 280},
                    {"month": "2024-02", "revenue": 455, "costs": 300},
                    {"month": "2024-03", "revenue": 520, "costs": 310}
                ],
                "mapping": {"category": "month", "value": ["revenue", "costs"]}
            })],
        ),
        entry(
            "chart.area",
            Chart,
            Sequence,
            "A line chart with the area under each series filled.",
            &["category", "value", "color"],
            &["stacked", "format"],
            vec![json!({
                "kind": "chart.area",
                "title": "Traffic by source",
                "data": [
                    {"week": "2024-01-01", "organic": 1200, "paid": 400},
                    {"week": "2024-01-08", "organic": 1350, "paid": 520}
                ],
                "mapping": {"category": "week", "value": ["organic", "paid"]},
                "options": {"stacked": true}
            })],
        ),
        entry(
            "chart.scatter",
            Chart,
            Sequence,
            "Plot two numeric measures against each other.",
            &["x", "y", "size", "color", "category", "value"],
            &["format"],
            vec![json!({
                "kind": "chart.scatter",
                "title": "Height vs. weight",
                "data": [
                    {"height": 172, "weight": 68},
                    {"height": 181, "weight": 82},
                    {"height": 165, "weight": 59}
                ],
                "mapping": {"x": "height", "y": "weight"}
            })],
        ),
        entry(
            "chart.pie",
            Chart,
            Sequence,
            "Show parts of a whole for a small number of categories.",
            &["label", "value"],
            &["donut", "format"],
            vec![json!({
                "kind": "chart.pie",
                "title": "Browser share",
                "data": [
                    {"browser": "Firefox", "share": 0.22},
                    {"browser": "Chrome", "share": 0.64},
                    {"browser": "Safari", "share": 0.14}
                ],
                "mapping": {"label": "browser", "value": "share"},
                "options": {"format": "percent"}
            })],
        ),
        entry(
            "chart.funnel",
            Chart,
            Sequence,
            "Show how a quantity narrows through ordered stages.",
            &["label", "value"],
            &["format"],
            vec![json!({
                "kind": "chart.funnel",
                "title": "Signup funnel",
                "data": [
                    {"stage": "Visited", "count": 5000},
                    {"stage": "Signed up", "count": 900},
                    {"stage": "Activated", "count": 420}
                ],
                "mapping": {"label": "stage", "value": "count"}
            })],
        ),
        entry(
            "chart.radar",
            Chart,
            Sequence,
            "Compare several measures per axis on a radial grid.",
            &["axis", "value"],
            &["filled"],
            vec![json!({
                "kind": "chart.radar",
                "title": "Skill profile",
                "data": [
                    {"skill": "Design", "alice": 8, "bob": 5},
                    {"skill": "Backend", "alice": 6, "bob": 9},
                    {"skill": "Testing", "alice": 7, "bob": 7}
                ],
                "mapping": {"axis": "skill", "value": ["alice", "bob"]}
            })],
        ),
        entry(
            "chart.heatmap",
            Chart,
            Sequence,
            "Color a grid of two categorical dimensions by a numeric value.",
            &["x", "y", "value"],
            &["colorScale"],
            vec![json!({
                "kind": "chart.heatmap",
                "title": "Commits by weekday and hour",
                "data": [
                    {"day": "Mon", "hour": "09", "commits": 14},
                    {"day": "Mon", "hour": "10", "commits": 21},
                    {"day": "Tue", "hour": "09", "commits": 9}
                ],
                "mapping": {"x": "hour", "y": "day", "value": "commits"}
            })],
        ),
        entry(
            "chart.boxplot",
            Chart,
            Sequence,
            "Summarize distributions with the five-number summary.",
            &["category", "min", "q1", "median", "q3", "max"],
            &["format"],
            vec![json!({
                "kind": "chart.boxplot",
                "title": "Response time by service",
                "data": [
                    {"service": "api", "min": 12, "q1": 30, "median": 45, "q3": 70, "max": 210},
                    {"service": "auth", "min": 8, "q1": 15, "median": 22, "q3": 35, "max": 90}
                ],
                "mapping": {
                    "category": "service",
                    "min": "min",
                    "q1": "q1",
                    "median": "median",
                    "q3": "q3",
                    "max": "max"
                }
            })],
        ),
        // Data
        entry(
            "table",
            Data,
            Sequence,
            "Show records as rows with one column per field.",
            &["columns"],
            &["pageSize", "sortable"],
            vec![json!({
                "kind": "table",
                "title": "Team",
                "data": [
                    {"name": "Ada", "role": "Engineer", "since": 2019},
                    {"name": "Grace", "role": "Manager", "since": 2016}
                ],
                "mapping": {
                    "columns": [{"key": "name", "label": "Name"}, "role", "since"]
                },
                "options": {"sortable": true}
            })],
        ),
        entry(
            "list",
            Data,
            Sequence,
            "Show records as a vertical list of primary and secondary text.",
            &["primary", "secondary"],
            &["dividers"],
            vec![json!({
                "kind": "list",
                "title": "Open tickets",
                "data": [
                    {"subject": "Login fails on Safari", "owner": "Ada"},
                    {"subject": "Export times out", "owner": "Grace"}
                ],
                "mapping": {"primary": "subject", "secondary": "owner"}
            })],
        ),
        entry(
            "timeline",
            Data,
            Sequence,
            "Show dated events in chronological order.",
            &[],
            &["orientation"],
            vec![json!({
                "kind": "timeline",
                "title": "Project milestones",
                "data": [
                    {"date": "2024-01-05", "title": "Kickoff"},
                    {"date": "2024-03-18", "title": "Beta"},
                    {"date": "2024-06-01", "title": "Launch"}
                ]
            })],
        ),
        // Display
        entry(
            "metric",
            Display,
            Record,
            "Show a single headline number.",
            &[],
            &["format", "unit", "trend"],
            vec![
                json!({
                    "kind": "metric",
                    "title": "Active users",
                    "data": {"value": 1284, "unit": "users"},
                    "options": {"format": "compact"}
                }),
                json!({
                    "kind": "metric",
                    "title": "Revenue",
                    "data": {"value": 48200.5},
                    "options": {"format": "currency"}
                }),
            ],
        ),
        entry(
            "progress",
            Display,
            Record,
            "Show completion of a value toward a maximum.",
            &[],
            &["format", "label"],
            vec![json!({
                "kind": "progress",
                "title": "Storage used",
                "data": {"value": 64, "max": 100},
                "options": {"format": "number"}
            })],
        ),
        entry(
            "gauge",
            Display,
            Record,
            "Show a value on a dial between a minimum and a maximum.",
            &[],
            &["format", "thresholds"],
            vec![json!({
                "kind": "gauge",
                "title": "CPU load",
                "data": {"value": 72, "min": 0, "max": 100}
            })],
        ),
        entry(
            "keyvalue",
            Display,
            Record,
            "Show the fields of one record as label/value pairs.",
            &[],
            &["columns"],
            vec![json!({
                "kind": "keyvalue",
                "title": "Subscription",
                "data": {"plan": "Pro", "seats": 12, "renewal": "2024-09-01"}
            })],
        ),
        entry(
            "card",
            Display,
            Record,
            "Show a titled block of text from one record.",
            &[],
            &["image"],
            vec![json!({
                "kind": "card",
                "data": {"title": "Welcome", "body": "Your workspace is ready."}
            })],
        ),
        entry(
            "markdown",
            Display,
            Any,
            "Render formatted text.",
            &[],
            &["content"],
            vec![json!({
                "kind": "markdown",
                "options": {"content": "## Release notes\n\n- Faster exports\n- Dark mode"}
            })],
        ),
        // Input
        entry(
            "form",
            Input,
            Any,
            "Collect input through fields and action buttons.",
            &[],
            &["submitUrl"],
            vec![
                json!({
                    "kind": "form",
                    "title": "Contact us",
                    "miniLanguageText": "@name*(Name): []\n@email*(Email): @[placeholder=you@example.com]\n@message(Message): T4[maxLength=1000]\n@[submit \"Send\"]\n@[cancel \"Cancel\"]"
                }),
                json!({
                    "kind": "form",
                    "title": "Preferences",
                    "fields": [
                        {"id": "theme", "label": "Theme", "type": "select", "options": ["light", "dark"]},
                        {"id": "digest", "label": "Weekly digest", "type": "toggle"}
                    ],
                    "actions": [
                        {"id": "submit", "label": "Save", "style": "primary"}
                    ]
                }),
            ],
        ),
        // Layout
        entry(
            "compose",
            Layout,
            Any,
            "Arrange child widgets in a stack, grid, row or tabs.",
            &[],
            &[],
            vec![json!({
                "kind": "compose",
                "title": "Overview",
                "layout": "grid",
                "columns": 2,
                "children": [
                    {
                        "kind": "metric",
                        "title": "Orders",
                        "data": {"value": 312}
                    },
                    {
                        "kind": "chart.bar",
                        "title": "Orders by channel",
                        "data": [
                            {"channel": "Web", "orders": 210},
                            {"channel": "Store", "orders": 102}
                        ]
                    }
                ]
            })],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_size_and_order() {
        let kinds: Vec<_> = kinds().map(|info| info.kind).collect();

        assert_eq!(kinds.len(), 20);
        assert_eq!(kinds[0], "chart.bar");
        assert_eq!(kinds[19], "compose");
    }

    #[test]
    fn test_every_kind_has_examples_of_its_kind() {
        for info in kinds() {
            assert!(!info.example_values().is_empty(), "{} has no examples", info.kind);
            for spec in examples(info.kind) {
                assert_eq!(spec.kind, info.kind);
            }
            assert_eq!(examples(info.kind).len(), info.example_values().len());
        }
    }

    #[test]
    fn test_template_unknown_kind() {
        assert!(template("chart.sankey").is_none());
        assert!(examples("chart.sankey").is_empty());
    }

    #[test]
    fn test_template_copy_isolation() {
        let mut first = template("chart.bar").unwrap();
        let second = template("chart.bar").unwrap();
        assert_eq!(first, second);

        first.title = Some("Changed".to_string());
        first.data = None;

        assert_eq!(template("chart.bar").unwrap(), second);
    }

    #[test]
    fn test_lookup() {
        let info = lookup("metric").unwrap();

        assert_eq!(info.category, Category::Display);
        assert_eq!(info.data, DataExpectation::Record);
        assert!(is_known("compose"));
        assert!(!is_known("Chart.Bar"));
    }
}
