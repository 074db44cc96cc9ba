//! Shape-driven mapping inference.
//!
//! Rules are looked up by kind family and only ever inspect the sample
//! record (the first element of a sequence). Inference is deterministic:
//! the same kind and data always yield the same mapping.

use log::trace;

use widgetry_core::{
    mapping::{Channel, Column, Mapping},
    shape::DataShape,
    spec::Data,
};

/// Field names of the five-number summary, in channel order.
pub const FIVE_NUMBER_SUMMARY: [&str; 5] = ["min", "q1", "median", "q3", "max"];

/// Infer a mapping for `kind` from the shape of `data`.
///
/// Returns `None` for kinds with no meaningful mapping, for empty data,
/// and when the data lacks the fields a kind family needs.
///
/// # Example
///
/// ```
/// # use widgetry::infer::infer;
/// use widgetry_core::{mapping::Channel, spec::Data};
///
/// let data: Data = serde_json::from_str(
///     r#"[{"name": "A", "value": 30}, {"name": "B", "value": 70}]"#,
/// ).unwrap();
/// let mapping = infer("chart.bar", &data).unwrap();
///
/// assert_eq!(mapping.category.as_deref(), Some("name"));
/// assert_eq!(mapping.value, Some(Channel::Fields(vec!["value".into()])));
/// ```
pub fn infer(kind: &str, data: &Data) -> Option<Mapping> {
    let shape = DataShape::of_data(data)?;
    infer_from_shape(kind, &shape)
}

pub(crate) fn infer_from_shape(kind: &str, shape: &DataShape<'_>) -> Option<Mapping> {
    let mapping = match kind {
        "chart.bar" | "chart.line" | "chart.area" => category_value(shape),
        "chart.scatter" => category_value(shape).or_else(|| xy(shape)),
        "chart.pie" | "chart.funnel" => label_value(shape),
        "chart.radar" => axis_values(shape),
        "chart.heatmap" => grid(shape),
        "chart.boxplot" => five_number(shape),
        "table" => columns(shape),
        "list" => primary_secondary(shape),
        _ => None,
    };
    trace!(kind, mapping:?; "Inferred mapping");
    mapping
}

fn names(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

/// Category is the first date-like string field, else the first string field.
fn category_field<'a>(shape: &DataShape<'a>) -> Option<&'a str> {
    shape
        .date_fields()
        .first()
        .or_else(|| shape.string_fields().first())
        .copied()
}

fn category_value(shape: &DataShape<'_>) -> Option<Mapping> {
    let category = category_field(shape)?;
    if shape.numeric_fields().is_empty() {
        return None;
    }
    Some(Mapping {
        category: Some(category.to_string()),
        value: Some(Channel::Fields(names(shape.numeric_fields()))),
        ..Mapping::default()
    })
}

fn xy(shape: &DataShape<'_>) -> Option<Mapping> {
    let [x, y, ..] = shape.numeric_fields() else {
        return None;
    };
    Some(Mapping {
        x: Some(x.to_string()),
        y: Some(y.to_string()),
        ..Mapping::default()
    })
}

fn label_value(shape: &DataShape<'_>) -> Option<Mapping> {
    let label = shape.string_fields().first()?;
    let value = shape.numeric_fields().first()?;
    Some(Mapping {
        label: Some(label.to_string()),
        value: Some(Channel::Field(value.to_string())),
        ..Mapping::default()
    })
}

fn axis_values(shape: &DataShape<'_>) -> Option<Mapping> {
    let axis = shape.string_fields().first()?;
    if shape.numeric_fields().is_empty() {
        return None;
    }
    Some(Mapping {
        axis: Some(axis.to_string()),
        value: Some(Channel::Fields(names(shape.numeric_fields()))),
        ..Mapping::default()
    })
}

fn grid(shape: &DataShape<'_>) -> Option<Mapping> {
    let [x, y, ..] = shape.string_fields() else {
        return None;
    };
    let value = shape.numeric_fields().first()?;
    Some(Mapping {
        x: Some(x.to_string()),
        y: Some(y.to_string()),
        value: Some(Channel::Field(value.to_string())),
        ..Mapping::default()
    })
}

fn five_number(shape: &DataShape<'_>) -> Option<Mapping> {
    let numeric = shape.numeric_fields();
    if numeric.len() < FIVE_NUMBER_SUMMARY.len() {
        return None;
    }

    let by_name = FIVE_NUMBER_SUMMARY
        .iter()
        .all(|name| shape.has_numeric(name));
    let [min, q1, median, q3, max] = if by_name {
        FIVE_NUMBER_SUMMARY
    } else {
        [numeric[0], numeric[1], numeric[2], numeric[3], numeric[4]]
    };

    Some(Mapping {
        category: shape.string_fields().first().map(|f| f.to_string()),
        min: Some(min.to_string()),
        q1: Some(q1.to_string()),
        median: Some(median.to_string()),
        q3: Some(q3.to_string()),
        max: Some(max.to_string()),
        ..Mapping::default()
    })
}

fn columns(shape: &DataShape<'_>) -> Option<Mapping> {
    if shape.keys().is_empty() {
        return None;
    }
    Some(Mapping {
        columns: Some(shape.keys().iter().map(|key| Column::keyed(*key)).collect()),
        ..Mapping::default()
    })
}

fn primary_secondary(shape: &DataShape<'_>) -> Option<Mapping> {
    let mut strings = shape.string_fields().iter();
    let primary = strings.next()?;
    Some(Mapping {
        primary: Some(primary.to_string()),
        secondary: strings.next().map(|f| f.to_string()),
        ..Mapping::default()
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    fn data(value: serde_json::Value) -> Data {
        serde_json::from_value(value).unwrap()
    }

    fn fields(names: &[&str]) -> Option<Channel> {
        Some(Channel::Fields(names.iter().map(|n| n.to_string()).collect()))
    }

    #[test]
    fn test_bar_category_and_value_list() {
        let mapping = infer(
            "chart.bar",
            &data(json!([{"name": "A", "value": 30}, {"name": "B", "value": 70}])),
        )
        .unwrap();

        assert_eq!(mapping, Mapping {
            category: Some("name".to_string()),
            value: fields(&["value"]),
            ..Mapping::default()
        });
    }

    #[test]
    fn test_line_prefers_date_like_category() {
        let mapping = infer(
            "chart.line",
            &data(json!([{"region": "EU", "month": "2024-01", "sales": 3, "returns": 1}])),
        )
        .unwrap();

        assert_eq!(mapping.category.as_deref(), Some("month"));
        assert_eq!(mapping.value, fields(&["sales", "returns"]));
    }

    #[test]
    fn test_category_family_requires_string_and_number() {
        assert!(infer("chart.area", &data(json!([{"a": 1, "b": 2}]))).is_none());
        assert!(infer("chart.bar", &data(json!([{"a": "x", "b": "y"}]))).is_none());
    }

    #[test]
    fn test_scatter_falls_back_to_xy() {
        let mapping = infer(
            "chart.scatter",
            &data(json!([{"height": 170, "weight": 65, "age": 30}])),
        )
        .unwrap();

        assert_eq!(mapping.x.as_deref(), Some("height"));
        assert_eq!(mapping.y.as_deref(), Some("weight"));
        assert!(mapping.category.is_none());

        assert!(infer("chart.scatter", &data(json!([{"height": 170}]))).is_none());
    }

    #[test]
    fn test_pie_label_value() {
        let mapping = infer(
            "chart.pie",
            &data(json!([{"browser": "Firefox", "share": 0.2, "users": 10}])),
        )
        .unwrap();

        assert_eq!(mapping.label.as_deref(), Some("browser"));
        assert_eq!(mapping.value, Some(Channel::Field("share".to_string())));
        assert!(infer("chart.funnel", &data(json!([{"stage": "Visit"}]))).is_none());
    }

    #[test]
    fn test_radar_axis() {
        let mapping = infer(
            "chart.radar",
            &data(json!([{"skill": "Design", "alice": 8, "bob": 5}])),
        )
        .unwrap();

        assert_eq!(mapping.axis.as_deref(), Some("skill"));
        assert_eq!(mapping.value, fields(&["alice", "bob"]));
    }

    #[test]
    fn test_heatmap_needs_two_strings() {
        let mapping = infer(
            "chart.heatmap",
            &data(json!([{"day": "Mon", "hour": "09", "count": 4}])),
        )
        .unwrap();

        assert_eq!(mapping.x.as_deref(), Some("day"));
        assert_eq!(mapping.y.as_deref(), Some("hour"));
        assert_eq!(mapping.value, Some(Channel::Field("count".to_string())));

        assert!(infer("chart.heatmap", &data(json!([{"day": "Mon", "count": 4}]))).is_none());
    }

    #[test]
    fn test_boxplot_prefers_summary_names() {
        let mapping = infer(
            "chart.boxplot",
            &data(json!([{
                "group": "api", "p99": 300, "max": 210, "q3": 70,
                "median": 45, "q1": 30, "min": 12
            }])),
        )
        .unwrap();

        assert_eq!(mapping.category.as_deref(), Some("group"));
        assert_eq!(mapping.min.as_deref(), Some("min"));
        assert_eq!(mapping.q1.as_deref(), Some("q1"));
        assert_eq!(mapping.median.as_deref(), Some("median"));
        assert_eq!(mapping.q3.as_deref(), Some("q3"));
        assert_eq!(mapping.max.as_deref(), Some("max"));
    }

    #[test]
    fn test_boxplot_takes_first_five_numeric() {
        let mapping = infer(
            "chart.boxplot",
            &data(json!([{"a": 1, "b": 2, "c": 3, "d": 4, "e": 5, "f": 6}])),
        )
        .unwrap();

        assert_eq!(mapping.min.as_deref(), Some("a"));
        assert_eq!(mapping.max.as_deref(), Some("e"));
        assert!(mapping.category.is_none());

        assert!(infer("chart.boxplot", &data(json!([{"a": 1, "b": 2, "c": 3, "d": 4}]))).is_none());
    }

    #[test]
    fn test_table_columns_in_declaration_order() {
        let mapping = infer(
            "table",
            &data(json!([{"name": "Ada", "active": true, "tags": ["x"], "age": 36}])),
        )
        .unwrap();

        let keys: Vec<_> = mapping
            .columns
            .unwrap()
            .into_iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(keys, vec!["name", "active", "tags", "age"]);
    }

    #[test]
    fn test_list_primary_secondary() {
        let mapping = infer(
            "list",
            &data(json!([{"id": 1, "title": "First", "owner": "Ada", "note": "x"}])),
        )
        .unwrap();

        assert_eq!(mapping.primary.as_deref(), Some("title"));
        assert_eq!(mapping.secondary.as_deref(), Some("owner"));

        let single = infer("list", &data(json!([{"title": "Only"}]))).unwrap();
        assert!(single.secondary.is_none());
        assert!(infer("list", &data(json!([{"id": 1}]))).is_none());
    }

    #[test]
    fn test_other_kinds_and_empty_data() {
        assert!(infer("metric", &data(json!({"value": 1}))).is_none());
        assert!(infer("form", &data(json!([{"a": "b"}]))).is_none());
        assert!(infer("chart.bar", &data(json!([]))).is_none());
    }

    #[test]
    fn test_single_record_is_sampled() {
        let mapping = infer("chart.bar", &data(json!({"name": "A", "value": 1}))).unwrap();

        assert_eq!(mapping.category.as_deref(), Some("name"));
    }

    // =============================================================================
    // Proptest Wrappers
    // =============================================================================

    fn arb_record() -> impl Strategy<Value = serde_json::Value> {
        prop::collection::vec(
            (
                "[a-z]{1,6}",
                prop_oneof![
                    any::<i32>().prop_map(|n| json!(n)),
                    "[a-zA-Z ]{0,8}".prop_map(|s| json!(s)),
                    Just(json!("2024-01-05")),
                    any::<bool>().prop_map(|b| json!(b)),
                ],
            ),
            0..8,
        )
        .prop_map(|pairs| serde_json::Value::Object(pairs.into_iter().collect()))
    }

    /// Inferring twice on the same input yields equal mappings.
    fn check_inference_deterministic(kind: &str, record: serde_json::Value) {
        let data = data(json!([record]));

        assert_eq!(infer(kind, &data), infer(kind, &data));
    }

    /// Every field an inferred mapping references exists in the sample.
    fn check_inferred_fields_exist(kind: &str, record: serde_json::Value) {
        let data = data(json!([record.clone()]));
        let Some(mapping) = infer(kind, &data) else {
            return;
        };
        let sample = record.as_object().unwrap();

        for (channel, names) in mapping.field_references() {
            for name in names {
                assert!(sample.contains_key(name), "{channel} -> {name} not in sample");
            }
        }
    }

    proptest! {
        #[test]
        fn inference_deterministic(
            kind in prop::sample::select(vec![
                "chart.bar", "chart.scatter", "chart.pie", "chart.radar",
                "chart.heatmap", "chart.boxplot", "table", "list", "metric",
            ]),
            record in arb_record(),
        ) {
            check_inference_deterministic(kind, record);
        }

        #[test]
        fn inferred_fields_exist(
            kind in prop::sample::select(vec![
                "chart.line", "chart.scatter", "chart.funnel", "chart.radar",
                "chart.heatmap", "chart.boxplot", "table", "list",
            ]),
            record in arb_record(),
        ) {
            check_inferred_fields_exist(kind, record);
        }
    }
}
