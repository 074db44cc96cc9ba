//! Centralized data-shape detection.
//!
//! Mapping inference, kind suggestion and the validator's mapping
//! cross-check all look at data the same way: take the first record as a
//! sample and classify its keys by the JSON type of their values.
//! [`DataShape`] is that single view; nothing else in the workspace sniffs
//! record types on its own.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::spec::{Data, Record};

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // 2024-01, 2024-01-05, 2024-01-05T10:00:00Z, 2024-01-05 10:00
        r"^\d{4}-\d{2}(-\d{2})?([T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?)?$",
        // 1/5/2024, 01/05/24
        r"^\d{1,2}/\d{1,2}/\d{2,4}$",
        // Jan 2024, January 5, 2024, Sept. 12 2023
        r"(?i)^(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?(\s+\d{1,2},?)?\s+\d{4}$",
        // Q1 2024, 2024-Q1, 2024 Q1
        r"(?i)^(q[1-4]\s+\d{4}|\d{4}[-\s]?q[1-4])$",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("date pattern is a valid regex"))
    .collect()
});

/// Returns `true` when `text` looks like a calendar date or timestamp.
pub fn is_date_like(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && DATE_PATTERNS.iter().any(|re| re.is_match(text))
}

/// A classified view of a data sample.
///
/// Key lists preserve the declaration order of the sample record.
#[derive(Debug, Clone, PartialEq)]
pub struct DataShape<'a> {
    sample: &'a Record,
    is_sequence: bool,
    len: usize,
    keys: Vec<&'a str>,
    string_fields: Vec<&'a str>,
    numeric_fields: Vec<&'a str>,
    boolean_fields: Vec<&'a str>,
    date_fields: Vec<&'a str>,
}

impl<'a> DataShape<'a> {
    /// Analyze typed spec data. An empty sequence has no shape.
    pub fn of_data(data: &'a Data) -> Option<Self> {
        let sample = data.sample()?;
        Some(Self::classify(sample, data.is_sequence(), data.len()))
    }

    /// Analyze loosely-typed JSON.
    ///
    /// Returns `None` for anything that is not a record or a non-empty
    /// array whose first element is a record.
    pub fn of_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::Object(record) => Some(Self::classify(record, false, 1)),
            Value::Array(items) => {
                let sample = items.first()?.as_object()?;
                Some(Self::classify(sample, true, items.len()))
            }
            _ => None,
        }
    }

    fn classify(sample: &'a Record, is_sequence: bool, len: usize) -> Self {
        let mut shape = Self {
            sample,
            is_sequence,
            len,
            keys: Vec::with_capacity(sample.len()),
            string_fields: Vec::new(),
            numeric_fields: Vec::new(),
            boolean_fields: Vec::new(),
            date_fields: Vec::new(),
        };

        for (key, value) in sample {
            let key = key.as_str();
            shape.keys.push(key);
            match value {
                Value::String(text) => {
                    shape.string_fields.push(key);
                    if is_date_like(text) {
                        shape.date_fields.push(key);
                    }
                }
                Value::Number(_) => shape.numeric_fields.push(key),
                Value::Bool(_) => shape.boolean_fields.push(key),
                _ => {}
            }
        }
        shape
    }

    /// The sampled record.
    pub fn sample(&self) -> &'a Record {
        self.sample
    }

    /// Returns `true` when the data is a sequence of records.
    pub fn is_sequence(&self) -> bool {
        self.is_sequence
    }

    /// Number of records in the data.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the sample has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// All sample keys in declaration order.
    pub fn keys(&self) -> &[&'a str] {
        &self.keys
    }

    /// Keys whose sampled value is a string.
    pub fn string_fields(&self) -> &[&'a str] {
        &self.string_fields
    }

    /// Keys whose sampled value is a number.
    pub fn numeric_fields(&self) -> &[&'a str] {
        &self.numeric_fields
    }

    /// Keys whose sampled value is a boolean.
    pub fn boolean_fields(&self) -> &[&'a str] {
        &self.boolean_fields
    }

    /// String keys whose sampled value looks like a date.
    pub fn date_fields(&self) -> &[&'a str] {
        &self.date_fields
    }

    /// Returns `true` if the sample has `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.sample.contains_key(key)
    }

    /// Returns `true` if the sample has `key` with a numeric value.
    pub fn has_numeric(&self, key: &str) -> bool {
        self.numeric_fields.contains(&key)
    }

    /// Returns `true` if the sample has `key` with a string value.
    pub fn has_string(&self, key: &str) -> bool {
        self.string_fields.contains(&key)
    }

    /// The first key among `candidates` present in the sample, in candidate order.
    pub fn first_present(&self, candidates: &[&str]) -> Option<&'a str> {
        candidates
            .iter()
            .find_map(|c| self.keys.iter().find(|k| **k == *c).copied())
    }
}
