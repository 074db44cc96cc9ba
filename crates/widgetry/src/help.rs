//! Kind documentation for hosts and authors.

use serde::Serialize;
use serde_json::Value;

use crate::{
    catalog::{self, Category, DataExpectation, KindInfo},
    config::SuggestConfig,
    strings::{StringTable, text},
    suggest,
};

/// The result of a help request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Help {
    /// Every kind grouped by category.
    Overview {
        title: String,
        categories: Vec<CategoryHelp>,
    },
    /// One kind's catalog entry.
    Kind(KindHelp),
    /// The requested kind is not registered.
    UnknownKind {
        kind: String,
        message: String,
        suggestion: Option<&'static str>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryHelp {
    pub category: Category,
    pub label: String,
    pub kinds: Vec<KindSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindSummary {
    pub kind: &'static str,
    pub description: &'static str,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindHelp {
    pub kind: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub data: String,
    pub mapping_keys: &'static [&'static str],
    pub option_keys: &'static [&'static str],
    pub example: Option<Value>,
}

fn data_text(strings: &StringTable, data: DataExpectation) -> String {
    let key = match data {
        DataExpectation::Sequence => "data.sequence",
        DataExpectation::Record => "data.record",
        DataExpectation::Any => "data.any",
    };
    text(strings, key).to_string()
}

fn kind_help(info: &'static KindInfo, strings: &StringTable) -> KindHelp {
    KindHelp {
        kind: info.kind,
        category: info.category,
        description: info.description,
        data: data_text(strings, info.data),
        mapping_keys: info.mapping_keys,
        option_keys: info.option_keys,
        example: info.example_values().first().cloned(),
    }
}

/// Help for one kind, or an overview of every kind when `kind` is `None`.
pub fn help(kind: Option<&str>, strings: &StringTable, config: &SuggestConfig) -> Help {
    let Some(kind) = kind else {
        return overview(strings);
    };

    if let Some(info) = catalog::lookup(kind) {
        return Help::Kind(kind_help(info, strings));
    }

    let suggestion = suggest::fuzzy_kind(kind, config);
    let mut message = text(strings, "help.unknown_kind").replace("{kind}", kind);
    message.push(' ');
    match suggestion {
        Some(candidate) => {
            message.push_str(&text(strings, "help.did_you_mean").replace("{suggestion}", candidate))
        }
        None => message.push_str(text(strings, "help.no_suggestion")),
    }

    Help::UnknownKind {
        kind: kind.to_string(),
        message,
        suggestion,
    }
}

fn overview(strings: &StringTable) -> Help {
    let categories = Category::ALL
        .into_iter()
        .map(|category| CategoryHelp {
            category,
            label: text(strings, &format!("category.{}", category.as_str())).to_string(),
            kinds: catalog::kinds()
                .filter(|info| info.category == category)
                .map(|info| KindSummary {
                    kind: info.kind,
                    description: info.description,
                    data: data_text(strings, info.data),
                })
                .collect(),
        })
        .collect();

    Help::Overview {
        title: text(strings, "help.title").to_string(),
        categories,
    }
}
