//! Value-to-display-string conversion.
//!
//! Pure functions for numbers, currency, percentages, compact magnitudes,
//! byte sizes and dates. Nothing here depends on the rest of the crate.
//!
//! # Example
//!
//! ```
//! # use widgetry_core::format::{format_bytes, format_currency, format_percent};
//! assert_eq!(format_currency(1234.5, "USD", 2), "$1,234.50");
//! assert_eq!(format_percent(0.256, 1), "25.6%");
//! assert_eq!(format_bytes(1536), "1.5 KB");
//! ```

use std::{fmt, str::FromStr};

use log::trace;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

const SHORT_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const MEDIUM_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");
const LONG_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// A named display format for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Number,
    Currency,
    Percent,
    Compact,
    Bytes,
    Date,
}

/// Error returned when a format name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value format `{0}`")]
pub struct UnknownFormat(pub String);

impl FromStr for ValueFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" => Ok(ValueFormat::Number),
            "currency" => Ok(ValueFormat::Currency),
            "percent" => Ok(ValueFormat::Percent),
            "compact" => Ok(ValueFormat::Compact),
            "bytes" => Ok(ValueFormat::Bytes),
            "date" => Ok(ValueFormat::Date),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueFormat::Number => "number",
            ValueFormat::Currency => "currency",
            ValueFormat::Percent => "percent",
            ValueFormat::Compact => "compact",
            ValueFormat::Bytes => "bytes",
            ValueFormat::Date => "date",
        };
        write!(f, "{name}")
    }
}

/// How dates are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `2024-01-05`
    Short,
    /// `Jan 5, 2024`
    #[default]
    Medium,
    /// `January 5, 2024`
    Long,
}

/// Defaults applied by [`format_value`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// ISO 4217 currency code.
    pub currency: String,
    /// Fraction digits for numbers, currency and percentages.
    pub decimals: usize,
    pub date_style: DateStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            decimals: 2,
            date_style: DateStyle::Medium,
        }
    }
}

/// Format a number with fixed `decimals` and `,` thousands separators.
///
/// Non-finite values render as the empty string.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return String::new();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // No sign on values that round to zero
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Format an amount of money in `currency`.
///
/// Known codes get a symbol prefix; JPY never shows fraction digits.
/// Unknown codes are written in front of the amount.
pub fn format_currency(value: f64, currency: &str, decimals: usize) -> String {
    let code = currency.to_ascii_uppercase();
    let (symbol, decimals) = match code.as_str() {
        "USD" => (Some("$"), decimals),
        "EUR" => (Some("€"), decimals),
        "GBP" => (Some("£"), decimals),
        "JPY" => (Some("¥"), 0),
        _ => (None, decimals),
    };

    let amount = format_number(value.abs(), decimals);
    if amount.is_empty() {
        return amount;
    }
    let sign = if value < 0.0 && amount.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    match symbol {
        Some(symbol) => format!("{sign}{symbol}{amount}"),
        None => format!("{sign}{code} {amount}"),
    }
}

/// Format a fraction as a percentage (`0.256` → `25.6%` at one decimal).
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    let number = format_number(fraction * 100.0, decimals);
    if number.is_empty() {
        number
    } else {
        format!("{number}%")
    }
}

/// Format a magnitude with a K/M/B/T suffix and at most one decimal.
pub fn format_compact(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

    if !value.is_finite() {
        return String::new();
    }

    let magnitude = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    for (i, (scale, suffix)) in UNITS.iter().enumerate() {
        if magnitude >= *scale {
            let scaled = (magnitude / scale * 10.0).round() / 10.0;
            // Rounding can carry into the next unit (999.96K -> 1M)
            if scaled >= 1000.0 && i > 0 {
                let (next_scale, next_suffix) = UNITS[i - 1];
                return format!("{sign}{}{next_suffix}", trim_decimal(magnitude / next_scale));
            }
            return format!("{sign}{}{suffix}", trim_decimal(scaled));
        }
    }
    format!("{sign}{}", trim_decimal(magnitude))
}

/// Format a byte count using 1024-based units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

/// Format an ISO-8601 date or datetime string.
///
/// Only the calendar date is rendered. Text that does not start with a
/// `YYYY-MM-DD` date is returned unchanged.
pub fn format_date(text: &str, style: DateStyle) -> String {
    let Some(date) = text
        .get(..10)
        .and_then(|prefix| Date::parse(prefix, SHORT_DATE).ok())
    else {
        return text.to_string();
    };

    let description = match style {
        DateStyle::Short => SHORT_DATE,
        DateStyle::Medium => MEDIUM_DATE,
        DateStyle::Long => LONG_DATE,
    };
    date.format(description)
        .unwrap_or_else(|_| text.to_string())
}

/// Format a JSON value in the given format.
///
/// Numeric formats accept numbers and numeric strings; anything else is
/// rendered as plain text. `null` renders as the empty string.
pub fn format_value(value: &Value, format: ValueFormat, options: &FormatOptions) -> String {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if format != ValueFormat::Date => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match (format, number) {
        (ValueFormat::Number, Some(n)) => format_number(n, options.decimals),
        (ValueFormat::Currency, Some(n)) => format_currency(n, &options.currency, options.decimals),
        (ValueFormat::Percent, Some(n)) => format_percent(n, options.decimals),
        (ValueFormat::Compact, Some(n)) => format_compact(n),
        (ValueFormat::Bytes, Some(n)) if n >= 0.0 => format_bytes(n.round() as u64),
        (ValueFormat::Date, _) => match value {
            Value::String(s) => format_date(s, options.date_style),
            other => plain_text(other),
        },
        _ => {
            trace!(format:?; "Value not formattable, rendering as text");
            plain_text(value)
        }
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn trim_decimal(value: f64) -> String {
    let text = format!("{value:.1}");
    text.strip_suffix(".0").map(str::to_string).unwrap_or(text)
}
