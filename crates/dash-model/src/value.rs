//! Cell values and records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single typed cell.
///
/// Numeric cells that failed normalization hold `NaN`; accessors that feed
/// scale computation never hand that sentinel out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Finite numeric content, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// String form used for control options and selection comparison.
    pub fn label(&self) -> String {
        match self {
            Self::Number(v) => format_numeric(*v),
            Self::Text(v) => v.clone(),
            Self::Missing => String::new(),
        }
    }

    /// Returns true when this value equals a selected control value.
    ///
    /// Text compares exactly; numbers compare numerically so that a `"2023"`
    /// radio value selects the year `2023.0`.
    pub fn matches(&self, selection: &str) -> bool {
        match self {
            Self::Text(v) => v == selection,
            Self::Number(v) => selection
                .trim()
                .parse::<f64>()
                .is_ok_and(|parsed| parsed == *v),
            Self::Missing => false,
        }
    }
}

/// Formats a floating-point number without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Formats a number with `,` thousands separators, keeping at most three
/// fractional digits.
pub fn format_thousands(v: f64) -> String {
    if !v.is_finite() {
        return format_numeric(v);
    }
    let rounded = (v * 1000.0).round() / 1000.0;
    let plain = format_numeric(rounded.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (plain.as_str(), None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// One immutable row of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mainly for fixtures.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    #[must_use]
    pub fn with_text(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(field, Value::Text(value.into()))
    }

    #[must_use]
    pub fn with_number(self, field: impl Into<String>, value: f64) -> Self {
        self.with(field, Value::Number(value))
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_text)
    }

    /// Finite numeric value of `field`; NaN sentinels read as absent.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_number)
    }

    /// Control-option label of `field`, `None` when absent, missing or a
    /// degraded numeric cell.
    pub fn label(&self, field: &str) -> Option<String> {
        match self.get(field) {
            None | Some(Value::Missing) => None,
            Some(Value::Number(v)) if !v.is_finite() => None,
            Some(value) => Some(value.label()),
        }
    }

    pub fn matches(&self, field: &str, selection: &str) -> bool {
        self.get(field).is_some_and(|value| value.matches(selection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_labels_drop_trailing_zeros() {
        assert_eq!(format_numeric(2000.0), "2000");
        assert_eq!(format_numeric(10.50), "10.5");
        assert_eq!(format_numeric(0.0), "0");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(1_234_567.0), "1,234,567");
        assert_eq!(format_thousands(-12_345.0), "-12,345");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1234.5), "1,234.5");
    }

    #[test]
    fn numbers_match_numeric_selections() {
        let year = Value::Number(2023.0);
        assert!(year.matches("2023"));
        assert!(year.matches("2023.0"));
        assert!(!year.matches("2022"));
        assert!(!Value::Number(f64::NAN).matches("NaN"));
    }

    #[test]
    fn nan_is_never_exposed_as_number() {
        let record = Record::new()
            .with_number("value", f64::NAN)
            .with_number("year", 2001.0);
        assert_eq!(record.number("value"), None);
        assert_eq!(record.number("year"), Some(2001.0));
        assert_eq!(record.label("year").as_deref(), Some("2001"));
        assert_eq!(record.label("absent"), None);
        assert_eq!(record.label("value"), None);
    }
}
