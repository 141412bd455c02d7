//! Lenient input normalization.
//!
//! Every value entering the settlement engine passes through here first.
//! The policy is uniform graceful degradation: malformed numbers, dates or
//! JSON coerce to 0 / `None` / empty rather than failing, because a billing
//! report must never abort over one bad record.

use crate::core::models::ExpenseItem;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// First numeric token in a free-text value, comma or dot decimals.
static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("valid regex literal"));

/// Strip diacritics from a string and trim surrounding whitespace.
///
/// Decomposes to NFD and drops combining marks, so "São Paulo" and
/// "Sao Paulo" compare equal after folding.
#[must_use]
pub fn fold_diacritics(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Fold diacritics and lowercase. The canonical comparison form for
/// Portuguese status, result and type text.
#[must_use]
pub fn normalize(value: &str) -> String {
    fold_diacritics(value).to_lowercase()
}

/// Coerce a JSON value to a finite number.
///
/// Accepts numbers and numeric strings using either comma or dot as the
/// decimal separator. Anything absent or non-finite yields 0.
#[must_use]
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_decimal(s),
        _ => 0.0,
    }
}

/// Parse a decimal string, accepting comma as the decimal separator.
/// Returns 0 for anything that does not parse to a finite number.
#[must_use]
pub fn parse_decimal(text: &str) -> f64 {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// Parse an ISO-like timestamp, returning `None` instead of an error when
/// the value is absent or unparseable.
///
/// Accepted shapes: RFC 3339 with offset, a naive `YYYY-MM-DDTHH:MM:SS`
/// (taken as UTC, with an optional space instead of `T` and optional
/// fractional seconds), and a bare `YYYY-MM-DD` date (midnight UTC).
#[must_use]
pub fn to_datetime(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Elapsed time between two instants in fractional hours.
///
/// Returns 0 when either bound is missing or the difference is
/// non-positive.
#[must_use]
pub fn hours_between(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> f64 {
    let (Some(start), Some(end)) = (start, end) else {
        return 0.0;
    };
    let millis = end.signed_duration_since(start).num_milliseconds();
    if millis > 0 {
        millis as f64 / 3_600_000.0
    } else {
        0.0
    }
}

/// Extract the decimal-hours figure from a free-text allowance description
/// such as "3 horas" or "2,5h". Returns 0 when no numeric token is found.
#[must_use]
pub fn parse_allowance_hours(text: Option<&str>) -> f64 {
    let Some(text) = text else { return 0.0 };
    NUMERIC_TOKEN
        .find(text)
        .map(|token| parse_decimal(token.as_str()))
        .unwrap_or(0.0)
}

/// Parse declared expense items from a JSON value.
///
/// Accepts an array of `{descricao, valor}` objects or the same array
/// JSON-encoded as a string. Malformed JSON and non-array shapes yield an
/// empty list.
#[must_use]
pub fn parse_expense_items(value: Option<&Value>) -> Vec<ExpenseItem> {
    let Some(value) = value else {
        return Vec::new();
    };

    let items = match value {
        Value::Array(items) => items.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .map(|item| ExpenseItem {
            description: item
                .get("descricao")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            amount: item.get("valor").map_or(0.0, to_number),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fold_diacritics_strips_marks() {
        assert_eq!(fold_diacritics("São Paulo"), "Sao Paulo");
        assert_eq!(fold_diacritics("  Apropriação Indébita "), "Apropriacao Indebita");
    }

    #[test]
    fn normalize_lowercases() {
        assert_eq!(normalize("Não Recuperado"), "nao recuperado");
    }

    #[test]
    fn to_number_accepts_comma_decimals() {
        assert_eq!(to_number(&json!("1234,56")), 1234.56);
        assert_eq!(to_number(&json!("78.9")), 78.9);
        assert_eq!(to_number(&json!(42)), 42.0);
    }

    #[test]
    fn to_number_degrades_to_zero() {
        assert_eq!(to_number(&json!(null)), 0.0);
        assert_eq!(to_number(&json!("not a number")), 0.0);
        assert_eq!(to_number(&json!({"nested": true})), 0.0);
    }

    #[test]
    fn to_datetime_accepts_common_shapes() {
        assert!(to_datetime(&json!("2025-03-10T14:30:00Z")).is_some());
        assert!(to_datetime(&json!("2025-03-10T14:30:00-03:00")).is_some());
        assert!(to_datetime(&json!("2025-03-10 14:30:00")).is_some());
        assert!(to_datetime(&json!("2025-03-10")).is_some());
    }

    #[test]
    fn to_datetime_rejects_garbage_quietly() {
        assert!(to_datetime(&json!("10/03/2025")).is_none());
        assert!(to_datetime(&json!("")).is_none());
        assert!(to_datetime(&json!(null)).is_none());
    }

    #[test]
    fn hours_between_positive_span() {
        let start = to_datetime(&json!("2025-03-10T10:00:00Z"));
        let end = to_datetime(&json!("2025-03-10T14:30:00Z"));
        assert!((hours_between(start, end) - 4.5).abs() < 1e-9);
    }

    #[test]
    fn hours_between_missing_or_inverted_is_zero() {
        let start = to_datetime(&json!("2025-03-10T14:00:00Z"));
        let end = to_datetime(&json!("2025-03-10T10:00:00Z"));
        assert_eq!(hours_between(start, end), 0.0);
        assert_eq!(hours_between(None, end), 0.0);
        assert_eq!(hours_between(start, None), 0.0);
    }

    #[test]
    fn allowance_hours_first_token() {
        assert_eq!(parse_allowance_hours(Some("3 horas")), 3.0);
        assert_eq!(parse_allowance_hours(Some("2,5h por acionamento")), 2.5);
        assert_eq!(parse_allowance_hours(Some("sem franquia")), 0.0);
        assert_eq!(parse_allowance_hours(None), 0.0);
    }

    #[test]
    fn expense_items_from_array() {
        let value = json!([
            {"descricao": "Pedágio", "valor": "12,50"},
            {"descricao": "Combustível", "valor": 80}
        ]);
        let items = parse_expense_items(Some(&value));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].amount, 12.5);
        assert_eq!(items[1].amount, 80.0);
    }

    #[test]
    fn expense_items_from_encoded_string() {
        let value = json!("[{\"descricao\":\"Guincho\",\"valor\":150}]");
        let items = parse_expense_items(Some(&value));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount, 150.0);
    }

    #[test]
    fn expense_items_malformed_is_empty() {
        assert!(parse_expense_items(Some(&json!("{broken"))).is_empty());
        assert!(parse_expense_items(Some(&json!(17))).is_empty());
        assert!(parse_expense_items(None).is_empty());
    }
}
