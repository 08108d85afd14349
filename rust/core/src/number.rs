// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lenient numeric fields
//!
//! Model exports mix JSON numbers and numeric strings for the same field
//! (`"Height": 300` next to `"Height": "300"`). Every numeric field goes
//! through [`lenient`], which accepts both and turns anything else into
//! `None` so the geometry layer can substitute its defaults.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Parse a numeric string with `.` as the decimal separator, ignoring
/// surrounding whitespace. Non-finite results are rejected.
#[inline]
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    fast_float::parse::<f64, _>(trimmed)
        .ok()
        .filter(|value| value.is_finite())
}

/// Deserialize an optional number that may be encoded as a string.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Number(value)) if value.is_finite() => Some(value),
        Some(NumberOrText::Text(text)) => parse_number(&text),
        _ => None,
    })
}

/// Deserialize an optional label that may be encoded as a number.
pub fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Number(value)) => Some(format_number(value)),
        Some(NumberOrText::Text(text)) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    })
}

/// Deserialize an optional boolean flag, accepting `true`/`false`, `0`/`1`
/// and their string spellings.
pub fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let raw = Option::<Flag>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Flag::Bool(value)) => Some(value),
        Some(Flag::Number(value)) => Some(value != 0.0),
        Some(Flag::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Deserialize a list that may be absent or `null`.
pub fn seq_or_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Format a number the way it would be written as an identifier:
/// integral values lose their fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient")]
        value: Option<f64>,
        #[serde(default, deserialize_with = "lenient_label")]
        label: Option<String>,
        #[serde(default, deserialize_with = "lenient_flag")]
        flag: Option<bool>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_number_accepts_plain_and_padded_text() {
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number("  40 "), Some(40.0));
        assert_eq!(parse_number("1e2"), Some(100.0));
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("12,5"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_lenient_number_field() {
        assert_eq!(probe(r#"{"value": 30}"#).value, Some(30.0));
        assert_eq!(probe(r#"{"value": "30.5"}"#).value, Some(30.5));
        assert_eq!(probe(r#"{"value": "n/a"}"#).value, None);
        assert_eq!(probe(r#"{"value": null}"#).value, None);
        assert_eq!(probe(r#"{"value": [1, 2]}"#).value, None);
        assert_eq!(probe(r#"{}"#).value, None);
    }

    #[test]
    fn test_lenient_label_field() {
        assert_eq!(probe(r#"{"label": 7}"#).label.as_deref(), Some("7"));
        assert_eq!(probe(r#"{"label": " B12 "}"#).label.as_deref(), Some("B12"));
        assert_eq!(probe(r#"{"label": ""}"#).label, None);
    }

    #[test]
    fn test_lenient_flag_field() {
        assert_eq!(probe(r#"{"flag": true}"#).flag, Some(true));
        assert_eq!(probe(r#"{"flag": 0}"#).flag, Some(false));
        assert_eq!(probe(r#"{"flag": "True"}"#).flag, Some(true));
        assert_eq!(probe(r#"{"flag": "maybe"}"#).flag, None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
    }
}
