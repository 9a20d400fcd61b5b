use crate::models::CellValue;
use serde::{Deserialize, Serialize};

/// What a sample value that fails to parse becomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnparseablePolicy {
    /// Treat the value as missing
    #[default]
    Missing,
    /// Legacy behaviour: substitute 0.0
    Zero,
}

impl UnparseablePolicy {
    pub fn apply(&self, value: &CellValue) -> Option<f64> {
        match self {
            UnparseablePolicy::Missing => normalize_value(value),
            UnparseablePolicy::Zero => normalize_value_or_zero(value),
        }
    }
}

/// Replace the letters `O`/`o` with the digit `0`.
///
/// Survey sheets were typed by hand and regularly contain `8O%` for `80%`.
pub fn correct_ocr_digits(text: &str) -> String {
    text.replace(['O', 'o'], "0")
}

/// Parse a sample value written as text.
///
/// Percentages (`"85%"`, `"12,5 %"`) become fractions; anything else must be a
/// plain float. Returns `None` when the text is not a number.
pub fn parse_numeric_text(text: &str) -> Option<f64> {
    let corrected = correct_ocr_digits(text);

    let parsed = if corrected.contains('%') {
        corrected
            .replace(',', ".")
            .trim()
            .trim_matches('%')
            .trim()
            .parse::<f64>()
            .ok()
            .map(|v| v / 100.0)
    } else {
        corrected.trim().parse::<f64>().ok()
    };

    parsed.filter(|v| !v.is_nan())
}

/// Normalize a sample cell to a float; `None` marks a missing or unparseable value
///
/// # Examples
/// ```
/// use sensor_dashboard::models::CellValue;
/// use sensor_dashboard::utils::values::normalize_value;
///
/// assert_eq!(normalize_value(&CellValue::from("8O%")), Some(0.8));
/// assert_eq!(normalize_value(&CellValue::from("abc")), None);
/// ```
pub fn normalize_value(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Empty => None,
        CellValue::Number(n) if n.is_nan() => None,
        CellValue::Number(n) => Some(*n),
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::Text(s) if s.trim().is_empty() => None,
        CellValue::Text(s) => parse_numeric_text(s),
        CellValue::DateTime(_) | CellValue::Error(_) => None,
    }
}

/// Like [`normalize_value`] but unparseable content becomes `0.0`.
///
/// Empty cells stay missing.
pub fn normalize_value_or_zero(value: &CellValue) -> Option<f64> {
    if value.is_empty() {
        return None;
    }
    match value {
        CellValue::Number(n) if n.is_nan() => None,
        _ => Some(normalize_value(value).unwrap_or(0.0)),
    }
}

/// Two-decimal rendering of an optional value, `n/a` when missing
pub fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: Option<f64>, expected: f64) -> bool {
        actual.is_some_and(|v| (v - expected).abs() < 1e-12)
    }

    #[test]
    fn test_percentages() {
        assert!(close(normalize_value(&"85%".into()), 0.85));
        assert!(close(normalize_value(&"12,5%".into()), 0.125));
        assert!(close(normalize_value(&" 40 % ".into()), 0.40));
    }

    #[test]
    fn test_letter_o_correction() {
        assert_eq!(correct_ocr_digits("8O%"), "80%");
        assert_eq!(correct_ocr_digits("1o.5"), "10.5");
        assert!(close(normalize_value(&"8O%".into()), 0.80));
        assert!(close(normalize_value(&"1O5".into()), 105.0));
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(normalize_value(&CellValue::Number(42.0)), Some(42.0));
        assert_eq!(normalize_value(&"42".into()), Some(42.0));
        assert_eq!(normalize_value(&" 3.5 ".into()), Some(3.5));
        assert_eq!(normalize_value(&CellValue::Bool(true)), Some(1.0));
    }

    #[test]
    fn test_unparseable_is_missing() {
        assert_eq!(normalize_value(&"abc".into()), None);
        assert_eq!(normalize_value(&"12,5".into()), None);
        assert_eq!(normalize_value(&CellValue::Error("#DIV/0!".to_string())), None);
        assert_eq!(normalize_value(&"nan".into()), None);
    }

    #[test]
    fn test_zero_fallback() {
        assert_eq!(normalize_value_or_zero(&"abc".into()), Some(0.0));
        assert_eq!(normalize_value_or_zero(&CellValue::Number(42.0)), Some(42.0));
        assert!(close(normalize_value_or_zero(&"85%".into()), 0.85));
        assert_eq!(normalize_value_or_zero(&CellValue::Empty), None);
    }

    #[test]
    fn test_policy_dispatch() {
        let cell = CellValue::from("n/a");
        assert_eq!(UnparseablePolicy::Missing.apply(&cell), None);
        assert_eq!(UnparseablePolicy::Zero.apply(&cell), Some(0.0));
        assert_eq!(UnparseablePolicy::default(), UnparseablePolicy::Missing);
    }

    #[test]
    fn test_empty_cells_stay_missing() {
        assert_eq!(normalize_value(&CellValue::Empty), None);
        assert_eq!(normalize_value(&"  ".into()), None);
    }
}
